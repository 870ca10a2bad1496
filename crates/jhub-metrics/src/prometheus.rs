//! Prometheus text exposition format.
//!
//! Renders metric families into the Prometheus text exposition format
//! (version 0.0.4) for scraping by a Prometheus server or compatible agent.

use crate::metric::MetricFamily;

/// Render metric families into Prometheus text format.
///
/// `# HELP` and `# TYPE` lines are written for every family, including
/// those with no samples.
pub fn render_prometheus(families: &[MetricFamily]) -> String {
    let mut out = String::new();

    for family in families {
        let desc = &family.desc;
        out.push_str(&format!("# HELP {} {}\n", desc.name, escape_help(&desc.help)));
        out.push_str(&format!("# TYPE {} {}\n", desc.name, desc.kind.as_str()));

        for s in &family.samples {
            out.push_str(&desc.name);
            if !s.labels.is_empty() {
                let labels: Vec<String> = s
                    .labels
                    .iter()
                    .map(|(name, value)| format!("{name}=\"{}\"", escape_label_value(value)))
                    .collect();
                out.push('{');
                out.push_str(&labels.join(","));
                out.push('}');
            }
            out.push(' ');
            out.push_str(&format_value(s.value));
            out.push('\n');
        }
    }

    out
}

fn escape_help(help: &str) -> String {
    help.replace('\\', "\\\\").replace('\n', "\\n")
}

fn escape_label_value(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "+Inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::{MetricDesc, MetricKind, Sample};

    fn active_user_family(users: &[(&str, f64)]) -> MetricFamily {
        MetricFamily {
            desc: MetricDesc::new(
                "jupyterhub_active_user",
                "Current active users.",
                MetricKind::Untyped,
            )
            .with_label("userName"),
            samples: users
                .iter()
                .map(|(name, value)| Sample::new(*value).with_label("userName", *name))
                .collect(),
        }
    }

    #[test]
    fn render_empty() {
        let output = render_prometheus(&[active_user_family(&[])]);
        // Should still have type declarations.
        assert_eq!(
            output,
            "# HELP jupyterhub_active_user Current active users.\n\
             # TYPE jupyterhub_active_user untyped\n"
        );
    }

    #[test]
    fn render_no_families() {
        assert_eq!(render_prometheus(&[]), "");
    }

    #[test]
    fn render_single_user() {
        let output = render_prometheus(&[active_user_family(&[(
            "alice",
            1_705_314_600_123_456_000_i64 as f64,
        )])]);

        assert!(output.contains("jupyterhub_active_user{userName=\"alice\"} 1705314600123456000\n"));
    }

    #[test]
    fn render_multiple_users() {
        let output = render_prometheus(&[active_user_family(&[("alice", 1.0), ("bob", 0.0)])]);

        assert!(output.contains("jupyterhub_active_user{userName=\"alice\"} 1\n"));
        assert!(output.contains("jupyterhub_active_user{userName=\"bob\"} 0\n"));
    }

    #[test]
    fn render_unlabelled_gauge() {
        let desc = MetricDesc::new(
            "jupyterhub_exporter_last_scrape_error",
            "Whether the last scrape failed.",
            MetricKind::Gauge,
        );
        let output = render_prometheus(&[MetricFamily::single(desc, 1.0)]);

        assert!(output.contains("# TYPE jupyterhub_exporter_last_scrape_error gauge\n"));
        assert!(output.contains("\njupyterhub_exporter_last_scrape_error 1\n"));
    }

    #[test]
    fn label_values_are_escaped() {
        let output = render_prometheus(&[active_user_family(&[("we\"ird\\na\nme", 2.0)])]);
        assert!(output.contains(r#"{userName="we\"ird\\na\nme"} 2"#));
    }

    #[test]
    fn help_is_escaped() {
        let desc = MetricDesc::new("x", "line one\nline \\ two", MetricKind::Gauge);
        let output = render_prometheus(&[MetricFamily::single(desc, 0.5)]);
        assert!(output.starts_with("# HELP x line one\\nline \\\\ two\n"));
    }

    #[test]
    fn special_float_values() {
        assert_eq!(format_value(f64::NAN), "NaN");
        assert_eq!(format_value(f64::INFINITY), "+Inf");
        assert_eq!(format_value(f64::NEG_INFINITY), "-Inf");
        assert_eq!(format_value(0.25), "0.25");
    }

    #[test]
    fn render_format_is_prometheus_compatible() {
        let output = render_prometheus(&[active_user_family(&[("alice", 1.0), ("bob", 2.0)])]);

        // Every non-empty, non-comment line should match: metric_name{labels} value
        for line in output.lines() {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            assert!(
                line.contains('{') && line.contains('}'),
                "line should have labels: {line}"
            );
            let value = line.rsplit(' ').next().unwrap();
            assert!(value.parse::<f64>().is_ok(), "value should parse: {line}");
        }
    }
}
