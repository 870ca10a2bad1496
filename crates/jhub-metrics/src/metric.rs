//! Metric shapes and the collector seam.

use std::future::Future;

/// Prometheus metric type reported on the `# TYPE` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Gauge,
    Untyped,
}

impl MetricKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Gauge => "gauge",
            MetricKind::Untyped => "untyped",
        }
    }
}

/// Name, help text, type and label names of a metric family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricDesc {
    pub name: String,
    pub help: String,
    pub kind: MetricKind,
    pub labels: Vec<String>,
}

impl MetricDesc {
    pub fn new(name: impl Into<String>, help: impl Into<String>, kind: MetricKind) -> Self {
        Self {
            name: name.into(),
            help: help.into(),
            kind,
            labels: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }
}

/// One value of a family, with its label pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub labels: Vec<(String, String)>,
    pub value: f64,
}

impl Sample {
    pub fn new(value: f64) -> Self {
        Self {
            labels: Vec::new(),
            value,
        }
    }

    pub fn with_label(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.push((name.into(), value.into()));
        self
    }
}

/// A descriptor and the samples gathered for it in one scrape.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricFamily {
    pub desc: MetricDesc,
    pub samples: Vec<Sample>,
}

impl MetricFamily {
    /// A family holding a single unlabelled sample.
    pub fn single(desc: MetricDesc, value: f64) -> Self {
        Self {
            desc,
            samples: vec![Sample::new(value)],
        }
    }
}

/// Produces metric families on demand, once per scrape.
pub trait Collector: Send + Sync {
    /// Shapes of every family `collect()` can emit. Must not touch the
    /// network.
    fn describe(&self) -> Vec<MetricDesc>;

    /// Gather current values. Failures are folded into the output rather
    /// than returned.
    fn collect(&self) -> impl Future<Output = Vec<MetricFamily>> + Send;
}
