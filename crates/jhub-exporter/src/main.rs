//! jupyterhub-exporter — Prometheus exporter for JupyterHub.
//!
//! Polls the hub's `/users` API on every scrape and reports, per user with
//! a running server, the time of last activity.
//!
//! # Usage
//!
//! ```text
//! jupyterhub-exporter --host http://localhost:8888/hub/api --token $TOKEN
//! ```

mod config;

use std::net::IpAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser};
use tracing::{debug, info, warn};

use jhub_client::HttpFetcher;
use jhub_metrics::ActiveUserCollector;

use crate::config::{ExporterConfig, Overrides};

/// Log filter used when `RUST_LOG` is unset. `jhub` covers every library crate.
const DEFAULT_LOG_FILTER: &str = "info,jupyterhub_exporter=debug,jhub=debug";

#[derive(Parser, Debug)]
#[command(
    name = "jupyterhub-exporter",
    about = "Prometheus exporter for JupyterHub active users",
    version
)]
struct Cli {
    /// JupyterHub API base URL [default: http://localhost:8888/hub/api]
    #[arg(long, env = "JUPYTERHUB_API_URL")]
    host: Option<String>,

    /// JupyterHub API token (admin), sent as `Authorization: token <TOKEN>`.
    #[arg(long, env = "JUPYTERHUB_API_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Address to listen on [default: 0.0.0.0]
    #[arg(long)]
    bind: Option<IpAddr>,

    /// Port to listen on [default: 9225]
    #[arg(long)]
    port: Option<u16>,

    /// TOML config file with host, token, bind and port keys.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stop idle single-user servers. Accepted but not acted on.
    #[arg(
        long,
        default_value_t = true,
        num_args = 0..=1,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    stop: bool,

    /// Idle hours before a server would be stopped. Accepted but not acted on.
    #[arg(long, default_value_t = 24)]
    hours: u32,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            host: self.host.clone(),
            token: self.token.clone(),
            bind: self.bind,
            port: self.port,
        }
    }

    fn resolve_config(&self) -> anyhow::Result<ExporterConfig> {
        let base = match &self.config {
            Some(path) => ExporterConfig::from_file(path)?,
            None => ExporterConfig::default(),
        };
        let config = base.apply(self.overrides());
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER)
            }),
        )
        .init();

    let cli = Cli::parse();
    debug!(stop = cli.stop, hours = cli.hours, "idle-server flags are not acted on");

    let config = cli.resolve_config()?;
    run(config).await
}

async fn run(config: ExporterConfig) -> anyhow::Result<()> {
    info!("JupyterHub exporter starting");

    let collector = ActiveUserCollector::new(HttpFetcher::new(), &config.host, &config.token);
    info!(
        url = collector.users_url(),
        authenticated = !config.token.is_empty(),
        "active user collector initialized"
    );

    let router = jhub_api::build_router(collector);
    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(%addr, "metrics server listening");

    // Graceful shutdown on Ctrl-C.
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("JupyterHub exporter stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to install Ctrl-C handler, running until killed");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Write;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn default_log_filter_covers_library_crates() {
        assert!(tracing_subscriber::EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
        let directives: Vec<&str> = DEFAULT_LOG_FILTER.split(',').collect();
        assert!(directives.contains(&"jhub=debug"));
        assert!(directives.contains(&"jupyterhub_exporter=debug"));
    }

    #[test]
    fn cli_compat_flags_default() {
        let cli = Cli::try_parse_from(["jupyterhub-exporter"]).unwrap();
        assert!(cli.stop);
        assert_eq!(cli.hours, 24);
        assert!(cli.config.is_none());
    }

    #[test]
    fn cli_compat_flags_parse() {
        let cli =
            Cli::try_parse_from(["jupyterhub-exporter", "--stop", "false", "--hours", "6"]).unwrap();
        assert!(!cli.stop);
        assert_eq!(cli.hours, 6);
    }

    #[test]
    fn cli_bare_stop_flag() {
        let cli = Cli::try_parse_from(["jupyterhub-exporter", "--stop", "--hours", "2"]).unwrap();
        assert!(cli.stop);
        assert_eq!(cli.hours, 2);

        let cli = Cli::try_parse_from(["jupyterhub-exporter", "--stop=false"]).unwrap();
        assert!(!cli.stop);
    }

    #[test]
    fn cli_flags_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "host = \"http://file-host:8081/hub/api\"").unwrap();
        writeln!(file, "port = 9300").unwrap();
        let path = file.path().to_str().unwrap();

        let cli = Cli::try_parse_from([
            "jupyterhub-exporter",
            "--config",
            path,
            "--host",
            "http://flag-host:8081/hub/api",
            "--token",
            "abc",
        ])
        .unwrap();
        let config = cli.resolve_config().unwrap();

        assert_eq!(config.host, "http://flag-host:8081/hub/api");
        assert_eq!(config.token, "abc");
        assert_eq!(config.port, 9300);
    }

    #[test]
    fn cli_invalid_host_fails_resolution() {
        let cli = Cli::try_parse_from([
            "jupyterhub-exporter",
            "--host",
            "https://hub.example.org/hub/api",
        ])
        .unwrap();
        assert!(cli.resolve_config().is_err());
    }

    #[test]
    fn cli_rejects_bad_port() {
        assert!(Cli::try_parse_from(["jupyterhub-exporter", "--port", "99999"]).is_err());
    }
}
