//! Exporter configuration.
//!
//! Values come from, in order of precedence: command-line flags (or their
//! environment variables), an optional TOML file, built-in defaults.
//!
//! ```toml
//! host = "http://hub.internal:8081/hub/api"
//! token = "0123456789abcdef"
//! bind = "127.0.0.1"
//! port = 9225
//! ```

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;

use anyhow::{Context, bail};
use serde::Deserialize;

pub const DEFAULT_HOST: &str = "http://localhost:8888/hub/api";
pub const DEFAULT_PORT: u16 = 9225;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExporterConfig {
    /// Hub API base URL; `/users` is appended.
    pub host: String,
    /// Hub API token. Empty means unauthenticated requests.
    pub token: String,
    pub bind: IpAddr,
    pub port: u16,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            token: String::new(),
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
        }
    }
}

/// Values given on the command line, each overriding the file/default.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub host: Option<String>,
    pub token: Option<String>,
    pub bind: Option<IpAddr>,
    pub port: Option<u16>,
}

impl ExporterConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn apply(mut self, overrides: Overrides) -> Self {
        if let Some(host) = overrides.host {
            self.host = host;
        }
        if let Some(token) = overrides.token {
            self.token = token;
        }
        if let Some(bind) = overrides.bind {
            self.bind = bind;
        }
        if let Some(port) = overrides.port {
            self.port = port;
        }
        self
    }

    /// The hub is reached over plain HTTP only.
    pub fn validate(&self) -> anyhow::Result<()> {
        let uri: http::Uri = self
            .host
            .parse()
            .with_context(|| format!("invalid hub host {:?}", self.host))?;

        match uri.scheme_str() {
            Some("http") => {}
            Some(other) => bail!("unsupported hub scheme {other:?} in {:?}, expected http", self.host),
            None => bail!("hub host {:?} has no scheme, expected http://...", self.host),
        }
        if uri.authority().is_none() {
            bail!("hub host {:?} has no authority", self.host);
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}
