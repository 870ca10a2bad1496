//! jhub-metrics — metrics for the JupyterHub exporter.
//!
//! Turns the hub's user listing into metric families on every scrape
//! and renders them in the Prometheus text exposition format.
//!
//! # Architecture
//!
//! ```text
//! ActiveUserCollector (impl Collector)
//!   ├── describe() → metric shapes, no fetch
//!   └── collect()  → Fetch → decode → ActiveUserSet → MetricFamily
//!
//! Prometheus exposition
//!   └── render_prometheus() → text/plain for /metrics endpoint
//! ```
//!
//! Nothing is cached between scrapes; each `collect()` is one upstream
//! request.

pub mod collector;
pub mod error;
pub mod metric;
pub mod prometheus;

pub use collector::{ActiveUserCollector, NAMESPACE, USER_LABEL};
pub use error::ScrapeError;
pub use metric::{Collector, MetricDesc, MetricFamily, MetricKind, Sample};
pub use prometheus::render_prometheus;
