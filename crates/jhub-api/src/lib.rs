//! jhub-api — HTTP surface of the JupyterHub exporter.
//!
//! # Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/` | Landing page linking to `/metrics` |
//! | GET | `/metrics` | Prometheus exposition |

pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use jhub_metrics::Collector;

/// Path the metrics are served on.
pub const METRICS_PATH: &str = "/metrics";

/// Shared state for API handlers.
pub struct ApiState<C> {
    pub collector: Arc<C>,
}

impl<C> Clone for ApiState<C> {
    fn clone(&self) -> Self {
        Self {
            collector: Arc::clone(&self.collector),
        }
    }
}

/// Build the exporter router around `collector`.
pub fn build_router<C: Collector + 'static>(collector: C) -> Router {
    let state = ApiState {
        collector: Arc::new(collector),
    };

    Router::new()
        .route("/", get(handlers::index))
        .route(METRICS_PATH, get(handlers::prometheus_metrics::<C>))
        .with_state(state)
}
