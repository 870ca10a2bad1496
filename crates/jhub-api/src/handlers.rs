//! HTTP handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use tracing::debug;

use jhub_metrics::{Collector, render_prometheus};

use crate::ApiState;

const INDEX_HTML: &str = r#"<html>
<head><title>Jupyterhub Exporter</title></head>
<body>
<h1>Jupyterhub Exporter</h1>
<p><a href="/metrics">Metrics</a></p>
</body>
</html>
"#;

/// Prometheus text exposition content type.
pub const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// GET /
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /metrics
///
/// Always 200: collection failures show up in the metrics themselves.
pub async fn prometheus_metrics<C: Collector>(State(state): State<ApiState<C>>) -> impl IntoResponse {
    let families = state.collector.collect().await;
    let body = render_prometheus(&families);
    debug!(families = families.len(), bytes = body.len(), "served scrape");

    (
        StatusCode::OK,
        [("content-type", EXPOSITION_CONTENT_TYPE)],
        body,
    )
}
