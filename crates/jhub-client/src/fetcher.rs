//! Hub API fetch.
//!
//! Performs a single GET against a hub endpoint and hands back the raw
//! response body. There is no timeout and no retry: a hung upstream
//! blocks the caller until the connection is dropped.

use std::future::Future;

use bytes::Bytes;
use http::header::USER_AGENT;
use http::{Method, Request, Uri};
use http_body_util::{BodyExt, Empty};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use tracing::debug;

use crate::error::FetchResult;

const USER_AGENT_VALUE: &str = concat!("jupyterhub-exporter/", env!("CARGO_PKG_VERSION"));

/// Header name/value pairs attached to an outgoing request.
pub type Headers = Vec<(String, String)>;

/// Source of raw hub API responses.
///
/// Implemented by [`HttpFetcher`] for real traffic; tests inject canned
/// bodies or errors.
pub trait Fetch: Send + Sync {
    /// GET `url` with `headers` and return the full response body.
    fn fetch(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> impl Future<Output = FetchResult<Bytes>> + Send;
}

/// Plain-HTTP fetcher backed by the hyper-util pooled client.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: Client<HttpConnector, Empty<Bytes>>,
}

impl HttpFetcher {
    pub fn new() -> Self {
        let client = Client::builder(TokioExecutor::new()).build_http();
        Self { client }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str, headers: &[(String, String)]) -> FetchResult<Bytes> {
        let uri: Uri = url.parse()?;

        let mut builder = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .header(USER_AGENT, USER_AGENT_VALUE);
        for (name, value) in headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let req = builder.body(Empty::<Bytes>::new())?;

        let resp = self.client.request(req).await?;
        let status = resp.status();
        if !status.is_success() {
            // The decoder gets the body regardless.
            debug!(%status, %url, "hub api returned non-2xx");
        }

        let body = resp.into_body().collect().await?.to_bytes();
        debug!(%url, bytes = body.len(), "hub api response received");
        Ok(body)
    }
}

/// URL of the user listing endpoint under `host`.
pub fn users_url(host: &str) -> String {
    format!("{}/users", host.trim_end_matches('/'))
}

/// Headers for an authenticated hub request. An empty token sends none.
pub fn auth_headers(token: &str) -> Headers {
    if token.is_empty() {
        Vec::new()
    } else {
        vec![("Authorization".to_string(), format!("token {token}"))]
    }
}
