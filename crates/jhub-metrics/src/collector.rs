//! Active-user collector — one hub fetch per scrape.
//!
//! Every `collect()` asks the hub for its user listing and reports each
//! user with a running server, valued at their last activity in
//! nanoseconds since the epoch. Upstream trouble never fails the scrape:
//! it yields zero users and raises the last-scrape-error gauge.

use std::time::Instant;

use tracing::{debug, warn};

use jhub_client::{ActiveUserSet, Fetch, Headers, auth_headers, decode_users, users_url};

use crate::error::ScrapeError;
use crate::metric::{Collector, MetricDesc, MetricFamily, MetricKind, Sample};

/// Prefix shared by every exported metric.
pub const NAMESPACE: &str = "jupyterhub";

/// Label carrying the hub user name.
pub const USER_LABEL: &str = "userName";

/// Reports active hub users, fetched fresh on every scrape.
pub struct ActiveUserCollector<F> {
    fetcher: F,
    users_url: String,
    headers: Headers,
    active_user: MetricDesc,
    last_scrape_error: MetricDesc,
    scrape_duration: MetricDesc,
}

impl<F: Fetch> ActiveUserCollector<F> {
    /// Create a collector polling `{host}/users`, authenticating with
    /// `token` when non-empty.
    pub fn new(fetcher: F, host: &str, token: &str) -> Self {
        Self {
            fetcher,
            users_url: users_url(host),
            headers: auth_headers(token),
            active_user: MetricDesc::new(
                format!("{NAMESPACE}_active_user"),
                "Current active users.",
                MetricKind::Untyped,
            )
            .with_label(USER_LABEL),
            last_scrape_error: MetricDesc::new(
                format!("{NAMESPACE}_exporter_last_scrape_error"),
                "Whether the last scrape of the hub API failed (1 for error, 0 for success).",
                MetricKind::Gauge,
            ),
            scrape_duration: MetricDesc::new(
                format!("{NAMESPACE}_exporter_scrape_duration_seconds"),
                "Time spent fetching and decoding the hub user listing.",
                MetricKind::Gauge,
            ),
        }
    }

    /// The user listing URL this collector polls.
    pub fn users_url(&self) -> &str {
        &self.users_url
    }

    /// Fetch and decode the listing, keeping active users.
    pub async fn active_users(&self) -> Result<ActiveUserSet, ScrapeError> {
        let body = self.fetcher.fetch(&self.users_url, &self.headers).await?;
        let records = decode_users(&body)?;
        Ok(ActiveUserSet::from_records(records))
    }
}

impl<F: Fetch> Collector for ActiveUserCollector<F> {
    fn describe(&self) -> Vec<MetricDesc> {
        vec![
            self.active_user.clone(),
            self.last_scrape_error.clone(),
            self.scrape_duration.clone(),
        ]
    }

    async fn collect(&self) -> Vec<MetricFamily> {
        let start = Instant::now();

        let (users, failed) = match self.active_users().await {
            Ok(users) => (users, false),
            Err(e) => {
                warn!(error = %e, url = %self.users_url, "hub scrape failed, reporting no active users");
                (ActiveUserSet::default(), true)
            }
        };
        debug!(active = users.len(), "collected active users");

        let samples = users
            .iter()
            .map(|(name, last_activity)| {
                Sample::new(last_activity as f64).with_label(USER_LABEL, name)
            })
            .collect();

        vec![
            MetricFamily {
                desc: self.active_user.clone(),
                samples,
            },
            MetricFamily::single(self.last_scrape_error.clone(), if failed { 1.0 } else { 0.0 }),
            MetricFamily::single(self.scrape_duration.clone(), start.elapsed().as_secs_f64()),
        ]
    }
}
