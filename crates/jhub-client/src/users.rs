//! Hub user records.
//!
//! Decodes the `/users` listing and reduces it to the set of users with a
//! running server, keyed by name.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::Deserialize;
use tracing::debug;

/// Layout of the hub's `last_activity` field: exactly six fractional
/// digits, literal `Z`.
pub const LAST_ACTIVITY_FORMAT: &str = "%Y-%m-%dT%H:%M:%S.%6fZ";

/// One entry of the hub's user listing.
///
/// Only the fields the exporter reads are decoded; the hub sends many more.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserRecord {
    pub name: String,
    /// URL path of the user's default server, empty or null when stopped.
    #[serde(default)]
    pub server: Option<String>,
    #[serde(default)]
    pub last_activity: Option<String>,
}

impl UserRecord {
    /// A user is active while their server field is non-empty.
    pub fn is_active(&self) -> bool {
        self.server.as_deref().is_some_and(|s| !s.is_empty())
    }
}

/// Decode a `/users` response body.
pub fn decode_users(body: &[u8]) -> serde_json::Result<Vec<UserRecord>> {
    serde_json::from_slice(body)
}

/// Parse a `last_activity` value into nanoseconds since the Unix epoch.
///
/// Returns `None` for anything not matching [`LAST_ACTIVITY_FORMAT`],
/// including whole-second values without a fraction.
pub fn parse_last_activity(value: &str) -> Option<i64> {
    NaiveDateTime::parse_from_str(value, LAST_ACTIVITY_FORMAT)
        .ok()
        .and_then(|t| t.and_utc().timestamp_nanos_opt())
}

/// Active users of one scrape: name → last activity (ns since epoch).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveUserSet {
    users: BTreeMap<String, i64>,
}

impl ActiveUserSet {
    /// Keep the active records. A missing or unparsable timestamp is
    /// reported as 0; the user is not dropped. Duplicate names keep the
    /// last record seen.
    pub fn from_records(records: impl IntoIterator<Item = UserRecord>) -> Self {
        let mut users = BTreeMap::new();

        for record in records.into_iter().filter(UserRecord::is_active) {
            let raw = record.last_activity.as_deref().unwrap_or_default();
            let last_activity = parse_last_activity(raw).unwrap_or_else(|| {
                debug!(user = %record.name, value = %raw, "unparsable last_activity, reporting 0");
                0
            });
            users.insert(record.name, last_activity);
        }

        Self { users }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Last activity of `name`, if active.
    pub fn get(&self, name: &str) -> Option<i64> {
        self.users.get(name).copied()
    }

    /// Users in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.users.iter().map(|(name, ts)| (name.as_str(), *ts))
    }
}
