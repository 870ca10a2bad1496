//! jhub-client — JupyterHub REST API access for the exporter.
//!
//! Fetches the hub's user listing and decodes it into user records.
//! The fetch side is abstracted behind the [`Fetch`] trait so collectors
//! can be exercised against a canned upstream.
//!
//! # Architecture
//!
//! ```text
//! Fetch (trait)
//!   └── HttpFetcher → GET {host}/users, raw body
//!
//! users
//!   ├── decode_users() → Vec<UserRecord>
//!   ├── parse_last_activity() → ns since epoch
//!   └── ActiveUserSet::from_records() → name → last activity
//! ```

pub mod error;
pub mod fetcher;
pub mod users;

pub use error::{FetchError, FetchResult};
pub use fetcher::{Fetch, Headers, HttpFetcher, auth_headers, users_url};
pub use users::{ActiveUserSet, UserRecord, decode_users, parse_last_activity};
