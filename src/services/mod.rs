//! Async HTTP clients for the external services the reviewer pipeline
//! depends on. Every call is bounded by the configured request timeout and
//! degrades to an empty/default result rather than propagating a transport
//! failure to sibling reviewers — matching the "no retry, degrade
//! gracefully" rule for the overall request.

pub mod similarity;
pub mod website_credibility;
pub mod worthiness;

use std::time::Duration;

use crate::config::Config;

/// Builds the shared `reqwest::Client` used by every service client, with
/// the configured per-request timeout applied uniformly.
pub fn http_client(cfg: &Config) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(cfg.request_timeout))
        .build()
        .expect("reqwest client config is static and always valid")
}
