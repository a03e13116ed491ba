//! Client for the external per-domain credibility service (§4.3), with an
//! LRU cache keyed by domain so repeated lookups for the same site (very
//! common within one article/tweet review) don't re-hit the network.

use std::num::NonZeroUsize;
use std::sync::Mutex;

use lru::LruCache;
use serde_json::Value;

use crate::config::Config;

/// Thread-safe, capacity-bounded cache of `DomainCredibility` lookups.
pub struct DomainCredibilityCache {
    cache: Mutex<LruCache<String, Value>>,
}

impl DomainCredibilityCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::new(1).unwrap());
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    fn get(&self, domain: &str) -> Option<Value> {
        self.cache.lock().expect("cache mutex poisoned").get(domain).cloned()
    }

    fn put(&self, domain: &str, value: Value) {
        self.cache
            .lock()
            .expect("cache mutex poisoned")
            .put(domain.to_string(), value);
    }
}

/// A `DomainCredibility` with no assessments at all — the result when the
/// service has never seen the domain.
pub fn default_domain_credibility(domain: &str) -> Value {
    serde_json::json!({
        "domain": domain,
        "credibility": {
            "value": 0.0,
            "confidence": 0.0,
        },
        "assessments": [],
    })
}

/// Fetches (or returns the cached) `DomainCredibility` for `domain`. Any
/// transport/HTTP failure falls back to [`default_domain_credibility`]
/// rather than propagating an error.
pub async fn domain_credibility(
    client: &reqwest::Client,
    cfg: &Config,
    cache: &DomainCredibilityCache,
    domain: &str,
) -> Value {
    if let Some(cached) = cache.get(domain) {
        return cached;
    }
    let url = format!(
        "{}/api/credibility/sources/?source={}",
        cfg.website_credibility_service_url, domain
    );
    let result = match client.get(&url).send().await {
        Ok(resp) if resp.status().is_success() => match resp.json::<Value>().await {
            Ok(v) => v,
            Err(e) => {
                tracing::error!("failed to parse domain credibility response for {domain}: {e}");
                default_domain_credibility(domain)
            }
        },
        Ok(resp) => {
            tracing::warn!("domain credibility lookup for {domain} returned {}", resp.status());
            default_domain_credibility(domain)
        }
        Err(e) => {
            tracing::error!("failed to fetch domain credibility for {domain}: {e}");
            default_domain_credibility(domain)
        }
    };
    cache.put(domain, result.clone());
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_unknown_domain_falls_back_on_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/api/credibility/sources/$"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let mut cfg = Config::test_default();
        cfg.website_credibility_service_url = server.uri();
        let cache = DomainCredibilityCache::new(8);
        let client = reqwest::Client::new();
        let result = domain_credibility(&client, &cfg, &cache, "example.com").await;
        assert_eq!(result["credibility"]["confidence"], 0.0);
    }

    #[tokio::test]
    async fn test_caches_successful_lookup() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/api/credibility/sources/$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "domain": "example.com",
                "credibility": {"value": 0.8, "confidence": 0.9},
                "assessments": [{"origin": "raterA"}]
            })))
            .expect(1)
            .mount(&server)
            .await;
        let mut cfg = Config::test_default();
        cfg.website_credibility_service_url = server.uri();
        let cache = DomainCredibilityCache::new(8);
        let client = reqwest::Client::new();
        let first = domain_credibility(&client, &cfg, &cache, "example.com").await;
        let second = domain_credibility(&client, &cfg, &cache, "example.com").await;
        assert_eq!(first, second);
    }
}
