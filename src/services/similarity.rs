//! Client for the external claim-similarity/stance service (§4.4).
//!
//! One batched call per list of query sentences — never one call per
//! sentence, since the whole point of this client is to amortise the cost
//! of the similarity/stance model across a batch.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::Config;

/// A single related sentence returned by the similarity service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimilarSent {
    pub sentence: String,
    pub similarity: f64,
    #[serde(default)]
    pub doc_url: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub lang_orig: Option<String>,
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(default)]
    pub claim_review: Option<Value>,
    #[serde(default)]
    pub sent_stance: Option<String>,
    #[serde(default)]
    pub sent_stance_confidence: Option<f64>,
    #[serde(default)]
    pub domain_credibility: Option<Value>,
    #[serde(default)]
    pub coinform_collection: Option<String>,
    #[serde(default)]
    pub doc_content: Option<String>,
}

/// The similarity result for one query sentence: the sentence itself plus
/// every related DB sentence found for it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SemanticClaimSimilarityResult {
    pub q_claim: String,
    #[serde(default)]
    pub sim_reviewer: Option<Value>,
    pub results: Vec<SimilarSent>,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    claims: &'a [String],
}

#[derive(Deserialize)]
struct SearchResponse {
    results: Option<Vec<SemanticClaimSimilarityResult>>,
}

/// Retrieves a [`SemanticClaimSimilarityResult`] per query sentence, aligned
/// by index with `sents`. An empty `sents` short-circuits to `[]`. Any
/// non-2xx response or transport error also yields `[]` — callers treat
/// that identically to "no similar sentence found", never as a hard error.
pub async fn find_related_sentences(
    client: &reqwest::Client,
    cfg: &Config,
    sents: &[String],
) -> Vec<SemanticClaimSimilarityResult> {
    if sents.is_empty() {
        return Vec::new();
    }
    let url = format!("{}/test/api/v1/claim/internal-search", cfg.similarity_service_url);
    let mut req = client.post(&url).json(&SearchRequest { claims: sents });
    if let (Some(user), Some(pass)) = (
        cfg.similarity_search_auth_user.as_deref(),
        cfg.similarity_search_auth_pwrd.as_deref(),
    ) {
        req = req.basic_auth(user, Some(pass));
    }

    let resp = match req.send().await {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("failed to find related sentences: {e}");
            return Vec::new();
        }
    };
    if !resp.status().is_success() {
        tracing::error!("failed to find related sentences: status {}", resp.status());
        return Vec::new();
    }
    match resp.json::<SearchResponse>().await {
        Ok(body) => body.results.unwrap_or_else(|| {
            tracing::error!("no related sentences field in response");
            Vec::new()
        }),
        Err(e) => {
            tracing::error!("failed to parse related-sentences response: {e}");
            Vec::new()
        }
    }
}

/// Fetches a cacheable bot descriptor from the `bots` field of an empty
/// search request — used to describe the similarity reviewer, the sentence
/// encoder and the stance predictor sub-bots.
pub async fn bot_descriptor(client: &reqwest::Client, cfg: &Config, path: &[&str]) -> Option<Value> {
    let url = format!("{}/test/api/v1/claim/internal-search", cfg.similarity_service_url);
    let mut req = client.post(&url).json(&serde_json::json!({}));
    if let (Some(user), Some(pass)) = (
        cfg.similarity_search_auth_user.as_deref(),
        cfg.similarity_search_auth_pwrd.as_deref(),
    ) {
        req = req.basic_auth(user, Some(pass));
    }
    let resp = req.send().await.ok()?;
    if !resp.status().is_success() {
        return None;
    }
    let body: Value = resp.json().await.ok()?;
    let mut current = &body;
    for key in path {
        current = current.get(key)?;
    }
    Some(current.clone())
}
