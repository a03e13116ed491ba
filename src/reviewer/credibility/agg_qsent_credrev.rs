//! Aggregate query-sentence credibility reviewer (§4.9) — entry point for
//! reviewing a batch of query sentences against the Co-inform database.

use std::collections::{HashMap, VecDeque};

use serde_json::{Value, json};

use crate::bot_describer;
use crate::config::Config;
use crate::content::{self, CI_CONTEXT};
use crate::isodate;
use crate::registry::Registry;
use crate::reviewer::credibility::{dbsent_credrev, qsent_credrev};
use crate::reviewer::factcheckability;
use crate::reviewer::similarity;
use crate::reviewer::stance;
use crate::reviewer::support;
use crate::services::similarity::{SemanticClaimSimilarityResult, find_related_sentences};
use crate::services::website_credibility::DomainCredibilityCache;

const VERSION: &str = "0.1.0";

pub fn bot_info(registry: &Registry) -> Value {
    let result = json!({
        "@context": CI_CONTEXT,
        "@type": "AggQSentCredReviewer",
        "name": "Aggregate Query Sentence Credibility Reviewer",
        "description": "Entry point for assessing the credibility of a batch of query sentences against the Co-inform claim/fact-check database.",
        "additionalType": content::super_types(registry, &json!("AggQSentCredReviewer")),
        "author": bot_describer::esi_lab_organization(),
        "dateCreated": "2020-06-20T20:03:00Z",
        "softwareVersion": VERSION,
        "applicationSuite": "Co-inform",
        "isBasedOn": [],
        "launchConfiguration": {},
    });
    content::with_identifier(registry, result)
}

/// Reviews `sentences` for credibility, one `AggQSentCredReview` per input
/// sentence, aligned by index with the input (never reordered, even though
/// the similarity service may internally reorder its batch response).
pub async fn review_batch(
    client: &reqwest::Client,
    cfg: &Config,
    cache: &DomainCredibilityCache,
    registry: &Registry,
    sentences: &[String],
) -> Vec<Value> {
    if sentences.is_empty() {
        return Vec::new();
    }

    let worthiness_reviews: Vec<Option<Value>> = if cfg.worthiness_review {
        factcheckability::review_batch(client, cfg, registry, sentences)
            .await
            .into_iter()
            .map(Some)
            .collect()
    } else {
        sentences.iter().map(|_| None).collect()
    };

    let mut worthy_sentences = Vec::new();
    let mut results: Vec<Option<Value>> = vec![None; sentences.len()];

    for (i, sentence) in sentences.iter().enumerate() {
        if let Some(worthiness_review) = &worthiness_reviews[i] {
            let ratingvalue = worthiness_review["reviewRating"]["ratingValue"].as_f64().unwrap_or(1.0);
            if ratingvalue == 0.0 {
                results[i] = Some(unworthy_review(registry, sentence, worthiness_review.clone()));
                continue;
            }
        }
        worthy_sentences.push((i, sentence.clone()));
    }

    let worthy_texts: Vec<String> = worthy_sentences.iter().map(|(_, s)| s.clone()).collect();
    let sim_results = find_related_sentences(client, cfg, &worthy_texts).await;

    let mut by_text: HashMap<&str, VecDeque<&SemanticClaimSimilarityResult>> = HashMap::new();
    for result in &sim_results {
        by_text.entry(result.q_claim.as_str()).or_default().push_back(result);
    }

    for (i, sentence) in &worthy_sentences {
        let matched = by_text.get_mut(sentence.as_str()).and_then(VecDeque::pop_front);
        let worthiness_review = worthiness_reviews[*i].clone();
        let review = match matched {
            None => no_matches_review(registry, sentence, worthiness_review),
            Some(sim_result) if sim_result.results.is_empty() => {
                no_matches_review(registry, sentence, worthiness_review)
            }
            Some(sim_result) => {
                review_one_with_matches(client, cfg, cache, registry, sentence, sim_result, worthiness_review).await
            }
        };
        results[*i] = Some(review);
    }

    results
        .into_iter()
        .enumerate()
        .map(|(i, r)| r.unwrap_or_else(|| no_matches_review(registry, &sentences[i], None)))
        .collect()
}

async fn review_one_with_matches(
    client: &reqwest::Client,
    cfg: &Config,
    cache: &DomainCredibilityCache,
    registry: &Registry,
    q_sent: &str,
    sim_result: &SemanticClaimSimilarityResult,
    worthiness_review: Option<Value>,
) -> Value {
    let mut qsent_reviews = Vec::with_capacity(sim_result.results.len());
    for sim_sent in &sim_result.results {
        let sim_review = similarity::review(registry, q_sent, sim_sent);
        let stance_review = stance::review(registry, q_sent, sim_sent);
        let polar_sim_review = stance::polarsim::review(cfg, registry, &sim_review, stance_review.as_ref());
        let db_sent_cred_review = dbsent_credrev::review(client, cfg, cache, registry, sim_sent).await;
        let qsent_review = qsent_credrev::review(registry, q_sent, &polar_sim_review, &db_sent_cred_review);
        qsent_reviews.push(qsent_review);
    }

    let selected = support::select_most_confident_review(&qsent_reviews)
        .expect("qsent_reviews is non-empty when sim_result.results is non-empty");
    let sub_review_counts: u64 = qsent_reviews
        .iter()
        .map(|r| r["reviewRating"]["reviewCount"].as_u64().unwrap_or(1))
        .sum();
    let sub_rating_counts: u64 = qsent_reviews
        .iter()
        .map(|r| r["reviewRating"]["ratingCount"].as_u64().unwrap_or(1))
        .sum();
    let review_count =
        sub_review_counts + qsent_reviews.len() as u64 + if worthiness_review.is_some() { 1 } else { 0 };

    let rating = json!({
        "@type": "AggregateRating",
        "reviewAspect": "credibility",
        "ratingValue": support::rating_value_of(&selected["reviewRating"]),
        "confidence": support::confidence_of(&selected["reviewRating"]),
        "ratingExplanation": selected["text"].clone(),
        "reviewCount": review_count,
        "ratingCount": sub_rating_counts,
    });
    let mut is_based_on = qsent_reviews;
    if let Some(worthiness_review) = worthiness_review {
        is_based_on.push(worthiness_review);
    }
    let text = format!(
        "Sentence `{q_sent}` {}",
        selected["text"].as_str().unwrap_or("could not be assessed")
    );
    let result = json!({
        "@context": CI_CONTEXT,
        "@type": "AggQSentCredReview",
        "additionalType": content::super_types(registry, &json!("AggQSentCredReview")),
        "itemReviewed": content::as_sentence(q_sent, vec![]),
        "reviewAspect": "credibility",
        "reviewRating": rating,
        "text": text,
        "dateCreated": isodate::now_utc_timestamp(),
        "author": bot_info(registry),
        "isBasedOn": is_based_on,
    });
    content::with_identifier(registry, result)
}

fn no_matches_review(registry: &Registry, q_sent: &str, worthiness_review: Option<Value>) -> Value {
    let explanation = "has no (close) matches in the Co-inform database, so we cannot assess its credibility.";
    let mut is_based_on = Vec::new();
    let mut review_count = 0u64;
    if let Some(worthiness_review) = worthiness_review {
        is_based_on.push(worthiness_review);
        review_count = 1;
    }
    not_verifiable(registry, q_sent, explanation, is_based_on, review_count)
}

fn unworthy_review(registry: &Registry, q_sent: &str, worthiness_review: Value) -> Value {
    let explanation = "doesn't seem to be a factual statement, or doesn't seem worth checking";
    not_verifiable(registry, q_sent, explanation, vec![worthiness_review], 1)
}

fn not_verifiable(
    registry: &Registry,
    q_sent: &str,
    explanation: &str,
    is_based_on: Vec<Value>,
    review_count: u64,
) -> Value {
    let rating = json!({
        "@type": "AggregateRating",
        "reviewAspect": "credibility",
        "ratingValue": 0.0,
        "confidence": 0.0,
        "ratingExplanation": explanation,
        "reviewCount": review_count,
        "ratingCount": 0,
    });
    let result = json!({
        "@context": CI_CONTEXT,
        "@type": "AggQSentCredReview",
        "additionalType": content::super_types(registry, &json!("AggQSentCredReview")),
        "itemReviewed": content::as_sentence(q_sent, vec![]),
        "reviewAspect": "credibility",
        "reviewRating": rating,
        "text": format!("Sentence `{q_sent}` {explanation}"),
        "dateCreated": isodate::now_utc_timestamp(),
        "author": bot_info(registry),
        "isBasedOn": is_based_on,
    });
    content::with_identifier(registry, result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Registry {
        Registry::bootstrap().unwrap()
    }

    #[tokio::test]
    async fn test_empty_input_returns_empty() {
        let r = registry();
        let cfg = Config::test_default();
        let cache = DomainCredibilityCache::new(cfg.domain_cache_capacity);
        let client = reqwest::Client::new();
        assert!(review_batch(&client, &cfg, &cache, &r, &[]).await.is_empty());
    }

    #[tokio::test]
    async fn test_no_matches_gives_not_verifiable_with_zero_review_count() {
        let r = registry();
        let cfg = Config::test_default();
        let cache = DomainCredibilityCache::new(cfg.domain_cache_capacity);
        let client = reqwest::Client::new();
        let sentences = vec!["Coronavirus kills people".to_string()];
        let reviews = review_batch(&client, &cfg, &cache, &r, &sentences).await;
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0]["reviewRating"]["ratingValue"], 0.0);
        assert_eq!(reviews[0]["reviewRating"]["confidence"], 0.0);
        assert_eq!(reviews[0]["reviewRating"]["reviewCount"], 0);
        assert_eq!(reviews[0]["isBasedOn"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_output_order_matches_input_order() {
        let r = registry();
        let cfg = Config::test_default();
        let cache = DomainCredibilityCache::new(cfg.domain_cache_capacity);
        let client = reqwest::Client::new();
        let sentences = vec!["first claim".to_string(), "second claim".to_string()];
        let reviews = review_batch(&client, &cfg, &cache, &r, &sentences).await;
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0]["itemReviewed"]["text"], "first claim");
        assert_eq!(reviews[1]["itemReviewed"]["text"], "second claim");
    }
}
