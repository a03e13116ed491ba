//! Article credibility reviewer (§4.10, §4.11): combines a domain-level
//! credibility review with a content-level aggregate of the article's
//! extracted claim sentences.

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::bot_describer;
use crate::config::Config;
use crate::content::{self, CI_CONTEXT};
use crate::isodate;
use crate::model::Article;
use crate::registry::Registry;
use crate::reviewer::credibility::{agg_qsent_credrev, contentagg, website_credrev};
use crate::reviewer::support;
use crate::services::website_credibility::DomainCredibilityCache;

const VERSION: &str = "0.1.0";

/// Resolves an `Article` to an *analysed* document — one with both `content`
/// and `claims_content` populated — by delegating to an external scraper
/// and claim extractor. Kept as a trait so the actual scraping/NLP pipeline
/// (out of scope for this crate) can be swapped in by the caller.
#[async_trait]
pub trait ArticleAnalyser: Send + Sync {
    async fn analyse(&self, article: &Article) -> Article;
}

/// An [`ArticleAnalyser`] that never scrapes anything: it assumes every
/// article handed to it is already analysed, returning it unchanged. Useful
/// for tests and for callers that pre-populate `content`/`claims_content`
/// themselves before submitting the article for review.
pub struct PreAnalysedArticle;

#[async_trait]
impl ArticleAnalyser for PreAnalysedArticle {
    async fn analyse(&self, article: &Article) -> Article {
        article.clone()
    }
}

pub fn bot_info(registry: &Registry) -> Value {
    let result = json!({
        "@context": CI_CONTEXT,
        "@type": "ArticleCredReviewer",
        "name": "Article Credibility Reviewer",
        "description": "Estimates the credibility of an article from its claim sentences and the site it was published on.",
        "additionalType": content::super_types(registry, &json!("ArticleCredReviewer")),
        "author": bot_describer::esi_lab_organization(),
        "dateCreated": "2020-06-20T20:03:00Z",
        "softwareVersion": VERSION,
        "applicationSuite": "Co-inform",
        "isBasedOn": [],
        "launchConfiguration": {},
    });
    content::with_identifier(registry, result)
}

/// Ensures `article` has `content`/`claims_content` populated, calling
/// `analyser` only when it isn't already analysed.
pub async fn ensure_analysed(analyser: &dyn ArticleAnalyser, article: &Article) -> Article {
    if article.is_analysed() {
        article.clone()
    } else {
        analyser.analyse(article).await
    }
}

/// Reviews `article` for credibility.
pub async fn review(
    client: &reqwest::Client,
    cfg: &Config,
    website_cache: &DomainCredibilityCache,
    registry: &Registry,
    analyser: &dyn ArticleAnalyser,
    article: &Article,
) -> Value {
    let analysed = ensure_analysed(analyser, article).await;

    let mut domain_review = website_credrev::review(client, cfg, website_cache, registry, &analysed.url).await;
    if content::site_matches_any(&analysed.url, &cfg.acred_socmedia_urls) {
        domain_review["reviewRating"]["confidence"] = json!(0.2);
    }

    let sentences: Vec<String> = analysed.claims_content.iter().take(cfg.max_claims_in_doc).cloned().collect();
    let content_reviews = if sentences.is_empty() {
        Vec::new()
    } else {
        let cache = DomainCredibilityCache::new(cfg.domain_cache_capacity);
        agg_qsent_credrev::review_batch(client, cfg, &cache, registry, &sentences).await
    };
    let content_aggregate = contentagg::aggregate(cfg, &content_reviews);

    let rating = aggregate_article_rating(cfg, &domain_review, &content_aggregate.rating);

    let mut is_based_on = vec![domain_review];
    is_based_on.extend(content_reviews);

    let result = json!({
        "@context": CI_CONTEXT,
        "@type": "ArticleCredReview",
        "additionalType": content::super_types(registry, &json!("ArticleCredReview")),
        "itemReviewed": article_as_value(&analysed),
        "reviewAspect": "credibility",
        "reviewRating": rating,
        "dateCreated": isodate::now_utc_timestamp(),
        "author": bot_info(registry),
        "isBasedOn": is_based_on,
    });
    content::with_identifier(registry, result)
}

fn article_as_value(article: &Article) -> Value {
    serde_json::to_value(article).unwrap_or_else(|_| json!({"@type": "Article", "url": article.url}))
}

/// The §4.11 article aggregation rule: prefer the content-level signal when
/// it's confident enough, otherwise fall back to the domain-level signal
/// (penalised when it leans credible), otherwise declare insufficient
/// signal entirely.
fn aggregate_article_rating(cfg: &Config, domain_review: &Value, content_rating: &Value) -> Value {
    let thresh = cfg.cred_conf_threshold;
    let penalty = cfg.article_from_website_conf_factor;
    let web_thresh = cfg.article_from_website_cred_threshold_penalise;

    let domain_val = support::rating_value_of(&domain_review["reviewRating"]);
    let domain_conf = support::confidence_of(&domain_review["reviewRating"]);
    let content_val = support::rating_value_of(content_rating);
    let content_conf = support::confidence_of(content_rating);
    let domain_name = domain_review["itemReviewed"]["name"].as_str().unwrap_or("??");
    let site_explanation = content_rating_explanation(domain_review);

    let (value, confidence, explanation) = if content_conf >= thresh {
        let mut explanation = content_rating_explanation(content_rating);
        if domain_conf >= thresh {
            explanation = format!(
                "{explanation} Take into account that it appeared in website {domain_name}. {site_explanation}"
            );
        }
        (content_val, content_conf, explanation)
    } else if domain_conf >= thresh {
        let confidence = domain_conf * if domain_val >= web_thresh { penalty } else { 1.0 };
        let explanation = format!("as it appeared in website {domain_name}. {site_explanation}");
        (domain_val, confidence, explanation)
    } else {
        let mut explanation = "insufficient credibility signals".to_string();
        if content_conf > 0.0 || domain_conf > 0.0 {
            explanation.push_str(&format!(
                " (weak signals: content confidence {content_conf:.2}, website confidence {domain_conf:.2})"
            ));
        }
        (0.0, 0.0, explanation)
    };

    let review_count = domain_review["reviewRating"]["reviewCount"].as_u64().unwrap_or(0)
        + content_rating["reviewCount"].as_u64().unwrap_or(0)
        + 2;
    let rating_count = domain_review["reviewRating"]["ratingCount"].as_u64().unwrap_or(0)
        + content_rating["ratingCount"].as_u64().unwrap_or(0);

    json!({
        "@type": "AggregateRating",
        "reviewAspect": "credibility",
        "ratingValue": value,
        "confidence": confidence,
        "ratingExplanation": explanation,
        "reviewCount": review_count,
        "ratingCount": rating_count,
    })
}

fn content_rating_explanation(rating_or_review: &Value) -> String {
    rating_or_review
        .get("ratingExplanation")
        .and_then(Value::as_str)
        .or_else(|| rating_or_review.get("reviewRating").and_then(|r| r.get("ratingExplanation")).and_then(Value::as_str))
        .unwrap_or("(no explanation)")
        .to_string()
}
