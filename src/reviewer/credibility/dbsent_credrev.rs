//! DB-sentence credibility reviewer (§4.6): reviews the credibility of a
//! sentence found in the Co-inform database, merging a possible
//! `ClaimReview` normalisation with the credibility of the site it was
//! found on.

use serde_json::{Value, json};

use crate::bot_describer;
use crate::config::Config;
use crate::content::{self, CI_CONTEXT};
use crate::isodate;
use crate::registry::Registry;
use crate::reviewer::credibility::claimreview_normalizer;
use crate::reviewer::credibility::website_credrev;
use crate::reviewer::support;
use crate::services::similarity::SimilarSent;
use crate::services::website_credibility::DomainCredibilityCache;

const VERSION: &str = "0.1.0";

pub fn bot_info(registry: &Registry) -> Value {
    let result = json!({
        "@context": CI_CONTEXT,
        "@type": "DBSentCredReviewer",
        "name": "DB Sentence Credibility Reviewer",
        "description": "Estimates the credibility of a sentence found in the Co-inform database, combining claim-review verdicts and site credibility.",
        "additionalType": content::super_types(registry, &json!("DBSentCredReviewer")),
        "author": bot_describer::esi_lab_organization(),
        "dateCreated": "2020-06-20T20:03:00Z",
        "softwareVersion": VERSION,
        "applicationSuite": "Co-inform",
        "isBasedOn": [],
        "launchConfiguration": {},
    });
    content::with_identifier(registry, result)
}

/// Reviews the DB-side sentence of `sim_sent` for credibility.
pub async fn review(
    client: &reqwest::Client,
    cfg: &Config,
    cache: &DomainCredibilityCache,
    registry: &Registry,
    sim_sent: &SimilarSent,
) -> Value {
    let claim_review_signal = claimreview_normalizer::normalise(sim_sent.claim_review.as_ref(), cfg, registry);

    let mut website_signal =
        website_credrev::similar_sent_as_website_cred_rev(client, cfg, cache, registry, &sim_sent_as_value(sim_sent))
            .await;
    if is_known_factchecker(cfg, sim_sent) {
        let penalised = support::confidence_of(&website_signal["reviewRating"])
            * cfg.factchecker_website_to_qclaim_confidence_penalty_factor;
        website_signal["reviewRating"]["confidence"] = json!(penalised);
    }

    let mut sub_reviews = vec![website_signal];
    if let Some(cr_signal) = claim_review_signal {
        sub_reviews.push(cr_signal);
    }

    let selected = support::select_most_confident_review(&sub_reviews)
        .expect("sub_reviews always has at least the website signal");
    let ratings: Vec<Value> = sub_reviews.iter().map(|r| r["reviewRating"].clone()).collect();
    let rating = json!({
        "@type": "AggregateRating",
        "reviewAspect": "credibility",
        "ratingValue": support::rating_value_of(&selected["reviewRating"]),
        "confidence": support::confidence_of(&selected["reviewRating"]),
        "reviewCount": 1 + sub_reviews.len() as u64,
        "ratingCount": support::total_rating_count(&ratings),
    });

    let domain = sim_sent.domain.clone().unwrap_or_else(|| "??".to_string());
    let doc_link = match &sim_sent.doc_url {
        Some(url) => format!("[{domain}]({url})"),
        None => "[this page](??)".to_string(),
    };
    let text = format!("Sentence `{}` found on {doc_link}", sim_sent.sentence);

    let result = json!({
        "@context": CI_CONTEXT,
        "@type": "DBSentCredReview",
        "additionalType": content::super_types(registry, &json!("DBSentCredReview")),
        "itemReviewed": content::as_sentence(&sim_sent.sentence, appearance(sim_sent)),
        "reviewAspect": "credibility",
        "reviewRating": rating,
        "text": text,
        "dateCreated": isodate::now_utc_timestamp(),
        "author": bot_info(registry),
        "isBasedOn": sub_reviews,
    });
    content::with_identifier(registry, result)
}

fn appearance(sim_sent: &SimilarSent) -> Vec<Value> {
    sim_sent
        .doc_url
        .as_deref()
        .map(|url| vec![json!({"@type": "WebPage", "url": url})])
        .unwrap_or_default()
}

fn sim_sent_as_value(sim_sent: &SimilarSent) -> Value {
    json!({
        "domain": sim_sent.domain,
        "doc_url": sim_sent.doc_url,
        "domain_credibility": sim_sent.domain_credibility,
    })
}

fn is_known_factchecker(cfg: &Config, sim_sent: &SimilarSent) -> bool {
    let site = sim_sent
        .doc_url
        .as_deref()
        .or(sim_sent.domain.as_deref())
        .unwrap_or_default();
    !cfg.acred_factchecker_urls.is_empty() && content::site_matches_any(site, &cfg.acred_factchecker_urls)
}
