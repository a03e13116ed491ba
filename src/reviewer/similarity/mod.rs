//! Semantic sentence-similarity reviewer (§4.7a): turns one related sentence
//! returned by the similarity service into a `SentSimilarityReview`.

pub mod label;

use serde_json::{Value, json};

use crate::bot_describer;
use crate::content::{self, CI_CONTEXT};
use crate::isodate;
use crate::registry::Registry;
use crate::services::similarity::SimilarSent;

const VERSION: &str = "0.1.0";

pub fn bot_info(registry: &Registry) -> Value {
    let result = json!({
        "@context": CI_CONTEXT,
        "@type": "SemSentSimReviewer",
        "name": "Semantic Sentence Similarity Reviewer",
        "description": "Estimates the semantic similarity between a query sentence and sentences found in a claim/fact-check database.",
        "additionalType": content::super_types(registry, &json!("SemSentSimReviewer")),
        "author": bot_describer::esi_lab_organization(),
        "dateCreated": "2020-06-20T20:03:00Z",
        "softwareVersion": VERSION,
        "applicationSuite": "Co-inform",
        "isBasedOn": [],
        "launchConfiguration": {},
    });
    content::with_identifier(registry, result)
}

/// Reviews the similarity between `q_sent` and `sim_sent.sentence`.
/// The `headline` field is always phrased without a stance, since stance is
/// layered on separately by `SentStanceReviewer`/`SentPolarSimilarityReviewer`.
pub fn review(registry: &Registry, q_sent: &str, sim_sent: &SimilarSent) -> Value {
    let appearance = sim_sent
        .doc_url
        .as_deref()
        .map(|url| vec![json!({"@type": "WebPage", "url": url})])
        .unwrap_or_default();
    let pair = content::as_dbq_sentpair(&sim_sent.sentence, q_sent, appearance);
    let headline = label::claim_rel_str(sim_sent.similarity, None);
    let rating = json!({
        "@type": "Rating",
        "reviewAspect": "similarity",
        "ratingValue": sim_sent.similarity,
        "confidence": 1.0,
    });
    let text = format!(
        "Sentence `{}` {} `{}`",
        sim_sent.sentence, headline, q_sent
    );
    let result = json!({
        "@context": CI_CONTEXT,
        "@type": "SentSimilarityReview",
        "additionalType": content::super_types(registry, &json!("SentSimilarityReview")),
        "itemReviewed": pair,
        "reviewAspect": "similarity",
        "reviewRating": rating,
        "headline": headline,
        "text": text,
        "dateCreated": isodate::now_utc_timestamp(),
        "author": bot_info(registry),
    });
    content::with_identifier(registry, result)
}
