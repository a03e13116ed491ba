//! Sentence-stance reviewer (§4.7b): turns a similarity result's embedded
//! stance prediction into a `SentStanceReview`.

pub mod polarsim;

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
        "@type": "SentStanceReviewer",
        "name": "Sentence Stance Reviewer",
        "description": "Estimates whether a sentence agrees with, disagrees with, discusses or is unrelated to a query sentence.",
        "additionalType": content::super_types(registry, &json!("SentStanceReviewer")),
        "author": bot_describer::esi_lab_organization(),
        "dateCreated": "2020-06-20T20:03:00Z",
        "softwareVersion": VERSION,
        "applicationSuite": "Co-inform",
        "isBasedOn": [],
        "launchConfiguration": {},
    });
    content::with_identifier(registry, result)
}

/// Reviews the stance `sim_sent.sentence` takes toward `q_sent`. `None` when
/// the similarity service returned no stance prediction for this pair.
pub fn review(registry: &Registry, q_sent: &str, sim_sent: &SimilarSent) -> Option<Value> {
    let stance = sim_sent.sent_stance.as_deref()?;
    let confidence = sim_sent.sent_stance_confidence.unwrap_or(0.0);
    let appearance = sim_sent
        .doc_url
        .as_deref()
        .map(|url| vec![json!({"@type": "WebPage", "url": url})])
        .unwrap_or_default();
    let pair = content::as_dbq_sentpair(&sim_sent.sentence, q_sent, appearance);
    let rating = json!({
        "@type": "Rating",
        "reviewAspect": "stance",
        "ratingValue": stance,
        "confidence": confidence,
    });
    let text = format!("Sentence `{}` {} `{}`.", sim_sent.sentence, stance, q_sent);
    let result = json!({
        "@context": CI_CONTEXT,
        "@type": "SentStanceReview",
        "additionalType": content::super_types(registry, &json!("SentStanceReview")),
        "itemReviewed": pair,
        "reviewAspect": "stance",
        "reviewRating": rating,
        "text": text,
        "dateCreated": isodate::now_utc_timestamp(),
        "author": bot_info(registry),
    });
    Some(content::with_identifier(registry, result))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Registry {
        Registry::bootstrap().unwrap()
    }

    fn base_sim_sent() -> SimilarSent {
        SimilarSent {
            sentence: "the sky appears blue".to_string(),
            similarity: 0.8,
            doc_url: None,
            domain: None,
            lang_orig: None,
            published_date: None,
            claim_review: None,
            sent_stance: None,
            sent_stance_confidence: None,
            domain_credibility: None,
            coinform_collection: None,
            doc_content: None,
        }
    }

    #[test]
    fn test_no_stance_returns_none() {
        let r = registry();
        assert!(review(&r, "q", &base_sim_sent()).is_none());
    }

    #[test]
    fn test_with_stance_builds_review() {
        let r = registry();
        let mut sim_sent = base_sim_sent();
        sim_sent.sent_stance = Some("agree".to_string());
        sim_sent.sent_stance_confidence = Some(0.9);
        let review = review(&r, "q", &sim_sent).unwrap();
        assert_eq!(review["reviewRating"]["ratingValue"], "agree");
        assert_eq!(review["reviewRating"]["confidence"], 0.9);
    }
}
