//! Check-worthiness reviewer (§4.5): wraps the worthiness-prediction service
//! as a `SentCheckWorthinessReview` per sentence.

use serde_json::{Value, json};

use crate::bot_describer;
use crate::config::Config;
use crate::content::{self, CI_CONTEXT};
use crate::isodate;
use crate::registry::Registry;
use crate::services::worthiness::{self, WorthinessPrediction};

const VERSION: &str = "0.1.0";

pub fn bot_info(registry: &Registry) -> Value {
    let result = json!({
        "@context": CI_CONTEXT,
        "@type": "SentCheckWorthinessReviewer",
        "name": "Check-worthiness Reviewer",
        "description": "Estimates whether a sentence is a check-worthy factual statement.",
        "additionalType": content::super_types(registry, &json!("SentCheckWorthinessReviewer")),
        "author": bot_describer::esi_lab_organization(),
        "dateCreated": "2020-06-20T20:03:00Z",
        "softwareVersion": VERSION,
        "applicationSuite": "Co-inform",
        "isBasedOn": [],
        "launchConfiguration": {},
    });
    content::with_identifier(registry, result)
}

/// Reviews a batch of sentences for check-worthiness, one `SentCheckWorthinessReview`
/// per input sentence, aligned by index. Sentences with no prediction (the
/// service degraded to `[]`) get a `CFS`/`0.0` neutral default.
pub async fn review_batch(
    client: &reqwest::Client,
    cfg: &Config,
    registry: &Registry,
    sentences: &[String],
) -> Vec<Value> {
    let predictions = worthiness::predict_worthiness(client, cfg, sentences).await;
    sentences
        .iter()
        .enumerate()
        .map(|(i, sentence)| {
            let pred = predictions.get(i).cloned().unwrap_or(WorthinessPrediction {
                sentence: sentence.clone(),
                label: "CFS".to_string(),
                confidence: 0.0,
            });
            review_one(registry, sentence, &pred)
        })
        .collect()
}

fn review_one(registry: &Registry, sentence: &str, pred: &WorthinessPrediction) -> Value {
    let worth = worthiness::worth_val(&pred.label);
    let rating = json!({
        "@type": "Rating",
        "reviewAspect": "checkWorthiness",
        "ratingValue": if worth == "worthy" { 1.0 } else { 0.0 },
        "confidence": pred.confidence,
    });
    let text = format!("Sentence `{sentence}` is {worth} of fact-checking.");
    let result = json!({
        "@context": CI_CONTEXT,
        "@type": "SentCheckWorthinessReview",
        "additionalType": content::super_types(registry, &json!("SentCheckWorthinessReview")),
        "itemReviewed": content::as_sentence(sentence, vec![]),
        "reviewAspect": "checkWorthiness",
        "reviewRating": rating,
        "text": text,
        "dateCreated": isodate::now_utc_timestamp(),
        "author": bot_info(registry),
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
    async fn test_missing_prediction_defaults_to_cfs_zero_confidence() {
        let r = registry();
        let cfg = Config::test_default();
        let client = reqwest::Client::new();
        let reviews = review_batch(&client, &cfg, &r, &["unreachable".to_string()]).await;
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0]["reviewRating"]["ratingValue"], 1.0);
        assert_eq!(reviews[0]["reviewRating"]["confidence"], 0.0);
    }

    #[test]
    fn test_review_one_unworthy() {
        let r = registry();
        let pred = WorthinessPrediction {
            sentence: "I like pizza".to_string(),
            label: "UFS".to_string(),
            confidence: 0.8,
        };
        let review = review_one(&r, "I like pizza", &pred);
        assert_eq!(review["reviewRating"]["ratingValue"], 0.0);
        assert_eq!(review["reviewRating"]["confidence"], 0.8);
    }

    #[test]
    fn test_bot_info_has_identifier() {
        let r = registry();
        let bot = bot_info(&r);
        assert!(bot["identifier"].is_string());
    }
}
