//! Shared "filter by confidence, take the least credible" content
//! aggregation rule used by both the article content sub-review (§4.10 step
//! 3) and the tweet aggregation (§4.12 step 5).

use serde_json::{Value, json};

use crate::config::Config;
use crate::reviewer::support;

/// The outcome of aggregating a batch of per-sentence credibility reviews:
/// the resulting `AggregateRating`-shaped rating, plus the sub-review it was
/// picked from (if any survived the confidence filter).
pub struct ContentAggregate {
    pub rating: Value,
    pub selected: Option<Value>,
}

/// Filters `reviews` (typically `AggQSentCredReview`s) to those whose
/// `reviewRating.confidence >= cfg.cred_conf_threshold`, then picks the
/// least credible of the confident ones. Falls back to a "not verifiable"
/// rating when nothing is confident enough, or when `reviews` is empty.
pub fn aggregate(cfg: &Config, reviews: &[Value]) -> ContentAggregate {
    let confident = support::filter_confident_reviews(reviews, cfg.cred_conf_threshold);
    let reviews_count: u64 = support::total_review_count(
        &reviews.iter().map(|r| r["reviewRating"].clone()).collect::<Vec<_>>(),
    );
    let ratings_count: u64 = support::total_rating_count(
        &reviews.iter().map(|r| r["reviewRating"].clone()).collect::<Vec<_>>(),
    );

    if confident.is_empty() {
        let explanation = match reviews.first() {
            Some(sample) => format!(
                "is not verifiable, as none of its sub-items (e.g. `{}`) could be assessed with enough confidence",
                item_label(sample)
            ),
            None => "is not verifiable, as it contains no assessable sub-items".to_string(),
        };
        return ContentAggregate {
            rating: json!({
                "@type": "AggregateRating",
                "reviewAspect": "credibility",
                "ratingValue": 0.0,
                "confidence": 0.0,
                "ratingExplanation": explanation,
                "reviewCount": reviews_count,
                "ratingCount": ratings_count,
            }),
            selected: None,
        };
    }

    let least_credible = support::select_least_credible_review(&confident)
        .expect("confident is non-empty");
    let text = item_label(&least_credible);
    let sub_explanation = least_credible["text"].as_str().unwrap_or("");
    let explanation = format!("like its least credible item `{text}` which {sub_explanation}");
    ContentAggregate {
        rating: json!({
            "@type": "AggregateRating",
            "reviewAspect": "credibility",
            "ratingValue": support::rating_value_of(&least_credible["reviewRating"]),
            "confidence": support::confidence_of(&least_credible["reviewRating"]),
            "ratingExplanation": explanation,
            "reviewCount": reviews_count,
            "ratingCount": ratings_count,
        }),
        selected: Some(least_credible),
    }
}

/// A short human-readable label for `review.itemReviewed`, for use in a
/// "least credible item" explanation — its sentence text for a
/// sentence/claim review, its URL for an article review.
fn item_label(review: &Value) -> String {
    let item = &review["itemReviewed"];
    item.get("text")
        .and_then(Value::as_str)
        .or_else(|| item.get("url").and_then(Value::as_str))
        .unwrap_or("?")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_not_verifiable() {
        let cfg = Config::test_default();
        let result = aggregate(&cfg, &[]);
        assert_eq!(result.rating["confidence"], 0.0);
        assert!(result.selected.is_none());
    }

    #[test]
    fn test_no_confident_reviews_falls_back() {
        let cfg = Config::test_default();
        let reviews = vec![json!({
            "itemReviewed": {"text": "a weak claim"},
            "reviewRating": {"ratingValue": -0.8, "confidence": 0.2, "reviewCount": 1, "ratingCount": 1},
        })];
        let result = aggregate(&cfg, &reviews);
        assert_eq!(result.rating["confidence"], 0.0);
        assert!(result.rating["ratingExplanation"].as_str().unwrap().contains("a weak claim"));
    }

    #[test]
    fn test_picks_least_credible_among_confident() {
        let cfg = Config::test_default();
        let reviews = vec![
            json!({
                "itemReviewed": {"text": "claim A"},
                "text": "was confirmed false",
                "reviewRating": {"ratingValue": -0.9, "confidence": 0.9, "reviewCount": 2, "ratingCount": 2},
            }),
            json!({
                "itemReviewed": {"text": "claim B"},
                "text": "was confirmed true",
                "reviewRating": {"ratingValue": 0.9, "confidence": 0.9, "reviewCount": 2, "ratingCount": 2},
            }),
        ];
        let result = aggregate(&cfg, &reviews);
        assert_eq!(result.rating["ratingValue"], -0.9);
        assert_eq!(result.rating["reviewCount"], 4);
        assert!(result.rating["ratingExplanation"].as_str().unwrap().contains("claim A"));
    }
}
