//! Value-based aggregation helpers shared by the reviewers that combine
//! heterogeneous sub-reviews (`AggQSentCredReview`, `ArticleCredReview`,
//! `TweetCredReview`). These work directly on the `serde_json::Value`
//! review/rating shapes the reviewer pipeline passes around internally —
//! mirroring how the corresponding Python aggregation code treats reviews
//! as plain dicts.

use serde_json::Value;

use crate::dictu;

pub fn confidence_of(rating: &Value) -> f64 {
    dictu::get_in(rating, &["confidence"], Value::from(0.0))
        .as_f64()
        .unwrap_or(0.0)
}

pub fn rating_value_of(rating: &Value) -> f64 {
    dictu::get_in(rating, &["ratingValue"], Value::from(0.0))
        .as_f64()
        .unwrap_or(0.0)
}

/// The most confident rating in `ratings`, or `None` if empty. Ties keep the
/// earliest-encountered rating.
pub fn select_most_confident_rating(ratings: &[Value]) -> Option<Value> {
    ratings
        .iter()
        .enumerate()
        .max_by(|(ia, a), (ib, b)| {
            confidence_of(a)
                .partial_cmp(&confidence_of(b))
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| ib.cmp(ia))
        })
        .map(|(_, r)| r.clone())
}

/// The most confident review in `reviews` (compared by `reviewRating.confidence`).
pub fn select_most_confident_review(reviews: &[Value]) -> Option<Value> {
    reviews
        .iter()
        .enumerate()
        .max_by(|(ia, a), (ib, b)| {
            confidence_of(&a["reviewRating"])
                .partial_cmp(&confidence_of(&b["reviewRating"]))
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| ib.cmp(ia))
        })
        .map(|(_, r)| r.clone())
}

/// The least credible review among `reviews` (lowest `reviewRating.ratingValue`,
/// ties broken by highest confidence, then earliest).
pub fn select_least_credible_review(reviews: &[Value]) -> Option<Value> {
    reviews
        .iter()
        .enumerate()
        .min_by(|(ia, a), (ib, b)| {
            rating_value_of(&a["reviewRating"])
                .partial_cmp(&rating_value_of(&b["reviewRating"]))
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| {
                    confidence_of(&b["reviewRating"])
                        .partial_cmp(&confidence_of(&a["reviewRating"]))
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .then_with(|| ia.cmp(ib))
        })
        .map(|(_, r)| r.clone())
}

/// Keep only the reviews whose `reviewRating.confidence` meets `threshold`.
pub fn filter_confident_reviews(reviews: &[Value], threshold: f64) -> Vec<Value> {
    reviews
        .iter()
        .filter(|r| confidence_of(&r["reviewRating"]) >= threshold)
        .cloned()
        .collect()
}

/// Sum of `reviewCount` across a set of ratings, defaulting absent ones to 0.
pub fn total_review_count(ratings: &[Value]) -> u64 {
    ratings
        .iter()
        .map(|r| dictu::get_in(r, &["reviewCount"], Value::from(0)).as_u64().unwrap_or(0))
        .sum()
}

/// Sum of `ratingCount` across a set of ratings, defaulting absent ones to 0.
/// This does *not* add one per rating — callers add the `+1` for the
/// aggregate rating itself explicitly, matching how the Python aggregators
/// separately add `len(isBasedOn)` to the review count.
pub fn total_rating_count(ratings: &[Value]) -> u64 {
    ratings
        .iter()
        .map(|r| dictu::get_in(r, &["ratingCount"], Value::from(0)).as_u64().unwrap_or(0))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_select_most_confident_rating() {
        let ratings = vec![json!({"confidence": 0.2}), json!({"confidence": 0.9}), json!({"confidence": 0.5})];
        assert_eq!(confidence_of(&select_most_confident_rating(&ratings).unwrap()), 0.9);
    }

    #[test]
    fn test_select_most_confident_rating_empty() {
        assert!(select_most_confident_rating(&[]).is_none());
    }

    #[test]
    fn test_select_least_credible_review_ties_break_by_confidence() {
        let reviews = vec![
            json!({"reviewRating": {"ratingValue": -0.5, "confidence": 0.3}}),
            json!({"reviewRating": {"ratingValue": -0.5, "confidence": 0.9}}),
            json!({"reviewRating": {"ratingValue": 0.8, "confidence": 0.9}}),
        ];
        let least = select_least_credible_review(&reviews).unwrap();
        assert_eq!(confidence_of(&least["reviewRating"]), 0.9);
        assert_eq!(rating_value_of(&least["reviewRating"]), -0.5);
    }

    #[test]
    fn test_filter_confident_reviews() {
        let reviews = vec![
            json!({"reviewRating": {"confidence": 0.9}}),
            json!({"reviewRating": {"confidence": 0.1}}),
        ];
        assert_eq!(filter_confident_reviews(&reviews, 0.5).len(), 1);
    }

    #[test]
    fn test_total_counts_default_to_zero() {
        let ratings = vec![json!({"ratingCount": 2, "reviewCount": 3}), json!({})];
        assert_eq!(total_rating_count(&ratings), 2);
        assert_eq!(total_review_count(&ratings), 3);
    }
}
