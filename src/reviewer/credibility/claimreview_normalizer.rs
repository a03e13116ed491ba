//! Normalises an external `ClaimReview` onto the shared credibility scale
//! (§4.2), producing a `NormalisedClaimReview`.

use serde_json::{Value, json};

use crate::bot_describer;
use crate::content::{self, CI_CONTEXT};
use crate::dictu;
use crate::isodate;
use crate::registry::Registry;
use crate::reviewer::credibility::label as credlabel;
use crate::config::Config;
use crate::reviewer::support;

const VERSION: &str = "0.1.2";
const DATE_CREATED: &str = "2020-06-05T13:23:00Z";

pub fn bot_info(registry: &Registry) -> Value {
    let result = json!({
        "@context": CI_CONTEXT,
        "@type": "ClaimReviewNormalizer",
        "name": "ESI ClaimReview Credibility Normalizer",
        "description": "Analyses the alternateName and numerical rating value for a ClaimReview and tries to convert that into a normalised credibility rating",
        "additionalType": content::super_types(registry, &json!("ClaimReviewNormalizer")),
        "author": bot_describer::esi_lab_organization(),
        "dateCreated": DATE_CREATED,
        "softwareVersion": VERSION,
        "url": format!("http://coinform.eu/bot/ClaimReviewNormalizer/{VERSION}"),
        "applicationSuite": "Co-inform",
        "isBasedOn": [],
        "launchConfiguration": {},
    });
    content::with_identifier(registry, result)
}

/// Normalises `claim_review` (a `ClaimReview`/`schema:ClaimReview` item) into
/// a `NormalisedClaimReview`, or returns `None` if `claim_review` is `None`.
pub fn normalise(claim_review: Option<&Value>, cfg: &Config, registry: &Registry) -> Option<Value> {
    let claim_review = claim_review?;
    let sub_ratings = normalised_claim_review_ratings(claim_review);
    let most_confident = support::select_most_confident_rating(&sub_ratings);
    let agg_rating = match most_confident {
        None => json!({
            "@type": "AggregateRating",
            "reviewAspect": "credibility",
            "reviewCount": 1,
            "ratingCount": sub_ratings.len(),
            "ratingValue": 0.0,
            "confidence": 0.0,
            "ratingExplanation": format!(
                "Failed to interpret original [review]({})",
                claim_review.get("url").and_then(Value::as_str).unwrap_or("missing_url")
            ),
        }),
        Some(mut best) => {
            best["@type"] = json!("AggregateRating");
            best["reviewCount"] = json!(1);
            best["ratingCount"] = json!(sub_ratings.len());
            best
        }
    };
    let mut is_based_on = vec![claim_review.clone()];
    is_based_on.extend(sub_ratings);
    Some(json!({
        "@context": CI_CONTEXT,
        "@type": "NormalisedClaimReview",
        "additionalType": content::super_types(registry, &json!("NormalisedClaimReview")),
        "author": bot_info(registry),
        "text": format!(
            "Claim `{}` is *{}* {}",
            claim_review.get("claimReviewed").and_then(Value::as_str).unwrap_or(""),
            credlabel::rating_label(&agg_rating, cfg),
            agg_rating.get("ratingExplanation").and_then(Value::as_str).unwrap_or("(missing explanation)")
        ),
        "claimReviewed": claim_review.get("claimReviewed").cloned().unwrap_or(Value::Null),
        "dateCreated": isodate::now_utc_timestamp(),
        "isBasedOn": is_based_on,
        "reviewAspect": "credibility",
        "reviewRating": agg_rating,
    }))
}

/// The most confident of the numeric and textual accuracy ratings for `claim_review`.
pub fn normalised_claim_review_accuracy(claim_review: &Value) -> Option<Value> {
    let ratings = normalised_claim_review_ratings(claim_review);
    support::select_most_confident_rating(&ratings)
}

fn normalised_claim_review_ratings(claim_review: &Value) -> Vec<Value> {
    let rating = claim_review.get("reviewRating").cloned().unwrap_or_else(|| json!({}));
    let mut out = Vec::with_capacity(2);
    out.push(review_alt_name_as_accuracy(&rating, claim_review));
    out.push(normalised_rating_value(&rating, claim_review));
    out
}

fn num(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Linearly maps a numeric `ratingValue ∈ [worst, best]` onto `[-1, 1]` with
/// a fixed confidence of `0.85`. `ratingValue == -1` is the sentinel for "no
/// numeric rating available" and maps to a zero-confidence failure rating.
fn normalised_rating_value(rating: &Value, claim_review: &Value) -> Value {
    let rating_val = rating.get("ratingValue").and_then(num).unwrap_or(-1.0);
    if rating_val == -1.0 {
        return json!({
            "@type": "Rating",
            "reviewAspect": "credibility",
            "ratingValue": 0.0,
            "confidence": 0.0,
            "ratingExplanation": format!(
                "Failed to normalise numeric rating in original [ClaimReview]({}) by [{}]({})",
                url_of(claim_review), author_name(claim_review), author_url(claim_review)
            ),
        });
    }
    let worst = rating.get("worstRating").and_then(num).unwrap_or(1.0);
    let best = rating.get("bestRating").and_then(num).unwrap_or(5.0);
    let norm = (rating_val - worst) / (best - worst);
    let cred = (norm * 2.0) - 1.0;
    json!({
        "@type": "Rating",
        "reviewAspect": "credibility",
        "ratingValue": cred,
        "confidence": 0.85,
        "ratingExplanation": format!(
            "Based on a [fact-check]({}) by [{}]({}) with normalised numeric ratingValue {} in range [{}-{}]",
            url_of(claim_review), author_name(claim_review), author_url(claim_review), rating_val, worst, best
        ),
        "description": "Normalised accuracy from original rating value (and range)",
    })
}

fn url_of(claim_review: &Value) -> String {
    claim_review.get("url").and_then(Value::as_str).unwrap_or("missingUrl").to_string()
}

fn author_url(claim_review: &Value) -> String {
    dictu::get_in(claim_review, &["author", "url"], json!("unknownUrl"))
        .as_str()
        .unwrap_or("unknownUrl")
        .to_string()
}

fn author_name(claim_review: &Value) -> String {
    if let Some(name) = dictu::get_in(claim_review, &["author", "name"], Value::Null).as_str() {
        return name.to_string();
    }
    let url = dictu::get_in(claim_review, &["author", "url"], Value::Null);
    let mut name = url
        .as_str()
        .and_then(content::domain_from_url)
        .unwrap_or_else(|| "unknown author".to_string());
    if let Some(stripped) = name.strip_prefix("www.") {
        name = stripped.to_string();
    }
    if let Some(stripped) = name.strip_suffix(".com") {
        name = stripped.to_string();
    }
    if name.is_empty() { "unknown author".to_string() } else { name }
}

/// The closed verdict-phrase dictionary: maps a `ClaimReview`'s textual
/// `alternateName` verdict onto the shared `[-1, 1]` credibility scale.
/// Unrecognised phrases fall through to a zero-confidence "unknown" rating.
fn review_alt_name_as_accuracy(rating: &Value, claim_review: &Value) -> Value {
    let alt_name = rating.get("alternateName").and_then(Value::as_str);
    let Some(alt_name) = alt_name else {
        return json!({
            "@type": "Rating",
            "reviewAspect": "credibility",
            "ratingValue": 0.0,
            "confidence": 0.0,
            "ratingExplanation": format!(
                "Based on [fact-check]({}) by [{}]({}) with no textual rating",
                url_of(claim_review), author_name(claim_review), author_url(claim_review)
            ),
        });
    };
    let mut alt_name = alt_name.trim().to_lowercase();
    if let Some(stripped) = alt_name.strip_suffix('.') {
        alt_name = stripped.to_string();
    }

    const FALSE_EXACT: &[&str] = &[
        "false", "inaccurate", "falso", "faux", "keliru", "фейк", "not true", "fake", "fake news",
        "incorrect", "wrong", "misleading/false", "pants on fire", "pants on fire!", "four pinocchios",
        "false and misleading", "false , misleading", "false, misleading", "misleading , false",
        "lie", "yalan", "forgery", "still wrong", "claim wrong", "not legit (false)",
        "not true (album)", "science says not possible",
    ];
    const FALSE_PREFIXES: &[&str] =
        &["wrong.", "wrong,", "wrong -", "false -", "no, ", "no! ", "certainly not! "];
    const FALSE_SUFFIXES: &[&str] = &["rating: false"];

    const MOSTLY_FALSE_EXACT: &[&str] = &[
        "misleading", "exaggerated", "partial error", "error", "mostly false", "three pinocchios",
        "mainly false", "this is misleading", "sesat", "this is exaggerated",
        "contradicts past remarks", "most of it is not true", "partially false", "partly false",
        "distorts the facts", "distortion", "short on truth", "not the official statistic",
        "conspiracy theory", "misinformation / conspiracy theory", "spins the facts",
        "false headline", "unlikely", "science doesn't support claim",
    ];
    const MOSTLY_FALSE_PREFIXES: &[&str] = &["misleading -"];
    const MOSTLY_FALSE_SUFFIXES: &[&str] = &["rating: false heading", "debunked "];

    const MIXED_EXACT: &[&str] = &[
        "half true", "half-truths", "two pinocchios", "half truth", "maybe", "not exactly",
        "unproven", "unverified", "the accuracy is mixed", "mixed", "mixture", "other",
        "this lacks evidence", "not proven", "needs more context", "needs context", "partial",
        "partially correct", "no evidence", "not the whole story", "partly true",
        "we may never know", "partially true , misleading", "partially true", "true but",
        "misses the mark", "insufficient evidence", "this is unproven", "unsupported", "anecdote",
        "in dispute", "analysis", "lacks solid numbers",
    ];
    const MIXED_PREFIXES: &[&str] = &["unsubstantiated."];
    const MIXED_SUFFIXES: &[&str] = &["rating: mixture"];

    const MOSTLY_TRUE_EXACT: &[&str] = &[
        "one pinocchio", "mostly true", "it could", "mostly right", "most legal experts agree",
        "largely accurate", "it's complicated", "semi-correct", "no sign of bias",
    ];
    const MOSTLY_TRUE_PREFIXES: &[&str] = &["true but ", "somewhat true "];

    const TRUE_EXACT: &[&str] = &["true", "accurate", "genuine", "correct", "benar"];
    const TRUE_PREFIXES: &[&str] = &["accurate."];

    const EXPLANATORY_EXACT: &[&str] = &["explanatory"];

    let verdict: Option<(f64, f64)> = if matches(&alt_name, FALSE_EXACT, FALSE_PREFIXES, FALSE_SUFFIXES) {
        Some((-1.0, 1.0))
    } else if matches(&alt_name, MOSTLY_FALSE_EXACT, MOSTLY_FALSE_PREFIXES, MOSTLY_FALSE_SUFFIXES) {
        Some((-0.5, 1.0))
    } else if matches(&alt_name, MIXED_EXACT, MIXED_PREFIXES, MIXED_SUFFIXES) {
        Some((0.0, 1.0))
    } else if matches(&alt_name, MOSTLY_TRUE_EXACT, MOSTLY_TRUE_PREFIXES, &[]) {
        Some((0.5, 1.0))
    } else if matches(&alt_name, TRUE_EXACT, TRUE_PREFIXES, &[]) {
        Some((1.0, 1.0))
    } else if EXPLANATORY_EXACT.contains(&alt_name.as_str()) {
        Some((0.0, 0.75))
    } else {
        None
    };

    match verdict {
        Some((value, confidence)) => json!({
            "@type": "Rating",
            "reviewAspect": "credibility",
            "ratingValue": value,
            "confidence": confidence,
            "ratingExplanation": format!(
                "based on [fact-check]({}) by [{}]({}) with textual claim-review rating '{}'",
                url_of(claim_review), author_name(claim_review), author_url(claim_review), alt_name
            ),
        }),
        None => json!({
            "@type": "Rating",
            "reviewAspect": "credibility",
            "ratingValue": 0.0,
            "confidence": 0.0,
            "ratingExplanation": format!(
                "based on [fact-check]({}) by [{}]({}) with unknown accuracy for textual claim-review rating '{}'",
                url_of(claim_review), author_name(claim_review), author_url(claim_review), alt_name
            ),
        }),
    }
}

fn matches(alt_name: &str, exact: &[&str], prefixes: &[&str], suffixes: &[&str]) -> bool {
    exact.contains(&alt_name)
        || prefixes.iter().any(|p| alt_name.starts_with(p))
        || suffixes.iter().any(|s| alt_name.ends_with(s))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cr(alt_name: &str) -> Value {
        json!({
            "@type": "ClaimReview",
            "url": "https://factchecker.example/claim",
            "claimReviewed": "the sky is green",
            "author": {"name": "Example FactCheckers", "url": "https://factchecker.example"},
            "reviewRating": {"alternateName": alt_name},
        })
    }

    #[test]
    fn test_false_exact_match() {
        let r = review_alt_name_as_accuracy(&cr("False")["reviewRating"], &cr("False"));
        assert_eq!(r["ratingValue"], -1.0);
        assert_eq!(r["confidence"], 1.0);
    }

    #[test]
    fn test_prefix_match() {
        let r = review_alt_name_as_accuracy(&cr("Wrong. It never happened")["reviewRating"], &cr("x"));
        assert_eq!(r["ratingValue"], -1.0);
    }

    #[test]
    fn test_suffix_match() {
        let r = review_alt_name_as_accuracy(&cr("Our Rating: False")["reviewRating"], &cr("x"));
        assert_eq!(r["ratingValue"], -1.0);
    }

    #[test]
    fn test_mostly_true() {
        let r = review_alt_name_as_accuracy(&cr("Mostly True")["reviewRating"], &cr("x"));
        assert_eq!(r["ratingValue"], 0.5);
    }

    #[test]
    fn test_explanatory_lower_confidence() {
        let r = review_alt_name_as_accuracy(&cr("Explanatory")["reviewRating"], &cr("x"));
        assert_eq!(r["ratingValue"], 0.0);
        assert_eq!(r["confidence"], 0.75);
    }

    #[test]
    fn test_unknown_phrase_zero_confidence() {
        let r = review_alt_name_as_accuracy(&cr("totally bizarre verdict")["reviewRating"], &cr("x"));
        assert_eq!(r["confidence"], 0.0);
    }

    #[test]
    fn test_missing_alt_name() {
        let rating = json!({});
        let r = review_alt_name_as_accuracy(&rating, &cr("x"));
        assert_eq!(r["confidence"], 0.0);
        assert!(r["ratingExplanation"].as_str().unwrap().contains("no textual rating"));
    }

    #[test]
    fn test_normalised_rating_value_sentinel() {
        let rating = json!({"ratingValue": -1});
        let r = normalised_rating_value(&rating, &cr("x"));
        assert_eq!(r["confidence"], 0.0);
    }

    #[test]
    fn test_normalised_rating_value_linear_mapping() {
        // ratingValue 3 in [1,5] -> norm 0.5 -> cred 0.0
        let rating = json!({"ratingValue": 3, "worstRating": 1, "bestRating": 5});
        let r = normalised_rating_value(&rating, &cr("x"));
        assert_eq!(r["ratingValue"], 0.0);
        assert_eq!(r["confidence"], 0.85);
    }

    #[test]
    fn test_author_name_strips_www_and_dot_com() {
        let claim_review = json!({"author": {"url": "https://www.politifact.com/"}});
        assert_eq!(author_name(&claim_review), "politifact");
    }

    #[test]
    fn test_normalise_none_input() {
        let registry = Registry::bootstrap().unwrap();
        let cfg = Config::test_default();
        assert!(normalise(None, &cfg, &registry).is_none());
    }

    #[test]
    fn test_normalise_combines_both_signals() {
        let registry = Registry::bootstrap().unwrap();
        let cfg = Config::test_default();
        let claim_review = json!({
            "@type": "ClaimReview",
            "url": "https://factchecker.example/claim",
            "claimReviewed": "the sky is green",
            "author": {"name": "Example FactCheckers", "url": "https://factchecker.example"},
            "reviewRating": {"alternateName": "False", "ratingValue": 1, "worstRating": 1, "bestRating": 5},
        });
        let normalised = normalise(Some(&claim_review), &cfg, &registry).unwrap();
        assert_eq!(normalised["@type"], "NormalisedClaimReview");
        assert_eq!(normalised["reviewRating"]["ratingValue"], -1.0);
        assert_eq!(normalised["isBasedOn"].as_array().unwrap().len(), 3);
    }
}
