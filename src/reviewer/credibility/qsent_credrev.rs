//! Query-sentence credibility reviewer (§4.8): composes a polar-similarity
//! review (§4.7) with a DB-sentence credibility review (§4.6) into a
//! `QSentCredReview` for the query sentence.

use serde_json::{Value, json};

use crate::bot_describer;
use crate::content::{self, CI_CONTEXT};
use crate::isodate;
use crate::registry::Registry;
use crate::reviewer::support;

const VERSION: &str = "0.1.0";

pub fn bot_info(registry: &Registry) -> Value {
    let result = json!({
        "@context": CI_CONTEXT,
        "@type": "QSentCredReviewer",
        "name": "Query Sentence Credibility Reviewer",
        "description": "Estimates the credibility of a query sentence from a related DB sentence's credibility and polar similarity.",
        "additionalType": content::super_types(registry, &json!("QSentCredReviewer")),
        "author": bot_describer::esi_lab_organization(),
        "dateCreated": "2020-06-20T20:03:00Z",
        "softwareVersion": VERSION,
        "applicationSuite": "Co-inform",
        "isBasedOn": [],
        "launchConfiguration": {},
    });
    content::with_identifier(registry, result)
}

fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Composes `polar_sim_review` (a `SentPolarSimilarityReview`) with
/// `db_sent_cred_review` (a `DBSentCredReview`) into a `QSentCredReview` for
/// `q_sent`.
pub fn review(
    registry: &Registry,
    q_sent: &str,
    polar_sim_review: &Value,
    db_sent_cred_review: &Value,
) -> Value {
    let db_val = support::rating_value_of(&db_sent_cred_review["reviewRating"]);
    let db_conf = support::confidence_of(&db_sent_cred_review["reviewRating"]);
    let pol_sim = support::rating_value_of(&polar_sim_review["reviewRating"]);
    assert!((-1.0..=1.0).contains(&db_val), "dbVal out of [-1,1]: {db_val}");
    assert!((0.0..=1.0).contains(&db_conf), "dbConf out of [0,1]: {db_conf}");
    assert!((-1.0..=1.0).contains(&pol_sim), "polSim out of [-1,1]: {pol_sim}");

    let q_val = sign(pol_sim) * db_val;
    let q_conf = db_conf * pol_sim.abs();

    let ratings = [&polar_sim_review["reviewRating"], &db_sent_cred_review["reviewRating"]];
    let review_count_a = polar_sim_review["reviewRating"]["reviewCount"].as_u64().unwrap_or(1);
    let review_count_b = db_sent_cred_review["reviewRating"]["reviewCount"].as_u64().unwrap_or(1);
    let rating = json!({
        "@type": "Rating",
        "reviewAspect": "credibility",
        "ratingValue": q_val,
        "confidence": q_conf,
        "reviewCount": review_count_a + review_count_b + 2,
        "ratingCount": ratings.iter().map(|r| r["ratingCount"].as_u64().unwrap_or(1)).sum::<u64>(),
    });
    let headline = polar_sim_review["headline"].as_str().unwrap_or("is related to");
    let text = format!(
        "Sentence `{q_sent}` {headline} a sentence for which {}",
        db_sent_cred_review["text"].as_str().unwrap_or("no explanation is available")
    );
    let result = json!({
        "@context": CI_CONTEXT,
        "@type": "QSentCredReview",
        "additionalType": content::super_types(registry, &json!("QSentCredReview")),
        "itemReviewed": content::as_sentence(q_sent, vec![]),
        "reviewAspect": "credibility",
        "reviewRating": rating,
        "headline": headline,
        "text": text,
        "dateCreated": isodate::now_utc_timestamp(),
        "author": bot_info(registry),
        "isBasedOn": [polar_sim_review.clone(), db_sent_cred_review.clone()],
    });
    content::with_identifier(registry, result)
}
