//! Polar-similarity reviewer (§4.7c): combines a `SentSimilarityReview` and
//! an optional `SentStanceReview` into a `SentPolarSimilarityReview` whose
//! rating lands in `[-1, 1]` — positive when the found sentence agrees,
//! negative when it disagrees.

use serde_json::{Value, json};

use crate::bot_describer;
use crate::config::Config;
use crate::content::{self, CI_CONTEXT};
use crate::isodate;
use crate::registry::Registry;
use crate::reviewer::similarity::label as sim_label;
use crate::reviewer::support;

const VERSION: &str = "0.1.0";

pub fn bot_info(registry: &Registry) -> Value {
    let result = json!({
        "@context": CI_CONTEXT,
        "@type": "SentPolarSimilarityReviewer",
        "name": "Sentence Polar Similarity Reviewer",
        "description": "Combines a similarity score with a stance prediction into a signed polar similarity.",
        "additionalType": content::super_types(registry, &json!("SentPolarSimilarityReviewer")),
        "author": bot_describer::esi_lab_organization(),
        "dateCreated": "2020-06-20T20:03:00Z",
        "softwareVersion": VERSION,
        "applicationSuite": "Co-inform",
        "isBasedOn": [],
        "launchConfiguration": {},
    });
    content::with_identifier(registry, result)
}

/// Maps `(sim, stance, stanceConf)` to a signed polar similarity in `[-1,1]`.
/// `stance` values other than `agree`/`disagree`/`discuss` (including an
/// empty/unrecognised label) are treated as `unrelated`.
pub fn calc_agg_polarsim(sim: f64, stance: &str, stance_conf: f64, cfg: &Config) -> f64 {
    assert!((0.0..=1.0).contains(&sim), "sim out of [0,1]: {sim}");
    assert!((0.0..=1.0).contains(&stance_conf), "stanceConf out of [0,1]: {stance_conf}");
    let discuss_factor = cfg.sentence_similarity_discuss_factor;
    let unrelated_factor = cfg.sentence_similarity_unrelated_factor;
    assert!((0.0..=1.0).contains(&discuss_factor));
    assert!((0.0..=1.0).contains(&unrelated_factor));

    let result = match stance {
        "agree" => agree_component(sim, stance_conf),
        "disagree" => -agree_component(sim, stance_conf),
        "discuss" => sim * discuss_factor,
        _ => sim * unrelated_factor,
    };
    result.clamp(-1.0, 1.0)
}

fn agree_component(sim: f64, stance_conf: f64) -> f64 {
    if sim > stance_conf { sim } else { (stance_conf + sim) / 2.0 }
}

/// Combines `sim_review` (a `SentSimilarityReview`) with `stance_review` (a
/// `SentStanceReview`, if any) into a `SentPolarSimilarityReview`. When
/// `stance_review` is `None` this passes `sim_review` through unchanged —
/// there is nothing to combine it with.
pub fn review(cfg: &Config, registry: &Registry, sim_review: &Value, stance_review: Option<&Value>) -> Value {
    let Some(stance_review) = stance_review else {
        return sim_review.clone();
    };
    let sim = support::rating_value_of(&sim_review["reviewRating"]);
    let stance = stance_review["reviewRating"]["ratingValue"].as_str().unwrap_or("unrelated");
    let stance_conf = support::confidence_of(&stance_review["reviewRating"]);
    let polar_sim = calc_agg_polarsim(sim, stance, stance_conf, cfg);

    let ratings = [&sim_review["reviewRating"], &stance_review["reviewRating"]];
    let rating_count: u64 = ratings.iter().map(|r| r["ratingCount"].as_u64().unwrap_or(1)).sum();
    let rating = json!({
        "@type": "Rating",
        "reviewAspect": "polarSimilarity",
        "ratingValue": polar_sim,
        "confidence": stance_conf,
        "ratingCount": rating_count,
        "reviewCount": 2,
    });
    let headline = sim_label::claim_rel_str(sim, Some(stance));
    let text = format!(
        "{} (polar similarity {:.2})",
        sim_review["text"].as_str().unwrap_or_default(),
        polar_sim
    );
    let result = json!({
        "@context": CI_CONTEXT,
        "@type": "SentPolarSimilarityReview",
        "additionalType": content::super_types(registry, &json!("SentPolarSimilarityReview")),
        "itemReviewed": sim_review["itemReviewed"].clone(),
        "reviewAspect": "polarSimilarity",
        "reviewRating": rating,
        "headline": headline,
        "text": text,
        "dateCreated": isodate::now_utc_timestamp(),
        "author": bot_info(registry),
        "isBasedOn": [sim_review.clone(), stance_review.clone()],
    });
    content::with_identifier(registry, result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Registry {
        Registry::bootstrap().unwrap()
    }

    #[test]
    fn test_agree_sim_greater_than_confidence() {
        let cfg = Config::test_default();
        assert_eq!(calc_agg_polarsim(0.9, "agree", 0.5, &cfg), 0.9);
    }

    #[test]
    fn test_agree_sim_at_or_below_confidence_averages() {
        let cfg = Config::test_default();
        assert_eq!(calc_agg_polarsim(0.8, "agree", 1.0, &cfg), 0.9);
    }

    #[test]
    fn test_disagree_is_negated_agree() {
        let cfg = Config::test_default();
        assert_eq!(calc_agg_polarsim(0.6, "disagree", 1.0, &cfg), -0.8);
    }

    #[test]
    fn test_unrelated_applies_factor_regardless_of_confidence() {
        let cfg = Config::test_default();
        assert_eq!(calc_agg_polarsim(1.0, "unrelated", 0.1, &cfg), 0.9);
    }

    #[test]
    fn test_discuss_applies_discuss_factor() {
        let cfg = Config::test_default();
        assert_eq!(calc_agg_polarsim(0.5, "discuss", 0.9, &cfg), 0.45);
    }

    #[test]
    fn test_unrecognised_stance_treated_as_unrelated() {
        let cfg = Config::test_default();
        assert_eq!(
            calc_agg_polarsim(1.0, "", 0.0, &cfg),
            calc_agg_polarsim(1.0, "unrelated", 0.0, &cfg)
        );
    }

    #[test]
    fn test_disagree_is_negation_property() {
        let cfg = Config::test_default();
        for sim in [0.1, 0.5, 0.9] {
            assert_eq!(
                calc_agg_polarsim(sim, "disagree", 0.3, &cfg),
                -calc_agg_polarsim(sim, "agree", 0.3, &cfg)
            );
        }
    }

    #[test]
    fn test_review_passes_through_when_no_stance() {
        let r = registry();
        let cfg = Config::test_default();
        let sim_review = json!({"@type": "SentSimilarityReview", "reviewRating": {"ratingValue": 0.8}});
        assert_eq!(review(&cfg, &r, &sim_review, None), sim_review);
    }

    #[test]
    fn test_review_with_stance_combines() {
        let r = registry();
        let cfg = Config::test_default();
        let sim_review = json!({
            "@type": "SentSimilarityReview",
            "text": "similar",
            "itemReviewed": {"@type": "SentencePair"},
            "reviewRating": {"ratingValue": 0.8, "ratingCount": 1},
        });
        let stance_review = json!({
            "@type": "SentStanceReview",
            "reviewRating": {"ratingValue": "agree", "confidence": 1.0, "ratingCount": 1},
        });
        let combined = review(&cfg, &r, &sim_review, Some(&stance_review));
        assert_eq!(combined["reviewRating"]["ratingValue"], 0.9);
        assert_eq!(combined["reviewRating"]["confidence"], 1.0);
        assert_eq!(combined["headline"], "agrees with");
    }
}
