//! Human-readable phrasing for a credibility rating.

use serde_json::Value;

use crate::config::Config;

/// Short label for a credibility rating. `not verifiable` if the rating's
/// confidence is below the configured threshold, otherwise one of five
/// bands over `ratingValue`.
pub fn rating_label(rating: &Value, cfg: &Config) -> &'static str {
    if let Some(conf) = rating.get("confidence").and_then(Value::as_f64) {
        if conf < cfg.cred_conf_threshold {
            return "not verifiable";
        }
    }
    let val = rating["ratingValue"].as_f64().unwrap_or(0.0);
    rating_value_label(val)
}

fn rating_value_label(val: f64) -> &'static str {
    if val >= 0.5 {
        "credible"
    } else if val >= 0.25 {
        "mostly credible"
    } else if val >= -0.25 {
        "uncertain"
    } else if val >= -0.5 {
        "mostly not credible"
    } else {
        "not credible"
    }
}

/// **Deprecated**: use [`rating_label`]. Describes a raw credibility value,
/// optionally attributed to a `domain` or `claimReview` source.
pub fn describe_credval(val: f64, source: Option<&str>, domain_reviewed: Option<&str>) -> String {
    match source {
        Some("domain") => format!(
            "was published in a site ({}) that is {}",
            domain_reviewed.unwrap_or("??"),
            describe_reliability(val)
        ),
        Some("claimReview") => format!("was fact-checked and found to be {}", describe_accuracy(val)),
        None => rating_value_label(val).to_string(),
        Some(other) => panic!("Unsupported credibility source {other}"),
    }
}

pub fn describe_reliability(cred_val: f64) -> &'static str {
    if cred_val >= 0.5 {
        "reliable"
    } else if cred_val >= 0.1 {
        "mostly reliable"
    } else if cred_val >= -0.1 {
        "mixed reliability"
    } else if cred_val >= -0.5 {
        "mostly unreliable"
    } else {
        "unreliable"
    }
}

pub fn describe_accuracy(cred_val: f64) -> &'static str {
    if cred_val >= 0.5 {
        "accurate"
    } else if cred_val >= 0.1 {
        "accurate with considerations"
    } else if cred_val >= -0.1 {
        "unsubstantiated"
    } else if cred_val >= -0.5 {
        "inaccurate with considerations"
    } else {
        "inaccurate"
    }
}
