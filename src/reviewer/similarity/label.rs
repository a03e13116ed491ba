//! Human-readable phrasing for a raw similarity score and optional stance.

/// Describes how similar two sentences are, in words.
pub fn similarity_str(sim_val: f64) -> &'static str {
    if sim_val >= 0.9 {
        "very similar"
    } else if sim_val >= 0.75 {
        "similar"
    } else if sim_val >= 0.6 {
        "vaguely related"
    } else {
        "not so similar"
    }
}

/// Describes the relation a related sentence has to the one it was found for.
pub fn claim_rel_str(sim_val: f64, sent_stance: Option<&str>) -> String {
    match sent_stance {
        None => format!("is {} to", similarity_str(sim_val)),
        Some("agree") => "agrees with".to_string(),
        Some("disagree") => "disagrees with".to_string(),
        Some("unrelated") => "is similar(?) but unrelated to".to_string(),
        Some(_discuss) => format!("is {} to and discussed by", similarity_str(sim_val)),
    }
}
