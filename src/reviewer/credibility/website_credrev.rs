//! WebSite credibility reviewer (§4.3): turns an external per-domain
//! credibility lookup into a `WebSiteCredReview`.

use serde_json::{Value, json};

use crate::bot_describer;
use crate::config::Config;
use crate::content::{self, CI_CONTEXT};
use crate::dictu;
use crate::hashu;
use crate::isodate;
use crate::registry::Registry;
use crate::services::website_credibility::{self, DomainCredibilityCache};

const VERSION: &str = "0.1.0";

/// `isBasedOn` bot descriptor for `WebSiteCredReview`s. The reported
/// `softwareVersion` rotates weekly, since the underlying MisinfoMe-style
/// service is updated independently of this crate.
pub fn misinfome_source_cred_reviewer(registry: &Registry) -> Value {
    let result = json!({
        "@context": CI_CONTEXT,
        "@type": "WebSiteCredReviewer",
        "name": "MisinfoMe Source Credibility Reviewer",
        "description": "Estimates the credibility of a web site based on assessments of its source by third party organisations.",
        "additionalType": content::super_types(registry, &json!("WebSiteCredReviewer")),
        "author": bot_describer::esi_lab_organization(),
        "dateCreated": "2019-06-20T20:03:00Z",
        "softwareVersion": isodate::start_of_week_utc_timestamp(),
        "applicationSuite": "Co-inform",
        "isBasedOn": [],
        "launchConfiguration": {},
    });
    content::with_identifier(registry, result)
}

/// Reviews a `WebSite` item (or a bare URL/domain string) for credibility.
pub async fn review(
    client: &reqwest::Client,
    cfg: &Config,
    cache: &DomainCredibilityCache,
    registry: &Registry,
    website_or_str: &str,
) -> Value {
    let website = content::str_as_website(website_or_str);
    let domain = website["name"].as_str().unwrap_or(website_or_str).to_string();
    let dom_cred = website_credibility::domain_credibility(client, cfg, cache, &domain).await;
    from_old_domain_credibility(&website, &dom_cred, registry)
}

/// Converts a `SimilarSent`-shaped value's `domain_credibility`/`domain`
/// fields into a `WebSiteCredReview`, looking the domain up fresh if no
/// `domain_credibility` was embedded in the similar-sentence result.
pub async fn similar_sent_as_website_cred_rev(
    client: &reqwest::Client,
    cfg: &Config,
    cache: &DomainCredibilityCache,
    registry: &Registry,
    sim_sent: &Value,
) -> Value {
    if let Some(dom_cred) = sim_sent.get("domain_credibility").filter(|v| !v.is_null()) {
        let domain = sim_sent["domain"].as_str().unwrap_or("??");
        let website = content::str_as_website(domain);
        return from_old_domain_credibility(&website, dom_cred, registry);
    }
    if let Some(domain) = sim_sent.get("domain").and_then(Value::as_str) {
        return review(client, cfg, cache, registry, domain).await;
    }
    if let Some(doc_url) = sim_sent.get("doc_url").and_then(Value::as_str) {
        if let Some(domain) = content::domain_from_url(doc_url) {
            return review(client, cfg, cache, registry, &domain).await;
        }
    }
    from_old_domain_credibility(
        &json!({"@type": "WebSite", "url": "??", "name": "??"}),
        &website_credibility::default_domain_credibility("??"),
        registry,
    )
}

/// Converts a legacy `DomainCredibility` record (the raw shape the external
/// service returns) into a `WebSiteCredReview` for `website`.
pub fn from_old_domain_credibility(website: &Value, dom_cred: &Value, registry: &Registry) -> Value {
    let assessments = dom_cred["assessments"].as_array().cloned().unwrap_or_default();
    let rating_value = dictu::get_in(dom_cred, &["credibility", "value"], json!(0.0))
        .as_f64()
        .unwrap_or(0.0);
    // Upstream quirk, deliberately preserved: an explicit `confidence: 0`
    // means "known and scored zero"; a field that's missing entirely means
    // "known but never scored", which defaults to moderate trust (0.5).
    let confidence = dictu::get_in(dom_cred, &["credibility", "confidence"], json!(0.5))
        .as_f64()
        .unwrap_or(0.5);
    let count = assessments.len() as u64;
    let explanation = example_raters_markdown(&assessments);
    let rating = json!({
        "@type": "AggregateRating",
        "reviewAspect": "credibility",
        "reviewCount": count,
        "ratingCount": count,
        "ratingValue": rating_value,
        "confidence": confidence,
        "ratingExplanation": explanation.clone(),
    });
    let text = format!(
        "Site `{}` has a credibility rating of {:.2}{}",
        website["name"].as_str().unwrap_or("??"),
        rating_value,
        if explanation.is_empty() { String::new() } else { format!(", {explanation}") }
    );
    let result = json!({
        "@context": CI_CONTEXT,
        "@type": "WebSiteCredReview",
        "additionalType": content::super_types(registry, &json!("WebSiteCredReview")),
        "itemReviewed": website,
        "reviewAspect": "credibility",
        "reviewRating": rating,
        "text": text,
        "dateCreated": isodate::now_utc_timestamp(),
        "author": misinfome_source_cred_reviewer(registry),
        "isBasedOn": [],
    });
    content::with_identifier(registry, result)
}

/// Formats a markdown citation clause naming the first one or two raters,
/// `e.g.`-prefixed when there are three or more.
fn example_raters_markdown(assessments: &[Value]) -> String {
    let names: Vec<String> = assessments
        .iter()
        .filter_map(|a| {
            let name = a.get("origin").and_then(Value::as_str)?;
            let homepage = a.get("origin_homepage").and_then(Value::as_str).unwrap_or(name);
            Some(format!("[{name}]({homepage})"))
        })
        .collect();
    match names.len() {
        0 => String::new(),
        1 => format!("according to {}", names[0]),
        2 => format!("according to {} and {}", names[0], names[1]),
        _ => format!("according to e.g. {} and {}", names[0], names[1]),
    }
}
