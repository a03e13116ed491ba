//! Type predicates and content-conversion helpers shared by every reviewer.
//!
//! These work directly on [`serde_json::Value`] item bodies — the same
//! representation [`crate::itnorm`] walks — rather than the typed structs in
//! [`crate::model`], since reviewers need to inspect items whose exact shape
//! is only known through the type registry.

use serde_json::{Map, Value, json};
use url::Url;

use crate::hashu;
use crate::registry::Registry;

pub const CI_CONTEXT: &str = "http://coinform.eu";

pub fn is_item(v: &Value) -> bool {
    v.is_object() && v.get("@type").is_some()
}

fn type_is(v: &Value, types: &[&str]) -> bool {
    is_item(v) && v["@type"].as_str().map(|t| types.contains(&t)).unwrap_or(false)
}

pub fn is_sentence(v: &Value) -> bool {
    type_is(v, &["Sentence", "Claim"])
}

pub fn is_sentence_pair(v: &Value) -> bool {
    type_is(v, &["SentencePair"])
}

pub fn is_website(v: &Value) -> bool {
    type_is(v, &["WebSite"])
}

pub fn is_rating(v: &Value) -> bool {
    type_is(v, &["Rating", "AggregateRating", "schema:Rating"])
}

pub fn is_review(v: &Value) -> bool {
    if !is_item(v) {
        return false;
    }
    let mut types: Vec<&str> = v["additionalType"]
        .as_array()
        .map(|a| a.iter().filter_map(|t| t.as_str()).collect())
        .unwrap_or_default();
    if let Some(t) = v["@type"].as_str() {
        types.push(t);
    }
    types.contains(&"Review")
}

pub fn is_claim_review(v: &Value) -> bool {
    type_is(v, &["ClaimReview", "schema:ClaimReview"])
}

pub fn is_similar_sent(v: &Value) -> bool {
    type_is(v, &["SimilarSent"])
}

pub fn is_website_cred_review(v: &Value) -> bool {
    type_is(v, &["WebSiteCredReview"])
}

pub fn is_creativework(v: &Value) -> bool {
    type_is(v, &["CreativeWork", "Article", "Webpage", "Tweet", "SocialMediaPosting"])
}

/// True if `s` parses as a URL with a non-empty scheme and authority.
pub fn is_url(s: &str) -> bool {
    Url::parse(s)
        .map(|u| !u.scheme().is_empty() && u.host_str().map(|h| !h.is_empty()).unwrap_or(false))
        .unwrap_or(false)
}

pub fn super_types(registry: &Registry, item_or_typename: &Value) -> Vec<String> {
    let typename = resolve_typename(item_or_typename);
    registry.super_types(&typename)
}

fn resolve_typename(item_or_typename: &Value) -> String {
    if is_item(item_or_typename) {
        item_or_typename["@type"].as_str().unwrap_or_default().to_string()
    } else {
        item_or_typename.as_str().unwrap_or_default().to_string()
    }
}

/// Wraps a bare string as a `Sentence`, or passes an existing `Sentence`/`Claim` through unchanged.
pub fn as_sentence(s: &str, appearance: Vec<Value>) -> Value {
    let ident = hashu::calc_str_hash(s);
    json!({
        "@context": CI_CONTEXT,
        "@type": "Sentence",
        "identifier": ident,
        "text": s,
        "additionalType": ["CreativeWork"],
        "description": "A single sentence, possibly appearing in some larger document",
        "appearance": appearance,
    })
}

/// Passes an already-constructed `Sentence`/`Claim` item through, otherwise wraps it.
pub fn as_sentence_value(s: &Value, appearance: Vec<Value>) -> Value {
    if is_sentence(s) {
        return s.clone();
    }
    as_sentence(s.as_str().unwrap_or_default(), appearance)
}

/// Builds a `SentencePair` item pairing a query sentence with a DB sentence.
pub fn as_dbq_sentpair(db_sent: &str, q_sent: &str, db_sent_appearance: Vec<Value>) -> Value {
    let sent_a = as_sentence(q_sent, vec![]);
    let sent_b = as_sentence(db_sent, db_sent_appearance);
    let mut pair = [q_sent, db_sent];
    pair.sort_unstable();
    let text = pair.join(" <sep> ");
    let ident = hashu::calc_str_hash(&text);
    json!({
        "@context": CI_CONTEXT,
        "@type": "SentencePair",
        "identifier": ident,
        "url": format!("{CI_CONTEXT}/sentencepair?querySentence={q_sent}&sentenceInDB={db_sent}"),
        "additionalType": ["ItemPair", "CreativeWork"],
        "description": "CreativeWork consisting of exactly two sentences",
        "sentA": sent_a,
        "roleA": "querySentence",
        "sentB": sent_b,
        "roleB": "sentenceInDB",
        "text": text,
    })
}

/// Converts a URL or bare domain name into a `WebSite` item.
pub fn str_as_website(s: &str) -> Value {
    let (url, domain) = if is_url(s) {
        let parsed = Url::parse(s).expect("checked by is_url");
        let url = format!(
            "{}://{}/",
            parsed.scheme(),
            parsed.host_str().unwrap_or_default()
        );
        let domain = domain_from_url(&url).unwrap_or_default();
        (url, domain)
    } else {
        let domain = s.to_string();
        (format!("http://{domain}/"), domain)
    };
    json!({
        "@type": "WebSite",
        "url": url,
        "identifier": url,
        "name": domain,
    })
}

/// Fixes the common `http:/example.com/a/b` broken-separator URL shape.
pub fn try_fix_url(url: &str) -> String {
    if is_url(url) {
        return url.to_string();
    }
    if let Some(rest) = url.strip_prefix("http:/").filter(|r| !r.starts_with('/')) {
        return format!("http://{rest}");
    }
    if let Some(rest) = url.strip_prefix("https:/").filter(|r| !r.starts_with('/')) {
        return format!("https://{rest}");
    }
    tracing::warn!("[acred:content] could not fix url {url}");
    url.to_string()
}

/// Extracts the netloc/domain from a URL, with a `web.archive.org` special
/// case that recurses into the real wrapped URL in the archive path.
pub fn domain_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?.to_string();
    if host == "web.archive.org" {
        let path = parsed.path();
        if let Some(index) = path.find("http") {
            let real_url = try_fix_url(&path[index..]);
            if let Some(domain) = domain_from_url(&real_url) {
                return Some(domain);
            }
        }
    }
    Some(host)
}

/// Deep-copy the subset of `value`'s top-level keys named by `keys`, dropping
/// any that are absent. Thin convenience wrapper kept alongside the content
/// helpers since every bot-info builder calls it the same way.
pub fn select_keys(value: &Value, keys: &[String]) -> Value {
    let refs: Vec<&str> = keys.iter().map(|s| s.as_str()).collect();
    crate::dictu::select_keys(value, &refs)
}

/// Stamp an `identifier` field onto `value` computed from its registered ident keys.
pub fn with_identifier(registry: &Registry, mut value: Value) -> Value {
    let typename = resolve_typename(&value);
    if let Ok(keys) = registry.ident_keys(&typename) {
        let keys = keys.to_vec();
        let subset = select_keys(&value, &keys);
        let ident = hashu::hash_dict(&subset);
        if let Value::Object(ref mut map) = value {
            map.insert("identifier".to_string(), Value::String(ident));
        }
    }
    value
}

pub fn empty_map() -> Map<String, Value> {
    Map::new()
}

/// True if `site` (a URL or bare domain) matches any of `candidates` (URLs
/// or bare domains) — compared by domain where both parse as a URL, falling
/// back to a literal prefix comparison otherwise. Used for the
/// fact-checker-site and social-media-platform allow-lists.
pub fn site_matches_any(site: &str, candidates: &[String]) -> bool {
    let site_domain = domain_from_url(site).or_else(|| domain_from_url(&format!("http://{site}/")));
    candidates.iter().any(|candidate| {
        let candidate_domain =
            domain_from_url(candidate).or_else(|| domain_from_url(&format!("http://{candidate}/")));
        match (&site_domain, &candidate_domain) {
            (Some(a), Some(b)) => a == b,
            _ => site.starts_with(candidate.as_str()) || candidate.starts_with(site),
        }
    })
}
