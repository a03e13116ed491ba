//! Tree-structural operations over generic item bodies: identifier
//! assignment, URL assignment, index/graph projection and tree trimming.
//!
//! These operate on [`serde_json::Value`] rather than concrete structs
//! because they must walk arbitrary registered item shapes, dispatched
//! purely by the `@type` tag through the [`Registry`]. Concrete reviewer
//! code above this layer works with typed structs and only drops to this
//! representation at the identity-engine boundary.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::hashu::hash_dict;
use crate::registry::{NO_IDENT_TYPES, Registry, no_url_types};

fn type_of(map: &Map<String, Value>) -> Option<&str> {
    map.get("@type").and_then(Value::as_str)
}

/// Reduce an item to a reference: its `identifier`, else `@id`, else `url`,
/// else the value unchanged (if it has none of those, it isn't an item).
fn reduce_to_ref(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            for key in ["identifier", "@id", "url"] {
                if let Some(Value::String(s)) = map.get(key) {
                    return Value::String(s.clone());
                }
            }
            value.clone()
        }
        Value::Array(items) => Value::Array(items.iter().map(reduce_to_ref).collect()),
        other => other.clone(),
    }
}

fn first_ref(value: &Value) -> Option<String> {
    match value {
        Value::Object(map) => {
            for key in ["identifier", "@id", "url"] {
                if let Some(Value::String(s)) = map.get(key) {
                    return Some(s.clone());
                }
            }
            None
        }
        _ => None,
    }
}

/// Recursively assign `identifier` to every item lacking one, bottom-up, so
/// that a parent's identity hash is computed over its children's already-
/// final identifiers rather than their full bodies.
pub fn ensure_ident(value: &mut Value, registry: &Registry) -> Result<()> {
    match value {
        Value::Object(map) => {
            for v in map.values_mut() {
                ensure_ident(v, registry)?;
            }
            if let Some(ty) = type_of(map).map(str::to_string) {
                if !map.contains_key("identifier") && !NO_IDENT_TYPES.contains(&ty.as_str()) {
                    let ident_keys = registry.ident_keys(&ty)?.to_vec();
                    let mut subset = Map::new();
                    for key in &ident_keys {
                        if let Some(v) = map.get(key) {
                            subset.insert(key.clone(), reduce_to_ref(v));
                        }
                    }
                    let id = hash_dict(&Value::Object(subset));
                    map.insert("identifier".to_string(), Value::String(id));
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                ensure_ident(item, registry)?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn render_route(template: &str, map: &Map<String, Value>) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let bytes = template.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'{' {
            let end = template[i..]
                .find('}')
                .map(|p| i + p)
                .ok_or_else(|| Error::Identity(format!("unterminated placeholder in route template: {template}")))?;
            let field = &template[i + 1..end];
            let rendered = map
                .get(field)
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    Error::Identity(format!(
                        "route template placeholder '{field}' has no matching string field"
                    ))
                })?;
            out.push_str(rendered);
            i = end + 1;
        } else {
            let ch = template[i..].chars().next().unwrap();
            out.push(ch);
            i += ch.len_utf8();
        }
    }
    Ok(out)
}

/// Recursively assign `url` to every item lacking one, via its registered
/// route template rendered against `base_url`.
pub fn ensure_url(value: &mut Value, registry: &Registry, base_url: &str) -> Result<()> {
    let skip = no_url_types();
    match value {
        Value::Object(map) => {
            for v in map.values_mut() {
                ensure_url(v, registry, base_url)?;
            }
            if let Some(ty) = type_of(map).map(str::to_string) {
                if !map.contains_key("url") && !skip.contains(&ty.as_str()) {
                    if let Some(template) = registry.route_template(&ty)? {
                        let path = render_route(template, map)?;
                        map.insert("url".to_string(), Value::String(format!("{base_url}{path}")));
                    }
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                ensure_url(item, registry, base_url)?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// Configuration for [`index_ident_tree`]/[`nested_item_as_graph`] (§4.1.3–4).
#[derive(Debug, Clone, Default)]
pub struct IndexOptions {
    /// Keep only the first body seen for a given identifier instead of
    /// shallow-merging later bodies into it.
    pub unique_id_index: bool,
    /// Relation field names whose nested items stay embedded in the parent
    /// rather than being decomposed into a separate ref + link — e.g.
    /// `reviewRating`, which is part of the review it belongs to, not an
    /// independent node in the graph.
    pub composite_rels: Vec<String>,
}

impl IndexOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// The default the CLI/reviewer pipeline actually projects with:
    /// `reviewRating` stays embedded in its review.
    pub fn default_composite() -> Self {
        Self {
            unique_id_index: false,
            composite_rels: vec!["reviewRating".to_string()],
        }
    }

    fn is_composite(&self, rel: &str) -> bool {
        self.composite_rels.iter().any(|r| r == rel)
    }
}

/// Shallow-merge two item bodies under identifier collision: keys from
/// `incoming` win over keys already present in `existing`.
fn merge_index_entry(existing: &Value, incoming: &Value) -> Result<Value> {
    let (Value::Object(e), Value::Object(i)) = (existing, incoming) else {
        return Err(Error::Identity(
            "index merge expects two object bodies".to_string(),
        ));
    };
    let mut out = e.clone();
    for (k, v) in i {
        out.insert(k.clone(), v.clone());
    }
    Ok(Value::Object(out))
}

fn index_walk(
    value: &Value,
    registry: &Registry,
    index: &mut HashMap<String, Value>,
    options: &IndexOptions,
) -> Result<()> {
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                // Composite-relation children stay embedded in their parent and
                // never get their own index entry/node.
                if !options.is_composite(k) {
                    index_walk(v, registry, index, options)?;
                }
            }
            if let Some(id) = map.get("identifier").and_then(Value::as_str) {
                let mut refs_map = Map::new();
                for (k, v) in map {
                    if options.is_composite(k) {
                        refs_map.insert(k.clone(), v.clone());
                    } else {
                        refs_map.insert(k.clone(), reduce_to_ref(v));
                    }
                }
                let entry = Value::Object(refs_map);
                let merged = match index.get(id) {
                    Some(existing) if options.unique_id_index => existing.clone(),
                    Some(existing) => merge_index_entry(existing, &entry)?,
                    None => entry,
                };
                index.insert(id.to_string(), merged);
            }
        }
        Value::Array(items) => {
            for item in items {
                index_walk(item, registry, index, options)?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// Build an identifier → item-with-refs index from a nested item tree.
/// Items lacking any identifier are traversed but not indexed.
///
/// `options.unique_id_index` keeps only the first body seen per identifier
/// instead of merging later ones in; `options.composite_rels` names
/// relations whose nested items stay embedded rather than being reduced to
/// a plain ref string.
pub fn index_ident_tree(tree: &Value, registry: &Registry, options: &IndexOptions) -> Result<HashMap<String, Value>> {
    let mut index = HashMap::new();
    index_walk(tree, registry, &mut index, options)?;
    Ok(index)
}

/// Split a nested item tree into a node list (items with ref-typed fields
/// stripped out) and a link list (`{source, target, rel}` triples). Relation
/// names in `options.composite_rels` are left embedded in their node rather
/// than decomposed into links, same as for [`index_ident_tree`].
pub fn nested_item_as_graph(
    tree: &Value,
    registry: &Registry,
    options: &IndexOptions,
) -> Result<(Vec<Value>, Vec<Value>)> {
    let index = index_ident_tree(tree, registry, options)?;
    let mut nodes = Vec::with_capacity(index.len());
    let mut links = Vec::new();

    for (id, item) in &index {
        let Value::Object(map) = item else { continue };
        let ty = type_of(map).unwrap_or("").to_string();
        let ref_keys = registry.itemref_keys_lenient(&ty);
        let mut node_map = map.clone();
        for key in &ref_keys {
            if options.is_composite(key) {
                continue;
            }
            let Some(value) = node_map.remove(key) else {
                continue;
            };
            match value {
                Value::String(target) => {
                    links.push(serde_json::json!({"source": id, "target": target, "rel": key}));
                }
                Value::Array(items) => {
                    let mut all_refs = true;
                    for item in &items {
                        if let Value::String(target) = item {
                            links.push(serde_json::json!({"source": id, "target": target, "rel": key}));
                        } else {
                            all_refs = false;
                        }
                    }
                    if !all_refs {
                        node_map.insert(key.clone(), Value::Array(items));
                    }
                }
                other => {
                    // Not actually reducible to a ref (e.g. nested item never got an
                    // identifier) — keep it embedded rather than silently drop data.
                    node_map.insert(key.clone(), other);
                }
            }
        }
        nodes.push(Value::Object(node_map));
    }

    Ok((nodes, links))
}

fn trim_walk(value: &Value, prop: &str, budget: i64) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = Map::new();
            for (k, v) in map {
                if k == prop {
                    if budget == 0 {
                        continue;
                    }
                    out.insert(k.clone(), trim_walk(v, prop, budget - 1));
                } else {
                    out.insert(k.clone(), trim_walk(v, prop, budget));
                }
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(|i| trim_walk(i, prop, budget)).collect()),
        other => other.clone(),
    }
}

/// Truncate a nested tree along `prop`: `depth=0` drops the property
/// entirely wherever it occurs, `depth=n` allows `n` levels of nesting
/// through it. Negative depth is a hard error.
pub fn trim_tree(tree: &Value, prop: &str, depth: i64) -> Result<Value> {
    if depth < 0 {
        return Err(Error::Identity(format!(
            "trim_tree depth must be >= 0, got {depth}"
        )));
    }
    Ok(trim_walk(tree, prop, depth))
}

/// Split an identifier→item index into named partitions by `@type`
/// membership, plus a reserved `_rest` partition for anything unclaimed.
/// If an item's type matches more than one named partition, it is assigned
/// to the first matching partition (in argument order) and a warning is
/// logged.
pub fn partition_ident_index(
    index: &HashMap<String, Value>,
    partitions: &[(&str, Vec<&str>)],
) -> HashMap<String, HashMap<String, Value>> {
    let mut out: HashMap<String, HashMap<String, Value>> = HashMap::new();
    for (name, _) in partitions {
        out.insert((*name).to_string(), HashMap::new());
    }
    out.insert("_rest".to_string(), HashMap::new());

    for (id, item) in index {
        let ty = item.get("@type").and_then(Value::as_str).unwrap_or("");
        let matches: Vec<&str> = partitions
            .iter()
            .filter(|(_, types)| types.contains(&ty))
            .map(|(name, _)| *name)
            .collect();
        let target = match matches.as_slice() {
            [] => "_rest",
            [only] => only,
            [first, rest @ ..] => {
                tracing::warn!(
                    "[acred:itnorm] item {id} of type {ty} matches multiple partitions ({first}, {rest:?}); assigning to {first}"
                );
                first
            }
        };
        out.get_mut(target)
            .expect("partition bucket pre-created above")
            .insert(id.clone(), item.clone());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;
    use serde_json::json;

    fn reg() -> Registry {
        Registry::bootstrap().unwrap()
    }

    #[test]
    fn test_ensure_ident_assigns_identifier() {
        let mut v = json!({"@type": "Sentence", "text": "hello"});
        ensure_ident(&mut v, &reg()).unwrap();
        assert!(v.get("identifier").unwrap().as_str().unwrap().len() > 0);
    }

    #[test]
    fn test_ensure_ident_is_idempotent() {
        let mut v = json!({"@type": "Sentence", "text": "hello"});
        ensure_ident(&mut v, &reg()).unwrap();
        let first = v.clone();
        ensure_ident(&mut v, &reg()).unwrap();
        assert_eq!(v, first);
    }

    #[test]
    fn test_ensure_ident_skips_no_ident_types() {
        let mut v = json!({"@type": "Thing", "name": "x"});
        ensure_ident(&mut v, &reg()).unwrap();
        assert!(v.get("identifier").is_none());
    }

    #[test]
    fn test_ensure_ident_bottom_up_uses_child_identifiers() {
        let mut v = json!({
            "@type": "Article",
            "url": "https://example.com/a",
            "claims_content": [{"@type": "Sentence", "text": "s1"}]
        });
        ensure_ident(&mut v, &reg()).unwrap();
        let child_id = v["claims_content"][0]["identifier"].as_str().unwrap().to_string();
        assert!(!child_id.is_empty());
        assert!(v.get("identifier").is_some());
    }

    #[test]
    fn test_ensure_ident_field_order_invariant() {
        let mut a = json!({"@type": "Sentence", "text": "hi"});
        let mut b = json!({"text": "hi", "@type": "Sentence"});
        ensure_ident(&mut a, &reg()).unwrap();
        ensure_ident(&mut b, &reg()).unwrap();
        assert_eq!(a["identifier"], b["identifier"]);
    }

    #[test]
    fn test_ensure_ident_unknown_type_errors() {
        let mut v = json!({"@type": "TotallyUnknownType", "x": 1});
        assert!(ensure_ident(&mut v, &reg()).is_err());
    }

    #[test]
    fn test_ensure_url_renders_route_template() {
        let mut v = json!({"@type": "Sentence", "text": "hi"});
        ensure_ident(&mut v, &reg()).unwrap();
        ensure_url(&mut v, &reg(), "http://coinform.eu").unwrap();
        let url = v["url"].as_str().unwrap();
        assert!(url.starts_with("http://coinform.eu/sentence/"));
    }

    #[test]
    fn test_ensure_url_skips_whitelisted_types() {
        let mut v = json!({"@type": "Thing", "name": "x"});
        ensure_url(&mut v, &reg(), "http://coinform.eu").unwrap();
        assert!(v.get("url").is_none());
    }

    #[test]
    fn test_index_ident_tree_reduces_children_to_refs() {
        let mut v = json!({
            "@type": "Article",
            "url": "https://example.com/a",
            "claims_content": [{"@type": "Sentence", "text": "s1"}]
        });
        ensure_ident(&mut v, &reg()).unwrap();
        let index = index_ident_tree(&v, &reg(), &IndexOptions::new()).unwrap();
        let article_id = v["identifier"].as_str().unwrap();
        let indexed_article = &index[article_id];
        // nested sentence should now be a plain ref string, not an embedded object
        assert!(indexed_article["claims_content"][0].is_string());
    }

    #[test]
    fn test_index_ident_tree_merges_on_collision() {
        let mut a = HashMap::new();
        let options = IndexOptions::new();
        index_walk(
            &json!({"@type": "Sentence", "identifier": "id1", "text": "hi"}),
            &reg(),
            &mut a,
            &options,
        )
        .unwrap();
        index_walk(
            &json!({"@type": "Sentence", "identifier": "id1", "text": "hi", "extra": "field"}),
            &reg(),
            &mut a,
            &options,
        )
        .unwrap();
        assert_eq!(a["id1"]["extra"], json!("field"));
    }

    #[test]
    fn test_index_ident_tree_unique_id_index_keeps_first_body() {
        let mut a = HashMap::new();
        let options = IndexOptions {
            unique_id_index: true,
            composite_rels: vec![],
        };
        index_walk(
            &json!({"@type": "Sentence", "identifier": "id1", "text": "hi"}),
            &reg(),
            &mut a,
            &options,
        )
        .unwrap();
        index_walk(
            &json!({"@type": "Sentence", "identifier": "id1", "text": "hi", "extra": "field"}),
            &reg(),
            &mut a,
            &options,
        )
        .unwrap();
        assert!(a["id1"].get("extra").is_none());
    }

    #[test]
    fn test_index_ident_tree_composite_rel_stays_embedded() {
        let v = json!({
            "@type": "WebSiteCredReview",
            "identifier": "rev1",
            "reviewRating": {"@type": "Rating", "identifier": "rat1", "ratingValue": 0.5},
        });
        let options = IndexOptions {
            unique_id_index: false,
            composite_rels: vec!["reviewRating".to_string()],
        };
        let index = index_ident_tree(&v, &reg(), &options).unwrap();
        let review = &index["rev1"];
        // the rating stays embedded as a full object rather than reduced to its ref
        assert!(review["reviewRating"].is_object());
        assert_eq!(review["reviewRating"]["ratingValue"], 0.5);
    }

    #[test]
    fn test_nested_item_as_graph_splits_nodes_and_links() {
        let mut v = json!({
            "@type": "Article",
            "url": "https://example.com/a",
            "claims_content": [{"@type": "Sentence", "text": "s1"}]
        });
        ensure_ident(&mut v, &reg()).unwrap();
        let (nodes, links) = nested_item_as_graph(&v, &reg(), &IndexOptions::new()).unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0]["rel"], json!("claims_content"));
    }

    #[test]
    fn test_nested_item_as_graph_composite_rel_not_decomposed() {
        let v = json!({
            "@type": "WebSiteCredReview",
            "identifier": "rev1",
            "author": {"identifier": "bot1"},
            "itemReviewed": {"identifier": "site1"},
            "reviewRating": {"@type": "Rating", "identifier": "rat1", "ratingValue": 0.5},
        });
        let (nodes, links) = nested_item_as_graph(&v, &reg(), &IndexOptions::default_composite()).unwrap();
        // reviewRating never becomes its own node or link, despite having an identifier
        assert!(!nodes.iter().any(|n| n["identifier"] == json!("rat1")));
        assert!(!links.iter().any(|l| l["rel"] == json!("reviewRating")));
        let review = nodes.iter().find(|n| n["identifier"] == json!("rev1")).unwrap();
        assert_eq!(review["reviewRating"]["ratingValue"], 0.5);
        // author/itemReviewed are still decomposed as usual
        assert!(links.iter().any(|l| l["rel"] == json!("author")));
    }

    #[test]
    fn test_trim_tree_depth_zero_removes_property() {
        let v = json!({"a": 1, "isBasedOn": [{"isBasedOn": [1, 2]}]});
        let trimmed = trim_tree(&v, "isBasedOn", 0).unwrap();
        assert!(trimmed.get("isBasedOn").is_none());
    }

    #[test]
    fn test_trim_tree_depth_one_allows_one_level() {
        let v = json!({"isBasedOn": [{"isBasedOn": [{"isBasedOn": [1]}]}]});
        let trimmed = trim_tree(&v, "isBasedOn", 1).unwrap();
        let inner = &trimmed["isBasedOn"][0];
        assert!(inner.get("isBasedOn").is_none());
    }

    #[test]
    fn test_trim_tree_fixed_point_at_full_depth() {
        let v = json!({"isBasedOn": [{"isBasedOn": [{"a": 1}]}]});
        let trimmed = trim_tree(&v, "isBasedOn", 5).unwrap();
        assert_eq!(trimmed, v);
    }

    #[test]
    fn test_trim_tree_negative_depth_errors() {
        let v = json!({"isBasedOn": []});
        assert!(trim_tree(&v, "isBasedOn", -1).is_err());
    }

    #[test]
    fn test_partition_ident_index_reconstructs_input() {
        let mut index = HashMap::new();
        index.insert("s1".to_string(), json!({"@type": "Sentence"}));
        index.insert("a1".to_string(), json!({"@type": "Article"}));
        index.insert("o1".to_string(), json!({"@type": "Organization"}));

        let partitions = vec![("sentences", vec!["Sentence"]), ("articles", vec!["Article"])];
        let parts = partition_ident_index(&index, &partitions);

        let mut reconstructed = HashMap::new();
        for bucket in parts.values() {
            for (k, v) in bucket {
                reconstructed.insert(k.clone(), v.clone());
            }
        }
        assert_eq!(reconstructed.len(), index.len());
        assert_eq!(parts["_rest"].len(), 1);
        assert_eq!(parts["sentences"].len(), 1);
        assert_eq!(parts["articles"].len(), 1);
    }

    #[test]
    fn test_partition_ident_index_ambiguous_assigns_first_match() {
        let mut index = HashMap::new();
        index.insert("x1".to_string(), json!({"@type": "Article"}));
        let partitions = vec![("docs", vec!["Article"]), ("webpages", vec!["Article"])];
        let parts = partition_ident_index(&index, &partitions);
        assert_eq!(parts["docs"].len(), 1);
        assert_eq!(parts["webpages"].len(), 0);
    }
}
