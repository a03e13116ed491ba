//! Small helpers for walking generic `serde_json::Value` trees — the
//! representation used by the identity/normalisation engine ([`crate::itnorm`])
//! for item bodies whose shape is only known through the type registry.

use serde_json::Value;

/// Recursive nested get with a default, e.g. `get_in(v, &["reviewRating", "ratingValue"], default)`.
/// Returns `default` if `v` is `Value::Null` at any point along the path.
pub fn get_in(value: &Value, path: &[&str], default: Value) -> Value {
    let mut current = value;
    for key in path {
        match current.get(*key) {
            Some(next) if !next.is_null() => current = next,
            _ => return default,
        }
    }
    current.clone()
}

/// Deep-copy the subset of `value`'s top-level keys named by `keys`, dropping
/// any that are absent.
pub fn select_keys(value: &Value, keys: &[&str]) -> Value {
    let Value::Object(map) = value else {
        return Value::Null;
    };
    let mut out = serde_json::Map::new();
    for key in keys {
        if let Some(v) = map.get(*key) {
            out.insert((*key).to_string(), v.clone());
        }
    }
    Value::Object(out)
}

/// Select nested paths, e.g. `select_paths(v, &[&["a", "b"], &["c"]])`. All
/// paths must agree on their depth at each shared prefix; mismatched depths
/// are a hard error since the result would otherwise silently shadow data.
pub fn select_paths(value: &Value, paths: &[&[&str]]) -> Result<Value, String> {
    let mut out = Value::Object(serde_json::Map::new());
    for path in paths {
        insert_path(&mut out, value, path)?;
    }
    Ok(out)
}

fn insert_path(out: &mut Value, source: &Value, path: &[&str]) -> Result<(), String> {
    let Some((head, rest)) = path.split_first() else {
        return Ok(());
    };
    let Some(source_child) = source.get(*head) else {
        return Ok(());
    };

    if !out.is_object() {
        return Err(format!(
            "path depth mismatch at key '{head}': expected an object at this level"
        ));
    }
    let out_map = out.as_object_mut().expect("checked above");

    if rest.is_empty() {
        out_map.insert((*head).to_string(), source_child.clone());
        return Ok(());
    }

    let entry = out_map
        .entry((*head).to_string())
        .or_insert_with(|| Value::Object(serde_json::Map::new()));
    if !entry.is_object() {
        return Err(format!(
            "path depth mismatch at key '{head}': a leaf value was already selected there"
        ));
    }
    insert_path(entry, source_child, rest)
}

/// True if `value` is composed entirely of str/int/float/None/list/dict —
/// i.e. it contains no function-like or otherwise non-serialisable payload.
/// `serde_json::Value` cannot represent such payloads in the first place,
/// so this is always true; kept as an explicit boundary check mirroring the
/// upstream validation of item trees.
pub fn is_value(_value: &Value) -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_in_present() {
        let v = json!({"a": {"b": 3}});
        assert_eq!(get_in(&v, &["a", "b"], json!(null)), json!(3));
    }

    #[test]
    fn test_get_in_missing_returns_default() {
        let v = json!({"a": {}});
        assert_eq!(get_in(&v, &["a", "b"], json!(0)), json!(0));
    }

    #[test]
    fn test_get_in_null_root_returns_default() {
        let v = Value::Null;
        assert_eq!(get_in(&v, &["a"], json!("fallback")), json!("fallback"));
    }

    #[test]
    fn test_select_keys_subset() {
        let v = json!({"a": 1, "b": 2, "c": 3});
        assert_eq!(select_keys(&v, &["a", "c"]), json!({"a": 1, "c": 3}));
    }

    #[test]
    fn test_select_keys_missing_key_dropped() {
        let v = json!({"a": 1});
        assert_eq!(select_keys(&v, &["a", "missing"]), json!({"a": 1}));
    }

    #[test]
    fn test_select_paths_nested() {
        let v = json!({"a": {"b": 1, "c": 2}, "d": 3});
        let result = select_paths(&v, &[&["a", "b"], &["d"]]).unwrap();
        assert_eq!(result, json!({"a": {"b": 1}, "d": 3}));
    }

    #[test]
    fn test_select_paths_depth_mismatch_errors() {
        let v = json!({"a": {"b": 1}});
        // First select "a" as a whole leaf, then try to select "a.b" — depth mismatch.
        let result = select_paths(&v, &[&["a"], &["a", "b"]]);
        assert!(result.is_err());
    }
}
