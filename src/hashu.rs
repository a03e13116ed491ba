//! Content-addressable hashing for data items.
//!
//! `hash_dict` canonicalises a JSON value (sorted object keys, recursively)
//! and SHA-256/base64url-encodes it. `calc_str_hash` is the older MD5-based
//! scheme still used for the identity of bare-text `Sentence` items.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use md5::Md5;
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Recursively sort object keys so the same logical value always serialises
/// to the same bytes regardless of field insertion order.
fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut out = serde_json::Map::new();
            for k in keys {
                out.insert(k.clone(), canonicalize(&map[k]));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

/// Escapes `s` into `out` the way Python's `json.dumps` does with its
/// defaults (`ensure_ascii=True`): ASCII printable characters (space through
/// tilde) pass through unescaped except `"` and `\`; everything else —
/// control characters, DEL, and any non-ASCII codepoint — is `\uXXXX`-escaped,
/// with UTF-16 surrogate pairs for codepoints above the BMP.
fn escape_py_string(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        let cp = c as u32;
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ if cp < 0x20 => out.push_str(&format!("\\u{cp:04x}")),
            _ if (0x20..0x7f).contains(&cp) => out.push(c),
            _ if cp > 0xffff => {
                let v = cp - 0x10000;
                let hi = 0xd800 + (v >> 10);
                let lo = 0xdc00 + (v & 0x3ff);
                out.push_str(&format!("\\u{hi:04x}\\u{lo:04x}"));
            }
            _ => out.push_str(&format!("\\u{cp:04x}")),
        }
    }
    out.push('"');
}

/// Serialises an already-key-sorted [`Value`] the way Python's
/// `json.dumps(d, sort_keys=True)` does with its defaults: `", "`/`": "`
/// separators and `ensure_ascii=True` escaping.
fn py_json_dumps(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => escape_py_string(s, out),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                py_json_dumps(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            out.push('{');
            for (i, (k, v)) in map.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                escape_py_string(k, out);
                out.push_str(": ");
                py_json_dumps(v, out);
            }
            out.push('}');
        }
    }
}

/// Hash a JSON value by canonical serialisation + SHA-256 + base64url (no
/// padding). The canonical serialisation matches Python's
/// `json.dumps(d, sort_keys=True)` byte-for-byte (spaced separators,
/// `ensure_ascii=True`), since identifiers are compared across independent
/// implementations.
pub fn hash_dict(value: &Value) -> String {
    let canonical = canonicalize(value);
    let mut serialized = String::new();
    py_json_dumps(&canonical, &mut serialized);
    let digest = Sha256::digest(serialized.as_bytes());
    URL_SAFE_NO_PAD.encode(digest)
}

/// Hash a plain string by MD5 + base64 (no padding). Used only for bare
/// `Sentence` identity, predating the structured-item hashing scheme.
pub fn calc_str_hash(s: &str) -> String {
    let digest = Md5::digest(s.as_bytes());
    URL_SAFE_NO_PAD.encode(digest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hash_dict_is_stable_across_key_order() {
        let a = json!({"b": 1, "a": 2});
        let b = json!({"a": 2, "b": 1});
        assert_eq!(hash_dict(&a), hash_dict(&b));
    }

    #[test]
    fn test_hash_dict_differs_on_value_change() {
        let a = json!({"a": 1});
        let b = json!({"a": 2});
        assert_ne!(hash_dict(&a), hash_dict(&b));
    }

    #[test]
    fn test_hash_dict_recurses_into_nested_objects() {
        let a = json!({"outer": {"y": 1, "x": 2}});
        let b = json!({"outer": {"x": 2, "y": 1}});
        assert_eq!(hash_dict(&a), hash_dict(&b));
    }

    #[test]
    fn test_hash_dict_no_padding_chars() {
        let h = hash_dict(&json!({"a": 1}));
        assert!(!h.contains('='));
    }

    #[test]
    fn test_calc_str_hash_deterministic() {
        assert_eq!(calc_str_hash("hello"), calc_str_hash("hello"));
        assert_ne!(calc_str_hash("hello"), calc_str_hash("world"));
    }

    #[test]
    fn test_calc_str_hash_no_padding_chars() {
        assert!(!calc_str_hash("a").contains('='));
    }

    #[test]
    fn test_py_json_dumps_uses_spaced_separators() {
        let mut out = String::new();
        py_json_dumps(&json!({"a": 1, "b": 2}), &mut out);
        assert_eq!(out, r#"{"a": 1, "b": 2}"#);
    }

    #[test]
    fn test_py_json_dumps_escapes_non_ascii() {
        let mut out = String::new();
        py_json_dumps(&json!("café"), &mut out);
        assert_eq!(out, "\"caf\\u00e9\"");
    }

    #[test]
    fn test_py_json_dumps_escapes_astral_plane_as_surrogate_pair() {
        let mut out = String::new();
        py_json_dumps(&json!("\u{1F600}"), &mut out);
        assert_eq!(out, "\"\\ud83d\\ude00\"");
    }

    #[test]
    fn test_py_json_dumps_array_spacing() {
        let mut out = String::new();
        py_json_dumps(&json!([1, 2, 3]), &mut out);
        assert_eq!(out, "[1, 2, 3]");
    }

    #[test]
    fn test_hash_dict_matches_python_json_dumps_sha256() {
        // sha256(json.dumps({"a": 1, "b": "café"}, sort_keys=True).encode()).digest(),
        // base64url-nopad encoded. ensure_ascii=True (the default) escapes the
        // accented "e" to its é form.
        let digest = Sha256::digest(b"{\"a\": 1, \"b\": \"caf\\u00e9\"}");
        let expected = URL_SAFE_NO_PAD.encode(digest);
        assert_eq!(hash_dict(&json!({"b": "café", "a": 1})), expected);
    }
}
