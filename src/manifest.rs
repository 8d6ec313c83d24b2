//! Manifest reading and dotted-path lookup.
//!
//! A module manifest is a JSON document we have no schema for; the tool only
//! pulls a handful of scalar values out of it by dotted path, for example
//! `compatibility.verified`. Traversal is a pure lookup with one hard rule:
//! stepping *into* a string or a list mid-path means the manifest does not
//! have the shape we need, and we report where traversal stopped rather than
//! silently returning nothing.
//!
//! # Example
//!
//! ```
//! use fvtt_autopublish::manifest::get_dotted_path;
//!
//! let doc = serde_json::json!({"compatibility": {"minimum": "10"}});
//! let val = get_dotted_path(&doc, "compatibility.minimum").unwrap();
//! assert_eq!(val, Some(&serde_json::json!("10")));
//! ```

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::ManifestError;

/// Read and parse a manifest file into an untyped JSON document.
pub fn read_manifest(path: &Path) -> Result<Value, ManifestError> {
    let text = fs::read_to_string(path).map_err(|source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ManifestError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolve a dotted key path like `compatibility.verified` against a JSON
/// document.
///
/// Returns `Ok(None)` when any segment is missing. Returns an error naming
/// the partial path reached when traversal would have to step into a string
/// or a list as if it were a mapping. Other scalars encountered mid-path
/// (numbers, booleans, null) are treated as absence, the same as a missing
/// key.
pub fn get_dotted_path<'a>(doc: &'a Value, path: &str) -> Result<Option<&'a Value>, ManifestError> {
    let components: Vec<&str> = path.split('.').collect();

    let mut current = doc;
    for (index, component) in components.iter().enumerate() {
        match current {
            Value::String(_) => {
                return Err(ManifestError::UnexpectedString {
                    partial: components[..index].join("."),
                    full: path.to_string(),
                });
            }
            Value::Array(_) => {
                return Err(ManifestError::UnexpectedList {
                    partial: components[..index].join("."),
                    full: path.to_string(),
                });
            }
            Value::Object(map) => match map.get(*component) {
                Some(next) => current = next,
                None => return Ok(None),
            },
            _ => return Ok(None),
        }
    }
    Ok(Some(current))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolves_nested_value() {
        let doc = json!({"compatibility": {"verified": "11"}});
        let val = get_dotted_path(&doc, "compatibility.verified").unwrap();
        assert_eq!(val, Some(&json!("11")));
    }

    #[test]
    fn resolves_top_level_value() {
        let doc = json!({"version": "1.2.0"});
        assert_eq!(
            get_dotted_path(&doc, "version").unwrap(),
            Some(&json!("1.2.0"))
        );
    }

    #[test]
    fn missing_key_is_absence() {
        let doc = json!({"compatibility": {"verified": "11"}});
        assert_eq!(get_dotted_path(&doc, "compatibility.maximum").unwrap(), None);
        assert_eq!(get_dotted_path(&doc, "nothing.here").unwrap(), None);
    }

    #[test]
    fn terminal_value_may_be_any_type() {
        // The string/list rule only applies before the path is exhausted.
        let doc = json!({"changelog": "https://x/CHANGELOG.md", "tags": ["a"]});
        assert_eq!(
            get_dotted_path(&doc, "changelog").unwrap(),
            Some(&json!("https://x/CHANGELOG.md"))
        );
        assert_eq!(get_dotted_path(&doc, "tags").unwrap(), Some(&json!(["a"])));
    }

    #[test]
    fn string_mid_path_is_an_error_naming_the_partial_path() {
        let doc = json!({"compatibility": "10"});
        let err = get_dotted_path(&doc, "compatibility.minimum").unwrap_err();
        match err {
            ManifestError::UnexpectedString { partial, full } => {
                assert_eq!(partial, "compatibility");
                assert_eq!(full, "compatibility.minimum");
            }
            other => panic!("expected UnexpectedString, got {other:?}"),
        }
    }

    #[test]
    fn list_mid_path_is_an_error_naming_the_partial_path() {
        let doc = json!({"a": {"b": [1, 2]}});
        let err = get_dotted_path(&doc, "a.b.c").unwrap_err();
        match err {
            ManifestError::UnexpectedList { partial, full } => {
                assert_eq!(partial, "a.b");
                assert_eq!(full, "a.b.c");
            }
            other => panic!("expected UnexpectedList, got {other:?}"),
        }
    }

    #[test]
    fn string_at_document_root_is_an_empty_partial_path() {
        let doc = json!("oops");
        let err = get_dotted_path(&doc, "version").unwrap_err();
        match err {
            ManifestError::UnexpectedString { partial, .. } => assert_eq!(partial, ""),
            other => panic!("expected UnexpectedString, got {other:?}"),
        }
    }

    #[test]
    fn number_mid_path_is_absence() {
        let doc = json!({"compatibility": 10});
        assert_eq!(get_dotted_path(&doc, "compatibility.minimum").unwrap(), None);
    }

    #[test]
    fn read_manifest_rejects_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("module.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            read_manifest(&path),
            Err(ManifestError::Json { .. })
        ));
    }

    #[test]
    fn read_manifest_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert!(matches!(read_manifest(&path), Err(ManifestError::Io { .. })));
    }
}
