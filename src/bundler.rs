//! Bundler configuration helper that registers the loader for script modules.

use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};

/// Module glob the loader rule is registered for.
pub const SOURCE_GLOB: &str = "**/*.{ts,tsx,js,jsx}";

/// Where the published loader lives inside a project.
pub fn default_loader_path(cwd: &Path) -> PathBuf {
    cwd.join("node_modules/turbopack-unocss-transform/dist/loader.mjs")
}

/// Base bundler config with the loader rule, merged with the user's config.
pub fn with_transform(user_config: Option<&Value>, loader_path: &Path) -> Value {
    let base = json!({
        "turbopack": {
            "rules": {
                SOURCE_GLOB: {
                    "loaders": [loader_path.display().to_string()]
                }
            }
        }
    });

    merge(&base, user_config)
}

/// Deep merge of `overrides` onto a copy of `base`.
///
/// Arrays concatenate base-then-override, objects merge key by key, and any
/// other override value replaces the base value. `base` is left untouched.
pub fn merge(base: &Value, overrides: Option<&Value>) -> Value {
    let mut out = base.clone();
    match overrides {
        Some(Value::Object(source)) => match &mut out {
            Value::Object(target) => merge_into(target, source),
            _ => {
                let mut target = Map::new();
                merge_into(&mut target, source);
                out = Value::Object(target);
            }
        },
        Some(Value::Null) | None => {}
        Some(other) => out = other.clone(),
    }
    out
}

fn merge_into(target: &mut Map<String, Value>, source: &Map<String, Value>) {
    for (key, value) in source {
        match value {
            Value::Array(items) => {
                let merged = match target.remove(key) {
                    Some(Value::Array(mut existing)) => {
                        existing.extend(items.iter().cloned());
                        existing
                    }
                    _ => items.clone(),
                };
                target.insert(key.clone(), Value::Array(merged));
            }
            Value::Object(nested) => {
                let slot = target
                    .entry(key.clone())
                    .or_insert_with(|| Value::Object(Map::new()));
                if !slot.is_object() {
                    *slot = Value::Object(Map::new());
                }
                if let Value::Object(slot) = slot {
                    merge_into(slot, nested);
                }
            }
            other => {
                target.insert(key.clone(), other.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_without_overrides_returns_base() {
        let base = json!({ "a": 1 });
        assert_eq!(merge(&base, None), base);
        assert_eq!(merge(&base, Some(&Value::Null)), base);
    }

    #[test]
    fn test_merge_concatenates_arrays() {
        let base = json!({ "list": [1, 2] });
        let merged = merge(&base, Some(&json!({ "list": [3] })));
        assert_eq!(merged, json!({ "list": [1, 2, 3] }));
    }

    #[test]
    fn test_merge_array_replaces_non_array() {
        let base = json!({ "list": "scalar" });
        let merged = merge(&base, Some(&json!({ "list": [3] })));
        assert_eq!(merged, json!({ "list": [3] }));
    }

    #[test]
    fn test_merge_recurses_into_objects() {
        let base = json!({ "outer": { "keep": true, "inner": { "x": 1 } } });
        let merged = merge(
            &base,
            Some(&json!({ "outer": { "inner": { "y": 2 }, "added": "v" } })),
        );
        assert_eq!(
            merged,
            json!({ "outer": { "keep": true, "inner": { "x": 1, "y": 2 }, "added": "v" } })
        );
    }

    #[test]
    fn test_merge_object_replaces_scalar() {
        let base = json!({ "outer": 5 });
        let merged = merge(&base, Some(&json!({ "outer": { "x": 1 } })));
        assert_eq!(merged, json!({ "outer": { "x": 1 } }));
    }

    #[test]
    fn test_merge_scalars_override() {
        let base = json!({ "flag": true, "name": "a", "n": 1 });
        let merged = merge(&base, Some(&json!({ "flag": false, "name": null, "n": 2 })));
        assert_eq!(merged, json!({ "flag": false, "name": null, "n": 2 }));
    }

    #[test]
    fn test_merge_does_not_mutate_base() {
        let base = json!({ "list": [1], "obj": { "a": 1 } });
        let snapshot = base.clone();
        let _ = merge(&base, Some(&json!({ "list": [2], "obj": { "b": 2 } })));
        assert_eq!(base, snapshot);
    }

    #[test]
    fn test_with_transform_registers_loader() {
        let config = with_transform(None, Path::new("/app/loader.mjs"));
        assert_eq!(
            config["turbopack"]["rules"][SOURCE_GLOB]["loaders"],
            json!(["/app/loader.mjs"])
        );
    }

    #[test]
    fn test_with_transform_keeps_user_loaders() {
        let user = json!({
            "reactStrictMode": true,
            "turbopack": { "rules": { SOURCE_GLOB: { "loaders": ["svgr"] } } }
        });
        let config = with_transform(Some(&user), Path::new("/app/loader.mjs"));

        assert_eq!(config["reactStrictMode"], json!(true));
        assert_eq!(
            config["turbopack"]["rules"][SOURCE_GLOB]["loaders"],
            json!(["/app/loader.mjs", "svgr"])
        );
    }

    #[test]
    fn test_default_loader_path() {
        assert_eq!(
            default_loader_path(Path::new("/app")),
            PathBuf::from("/app/node_modules/turbopack-unocss-transform/dist/loader.mjs")
        );
    }
}
