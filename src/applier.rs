//! Applies configuration directives to a resolved schema.
//!
//! Directives run strictly in file order. A directive whose target was
//! removed by an earlier deletion sees "path not found" like any other
//! missing path. Problems with individual directives are warnings; they
//! never abort the compile.

use serde_json::{Map, Value};

use crate::directive::{ConfigEntry, Directive, EnumMapping};
use crate::navigator::{delete_node, get_node_mut, split_path};
use crate::types::{type_set, NodeKind, Warning};

/// Apply every entry to `schema` in place, returning the warnings raised.
pub fn apply_config(schema: &mut Value, entries: &[ConfigEntry]) -> Vec<Warning> {
    tracing::info!("Modifying schema based on configuration...");
    let mut warnings = Vec::new();

    for entry in entries {
        let result = apply_directive(schema, &entry.path, &entry.directive);
        if let Err(warning) = result {
            tracing::warn!("{}", warning);
            warnings.push(warning);
        }
    }

    warnings
}

/// Apply a single directive at a dotted path.
pub fn apply_directive(schema: &mut Value, path: &str, directive: &Directive) -> Result<(), Warning> {
    let segments = split_path(path);

    match directive {
        Directive::Keep => Ok(()),
        Directive::Delete => {
            if delete_node(schema, &segments) {
                tracing::debug!("Deleted property '{}'", path);
            } else {
                tracing::debug!("Nothing to delete at '{}'", path);
            }
            Ok(())
        }
        Directive::Enumerate(mapping) if mapping.is_empty() => Err(Warning::UnsupportedDirective {
            path: path.to_string(),
            actual: "empty mapping".to_string(),
        }),
        Directive::Enumerate(mapping) => {
            let node = get_node_mut(schema, &segments)
                .and_then(Value::as_object_mut)
                .ok_or_else(|| Warning::PathNotFound {
                    path: path.to_string(),
                })?;
            apply_mapping(node, path, mapping)
        }
        Directive::Unsupported { actual } => Err(Warning::UnsupportedDirective {
            path: path.to_string(),
            actual: actual.to_string(),
        }),
    }
}

/// Attach the canonical values as `enum` and annotate the description.
///
/// For array nodes the constraint goes on `items`; the description stays on
/// the array node itself.
fn apply_mapping(
    node: &mut Map<String, Value>,
    path: &str,
    mapping: &EnumMapping,
) -> Result<(), Warning> {
    let values = Value::Array(mapping.canonical_values());
    // Typed arrays without `items` still count so they get a warning
    let is_array = type_set(node).contains("array") || NodeKind::has_items(node);

    if is_array {
        let items = node
            .get_mut("items")
            .and_then(Value::as_object_mut)
            .ok_or_else(|| Warning::MissingItems {
                path: path.to_string(),
            })?;
        items.insert("enum".to_string(), values);
    } else {
        node.insert("enum".to_string(), values);
    }

    let summary = mapping.summary();
    let description = match node.get("description").and_then(Value::as_str) {
        Some(existing) if !existing.is_empty() => format!("{}\n{}", existing, summary),
        _ => summary,
    };
    node.insert("description".to_string(), Value::String(description));

    tracing::debug!(values = mapping.len(), "Applied mapping to '{}'", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directive::parse_config;
    use serde_json::json;

    fn apply(schema: &mut Value, yaml: &str) -> Vec<Warning> {
        let config: serde_yaml::Mapping = serde_yaml::from_str(yaml).unwrap();
        let mut warnings = Vec::new();
        let entries = parse_config(&config, &mut warnings);
        warnings.extend(apply_config(schema, &entries));
        warnings
    }

    fn product() -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": { "type": "string" },
                "color": { "type": "string", "description": "Primary color" },
                "tags": { "type": "array", "items": { "type": "string" } },
                "variants": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "sku": { "type": "string" },
                            "size": { "type": ["string", "null"] }
                        }
                    }
                }
            }
        })
    }

    #[test]
    fn delete_directive_removes_property() {
        let mut schema = product();
        let warnings = apply(&mut schema, "name: false\nvariants.sku: false\n");

        assert!(warnings.is_empty());
        assert!(schema["properties"].get("name").is_none());
        assert!(schema["properties"]["variants"]["items"]["properties"]
            .get("sku")
            .is_none());
    }

    #[test]
    fn keep_directive_is_noop() {
        let mut schema = product();
        let warnings = apply(&mut schema, "name: true\n");
        assert!(warnings.is_empty());
        assert_eq!(schema, product());
    }

    #[test]
    fn mapping_sets_enum_and_appends_description() {
        let mut schema = product();
        apply(&mut schema, "color:\n  r: Red\n  g: Green\n");

        let color = &schema["properties"]["color"];
        assert_eq!(color["enum"], json!(["Red", "Green"]));
        assert_eq!(
            color["description"],
            "Primary color\nMappings: 'r' => 'Red', 'g' => 'Green'"
        );
    }

    #[test]
    fn mapping_without_prior_description() {
        let mut schema = product();
        apply(&mut schema, "name: [Alpha, Beta]\n");
        assert_eq!(
            schema["properties"]["name"]["description"],
            "Mappings: 'Alpha' => 'Alpha', 'Beta' => 'Beta'"
        );
    }

    #[test]
    fn mapping_on_array_targets_items() {
        let mut schema = product();
        apply(&mut schema, "tags:\n  x: X\n  y: Y\n");

        let tags = &schema["properties"]["tags"];
        assert_eq!(tags["items"]["enum"], json!(["X", "Y"]));
        assert!(tags.get("enum").is_none());
        assert_eq!(tags["description"], "Mappings: 'x' => 'X', 'y' => 'Y'");
    }

    #[test]
    fn mapping_through_array_of_objects() {
        let mut schema = product();
        apply(&mut schema, "variants.size: [S, M, L]\n");
        assert_eq!(
            schema["properties"]["variants"]["items"]["properties"]["size"]["enum"],
            json!(["S", "M", "L"])
        );
    }

    #[test]
    fn array_without_items_warns() {
        let mut schema = json!({
            "type": "object",
            "properties": { "tags": { "type": "array" } }
        });
        let warnings = apply(&mut schema, "tags: [a]\n");

        assert_eq!(
            warnings,
            vec![Warning::MissingItems {
                path: "tags".into()
            }]
        );
        assert!(schema["properties"]["tags"].get("description").is_none());
    }

    #[test]
    fn string_with_stray_items_gets_enum_on_node() {
        let mut schema = json!({
            "type": "object",
            "properties": {
                "code": { "type": "string", "items": { "type": "string" } }
            }
        });
        let warnings = apply(&mut schema, "code: [A, B]\n");

        assert!(warnings.is_empty());
        let code = &schema["properties"]["code"];
        assert_eq!(code["enum"], json!(["A", "B"]));
        assert!(code["items"].get("enum").is_none());
    }

    #[test]
    fn untyped_node_with_items_is_an_array() {
        let mut schema = json!({
            "type": "object",
            "properties": { "tags": { "items": { "type": "string" } } }
        });
        let warnings = apply(&mut schema, "tags: [a]\n");

        assert!(warnings.is_empty());
        assert_eq!(schema["properties"]["tags"]["items"]["enum"], json!(["a"]));
    }

    #[test]
    fn missing_path_warns_and_continues() {
        let mut schema = product();
        let warnings = apply(&mut schema, "nope: [a]\ncolor: [blue]\n");

        assert_eq!(
            warnings,
            vec![Warning::PathNotFound {
                path: "nope".into()
            }]
        );
        assert_eq!(schema["properties"]["color"]["enum"], json!(["blue"]));
    }

    #[test]
    fn unsupported_value_warns() {
        let mut schema = product();
        let warnings = apply(&mut schema, "name: 3\n");
        assert!(matches!(
            &warnings[..],
            [Warning::UnsupportedDirective { path, actual }] if path == "name" && actual == "number"
        ));
        assert_eq!(schema, product());
    }

    #[test]
    fn empty_mapping_warns() {
        let mut schema = product();
        let warnings = apply(&mut schema, "name: []\n");
        assert_eq!(warnings.len(), 1);
        assert!(schema["properties"]["name"].get("enum").is_none());
    }

    #[test]
    fn overlapping_paths_apply_in_order() {
        let mut schema = product();
        let warnings = apply(&mut schema, "variants: false\nvariants.sku: [A1]\n");

        assert!(schema["properties"].get("variants").is_none());
        assert_eq!(
            warnings,
            vec![Warning::PathNotFound {
                path: "variants.sku".into()
            }]
        );

        let mut schema = product();
        let warnings = apply(&mut schema, "variants.sku: [A1]\nvariants: false\n");
        assert!(warnings.is_empty());
        assert!(schema["properties"].get("variants").is_none());
    }
}
