//! Reference resolution - inlines local `$defs` references.
//!
//! Every `{"$ref": "#/$defs/<name>"}` is replaced by an independent,
//! recursively resolved copy of the definition, with any sibling keys of the
//! reference overlaid on top. The `$defs` table itself is dropped from the
//! output so the compiled schema is self-contained.

use serde_json::{Map, Value};

use crate::error::CompileError;

const DEFS_KEY: &str = "$defs";
const REF_KEY: &str = "$ref";
const DEFS_PREFIX: &str = "#/$defs/";

/// Resolve every `$ref` in `schema` against its top-level `$defs`.
///
/// Consumes the schema; the returned tree contains no `$ref` and no `$defs`.
/// Cyclic definitions are not supported and will not terminate.
///
/// # Errors
///
/// Returns `CompileError::UnsupportedRef` for references that are not local
/// `$defs` pointers, and `CompileError::DefinitionNotFound` for dangling names.
pub fn resolve_refs(mut schema: Value) -> Result<Value, CompileError> {
    tracing::info!("Resolving $ref references...");

    let definitions = match schema.as_object_mut().and_then(|m| m.shift_remove(DEFS_KEY)) {
        Some(Value::Object(defs)) => defs,
        _ => Map::new(),
    };

    let mut resolver = Resolver {
        definitions: &definitions,
        expanded: 0,
    };
    let resolved = resolver.resolve_value(&schema)?;

    tracing::info!(
        definitions = definitions.len(),
        references = resolver.expanded,
        "References resolved."
    );
    Ok(resolved)
}

/// Returns true if any node in the tree still carries a `$ref`.
pub fn has_refs(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.contains_key(REF_KEY) || map.values().any(has_refs),
        Value::Array(arr) => arr.iter().any(has_refs),
        _ => false,
    }
}

/// Extract the definition name from a `#/$defs/<name>` pointer.
///
/// Applies JSON Pointer unescaping (`~1` = `/`, `~0` = `~`). Pointers that
/// reach deeper than a single definition are not supported.
pub fn definition_name(reference: &str) -> Result<String, CompileError> {
    let unsupported = || CompileError::UnsupportedRef {
        reference: reference.to_string(),
    };

    let name = reference.strip_prefix(DEFS_PREFIX).ok_or_else(unsupported)?;
    if name.is_empty() || name.contains('/') {
        return Err(unsupported());
    }
    Ok(name.replace("~1", "/").replace("~0", "~"))
}

// --- Internal implementation ---

struct Resolver<'a> {
    definitions: &'a Map<String, Value>,
    expanded: usize,
}

impl Resolver<'_> {
    fn resolve_value(&mut self, value: &Value) -> Result<Value, CompileError> {
        match value {
            Value::Object(map) => self.resolve_object(map),
            Value::Array(arr) => arr
                .iter()
                .map(|item| self.resolve_value(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            // Primitives pass through unchanged
            other => Ok(other.clone()),
        }
    }

    fn resolve_object(&mut self, map: &Map<String, Value>) -> Result<Value, CompileError> {
        let Some(reference) = map.get(REF_KEY) else {
            let mut result = Map::new();
            for (key, value) in map {
                result.insert(key.clone(), self.resolve_value(value)?);
            }
            return Ok(Value::Object(result));
        };

        let reference = reference
            .as_str()
            .ok_or_else(|| CompileError::UnsupportedRef {
                reference: reference.to_string(),
            })?;
        let name = definition_name(reference)?;
        let definition = self
            .definitions
            .get(&name)
            .ok_or(CompileError::DefinitionNotFound { name })?;

        // resolve_value builds a fresh tree, so every expansion is independent
        self.expanded += 1;
        let mut resolved = self.resolve_value(definition)?;

        // Sibling keys of the reference override the definition's own keys
        if let Value::Object(target) = &mut resolved {
            for (key, value) in map {
                if key != REF_KEY {
                    target.insert(key.clone(), self.resolve_value(value)?);
                }
            }
        }
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn inlines_definition_and_drops_defs() {
        let schema = json!({
            "type": "object",
            "properties": {
                "price": { "$ref": "#/$defs/money" }
            },
            "$defs": {
                "money": { "type": "number", "minimum": 0 }
            }
        });
        let resolved = resolve_refs(schema).unwrap();

        assert_eq!(
            resolved["properties"]["price"],
            json!({ "type": "number", "minimum": 0 })
        );
        assert!(resolved.get("$defs").is_none());
        assert!(!has_refs(&resolved));
    }

    #[test]
    fn resolves_nested_definitions() {
        let schema = json!({
            "type": "object",
            "properties": {
                "variant": { "$ref": "#/$defs/variant" }
            },
            "$defs": {
                "variant": {
                    "type": "object",
                    "properties": { "price": { "$ref": "#/$defs/money" } }
                },
                "money": { "type": "number" }
            }
        });
        let resolved = resolve_refs(schema).unwrap();

        assert_eq!(
            resolved["properties"]["variant"]["properties"]["price"]["type"],
            "number"
        );
        assert!(!has_refs(&resolved));
    }

    #[test]
    fn sibling_keys_override_definition() {
        let schema = json!({
            "type": "object",
            "properties": {
                "sale_price": {
                    "$ref": "#/$defs/money",
                    "description": "Discounted price"
                }
            },
            "$defs": {
                "money": { "type": "number", "description": "Amount in store currency" }
            }
        });
        let resolved = resolve_refs(schema).unwrap();

        assert_eq!(
            resolved["properties"]["sale_price"]["description"],
            "Discounted price"
        );
        assert_eq!(resolved["properties"]["sale_price"]["type"], "number");
    }

    #[test]
    fn resolves_refs_inside_arrays() {
        let schema = json!({
            "type": "array",
            "items": { "$ref": "#/$defs/tag" },
            "anyOf": [{ "$ref": "#/$defs/tag" }],
            "$defs": { "tag": { "type": "string" } }
        });
        let resolved = resolve_refs(schema).unwrap();

        assert_eq!(resolved["items"], json!({ "type": "string" }));
        assert_eq!(resolved["anyOf"][0], json!({ "type": "string" }));
    }

    #[test]
    fn repeated_references_are_independent() {
        let schema = json!({
            "type": "object",
            "properties": {
                "billing": { "$ref": "#/$defs/address" },
                "shipping": { "$ref": "#/$defs/address" }
            },
            "$defs": {
                "address": {
                    "type": "object",
                    "properties": {
                        "street": { "type": "string" },
                        "city": { "type": "string" }
                    }
                }
            }
        });
        let mut resolved = resolve_refs(schema).unwrap();

        resolved["properties"]["billing"]["properties"]
            .as_object_mut()
            .unwrap()
            .remove("city");

        assert!(resolved["properties"]["billing"]["properties"]
            .get("city")
            .is_none());
        assert!(resolved["properties"]["shipping"]["properties"]
            .get("city")
            .is_some());
    }

    #[test]
    fn schema_without_defs_is_unchanged() {
        let schema = json!({
            "type": "object",
            "properties": { "name": { "type": "string" } }
        });
        let resolved = resolve_refs(schema.clone()).unwrap();
        assert_eq!(resolved, schema);
    }

    #[test]
    fn missing_definition_errors() {
        let schema = json!({
            "properties": { "a": { "$ref": "#/$defs/missing" } },
            "$defs": {}
        });
        let result = resolve_refs(schema);
        assert!(matches!(
            result,
            Err(CompileError::DefinitionNotFound { name }) if name == "missing"
        ));
    }

    #[test]
    fn unsupported_reference_forms_error() {
        for reference in [
            "https://example.com/schema.json",
            "other.json#/$defs/a",
            "#/definitions/a",
            "#/$defs/",
            "#/$defs/a/properties/b",
            "#",
        ] {
            let schema = json!({ "properties": { "a": { "$ref": reference } } });
            assert!(
                matches!(resolve_refs(schema), Err(CompileError::UnsupportedRef { .. })),
                "expected {} to be rejected",
                reference
            );
        }
    }

    #[test]
    fn definition_name_unescapes_pointer() {
        assert_eq!(definition_name("#/$defs/a~1b").unwrap(), "a/b");
        assert_eq!(definition_name("#/$defs/a~0b").unwrap(), "a~b");
    }
}
