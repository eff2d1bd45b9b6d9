//! Closes a schema for strict structured output.
//!
//! Every object node reachable through `properties` and `items` gets
//! `required` set to exactly its current property names and
//! `additionalProperties: false`. Run after directives so deleted fields
//! never appear in `required`.

use serde_json::Value;

use crate::types::NodeKind;

/// Recursively mark all object nodes fully required and closed.
///
/// Idempotent: values are set, never toggled.
pub fn close_schema(schema: &mut Value) {
    tracing::info!("Setting all fields as required...");
    tracing::info!("Setting 'additionalProperties' to false for all objects...");
    close_node(schema);
}

fn close_node(node: &mut Value) {
    match NodeKind::of_value(node) {
        NodeKind::Object => {
            let Value::Object(map) = node else {
                return;
            };
            let required: Vec<Value> = match map.get("properties") {
                Some(Value::Object(props)) => {
                    props.keys().map(|k| Value::String(k.clone())).collect()
                }
                _ => Vec::new(),
            };
            map.insert("required".to_string(), Value::Array(required));
            map.insert("additionalProperties".to_string(), Value::Bool(false));

            if let Some(Value::Object(props)) = map.get_mut("properties") {
                for prop in props.values_mut() {
                    close_node(prop);
                }
            }
            if NodeKind::has_items(map) {
                if let Some(items) = map.get_mut("items") {
                    close_node(items);
                }
            }
        }
        NodeKind::Array => {
            if let Some(items) = node.get_mut("items") {
                close_node(items);
            }
        }
        NodeKind::Leaf => {}
    }
}
