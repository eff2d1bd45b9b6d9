//! Dotted-path navigation over a schema tree.
//!
//! A path such as `variants.options.name` walks object `properties` one
//! segment at a time. Array nodes are transparent: the walk continues into
//! `items` without consuming a segment, so a path addresses the element
//! schema rather than an index.

use serde_json::Value;

use crate::types::NodeKind;

/// Split a dotted path into its segments.
pub fn split_path(path: &str) -> Vec<&str> {
    path.split('.').collect()
}

/// Find the node at `path`, or `None` if the path does not resolve.
pub fn get_node<'a>(node: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let Some((key, rest)) = path.split_first() else {
        return Some(node);
    };

    match NodeKind::of_value(node) {
        NodeKind::Object => get_node(node.get("properties")?.get(*key)?, rest),
        NodeKind::Array => get_node(node.get("items")?, path),
        NodeKind::Leaf => None,
    }
}

/// Mutable counterpart of [`get_node`].
pub fn get_node_mut<'a>(node: &'a mut Value, path: &[&str]) -> Option<&'a mut Value> {
    let Some((key, rest)) = path.split_first() else {
        return Some(node);
    };

    match NodeKind::of_value(node) {
        NodeKind::Object => get_node_mut(node.get_mut("properties")?.get_mut(*key)?, rest),
        NodeKind::Array => get_node_mut(node.get_mut("items")?, path),
        NodeKind::Leaf => None,
    }
}

/// Remove the property addressed by `path` from its parent's `properties`.
///
/// Returns whether anything was removed; unresolvable paths are a no-op.
/// Sibling order in `properties` is preserved.
pub fn delete_node(node: &mut Value, path: &[&str]) -> bool {
    let Some((key, rest)) = path.split_first() else {
        return false;
    };

    match NodeKind::of_value(node) {
        NodeKind::Object => {
            let Some(props) = node.get_mut("properties").and_then(Value::as_object_mut) else {
                return false;
            };
            if rest.is_empty() {
                props.shift_remove(*key).is_some()
            } else {
                props
                    .get_mut(*key)
                    .is_some_and(|child| delete_node(child, rest))
            }
        }
        NodeKind::Array => node
            .get_mut("items")
            .is_some_and(|items| delete_node(items, path)),
        NodeKind::Leaf => false,
    }
}
