//! Structural statistics checked against the consumer's budgets.

use serde::Serialize;
use serde_json::Value;

use crate::types::{Budgets, NodeKind, Warning};

/// Size and nesting of a compiled schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SchemaStats {
    /// Sum of `properties` sizes over every reachable object node.
    pub total_properties: usize,
    /// Deepest object nesting; the root object is level 1 and arrays add nothing.
    pub max_depth: usize,
}

impl SchemaStats {
    /// Walk the tree and collect statistics.
    pub fn collect(schema: &Value) -> Self {
        let mut stats = SchemaStats::default();
        stats.visit(schema, 1);
        stats
    }

    fn visit(&mut self, node: &Value, level: usize) {
        match NodeKind::of_value(node) {
            NodeKind::Object => {
                let Some(props) = node.get("properties").and_then(Value::as_object) else {
                    return;
                };
                self.total_properties += props.len();
                self.max_depth = self.max_depth.max(level);
                for prop in props.values() {
                    self.visit(prop, level + 1);
                }
                if node.as_object().is_some_and(NodeKind::has_items) {
                    self.visit(&node["items"], level);
                }
            }
            NodeKind::Array => {
                if let Some(items) = node.get("items") {
                    self.visit(items, level);
                }
            }
            NodeKind::Leaf => {}
        }
    }

    /// Budget violations, empty when within budget.
    pub fn exceeded(&self, budgets: &Budgets) -> Vec<Warning> {
        let mut warnings = Vec::new();
        if self.total_properties > budgets.max_properties {
            warnings.push(Warning::PropertyBudgetExceeded {
                count: self.total_properties,
                limit: budgets.max_properties,
            });
        }
        if self.max_depth > budgets.max_depth {
            warnings.push(Warning::DepthBudgetExceeded {
                depth: self.max_depth,
                limit: budgets.max_depth,
            });
        }
        warnings
    }

    pub fn within_budget(&self, budgets: &Budgets) -> bool {
        self.exceeded(budgets).is_empty()
    }
}

/// Collect statistics, log them, and return any budget warnings.
pub fn report_stats(schema: &Value, budgets: &Budgets) -> (SchemaStats, Vec<Warning>) {
    tracing::info!("Calculating schema statistics...");
    let stats = SchemaStats::collect(schema);
    tracing::info!("Total properties: {}", stats.total_properties);
    tracing::info!("Maximum nesting level: {}", stats.max_depth);

    let warnings = stats.exceeded(budgets);
    for warning in &warnings {
        tracing::warn!("{}", warning);
    }
    if warnings.is_empty() {
        tracing::info!("Schema meets the property and nesting constraints.");
    } else {
        tracing::info!("Schema does not meet the property and nesting constraints.");
    }

    (stats, warnings)
}
