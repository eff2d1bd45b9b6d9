//! Core types shared by the compilation stages.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::writer::compiled_file_name;

/// Suffix inserted before the extension of the compiled output file.
pub const COMPILED_SUFFIX: &str = "_compiled";

/// Normalize a node's `type` keyword into a set of type names.
///
/// `"object"` and `["object", "null"]` both come out as sets; a missing
/// or malformed `type` yields the empty set.
pub fn type_set(node: &Map<String, Value>) -> BTreeSet<&str> {
    match node.get("type") {
        Some(Value::String(s)) => BTreeSet::from([s.as_str()]),
        Some(Value::Array(types)) => types.iter().filter_map(Value::as_str).collect(),
        _ => BTreeSet::new(),
    }
}

/// Whether a node's `type` permits `name`. An untyped node permits anything.
pub fn allows_type(node: &Map<String, Value>, name: &str) -> bool {
    let types = type_set(node);
    types.is_empty() || types.contains(name)
}

/// How a traversal should treat a schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Has a `properties` mapping.
    Object,
    /// Has an `items` schema; transparent to paths and depth.
    Array,
    /// Anything else.
    Leaf,
}

impl NodeKind {
    /// Classify a node by its structural keywords, using `type` only to
    /// rule a keyword out when the type set excludes it.
    ///
    /// A node that allows both `object` and `array` and carries both
    /// `properties` and `items` is an `Object`; paths go through its
    /// `properties`, while closing and statistics also descend into its
    /// `items` (see [`NodeKind::has_items`]).
    pub fn of(node: &Map<String, Value>) -> Self {
        if allows_type(node, "object") && matches!(node.get("properties"), Some(Value::Object(_))) {
            NodeKind::Object
        } else if NodeKind::has_items(node) {
            NodeKind::Array
        } else {
            NodeKind::Leaf
        }
    }

    /// Whether a node's type also allows arrays and it has an `items` schema.
    pub fn has_items(node: &Map<String, Value>) -> bool {
        allows_type(node, "array") && node.get("items").is_some_and(Value::is_object)
    }

    /// Classify any JSON value; non-objects are leaves.
    pub fn of_value(value: &Value) -> Self {
        value.as_object().map_or(NodeKind::Leaf, NodeKind::of)
    }
}

/// Complexity ceiling enforced by the downstream structured-output consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Budgets {
    pub max_properties: usize,
    pub max_depth: usize,
}

impl Default for Budgets {
    fn default() -> Self {
        Self {
            max_properties: 100,
            max_depth: 5,
        }
    }
}

/// Input and output locations plus budgets for one compilation.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Directory that holds the schema, the configuration and the output.
    pub data_dir: PathBuf,
    pub schema_file: String,
    pub config_file: String,
    pub output_suffix: String,
    pub budgets: Budgets,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self::new("data")
    }
}

impl CompileOptions {
    /// Options with default file names rooted at `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            schema_file: "schema.json".to_string(),
            config_file: "instructions.yaml".to_string(),
            output_suffix: COMPILED_SUFFIX.to_string(),
            budgets: Budgets::default(),
        }
    }

    pub fn schema_file(mut self, name: impl Into<String>) -> Self {
        self.schema_file = name.into();
        self
    }

    pub fn config_file(mut self, name: impl Into<String>) -> Self {
        self.config_file = name.into();
        self
    }

    pub fn output_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.output_suffix = suffix.into();
        self
    }

    pub fn budgets(mut self, budgets: Budgets) -> Self {
        self.budgets = budgets;
        self
    }

    pub fn schema_path(&self) -> PathBuf {
        self.data_dir.join(&self.schema_file)
    }

    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join(&self.config_file)
    }

    /// Path of the compiled output, e.g. `data/schema_compiled.json`.
    pub fn output_path(&self) -> PathBuf {
        let name = compiled_file_name(Path::new(&self.schema_file), &self.output_suffix);
        self.data_dir.join(name)
    }
}

/// Non-fatal condition encountered while compiling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    PathNotFound { path: String },
    UnsupportedDirective { path: String, actual: String },
    UnsupportedMappingEntry { path: String, actual: String },
    MissingItems { path: String },
    PropertyBudgetExceeded { count: usize, limit: usize },
    DepthBudgetExceeded { depth: usize, limit: usize },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::PathNotFound { path } => write!(f, "property '{}' not found in schema", path),
            Warning::UnsupportedDirective { path, actual } => {
                write!(f, "unsupported config value type for '{}': {}", path, actual)
            }
            Warning::UnsupportedMappingEntry { path, actual } => {
                write!(f, "skipping {} entry in mapping list for '{}'", actual, path)
            }
            Warning::MissingItems { path } => {
                write!(f, "'items' not found in array property '{}'", path)
            }
            Warning::PropertyBudgetExceeded { count, limit } => {
                write!(f, "total properties {} exceed {}", count, limit)
            }
            Warning::DepthBudgetExceeded { depth, limit } => {
                write!(f, "maximum nesting level {} exceeds {}", depth, limit)
            }
        }
    }
}
