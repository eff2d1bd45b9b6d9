//! Strict Schema Compiler
//!
//! Compiles a draft JSON Schema into a self-contained, closed schema suitable
//! for strict structured-output APIs.
//!
//! Compilation inlines every local `$defs` reference, applies a YAML
//! configuration of per-path directives, marks every object fully required
//! with `additionalProperties: false`, and reports size against budgets.
//!
//! # Example
//!
//! ```
//! use strict_schema::{compile_schema, load_config_str, Budgets};
//! use serde_json::json;
//!
//! let schema = json!({
//!     "type": "object",
//!     "properties": {
//!         "sku": { "type": "string" },
//!         "color": { "$ref": "#/$defs/color" },
//!         "notes": { "type": "string" }
//!     },
//!     "$defs": { "color": { "type": "string" } }
//! });
//! let config = load_config_str("notes: false\ncolor:\n  r: Red\n  b: Blue\n").unwrap();
//!
//! let compiled = compile_schema(schema, &config, &Budgets::default()).unwrap();
//!
//! assert!(compiled.schema.get("$defs").is_none());
//! assert_eq!(compiled.schema["required"], json!(["sku", "color"]));
//! assert_eq!(compiled.schema["additionalProperties"], json!(false));
//! assert_eq!(compiled.schema["properties"]["color"]["enum"], json!(["Red", "Blue"]));
//! ```
//!
//! # Directives
//!
//! | YAML value | Effect |
//! |------------|--------|
//! | `false` | Delete the property at the path |
//! | `true` | Keep as-is |
//! | `{raw: canonical}` | Set `enum` to the canonical values, document the mapping |
//! | `[value, {raw: canonical}]` | Same, bare strings map to themselves |
//!
//! Paths are dotted property names. Arrays are transparent: `variants.sku`
//! addresses the `sku` property of each element of `variants`.

mod applier;
mod directive;
mod enforcer;
mod error;
mod loader;
mod navigator;
mod pipeline;
mod resolver;
mod stats;
mod types;
mod validator;
mod writer;

pub use applier::{apply_config, apply_directive};
pub use directive::{parse_config, parse_directive, ConfigEntry, Directive, EnumMapping};
pub use enforcer::close_schema;
pub use error::{CompileError, SchemaError, ValidateError};
pub use loader::{check_schema, load_config, load_config_str, load_schema, load_schema_str};
pub use navigator::{delete_node, get_node, get_node_mut, split_path};
pub use pipeline::{build, compile, compile_schema, CompileReport, Compiled};
pub use resolver::{definition_name, has_refs, resolve_refs};
pub use stats::{report_stats, SchemaStats};
pub use types::{allows_type, type_set, Budgets, CompileOptions, NodeKind, Warning};
pub use validator::validate_instance;
pub use writer::{compiled_file_name, render_schema, save_schema};
