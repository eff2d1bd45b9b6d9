//! End-to-end compilation.
//!
//! load → resolve refs → apply directives → close objects → statistics → save

use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value;
use serde_yaml::Mapping;

use crate::applier::apply_config;
use crate::directive::parse_config;
use crate::enforcer::close_schema;
use crate::error::CompileError;
use crate::loader::{load_config, load_schema};
use crate::resolver::resolve_refs;
use crate::stats::{report_stats, SchemaStats};
use crate::types::{Budgets, CompileOptions, Warning};
use crate::writer::save_schema;

/// A compiled schema held in memory.
#[derive(Debug, Clone)]
pub struct Compiled {
    pub schema: Value,
    pub stats: SchemaStats,
    pub warnings: Vec<Warning>,
}

/// Summary of a compile that wrote its output.
#[derive(Debug, Clone, Serialize)]
pub struct CompileReport {
    pub output_path: PathBuf,
    pub stats: SchemaStats,
    pub warnings: Vec<Warning>,
}

/// Run every in-memory stage on an already loaded schema and configuration.
///
/// # Errors
///
/// Only reference resolution can fail here; directive problems and budget
/// overruns are returned as warnings.
pub fn compile_schema(
    schema: Value,
    config: &Mapping,
    budgets: &Budgets,
) -> Result<Compiled, CompileError> {
    let mut schema = resolve_refs(schema)?;

    let mut warnings = Vec::new();
    let entries = parse_config(config, &mut warnings);
    warnings.extend(apply_config(&mut schema, &entries));

    close_schema(&mut schema);

    let (stats, budget_warnings) = report_stats(&schema, budgets);
    warnings.extend(budget_warnings);

    Ok(Compiled {
        schema,
        stats,
        warnings,
    })
}

/// Load the schema and configuration named by `options` and compile them
/// without writing anything.
pub fn build(options: &CompileOptions) -> Result<Compiled, CompileError> {
    let schema = load_schema(&options.schema_path())?;
    let config = load_config(&options.config_path())?;
    compile_schema(schema, &config, &options.budgets)
}

/// Compile and write `<schema>_compiled.json` next to the input.
///
/// # Errors
///
/// Returns the first fatal `CompileError`; warnings are in the report.
pub fn compile(options: &CompileOptions) -> Result<CompileReport, CompileError> {
    let compiled = build(options)?;
    let output_path = options.output_path();
    save_schema(&compiled.schema, &output_path)?;
    tracing::info!("Process completed successfully.");

    Ok(CompileReport {
        output_path,
        stats: compiled.stats,
        warnings: compiled.warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_config_str;
    use serde_json::json;

    #[test]
    fn stages_run_in_order() {
        let schema = json!({
            "type": "object",
            "properties": {
                "title": { "type": "string" },
                "internal_id": { "type": "string" },
                "category": { "$ref": "#/$defs/category" }
            },
            "$defs": {
                "category": { "type": "string", "description": "Store category" }
            }
        });
        let config = load_config_str("internal_id: false\ncategory:\n  shoes: Footwear\n").unwrap();

        let compiled = compile_schema(schema, &config, &Budgets::default()).unwrap();

        assert!(compiled.warnings.is_empty());
        assert_eq!(compiled.schema["required"], json!(["title", "category"]));
        assert_eq!(
            compiled.schema["properties"]["category"],
            json!({
                "type": "string",
                "description": "Store category\nMappings: 'shoes' => 'Footwear'",
                "enum": ["Footwear"]
            })
        );
        assert!(compiled.schema.get("$defs").is_none());
        assert_eq!(compiled.stats.total_properties, 2);
    }

    #[test]
    fn reference_errors_are_fatal() {
        let schema = json!({ "properties": { "a": { "$ref": "#/$defs/nope" } } });
        let result = compile_schema(schema, &Mapping::new(), &Budgets::default());
        assert!(matches!(result, Err(CompileError::DefinitionNotFound { .. })));
    }
}
