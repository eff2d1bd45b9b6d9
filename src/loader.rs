//! Schema and configuration loading.
//!
//! Loads the draft schema from JSON, checks it against the Draft-7
//! meta-schema, and loads the YAML directive configuration.

use std::path::Path;

use serde_json::Value;
use serde_yaml::Mapping;

use crate::error::CompileError;

/// Load and check a draft JSON Schema from a file path.
///
/// # Errors
///
/// Returns `CompileError::FileNotFound` if the file doesn't exist,
/// `CompileError::InvalidJson` if it isn't valid JSON, or
/// `CompileError::InvalidSchema` if it isn't a valid Draft-7 schema.
pub fn load_schema(path: &Path) -> Result<Value, CompileError> {
    tracing::info!("Loading JSON Schema from '{}'...", path.display());
    let content = read_file(path)?;

    let schema: Value =
        serde_json::from_str(&content).map_err(|source| CompileError::InvalidJson {
            path: path.to_path_buf(),
            source,
        })?;
    check_schema(&schema)?;

    tracing::info!(
        bytes = content.len(),
        top_level_keys = schema.as_object().map_or(0, |m| m.len()),
        "JSON Schema is valid."
    );
    Ok(schema)
}

/// Load a schema from a JSON string, without meta-schema checks.
///
/// # Errors
///
/// Returns `CompileError::InvalidJson` if the string isn't valid JSON.
pub fn load_schema_str(content: &str) -> Result<Value, CompileError> {
    serde_json::from_str(content).map_err(|source| CompileError::InvalidJson {
        path: "<string>".into(),
        source,
    })
}

/// URI of the Draft-7 meta-schema bundled with `jsonschema`.
const DRAFT7_META_SCHEMA: &str = "http://json-schema.org/draft-07/schema#";

/// Validate a document against the Draft-7 schema-of-schemas.
///
/// The document is checked as an instance of the meta-schema, so its own
/// `$ref`s are never resolved here; broken local references surface later
/// as resolver errors.
pub fn check_schema(schema: &Value) -> Result<(), CompileError> {
    let meta = jsonschema::draft7::new(&serde_json::json!({ "$ref": DRAFT7_META_SCHEMA }))
        .map_err(|e| CompileError::InvalidSchema {
            message: e.to_string(),
        })?;

    let errors: Vec<String> = meta.iter_errors(schema).map(|e| e.to_string()).collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(CompileError::InvalidSchema {
            message: errors.join("; "),
        })
    }
}

/// Load the YAML directive configuration.
///
/// An empty document is an empty configuration. Any root other than a
/// mapping is rejected.
///
/// # Errors
///
/// Returns `CompileError::FileNotFound`, `CompileError::InvalidYaml`, or
/// `CompileError::InvalidConfig`.
pub fn load_config(path: &Path) -> Result<Mapping, CompileError> {
    tracing::info!("Loading configuration from '{}'...", path.display());
    let content = read_file(path)?;
    let config = load_config_str(&content).map_err(|e| match e {
        CompileError::InvalidYaml { source, .. } => CompileError::InvalidYaml {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })?;
    tracing::info!(directives = config.len(), "Configuration loaded.");
    Ok(config)
}

/// Parse a YAML directive configuration from a string.
pub fn load_config_str(content: &str) -> Result<Mapping, CompileError> {
    let value: serde_yaml::Value =
        serde_yaml::from_str(content).map_err(|source| CompileError::InvalidYaml {
            path: "<string>".into(),
            source,
        })?;

    match value {
        serde_yaml::Value::Null => Ok(Mapping::new()),
        serde_yaml::Value::Mapping(map) => Ok(map),
        other => Err(CompileError::InvalidConfig {
            message: format!(
                "expected a mapping of paths to directives, got {}",
                crate::directive::yaml_type_name(&other)
            ),
        }),
    }
}

fn read_file(path: &Path) -> Result<String, CompileError> {
    if !path.exists() {
        return Err(CompileError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    std::fs::read_to_string(path).map_err(|source| CompileError::ReadError {
        path: path.to_path_buf(),
        source,
    })
}
