//! Instance validation against compiled schemas.
//!
//! A compiled schema is handed to a strict structured-output consumer, so a
//! generated instance can be checked against it before use.

use serde_json::Value;

use crate::error::{CompileError, SchemaError, ValidateError};

/// Validate an instance against a compiled schema, collecting every error.
///
/// # Errors
///
/// Returns `ValidateError::Compile` if the schema itself can't be compiled,
/// or `ValidateError::Invalid` if the instance doesn't match.
pub fn validate_instance(schema: &Value, instance: &Value) -> Result<(), ValidateError> {
    let validator = jsonschema::validator_for(schema).map_err(|e| {
        ValidateError::Compile(CompileError::InvalidSchema {
            message: e.to_string(),
        })
    })?;

    let errors: Vec<SchemaError> = validator
        .iter_errors(instance)
        .map(|e| SchemaError {
            path: e.instance_path.to_string(),
            message: e.to_string(),
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidateError::Invalid { errors })
    }
}
