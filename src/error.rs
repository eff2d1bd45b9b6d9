//! Error types for schema compilation and instance validation.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors during schema compilation.
///
/// Anything that is not fatal is reported as a [`crate::Warning`] instead.
#[derive(Debug, Error)]
pub enum CompileError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Parse errors (exit code 2)
    #[error("invalid JSON in {path}: {source}")]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid YAML in {path}: {source}")]
    InvalidYaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    // Schema errors (exit code 2)
    #[error("invalid JSON Schema: {message}")]
    InvalidSchema { message: String },

    #[error("unsupported $ref format: {reference}")]
    UnsupportedRef { reference: String },

    #[error("definition '{name}' not found in $defs")]
    DefinitionNotFound { name: String },

    #[error("failed to serialize schema: {source}")]
    Serialize {
        #[source]
        source: serde_json::Error,
    },
}

impl CompileError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            CompileError::FileNotFound { .. }
            | CompileError::ReadError { .. }
            | CompileError::WriteError { .. } => 3,
            _ => 2,
        }
    }
}

/// Errors while validating an instance against a compiled schema.
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("validation failed with {} error(s)", errors.len())]
    Invalid { errors: Vec<SchemaError> },
}

/// Single validation error with path context.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SchemaError {
    /// JSON Pointer (RFC 6901) to the invalid field.
    pub path: String,
    /// Human-readable error message.
    pub message: String,
}

impl std::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

impl ValidateError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ValidateError::Compile(e) => e.exit_code(),
            ValidateError::Invalid { .. } => 1,
        }
    }
}
