//! Persists compiled schemas.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::CompileError;

/// Derive the output file name by inserting `suffix` before the extension.
///
/// `schema.json` becomes `schema_compiled.json`; a name without an extension
/// just gets the suffix appended.
pub fn compiled_file_name(original: &Path, suffix: &str) -> PathBuf {
    let stem = original.file_stem().unwrap_or(original.as_os_str());
    let mut name = OsString::from(stem);
    name.push(suffix);
    if let Some(ext) = original.extension() {
        name.push(".");
        name.push(ext);
    }
    original.with_file_name(name)
}

/// Render a schema as pretty-printed JSON.
pub fn render_schema(schema: &Value) -> Result<String, CompileError> {
    serde_json::to_string_pretty(schema).map_err(|source| CompileError::Serialize { source })
}

/// Write a schema to `path` as pretty-printed JSON.
///
/// # Errors
///
/// Returns `CompileError::WriteError` if the file can't be written.
pub fn save_schema(schema: &Value, path: &Path) -> Result<(), CompileError> {
    tracing::info!("Saving modified schema to '{}'...", path.display());
    let content = render_schema(schema)?;
    std::fs::write(path, content).map_err(|source| CompileError::WriteError {
        path: path.to_path_buf(),
        source,
    })
}
