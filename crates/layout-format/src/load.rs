use std::fs;
use std::path::Path;

use keyplate_types::LayoutRow;
use plate_kernel::Parameters;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::errors::LoadError;
use crate::metadata::LayoutMetadata;
use crate::relaxed::quote_bare_keys;

/// A parsed layout file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutDocument {
    pub metadata: Option<LayoutMetadata>,
    pub rows: Vec<LayoutRow>,
}

/// Parse layout-editor JSON.
///
/// Strict JSON is tried first. On failure the text is treated as the
/// editor's raw-data form: wrapped in brackets with bare keys quoted.
/// A leading object is read as board metadata; any other entry that is not
/// an array is skipped. A top-level array of keys with no nested rows is
/// a one-row layout.
pub fn parse_layout(text: &str) -> Result<LayoutDocument, LoadError> {
    let value: Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(strict) => {
            debug!(error = %strict, "layout is not strict JSON, trying raw-data form");
            let repaired = quote_bare_keys(&format!("[{text}]"));
            serde_json::from_str(&repaired).map_err(|e| LoadError::Layout(e.to_string()))?
        }
    };

    let Value::Array(mut entries) = value else {
        return Err(LoadError::Layout("top level is not an array".into()));
    };
    // Raw data holding a single row parses as that row on its own.
    let single_row = !entries.iter().any(Value::is_array) && entries.iter().any(Value::is_string);
    if single_row {
        entries = vec![Value::Array(entries)];
    }

    let mut doc = LayoutDocument::default();
    for (index, entry) in entries.into_iter().enumerate() {
        match entry {
            Value::Array(_) => {
                let row: LayoutRow =
                    serde_json::from_value(entry).map_err(|e| LoadError::Layout(format!("row {index}: {e}")))?;
                doc.rows.push(row);
            }
            Value::Object(_) if index == 0 => {
                let meta: LayoutMetadata =
                    serde_json::from_value(entry).map_err(|e| LoadError::Layout(format!("metadata: {e}")))?;
                doc.metadata = Some(meta);
            }
            other => warn!(index, kind = value_kind(&other), "skipping non-row layout entry"),
        }
    }
    info!(rows = doc.rows.len(), "layout parsed");
    Ok(doc)
}

/// Parse and validate a parameter file.
pub fn parse_parameters(text: &str) -> Result<Parameters, LoadError> {
    let params: Parameters = serde_json::from_str(text).map_err(|e| LoadError::Parameters(e.to_string()))?;
    params.validate()?;
    Ok(params)
}

pub fn load_layout_file(path: &Path) -> Result<LayoutDocument, LoadError> {
    parse_layout(&read(path)?)
}

pub fn load_parameter_file(path: &Path) -> Result<Parameters, LoadError> {
    parse_parameters(&read(path)?)
}

fn read(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
