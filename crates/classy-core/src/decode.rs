//! # Decoding
//!
//! Turns text, files and readers into [`Value`]s. JSON is the default
//! format; files ending in `.yaml` or `.yml` are read as YAML and converted
//! with [`yaml_to_json`].

use std::io::Read;
use std::path::Path;

use serde_json::Value;

use crate::error::ClassyError;
use crate::value::yaml_to_json;

/// Origin label used for inline text.
pub const TEXT_ORIGIN: &str = "<text>";
/// Origin label used for readers.
pub const READER_ORIGIN: &str = "<reader>";

/// Decode JSON text.
pub fn decode_json_str(text: &str, origin: &str) -> Result<Value, ClassyError> {
    serde_json::from_str(text).map_err(|e| ClassyError::Decode {
        origin: origin.to_string(),
        reason: format!("invalid JSON: {e}"),
    })
}

/// Decode YAML text into the equivalent JSON value.
pub fn decode_yaml_str(text: &str, origin: &str) -> Result<Value, ClassyError> {
    let yaml_value: serde_yaml::Value =
        serde_yaml::from_str(text).map_err(|e| ClassyError::Decode {
            origin: origin.to_string(),
            reason: format!("invalid YAML: {e}"),
        })?;
    yaml_to_json(&yaml_value).map_err(|e| ClassyError::Decode {
        origin: origin.to_string(),
        reason: format!("YAML-to-JSON conversion failed: {e}"),
    })
}

/// Read and decode a file, choosing the format from its extension.
///
/// # Errors
///
/// Returns `ClassyError::Decode` if the file cannot be read or parsed.
pub fn decode_file(path: &Path) -> Result<Value, ClassyError> {
    let origin = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|e| ClassyError::Decode {
        origin: origin.clone(),
        reason: format!("cannot read file: {e}"),
    })?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    tracing::debug!(path = %origin, format = ext, "decoding file");

    match ext {
        "yaml" | "yml" => decode_yaml_str(&content, &origin),
        _ => decode_json_str(&content, &origin),
    }
}

/// Decode JSON from an open reader.
pub fn decode_reader<R: Read>(reader: R) -> Result<Value, ClassyError> {
    serde_json::from_reader(reader).map_err(|e| ClassyError::Decode {
        origin: READER_ORIGIN.to_string(),
        reason: format!("invalid JSON: {e}"),
    })
}
