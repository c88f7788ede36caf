#![forbid(unsafe_code)]

use crate::error::PatchError;
use fixmeta_core::ids::ProgramAddress;
use fixmeta_core::idl::{ADDRESS_KEY, METADATA_KEY};
use serde_json::{Map, Value, json};
use std::path::Path;

pub(crate) type IdlDocument = Map<String, Value>;

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub(crate) fn parse_document(path: &Path, text: &str) -> Result<IdlDocument, PatchError> {
    let value: Value = serde_json::from_str(text).map_err(|e| PatchError::MalformedJson {
        path: path.to_path_buf(),
        source: e,
    })?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(PatchError::NotAnObject {
            path: path.to_path_buf(),
            found: kind_name(&other),
        }),
    }
}

pub(crate) fn metadata_block(address: &ProgramAddress) -> Value {
    json!({ ADDRESS_KEY: address.as_str() })
}

/// Replaces (never merges) the top-level metadata block.
/// An existing key keeps its position; a new one is appended.
pub(crate) fn set_metadata(doc: &mut IdlDocument, address: &ProgramAddress) {
    doc.insert(METADATA_KEY.to_string(), metadata_block(address));
}

pub(crate) fn metadata_matches(doc: &IdlDocument, address: &ProgramAddress) -> bool {
    doc.get(METADATA_KEY) == Some(&metadata_block(address))
}

pub(crate) fn render(path: &Path, doc: &IdlDocument) -> Result<String, PatchError> {
    serde_json::to_string(doc).map_err(|e| PatchError::Encode {
        path: path.to_path_buf(),
        source: e,
    })
}
