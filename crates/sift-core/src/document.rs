//! Stored document representation.
//!
//! Documents travel as JSON objects. The identifier lives under the reserved
//! [`ID_FIELD`] key on the application side and is moved out of the body
//! before a document is handed to the engine.

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// A document as seen by the application: a JSON object.
pub type Document = Map<String, Value>;

/// Reserved key carrying the document identifier.
pub const ID_FIELD: &str = "_id";

/// Characters the engine refuses in index names.
const FORBIDDEN_INDEX_CHARS: &[char] = &['\\', '/', '*', '?', '"', '<', '>', '|', ' ', ',', '#', ':'];

/// Maximum index name length in bytes.
const MAX_INDEX_NAME_BYTES: usize = 255;

/// Split a document into its identifier and the remaining body.
///
/// String identifiers are used as-is and numeric ones are rendered to text.
/// A missing or `null` identifier yields `None`, leaving the engine to
/// assign one. Any other identifier type is a validation error.
pub fn split_id(mut doc: Document) -> Result<(Option<String>, Document)> {
    let id = match doc.remove(ID_FIELD) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(other) => {
            return Err(Error::validation_field(
                ID_FIELD,
                format!("document identifier must be a string or number, got {other}"),
            ));
        }
    };
    Ok((id, doc))
}

/// Merge an identifier back into a document body under [`ID_FIELD`].
pub fn with_id(mut doc: Document, id: &str) -> Document {
    doc.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
    doc
}

/// Check that `name` is a well-formed index name.
///
/// Index names must be non-empty, lowercase, at most 255 bytes, must not be
/// `.` or `..`, must not start with `-`, `_` or `+`, and must not contain
/// any of `\ / * ? " < > | , # :` or spaces.
pub fn validate_index_name(name: &str) -> Result<()> {
    let invalid = |message: String| Err(Error::validation_field("index_name", message));

    if name.is_empty() {
        return invalid("Index name must not be empty".to_string());
    }
    if name == "." || name == ".." {
        return invalid(format!("Index name '{name}' is reserved"));
    }
    if name.len() > MAX_INDEX_NAME_BYTES {
        return invalid(format!(
            "Index name is {} bytes, limit is {MAX_INDEX_NAME_BYTES}",
            name.len()
        ));
    }
    if name.starts_with(['-', '_', '+']) {
        return invalid(format!("Index name '{name}' must not start with '-', '_' or '+'"));
    }
    if name.chars().any(|c| c.is_uppercase()) {
        return invalid(format!("Index name '{name}' must be lowercase"));
    }
    if let Some(c) = name.chars().find(|c| FORBIDDEN_INDEX_CHARS.contains(c)) {
        return invalid(format!("Index name '{name}' contains forbidden character '{c}'"));
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
