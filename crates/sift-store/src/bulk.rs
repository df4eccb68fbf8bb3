//! Typed bulk operations.
//!
//! Each operation encodes to the engine's line format: an action line,
//! followed by a source line for index and update actions.

use serde_json::{Value, json};
use sift_core::document::split_id;
use sift_core::{Document, Result};

/// One action inside a bulk request.
#[derive(Debug, Clone, PartialEq)]
pub enum BulkOperation {
    /// Upsert a document. `None` lets the engine assign an identifier.
    Index {
        /// Document identifier.
        id: Option<String>,
        /// Stored fields, without the identifier.
        document: Document,
    },
    /// Merge fields into an existing document.
    Update {
        /// Document identifier.
        id: String,
        /// Fields to merge.
        document: Document,
    },
    /// Remove a document.
    Delete {
        /// Document identifier.
        id: String,
    },
}

impl BulkOperation {
    /// Upsert an application document, taking the identifier from `_id`.
    pub fn index(document: Document) -> Result<Self> {
        let (id, document) = split_id(document)?;
        Ok(BulkOperation::Index { id, document })
    }

    /// Merge `document` into the document `id`.
    pub fn update(id: impl Into<String>, document: Document) -> Self {
        BulkOperation::Update {
            id: id.into(),
            document,
        }
    }

    /// Remove the document `id`.
    pub fn delete(id: impl Into<String>) -> Self {
        BulkOperation::Delete { id: id.into() }
    }

    /// Append this operation's lines to `lines`.
    pub fn encode_into(&self, lines: &mut Vec<Value>) {
        match self {
            BulkOperation::Index { id, document } => {
                let action = match id {
                    Some(id) => json!({ "index": { "_id": id } }),
                    None => json!({ "index": {} }),
                };
                lines.push(action);
                lines.push(Value::Object(document.clone()));
            }
            BulkOperation::Update { id, document } => {
                lines.push(json!({ "update": { "_id": id } }));
                lines.push(json!({ "doc": document }));
            }
            BulkOperation::Delete { id } => {
                lines.push(json!({ "delete": { "_id": id } }));
            }
        }
    }
}

/// Encode a batch of operations into request lines.
pub fn encode_operations(operations: &[BulkOperation]) -> Vec<Value> {
    let mut lines = Vec::with_capacity(operations.len() * 2);
    for operation in operations {
        operation.encode_into(&mut lines);
    }
    lines
}
