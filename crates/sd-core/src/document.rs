//! Raw documents as delivered by the change feed.

use serde_json::Value;

use crate::{PrimaryKey, SdError, SdResult};

/// An undecoded document from the backing store.
///
/// Documents arrive in extended JSON form; object ids are either plain
/// strings or `{"$oid": "<hex>"}` objects.
pub type RawDocument = Value;

/// Field holding the document identifier.
pub const DOCUMENT_ID_FIELD: &str = "_id";

/// Extract the primary key of a raw document routed to `kind`.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use sd_core::document_id;
///
/// let doc = json!({ "_id": { "$oid": "5f1d7c1e9a0b8c7d6e5f4a3b" } });
/// assert_eq!(document_id("service", &doc).unwrap(), "5f1d7c1e9a0b8c7d6e5f4a3b");
/// ```
pub fn document_id(kind: &str, doc: &RawDocument) -> SdResult<PrimaryKey> {
    let id = match doc.get(DOCUMENT_ID_FIELD) {
        Some(Value::String(id)) => Some(id.as_str()),
        Some(Value::Object(fields)) => fields.get("$oid").and_then(Value::as_str),
        _ => None,
    };

    match id {
        Some(id) if !id.is_empty() => Ok(id.to_string()),
        _ => Err(SdError::MissingDocumentId {
            kind: kind.to_string(),
        }),
    }
}
