//! Domain models.
//!
//! Raw documents from the hosted store are schema-flexible; these types are
//! not. Every fetch maps documents into models immediately via the
//! `from_document` constructors here. A document missing a required field is
//! rejected with [`InvalidDocument`]; list conversions log and skip such
//! documents rather than letting untyped data deeper into the app.

pub mod catalog;
pub mod order;
pub mod session;
pub mod user;

pub use catalog::{Category, PLACEHOLDER_IMAGE, Product};
pub use order::Order;
pub use session::{CurrentUser, session_keys};
pub use user::UserProfile;

use chrono::{DateTime, Utc};

use crate::appwrite::Document;

/// A document that cannot be mapped into its domain type.
#[derive(Debug, thiserror::Error)]
#[error("invalid {collection} document {id}: missing or malformed field `{field}`")]
pub struct InvalidDocument {
    /// Collection the document came from.
    pub collection: &'static str,
    /// Document id.
    pub id: String,
    /// The offending field.
    pub field: &'static str,
}

impl InvalidDocument {
    pub(crate) fn new(collection: &'static str, doc: &Document, field: &'static str) -> Self {
        Self {
            collection,
            id: doc.id.clone(),
            field,
        }
    }
}

/// Convert a list of documents, logging and skipping the invalid ones.
pub(crate) fn convert_all<T>(
    documents: &[Document],
    convert: impl Fn(&Document) -> Result<T, InvalidDocument>,
) -> Vec<T> {
    documents
        .iter()
        .filter_map(|doc| match convert(doc) {
            Ok(model) => Some(model),
            Err(err) => {
                tracing::warn!(error = %err, "skipping invalid document");
                None
            }
        })
        .collect()
}

/// Read a timestamp attribute, falling back to the system timestamp.
///
/// Records written by this application carry their own ISO `createdAt` /
/// `updatedAt` attributes; the store also stamps `$createdAt` / `$updatedAt`
/// on everything.
pub(crate) fn timestamp_field(doc: &Document, field: &str, system: &str) -> Option<DateTime<Utc>> {
    let raw = doc.non_empty_field(field).unwrap_or(system);
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
