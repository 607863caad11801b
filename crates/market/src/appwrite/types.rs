//! Wire types for the hosted backend REST API.
//!
//! A [`Document`] is a schema-flexible record: system fields (`$id`,
//! `$createdAt`, `$updatedAt`) plus arbitrary attributes. The typed field
//! accessors are what the model-layer conversions are built on.

use serde::Deserialize;

/// A raw document from the document store.
#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    /// Document id (`$id`).
    #[serde(rename = "$id")]
    pub id: String,
    /// System creation timestamp.
    #[serde(rename = "$createdAt", default)]
    pub created_at: String,
    /// System update timestamp.
    #[serde(rename = "$updatedAt", default)]
    pub updated_at: String,
    /// All non-system attributes.
    #[serde(flatten)]
    pub data: serde_json::Map<String, serde_json::Value>,
}

impl Document {
    /// Get a string attribute, if present and non-null.
    #[must_use]
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.data.get(name).and_then(serde_json::Value::as_str)
    }

    /// Get a string attribute, treating empty strings as absent.
    #[must_use]
    pub fn non_empty_field(&self, name: &str) -> Option<&str> {
        self.str_field(name).filter(|s| !s.is_empty())
    }

    /// Get an integer attribute.
    ///
    /// Numbers stored as JSON strings are accepted too; the original data
    /// set mixes both.
    #[must_use]
    pub fn i64_field(&self, name: &str) -> Option<i64> {
        match self.data.get(name)? {
            serde_json::Value::Number(n) => n.as_i64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Get a boolean attribute.
    #[must_use]
    pub fn bool_field(&self, name: &str) -> Option<bool> {
        self.data.get(name).and_then(serde_json::Value::as_bool)
    }

    /// Get a list-of-strings attribute.
    #[must_use]
    pub fn str_list_field(&self, name: &str) -> Option<Vec<String>> {
        let values = self.data.get(name)?.as_array()?;
        Some(
            values
                .iter()
                .filter_map(|v| v.as_str().map(str::to_owned))
                .collect(),
        )
    }
}

/// A page of documents.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentList {
    /// Total matching documents (not just this page).
    pub total: u64,
    /// The documents themselves.
    pub documents: Vec<Document>,
}

/// A file stored in the object store.
#[derive(Debug, Clone, Deserialize)]
pub struct StoredFile {
    /// File id (`$id`).
    #[serde(rename = "$id")]
    pub id: String,
    /// Original filename.
    #[serde(default)]
    pub name: String,
    /// MIME type recorded by the backend.
    #[serde(rename = "mimeType", default)]
    pub mime_type: String,
    /// Size in bytes.
    #[serde(rename = "sizeOriginal", default)]
    pub size: u64,
}

/// The authenticated account behind a session.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    /// Auth-service user id (`$id`) - the identity key for profiles.
    #[serde(rename = "$id")]
    pub id: String,
    /// Display name given at registration.
    #[serde(default)]
    pub name: String,
    /// Account email.
    pub email: String,
}

/// A session issued by the auth service.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    /// Session id (`$id`).
    #[serde(rename = "$id")]
    pub id: String,
    /// The account this session belongs to.
    #[serde(rename = "userId")]
    pub user_id: String,
    /// Session secret, only returned at creation time.
    #[serde(default)]
    pub secret: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_document() -> Document {
        serde_json::from_value(serde_json::json!({
            "$id": "doc1",
            "$createdAt": "2025-03-01T10:00:00.000+00:00",
            "$updatedAt": "2025-03-01T10:00:00.000+00:00",
            "title": "Alphonso Mangoes",
            "price": 450,
            "quantity": "12",
            "isFeatured": true,
            "products": ["Alphonso Mangoes"],
            "fileId": "",
        }))
        .unwrap()
    }

    #[test]
    fn test_system_fields() {
        let doc = sample_document();
        assert_eq!(doc.id, "doc1");
        assert!(doc.created_at.starts_with("2025-03-01"));
    }

    #[test]
    fn test_str_field() {
        let doc = sample_document();
        assert_eq!(doc.str_field("title"), Some("Alphonso Mangoes"));
        assert_eq!(doc.str_field("missing"), None);
    }

    #[test]
    fn test_non_empty_field_filters_empty_strings() {
        let doc = sample_document();
        assert_eq!(doc.non_empty_field("fileId"), None);
        assert_eq!(doc.non_empty_field("title"), Some("Alphonso Mangoes"));
    }

    #[test]
    fn test_i64_field_accepts_numbers_and_strings() {
        let doc = sample_document();
        assert_eq!(doc.i64_field("price"), Some(450));
        assert_eq!(doc.i64_field("quantity"), Some(12));
        assert_eq!(doc.i64_field("title"), None);
    }

    #[test]
    fn test_bool_and_list_fields() {
        let doc = sample_document();
        assert_eq!(doc.bool_field("isFeatured"), Some(true));
        assert_eq!(
            doc.str_list_field("products").unwrap(),
            vec!["Alphonso Mangoes".to_string()]
        );
    }
}
