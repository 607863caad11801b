//! Document store operations (list / get / create / update / delete).

use reqwest::Method;
use serde_json::json;
use tracing::instrument;

use super::types::{Document, DocumentList};
use super::{AppwriteClient, AppwriteError, check_status, parse_json};
use crate::config::AppwriteConfig;

/// A list-query filter, serialized to the backend's JSON query strings.
#[derive(Debug, Clone)]
pub enum Query {
    /// Equality filter on an attribute.
    Equal {
        /// Attribute name.
        attribute: String,
        /// Value to match.
        value: serde_json::Value,
    },
    /// Ascending sort on an attribute.
    OrderAsc(String),
    /// Descending sort on an attribute.
    OrderDesc(String),
    /// Limit the page size.
    Limit(u32),
}

impl Query {
    /// Equality filter on a string attribute.
    #[must_use]
    pub fn equal(attribute: &str, value: &str) -> Self {
        Self::Equal {
            attribute: attribute.to_owned(),
            value: serde_json::Value::String(value.to_owned()),
        }
    }

    /// Ascending sort.
    #[must_use]
    pub fn order_asc(attribute: &str) -> Self {
        Self::OrderAsc(attribute.to_owned())
    }

    /// Descending sort.
    #[must_use]
    pub fn order_desc(attribute: &str) -> Self {
        Self::OrderDesc(attribute.to_owned())
    }

    /// Limit the page size.
    #[must_use]
    pub const fn limit(limit: u32) -> Self {
        Self::Limit(limit)
    }

    /// Serialize to the wire format, e.g.
    /// `{"method":"equal","attribute":"email","values":["a@b.c"]}`.
    #[must_use]
    pub fn to_wire(&self) -> String {
        let value = match self {
            Self::Equal { attribute, value } => json!({
                "method": "equal",
                "attribute": attribute,
                "values": [value],
            }),
            Self::OrderAsc(attribute) => json!({
                "method": "orderAsc",
                "attribute": attribute,
            }),
            Self::OrderDesc(attribute) => json!({
                "method": "orderDesc",
                "attribute": attribute,
            }),
            Self::Limit(limit) => json!({
                "method": "limit",
                "values": [limit],
            }),
        };
        value.to_string()
    }
}

/// Typed access to the document store collections.
#[derive(Clone)]
pub struct Documents {
    client: AppwriteClient,
    database_id: String,
}

impl Documents {
    /// Create a new document store wrapper.
    #[must_use]
    pub fn new(client: AppwriteClient, config: &AppwriteConfig) -> Self {
        Self {
            client,
            database_id: config.database_id.clone(),
        }
    }

    fn collection_path(&self, collection_id: &str) -> String {
        format!(
            "databases/{}/collections/{collection_id}/documents",
            self.database_id
        )
    }

    /// List documents in a collection, optionally filtered and ordered.
    ///
    /// Result sets are assumed small enough to fetch in full; there is no
    /// pagination loop.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    #[instrument(skip(self, queries), fields(collection = collection_id))]
    pub async fn list(
        &self,
        collection_id: &str,
        queries: &[Query],
    ) -> Result<DocumentList, AppwriteError> {
        let mut request = self
            .client
            .keyed_request(Method::GET, &self.collection_path(collection_id));

        for query in queries {
            request = request.query(&[("queries[]", query.to_wire())]);
        }

        let response = check_status(request.send().await?).await?;
        parse_json(response).await
    }

    /// Get a single document by id.
    ///
    /// # Errors
    ///
    /// Returns `AppwriteError::NotFound` if the document does not exist.
    #[instrument(skip(self), fields(collection = collection_id))]
    pub async fn get(
        &self,
        collection_id: &str,
        document_id: &str,
    ) -> Result<Document, AppwriteError> {
        let path = format!("{}/{document_id}", self.collection_path(collection_id));
        let response = self.client.keyed_request(Method::GET, &path).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(AppwriteError::NotFound(document_id.to_owned()));
        }

        let response = check_status(response).await?;
        parse_json(response).await
    }

    /// Create a document with an explicit id.
    ///
    /// # Errors
    ///
    /// Returns an error if the write is rejected or the request fails.
    #[instrument(skip(self, data), fields(collection = collection_id))]
    pub async fn create(
        &self,
        collection_id: &str,
        document_id: &str,
        data: serde_json::Value,
    ) -> Result<Document, AppwriteError> {
        let response = self
            .client
            .keyed_request(Method::POST, &self.collection_path(collection_id))
            .json(&json!({
                "documentId": document_id,
                "data": data,
            }))
            .send()
            .await?;

        let response = check_status(response).await?;
        parse_json(response).await
    }

    /// Update a document by id. Only the provided attributes change.
    ///
    /// # Errors
    ///
    /// Returns an error if the write is rejected or the request fails.
    #[instrument(skip(self, data), fields(collection = collection_id))]
    pub async fn update(
        &self,
        collection_id: &str,
        document_id: &str,
        data: serde_json::Value,
    ) -> Result<Document, AppwriteError> {
        let path = format!("{}/{document_id}", self.collection_path(collection_id));
        let response = self
            .client
            .keyed_request(Method::PATCH, &path)
            .json(&json!({ "data": data }))
            .send()
            .await?;

        let response = check_status(response).await?;
        parse_json(response).await
    }

    /// Delete a document by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete is rejected or the request fails.
    #[instrument(skip(self), fields(collection = collection_id))]
    pub async fn delete(
        &self,
        collection_id: &str,
        document_id: &str,
    ) -> Result<(), AppwriteError> {
        let path = format!("{}/{document_id}", self.collection_path(collection_id));
        let response = self
            .client
            .keyed_request(Method::DELETE, &path)
            .send()
            .await?;

        check_status(response).await?;
        Ok(())
    }
}
