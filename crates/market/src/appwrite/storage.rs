//! Object store operations for product images.

use reqwest::Method;
use tracing::instrument;

use super::types::StoredFile;
use super::{AppwriteClient, AppwriteError, check_status, parse_json};
use crate::config::AppwriteConfig;

/// An image file received from a product form.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Original filename.
    pub filename: String,
    /// MIME type reported by the browser.
    pub content_type: String,
    /// Raw bytes.
    pub bytes: Vec<u8>,
}

/// Typed access to the image bucket.
#[derive(Clone)]
pub struct Storage {
    client: AppwriteClient,
    bucket_id: String,
}

impl Storage {
    /// Create a new object store wrapper.
    #[must_use]
    pub fn new(client: AppwriteClient, config: &AppwriteConfig) -> Self {
        Self {
            client,
            bucket_id: config.bucket_id.clone(),
        }
    }

    fn bucket_path(&self) -> String {
        format!("storage/buckets/{}/files", self.bucket_id)
    }

    /// Upload a file under an explicit id.
    ///
    /// # Errors
    ///
    /// Returns an error if the upload is rejected, the payload cannot be
    /// encoded, or the request fails.
    #[instrument(skip(self, image), fields(filename = %image.filename, size = image.bytes.len()))]
    pub async fn create_file(
        &self,
        file_id: &str,
        image: ImageUpload,
    ) -> Result<StoredFile, AppwriteError> {
        let part = reqwest::multipart::Part::bytes(image.bytes)
            .file_name(image.filename)
            .mime_str(&image.content_type)
            .map_err(AppwriteError::Http)?;

        let form = reqwest::multipart::Form::new()
            .text("fileId", file_id.to_owned())
            .part("file", part);

        let response = self
            .client
            .keyed_request(Method::POST, &self.bucket_path())
            .multipart(form)
            .send()
            .await?;

        let response = check_status(response).await?;
        parse_json(response).await
    }

    /// Build the durable display URL for a stored file.
    ///
    /// The view endpoint serves the raw bytes and only needs the project id
    /// as a query parameter, so the URL can be embedded directly in pages.
    #[must_use]
    pub fn file_view_url(&self, file_id: &str) -> String {
        format!(
            "{}/storage/buckets/{}/files/{file_id}/view?project={}",
            self.client.endpoint(),
            self.bucket_id,
            self.client.project_id()
        )
    }

    /// Delete a stored file.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete is rejected or the request fails.
    #[instrument(skip(self))]
    pub async fn delete_file(&self, file_id: &str) -> Result<(), AppwriteError> {
        let path = format!("{}/{file_id}", self.bucket_path());
        let response = self
            .client
            .keyed_request(Method::DELETE, &path)
            .send()
            .await?;

        check_status(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn test_storage() -> Storage {
        let config = AppwriteConfig {
            endpoint: "https://cloud.appwrite.io/v1".to_string(),
            project_id: "farmstand".to_string(),
            api_key: SecretString::from("k9$Jq2!xB7@mR4#vZ8&wN1*pT5^cL0"),
            database_id: "marketplace".to_string(),
            users_collection_id: "users".to_string(),
            products_collection_id: "products".to_string(),
            categories_collection_id: "categories".to_string(),
            orders_collection_id: "orders".to_string(),
            bucket_id: "product-images".to_string(),
        };
        Storage::new(AppwriteClient::new(&config), &config)
    }

    #[test]
    fn test_file_view_url() {
        let storage = test_storage();
        assert_eq!(
            storage.file_view_url("abc123"),
            "https://cloud.appwrite.io/v1/storage/buckets/product-images/files/abc123/view?project=farmstand"
        );
    }
}
