//! Application state shared across handlers.

use std::sync::Arc;

use crate::appwrite::{Account, AppwriteClient, Documents, Storage};
use crate::config::MarketConfig;
use crate::razorpay::RazorpayClient;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// hosted-backend clients, the payment gateway client, and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: MarketConfig,
    appwrite: AppwriteClient,
    documents: Documents,
    storage: Storage,
    account: Account,
    razorpay: RazorpayClient,
    http: reqwest::Client,
}

impl AppState {
    /// Create a new application state from configuration.
    #[must_use]
    pub fn new(config: MarketConfig) -> Self {
        let appwrite = AppwriteClient::new(&config.appwrite);
        let documents = Documents::new(appwrite.clone(), &config.appwrite);
        let storage = Storage::new(appwrite.clone(), &config.appwrite);
        let account = Account::new(appwrite.clone());
        let razorpay = RazorpayClient::new(&config.payment);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                appwrite,
                documents,
                storage,
                account,
                razorpay,
                http: reqwest::Client::new(),
            }),
        }
    }

    /// Get a reference to the market configuration.
    #[must_use]
    pub fn config(&self) -> &MarketConfig {
        &self.inner.config
    }

    /// Get a reference to the shared hosted-backend client.
    #[must_use]
    pub fn appwrite(&self) -> &AppwriteClient {
        &self.inner.appwrite
    }

    /// Get a reference to the document store.
    #[must_use]
    pub fn documents(&self) -> &Documents {
        &self.inner.documents
    }

    /// Get a reference to the object store.
    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.inner.storage
    }

    /// Get a reference to the auth service.
    #[must_use]
    pub fn account(&self) -> &Account {
        &self.inner.account
    }

    /// Get a reference to the payment gateway client.
    #[must_use]
    pub fn razorpay(&self) -> &RazorpayClient {
        &self.inner.razorpay
    }

    /// Get a plain HTTP client (verification-authority calls).
    #[must_use]
    pub fn http(&self) -> &reqwest::Client {
        &self.inner.http
    }

    /// Users collection id.
    #[must_use]
    pub fn users_collection(&self) -> &str {
        &self.inner.config.appwrite.users_collection_id
    }

    /// Products collection id.
    #[must_use]
    pub fn products_collection(&self) -> &str {
        &self.inner.config.appwrite.products_collection_id
    }

    /// Categories collection id.
    #[must_use]
    pub fn categories_collection(&self) -> &str {
        &self.inner.config.appwrite.categories_collection_id
    }

    /// Orders collection id.
    #[must_use]
    pub fn orders_collection(&self) -> &str {
        &self.inner.config.appwrite.orders_collection_id
    }
}
