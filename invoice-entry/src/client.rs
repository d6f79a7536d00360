//! HTTP client for the invoicing API.
//!
//! Two endpoints are used: `GET /products` for the catalog and `POST /invoices` to save a
//! finished invoice. Each call is a single attempt; there is no retry or timeout beyond what
//! [`reqwest`] applies by default.

use derive_builder::Builder;
use reqwest::Client;
use tracing::{debug, info};

use crate::{
    error::AddContext,
    invoice::{InvoicePayload, Product},
};

/// Where the API lives.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into), pattern = "owned")]
pub struct ApiConfig {
    /// Base URL, e.g. `http://localhost:8080/api`. A trailing slash is ignored.
    base_url: String,
}

impl ApiConfig {
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    config: ApiConfig,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url(), path)
    }

    /// Fetch the product catalog.
    ///
    /// # Errors
    /// Returns [`crate::Error`] if the request cannot be sent, the server answers with a
    /// non-success status, or the body is not a JSON array of products.
    pub async fn fetch_products(&self) -> Result<Vec<Product>, crate::Error> {
        let url = self.url("/products");
        debug!(%url, "fetching product catalog");
        let body = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(crate::Error::from)
            .add_context(&format!("requesting {url}"))
            .add_context("fetching products")?
            .bytes()
            .await
            .map_err(crate::Error::from)
            .add_context("reading catalog body")
            .add_context("fetching products")?;
        let products: Vec<Product> = serde_json::from_slice(&body)
            .map_err(crate::Error::from)
            .add_context("parsing catalog JSON")
            .add_context("fetching products")?;
        info!(count = products.len(), "loaded product catalog");
        Ok(products)
    }

    /// Save an invoice. Only the status of the response is looked at.
    ///
    /// # Errors
    /// Returns [`crate::Error`] if the request cannot be sent or the server answers with a
    /// non-success status.
    pub async fn post_invoice(&self, invoice: &InvoicePayload<'_>) -> Result<(), crate::Error> {
        let url = self.url("/invoices");
        debug!(%url, total = %invoice.total_amount(), "saving invoice");
        self.client
            .post(&url)
            .json(invoice)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(crate::Error::from)
            .add_context(&format!("requesting {url}"))
            .add_context("saving invoice")?;
        Ok(())
    }
}
