//! Cylindo content API client.
//!
//! Thin blocking client for the two read-only endpoints this tool consumes:
//!
//! ```text
//! GET {base}/{cid}/listcustomerproducts          → product codes
//! GET {base}/{cid}/products/{code}/configuration → feature axes/options
//! ```
//!
//! One fetch per product per run, 20 second timeout, no retries — the
//! workload is a bounded bulk export, and a failed product is skipped with a
//! warning rather than retried or aborted on. Everything downstream of the
//! fetch is pure and synchronous, so the client is blocking by design.

use crate::catalog::{ProductConfiguration, ProductList};
use crate::url::CONTENT_API_BASE;
use std::time::Duration;
use thiserror::Error;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

/// Client bound to one customer ID.
pub struct ContentClient {
    http: reqwest::blocking::Client,
    base: String,
    cid: String,
}

impl ContentClient {
    pub fn new(cid: impl Into<String>) -> Result<Self, FetchError> {
        Self::with_base(cid, CONTENT_API_BASE)
    }

    /// Point the client at a different API root (test servers).
    pub fn with_base(cid: impl Into<String>, base: impl Into<String>) -> Result<Self, FetchError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base: base.into(),
            cid: cid.into(),
        })
    }

    /// All product codes available to the customer, in catalog order.
    pub fn list_products(&self) -> Result<Vec<String>, FetchError> {
        let url = format!("{}/{}/listcustomerproducts", self.base, self.cid);
        let list: ProductList = self.get_json(&url)?;
        Ok(list.codes())
    }

    /// A product's feature axes and options.
    pub fn product_configuration(&self, code: &str) -> Result<ProductConfiguration, FetchError> {
        let url = format!("{}/{}/products/{}/configuration", self.base, self.cid, code);
        self.get_json(&url)
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let response = self.http.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.json()?)
    }
}
