//! Web Larek catalog/order API client.
//!
//! # Endpoints
//!
//! - `GET {base}/product` - the full catalog (`{ total, items }`)
//! - `POST {base}/order` - place an order (`{ id, total }` or `{ error }`)
//!
//! The presenter depends on the [`LarekApi`] trait rather than on
//! [`LarekClient`] so the checkout flow can run against a fake.

pub mod types;

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, instrument};
use url::Url;
use web_larek_core::Product;

use crate::config::ApiConfig;

pub use types::{ErrorBody, OrderRequest, OrderResult, ProductList};

use types::OrderResponse;

/// Errors that can occur when talking to the Web Larek API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status without an error body.
    #[error("API error: {status} - {message}")]
    Status { status: u16, message: String },

    /// API refused the request and said why.
    #[error("{0}")]
    Rejected(String),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Operations the storefront needs from the backend.
#[allow(async_fn_in_trait)]
pub trait LarekApi {
    /// Fetch the full catalog.
    async fn get_products(&self) -> Result<Vec<Product>, ApiError>;

    /// Place an order.
    async fn create_order(&self, order: &OrderRequest) -> Result<OrderResult, ApiError>;
}

/// HTTP client for the Web Larek API.
#[derive(Clone)]
pub struct LarekClient {
    inner: Arc<LarekClientInner>,
}

struct LarekClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl LarekClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            inner: Arc::new(LarekClientInner {
                client,
                base_url: config.base_url.clone(),
            }),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path)?)
    }
}

/// Turn a response body into `T`, or into the API's own error message.
fn decode<T: serde::de::DeserializeOwned>(
    status: reqwest::StatusCode,
    body: &str,
) -> Result<T, ApiError> {
    if !status.is_success() {
        if let Ok(ErrorBody { error }) = serde_json::from_str::<ErrorBody>(body) {
            return Err(ApiError::Rejected(error));
        }
        tracing::error!(
            status = %status,
            body = %body.chars().take(500).collect::<String>(),
            "Web Larek API returned non-success status"
        );
        return Err(ApiError::Status {
            status: status.as_u16(),
            message: body.chars().take(200).collect(),
        });
    }

    serde_json::from_str(body).map_err(|e| {
        tracing::error!(
            error = %e,
            body = %body.chars().take(500).collect::<String>(),
            "Failed to parse Web Larek API response"
        );
        ApiError::Parse(e)
    })
}

impl LarekApi for LarekClient {
    #[instrument(skip(self))]
    async fn get_products(&self) -> Result<Vec<Product>, ApiError> {
        let response = self
            .inner
            .client
            .get(self.endpoint("product")?)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        let list: ProductList = decode(status, &body)?;
        if list.total != list.items.len() {
            debug!(
                total = list.total,
                received = list.items.len(),
                "Catalog total differs from item count"
            );
        }
        info!(count = list.items.len(), "Catalog fetched");
        Ok(list.items)
    }

    #[instrument(skip(self, order), fields(items = order.items.len(), total = %order.total))]
    async fn create_order(&self, order: &OrderRequest) -> Result<OrderResult, ApiError> {
        let response = self
            .inner
            .client
            .post(self.endpoint("order")?)
            .json(order)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        match decode::<OrderResponse>(status, &body)? {
            OrderResponse::Placed(result) => {
                info!(order_id = %result.id, "Order placed");
                Ok(result)
            }
            OrderResponse::Rejected(ErrorBody { error }) => Err(ApiError::Rejected(error)),
        }
    }
}
