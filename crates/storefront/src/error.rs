//! Unified error handling with Sentry integration.
//!
//! Every layer has its own `thiserror` enum; `AppError` unifies them and is
//! the error type bus handlers return. The bus logs a failing handler and
//! keeps delivering, so nothing here ever aborts the storefront.

use thiserror::Error;

use crate::api::ApiError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::model::ModelError;
use crate::views::ViewError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// State model rejected a mutation.
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// Checkout transition was not allowed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// A view failed to render.
    #[error("View error: {0}")]
    View(#[from] ViewError),

    /// Web Larek API operation failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// An event pattern is not a valid regular expression.
    #[error("Invalid event pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// An event carried a payload its handler cannot use.
    #[error("Event {event} carried an unexpected payload (expected {expected})")]
    UnexpectedPayload {
        event: String,
        expected: &'static str,
    },
}

impl AppError {
    /// Whether the error should be reported to Sentry.
    ///
    /// Validation-style rejections (checkout guards, unknown basket items)
    /// are expected during normal use and are only logged.
    #[must_use]
    pub const fn is_reportable(&self) -> bool {
        matches!(
            self,
            Self::Api(_) | Self::View(_) | Self::Pattern(_) | Self::UnexpectedPayload { .. }
        )
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Log an error and capture it to Sentry when it is reportable.
pub fn report(context: &str, err: &AppError) {
    if err.is_reportable() {
        let event_id = sentry::capture_error(err);
        tracing::error!(
            error = %err,
            sentry_event_id = %event_id,
            "{context}"
        );
    } else {
        tracing::warn!(error = %err, "{context}");
    }
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of events
/// leading up to an error. Without an initialised client this is a no-op.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("event", "product-opened", Some(&[("product_id", "123")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
