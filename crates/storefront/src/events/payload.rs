//! Event payloads.
//!
//! The set of things that travel over the bus is small and closed, so
//! payloads are an enum rather than untyped values. Handlers use the typed
//! accessors on [`Event`], which fail with `AppError::UnexpectedPayload`
//! when an event was emitted with the wrong shape.

use web_larek_core::{PaymentMethod, Product};

use crate::api::OrderResult;
use crate::error::{AppError, Result};
use crate::model::{BasketSnapshot, ValidationErrors};

/// Data attached to an event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Payload {
    #[default]
    None,
    Products(Vec<Product>),
    Product(Product),
    Basket(BasketSnapshot),
    Field { field: String, value: String },
    Payment(PaymentMethod),
    Validation(ValidationErrors),
    Order(OrderResult),
    Message(String),
}

/// A named event with its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub name: String,
    pub payload: Payload,
}

impl Event {
    /// Create an event.
    #[must_use]
    pub fn new(name: impl Into<String>, payload: Payload) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }

    /// The product carried by the event.
    ///
    /// # Errors
    ///
    /// Returns `AppError::UnexpectedPayload` for any other payload.
    pub fn product(&self) -> Result<&Product> {
        match &self.payload {
            Payload::Product(product) => Ok(product),
            _ => Err(self.unexpected("product")),
        }
    }

    /// The product list carried by the event.
    ///
    /// # Errors
    ///
    /// Returns `AppError::UnexpectedPayload` for any other payload.
    pub fn products(&self) -> Result<&[Product]> {
        match &self.payload {
            Payload::Products(products) => Ok(products),
            _ => Err(self.unexpected("products")),
        }
    }

    /// The basket snapshot carried by the event.
    ///
    /// # Errors
    ///
    /// Returns `AppError::UnexpectedPayload` for any other payload.
    pub fn basket(&self) -> Result<&BasketSnapshot> {
        match &self.payload {
            Payload::Basket(basket) => Ok(basket),
            _ => Err(self.unexpected("basket")),
        }
    }

    /// The `(field, value)` pair of a form change.
    ///
    /// # Errors
    ///
    /// Returns `AppError::UnexpectedPayload` for any other payload.
    pub fn field(&self) -> Result<(&str, &str)> {
        match &self.payload {
            Payload::Field { field, value } => Ok((field, value)),
            _ => Err(self.unexpected("field")),
        }
    }

    /// The selected payment method.
    ///
    /// # Errors
    ///
    /// Returns `AppError::UnexpectedPayload` for any other payload.
    pub fn payment(&self) -> Result<PaymentMethod> {
        match &self.payload {
            Payload::Payment(method) => Ok(*method),
            _ => Err(self.unexpected("payment")),
        }
    }

    /// The validation errors carried by the event.
    ///
    /// # Errors
    ///
    /// Returns `AppError::UnexpectedPayload` for any other payload.
    pub fn validation(&self) -> Result<&ValidationErrors> {
        match &self.payload {
            Payload::Validation(errors) => Ok(errors),
            _ => Err(self.unexpected("validation")),
        }
    }

    /// The order result carried by the event.
    ///
    /// # Errors
    ///
    /// Returns `AppError::UnexpectedPayload` for any other payload.
    pub fn order(&self) -> Result<&OrderResult> {
        match &self.payload {
            Payload::Order(result) => Ok(result),
            _ => Err(self.unexpected("order")),
        }
    }

    /// The message carried by the event.
    ///
    /// # Errors
    ///
    /// Returns `AppError::UnexpectedPayload` for any other payload.
    pub fn message(&self) -> Result<&str> {
        match &self.payload {
            Payload::Message(message) => Ok(message),
            _ => Err(self.unexpected("message")),
        }
    }

    fn unexpected(&self, expected: &'static str) -> AppError {
        AppError::UnexpectedPayload {
            event: self.name.clone(),
            expected,
        }
    }
}
