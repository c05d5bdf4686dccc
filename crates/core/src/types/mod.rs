//! Core types for Web Larek.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod contact;
pub mod id;
pub mod payment;
pub mod price;
pub mod product;

pub use category::{Category, CategoryError};
pub use contact::{ContactError, Email, Phone};
pub use id::*;
pub use payment::{PaymentError, PaymentMethod};
pub use price::Price;
pub use product::Product;
