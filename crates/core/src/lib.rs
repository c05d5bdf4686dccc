//! Web Larek Core - Shared domain types.
//!
//! This crate provides the types shared by every Web Larek component:
//! - `storefront` - Event bus, state model, views and API client
//! - `integration-tests` - End-to-end checkout tests
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no event
//! wiring. This keeps it lightweight and usable from any host.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, categories, payment methods and
//!   validated contact details

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
