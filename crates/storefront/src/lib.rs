//! Web Larek storefront library.
//!
//! The storefront is a single-threaded, event-driven application: views
//! emit user intents on an [`events::EventBus`], the [`presenter`] reacts by
//! updating the [`model`] and driving the [`checkout`] state machine, and
//! model changes flow back to the views as events.
//!
//! The `web-larek` binary wires this to the real API; the library exists so
//! the whole flow can be tested against a fake one.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod checkout;
pub mod config;
pub mod error;
pub mod events;
pub mod model;
pub mod presenter;
pub mod views;

pub use presenter::Storefront;
