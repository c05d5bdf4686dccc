//! Synchronous publish/subscribe event bus.
//!
//! # Delivery
//!
//! - Handlers subscribe with a [`Pattern`]: an exact name, a regular
//!   expression tested against the emitted name, or every event.
//! - All matching handlers run in subscription order, synchronously, on the
//!   caller's stack. Emission is re-entrant: a handler may emit further
//!   events or subscribe new handlers. The set of handlers for one emission
//!   is fixed when it starts.
//! - A handler returning `Err` is logged (and reported to Sentry when the
//!   error is reportable); delivery continues with the next handler.
//!
//! The bus is a cheap `Rc` handle; clone it into every component that needs
//! to publish or subscribe. It is `!Send`; the storefront runs on a single
//! thread.

pub mod payload;
pub mod topics;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use regex::Regex;
use tracing::debug;

use crate::error::{self, Result};

pub use payload::{Event, Payload};

/// A subscribed event handler.
pub type Handler = Rc<dyn Fn(&Event) -> Result<()>>;

/// Which event names a subscription receives.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Exactly this name.
    Exact(String),
    /// Any name the expression matches.
    Regex(Regex),
    /// Every event.
    Any,
}

impl Pattern {
    /// Compile a regular-expression pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if `pattern` is not a valid regular expression.
    pub fn regex(pattern: &str) -> std::result::Result<Self, regex::Error> {
        Ok(Self::Regex(Regex::new(pattern)?))
    }

    /// Whether an event called `name` is delivered to this subscription.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Exact(exact) => exact == name,
            Self::Regex(regex) => regex.is_match(name),
            Self::Any => true,
        }
    }
}

impl From<&str> for Pattern {
    fn from(name: &str) -> Self {
        Self::Exact(name.to_owned())
    }
}

impl From<String> for Pattern {
    fn from(name: String) -> Self {
        Self::Exact(name)
    }
}

impl From<Regex> for Pattern {
    fn from(regex: Regex) -> Self {
        Self::Regex(regex)
    }
}

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscription {
    id: SubscriptionId,
    pattern: Pattern,
    handler: Handler,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    subscriptions: Vec<Subscription>,
}

/// In-process event bus.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Rc<RefCell<Registry>>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriptions", &self.len())
            .finish()
    }
}

impl EventBus {
    /// Create a bus with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `handler` to every event matching `pattern`.
    pub fn subscribe<F>(&self, pattern: impl Into<Pattern>, handler: F) -> SubscriptionId
    where
        F: Fn(&Event) -> Result<()> + 'static,
    {
        let mut registry = self.inner.borrow_mut();
        let id = SubscriptionId(registry.next_id);
        registry.next_id += 1;
        registry.subscriptions.push(Subscription {
            id,
            pattern: pattern.into(),
            handler: Rc::new(handler),
        });
        id
    }

    /// Subscribe `handler` to every event.
    pub fn on_all<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&Event) -> Result<()> + 'static,
    {
        self.subscribe(Pattern::Any, handler)
    }

    /// Remove a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut registry = self.inner.borrow_mut();
        let before = registry.subscriptions.len();
        registry.subscriptions.retain(|s| s.id != id);
        registry.subscriptions.len() != before
    }

    /// Remove every subscription.
    pub fn clear(&self) {
        self.inner.borrow_mut().subscriptions.clear();
    }

    /// Number of active subscriptions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().subscriptions.len()
    }

    /// Whether there are no subscriptions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Emit an event and return how many handlers received it.
    pub fn emit(&self, name: impl Into<String>, payload: Payload) -> usize {
        self.dispatch(&Event::new(name, payload))
    }

    /// Deliver an already-built event.
    pub fn dispatch(&self, event: &Event) -> usize {
        // Collect first: handlers may subscribe or emit while we iterate.
        let handlers: Vec<Handler> = self
            .inner
            .borrow()
            .subscriptions
            .iter()
            .filter(|s| s.pattern.matches(&event.name))
            .map(|s| Rc::clone(&s.handler))
            .collect();

        debug!(event = %event.name, handlers = handlers.len(), "emit");
        error::add_breadcrumb("event", &event.name, None);

        for handler in &handlers {
            if let Err(err) = handler(event) {
                error::report(&format!("handler for {} failed", event.name), &err);
            }
        }

        handlers.len()
    }
}
