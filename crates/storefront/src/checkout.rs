//! Checkout state machine.
//!
//! ```text
//! Browsing ─▶ ProductDetail ─▶ Basket ─▶ DeliveryForm ─▶ ContactForm ─▶ Submitting ─▶ Success
//!                                              ▲              ▲  │                  │
//!                                              └── StartOrder ┘  └──── failure ◀────┘
//! ```
//!
//! Transitions are pure: [`CheckoutState::apply`] takes the action plus a
//! [`Readiness`] snapshot of the model and returns the next state or the
//! reason the move is not allowed. The presenter owns the current state.

use thiserror::Error;
use web_larek_core::ProductId;

use crate::api::OrderResult;

/// Why a transition was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("basket is empty")]
    EmptyBasket,
    #[error("checkout is blocked: {0}")]
    Blocked(String),
    #[error("delivery details are incomplete")]
    DeliveryIncomplete,
    #[error("contact details are incomplete")]
    ContactsIncomplete,
    #[error("an order is already being submitted")]
    SubmissionInFlight,
    #[error("cannot {action} while {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },
}

/// Where the customer is in the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CheckoutState {
    #[default]
    Browsing,
    ProductDetail(ProductId),
    Basket,
    DeliveryForm,
    /// `error` holds the message of a failed submission.
    ContactForm {
        error: Option<String>,
    },
    Submitting,
    Success(OrderResult),
}

/// Something the customer (or the API) did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutAction {
    OpenProduct(ProductId),
    OpenBasket,
    StartOrder,
    SubmitDelivery,
    SubmitContacts,
    SubmissionSucceeded(OrderResult),
    SubmissionFailed(String),
    Close,
}

/// What the model says about the basket and draft right now.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Readiness {
    pub basket_len: usize,
    /// A policy reason checkout is refused (e.g., a priceless item).
    pub blocker: Option<String>,
    pub delivery_complete: bool,
    pub contacts_complete: bool,
}

impl CheckoutState {
    /// Short state name for logs and errors.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Browsing => "browsing",
            Self::ProductDetail(_) => "viewing a product",
            Self::Basket => "viewing the basket",
            Self::DeliveryForm => "on the delivery form",
            Self::ContactForm { .. } => "on the contacts form",
            Self::Submitting => "submitting",
            Self::Success(_) => "showing the confirmation",
        }
    }

    /// Whether one of the two checkout forms is showing.
    #[must_use]
    pub const fn is_form(&self) -> bool {
        matches!(self, Self::DeliveryForm | Self::ContactForm { .. })
    }

    /// Compute the state after `action`.
    ///
    /// # Errors
    ///
    /// Returns the guard that refused the transition. The current state is
    /// unchanged in that case.
    pub fn apply(&self, action: CheckoutAction, ready: &Readiness) -> Result<Self, CheckoutError> {
        use CheckoutAction as A;

        if matches!(self, Self::Submitting)
            && !matches!(action, A::SubmissionSucceeded(_) | A::SubmissionFailed(_))
        {
            return Err(CheckoutError::SubmissionInFlight);
        }

        match action {
            A::OpenProduct(id) => Ok(Self::ProductDetail(id)),
            A::OpenBasket => Ok(Self::Basket),
            A::Close => Ok(Self::Browsing),

            A::StartOrder => match self {
                Self::Basket | Self::DeliveryForm | Self::ContactForm { .. } => {
                    if ready.basket_len == 0 {
                        Err(CheckoutError::EmptyBasket)
                    } else if let Some(reason) = &ready.blocker {
                        Err(CheckoutError::Blocked(reason.clone()))
                    } else if ready.delivery_complete {
                        Ok(Self::ContactForm { error: None })
                    } else {
                        Ok(Self::DeliveryForm)
                    }
                }
                _ => Err(self.refuse("start an order")),
            },

            A::SubmitDelivery => match self {
                Self::DeliveryForm if ready.delivery_complete => {
                    Ok(Self::ContactForm { error: None })
                }
                Self::DeliveryForm => Err(CheckoutError::DeliveryIncomplete),
                _ => Err(self.refuse("submit delivery details")),
            },

            A::SubmitContacts => match self {
                Self::ContactForm { .. } if !ready.delivery_complete => {
                    Err(CheckoutError::DeliveryIncomplete)
                }
                Self::ContactForm { .. } if ready.contacts_complete => Ok(Self::Submitting),
                Self::ContactForm { .. } => Err(CheckoutError::ContactsIncomplete),
                _ => Err(self.refuse("submit contact details")),
            },

            A::SubmissionSucceeded(result) => match self {
                Self::Submitting => Ok(Self::Success(result)),
                _ => Err(self.refuse("complete an order")),
            },

            A::SubmissionFailed(message) => match self {
                Self::Submitting => Ok(Self::ContactForm {
                    error: Some(message),
                }),
                _ => Err(self.refuse("fail an order")),
            },
        }
    }

    const fn refuse(&self, action: &'static str) -> CheckoutError {
        CheckoutError::InvalidTransition {
            action,
            state: self.name(),
        }
    }
}
