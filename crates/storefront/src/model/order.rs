//! Order draft, its fields, and validation.

use std::collections::BTreeMap;
use std::fmt;

use web_larek_core::{Email, PaymentMethod, Phone};

use super::ModelError;
use crate::events::topics;

/// An editable field of the order draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OrderField {
    Payment,
    Address,
    Email,
    Phone,
}

impl OrderField {
    /// Fields filled on the delivery step.
    pub const DELIVERY: [Self; 2] = [Self::Payment, Self::Address];
    /// Fields filled on the contacts step.
    pub const CONTACTS: [Self; 2] = [Self::Email, Self::Phone];

    /// The field name used in events and forms.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Payment => "payment",
            Self::Address => "address",
            Self::Email => "email",
            Self::Phone => "phone",
        }
    }

    /// Name of the form the field belongs to.
    #[must_use]
    pub const fn form(self) -> &'static str {
        match self {
            Self::Payment | Self::Address => topics::ORDER_FORM,
            Self::Email | Self::Phone => topics::CONTACTS_FORM,
        }
    }
}

impl fmt::Display for OrderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderField {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "payment" => Ok(Self::Payment),
            "address" => Ok(Self::Address),
            "email" => Ok(Self::Email),
            "phone" => Ok(Self::Phone),
            _ => Err(ModelError::UnknownField(s.to_owned())),
        }
    }
}

/// Order form data as typed so far. Empty strings mean "not set".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrderDraft {
    pub payment: Option<PaymentMethod>,
    pub address: String,
    pub email: String,
    pub phone: String,
}

impl OrderDraft {
    /// Current value of a text field (`payment` renders as its wire value).
    #[must_use]
    pub fn value(&self, field: OrderField) -> &str {
        match field {
            OrderField::Payment => self.payment.map_or("", PaymentMethod::as_str),
            OrderField::Address => &self.address,
            OrderField::Email => &self.email,
            OrderField::Phone => &self.phone,
        }
    }
}

/// Per-field validation messages. A field absent from the map is valid.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors(BTreeMap<OrderField, String>);

impl ValidationErrors {
    /// Validate every field of `draft`.
    #[must_use]
    pub fn check(draft: &OrderDraft) -> Self {
        let mut errors = BTreeMap::new();

        if draft.payment.is_none() {
            errors.insert(OrderField::Payment, "Select a payment method".to_string());
        }
        if draft.address.trim().is_empty() {
            errors.insert(OrderField::Address, "Enter a delivery address".to_string());
        }
        if draft.email.trim().is_empty() {
            errors.insert(OrderField::Email, "Enter an email".to_string());
        } else if let Err(err) = Email::parse(&draft.email) {
            errors.insert(OrderField::Email, format!("Email {err}"));
        }
        if draft.phone.trim().is_empty() {
            errors.insert(OrderField::Phone, "Enter a phone number".to_string());
        } else if let Err(err) = Phone::parse(&draft.phone) {
            errors.insert(OrderField::Phone, format!("Phone {err}"));
        }

        Self(errors)
    }

    /// Message for `field`, if it is invalid.
    #[must_use]
    pub fn get(&self, field: OrderField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    /// Whether `field` is invalid.
    #[must_use]
    pub fn contains(&self, field: OrderField) -> bool {
        self.0.contains_key(&field)
    }

    /// Whether every field is valid.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether all of `fields` are valid.
    #[must_use]
    pub fn all_valid(&self, fields: &[OrderField]) -> bool {
        fields.iter().all(|field| !self.contains(*field))
    }

    /// Messages for `fields`, joined for display under a form.
    #[must_use]
    pub fn summary(&self, fields: &[OrderField]) -> String {
        fields
            .iter()
            .filter_map(|field| self.get(*field))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// All messages in field order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.0.values().cloned().collect()
    }
}
