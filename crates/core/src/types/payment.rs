//! Payment methods offered at checkout.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PaymentMethod`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid payment method: {0}")]
pub struct PaymentError(pub String);

/// How the customer pays for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Card payment online.
    Online,
    /// Cash on delivery.
    Cash,
}

impl PaymentMethod {
    /// The wire value (`online` or `cash`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Cash => "cash",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "online" | "card" => Ok(Self::Online),
            "cash" => Ok(Self::Cash),
            _ => Err(PaymentError(s.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("online".parse::<PaymentMethod>().unwrap(), PaymentMethod::Online);
        assert_eq!("card".parse::<PaymentMethod>().unwrap(), PaymentMethod::Online);
        assert_eq!("cash".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cash);
        assert!("barter".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Cash).unwrap(),
            "\"cash\""
        );
    }
}
