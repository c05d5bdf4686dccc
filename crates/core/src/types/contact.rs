//! Customer contact details collected by the contacts form.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`Email`] or [`Phone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ContactError {
    /// The input is empty (after trimming).
    #[error("value cannot be empty")]
    Empty,
    /// The input is too long.
    #[error("must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The email is not `local@domain.tld`.
    #[error("must look like name@example.com")]
    MalformedEmail,
    /// The phone contains something other than digits and separators.
    #[error("may only contain digits, spaces, dashes, brackets and a leading +")]
    PhoneCharacters,
    /// The phone has too few or too many digits.
    #[error("must have between {min} and {max} digits")]
    PhoneDigits {
        /// Minimum digit count.
        min: usize,
        /// Maximum digit count.
        max: usize,
    },
}

/// A customer email address.
///
/// ## Constraints
///
/// - Length: 1-254 characters after trimming (RFC 5321 limit)
/// - Exactly one @ symbol with a non-empty local part
/// - Domain contains a dot and does not start or end with one
///
/// ```
/// use web_larek_core::Email;
///
/// assert!(Email::parse("buyer@example.com").is_ok());
/// assert!(Email::parse("  buyer@example.com ").is_ok());
/// assert!(Email::parse("buyer@localhost").is_err());
/// assert!(Email::parse("a@b@c.d").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Maximum length of an email address (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Parse an `Email`, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty, too long, or not of
    /// the form `local@domain.tld`.
    pub fn parse(s: &str) -> Result<Self, ContactError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ContactError::Empty);
        }
        if s.len() > Self::MAX_LENGTH {
            return Err(ContactError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        let (local, domain) = s.split_once('@').ok_or(ContactError::MalformedEmail)?;
        let domain_ok = domain.contains('.')
            && !domain.starts_with('.')
            && !domain.ends_with('.')
            && !domain.contains('@');
        if local.is_empty() || !domain_ok {
            return Err(ContactError::MalformedEmail);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the email address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = ContactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A customer phone number, kept as typed by the customer.
///
/// ```
/// use web_larek_core::Phone;
///
/// assert!(Phone::parse("+7 (999) 123-45-67").is_ok());
/// assert!(Phone::parse("12345").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Minimum number of digits.
    pub const MIN_DIGITS: usize = 10;
    /// Maximum number of digits (E.164).
    pub const MAX_DIGITS: usize = 15;

    /// Parse a `Phone`, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, contains characters other
    /// than digits, separators and a leading `+`, or has a digit count
    /// outside `MIN_DIGITS..=MAX_DIGITS`.
    pub fn parse(s: &str) -> Result<Self, ContactError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ContactError::Empty);
        }

        let body = s.strip_prefix('+').unwrap_or(s);
        let mut digits = 0;
        for c in body.chars() {
            match c {
                '0'..='9' => digits += 1,
                ' ' | '-' | '(' | ')' => {}
                _ => return Err(ContactError::PhoneCharacters),
            }
        }

        if !(Self::MIN_DIGITS..=Self::MAX_DIGITS).contains(&digits) {
            return Err(ContactError::PhoneDigits {
                min: Self::MIN_DIGITS,
                max: Self::MAX_DIGITS,
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the phone number as typed (trimmed).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Phone {
    type Err = ContactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_email_valid() {
        assert!(Email::parse("user@example.com").is_ok());
        assert!(Email::parse("user.name+tag@example.co.uk").is_ok());
        assert!(Email::parse("a@b.c").is_ok());
    }

    #[test]
    fn test_email_trims() {
        let email = Email::parse("  user@example.com\n").unwrap();
        assert_eq!(email.as_str(), "user@example.com");
    }

    #[test]
    fn test_email_empty() {
        assert_eq!(Email::parse("   "), Err(ContactError::Empty));
    }

    #[test]
    fn test_email_too_long() {
        let long = format!("{}@example.com", "a".repeat(250));
        assert!(matches!(
            Email::parse(&long),
            Err(ContactError::TooLong { .. })
        ));
    }

    #[test]
    fn test_email_malformed() {
        for bad in ["no-at", "@example.com", "user@", "user@host", "user@.com", "a@b@c.d"] {
            assert_eq!(Email::parse(bad), Err(ContactError::MalformedEmail), "{bad}");
        }
    }

    #[test]
    fn test_phone_valid() {
        assert_eq!(
            Phone::parse(" +7 (999) 123-45-67 ").unwrap().as_str(),
            "+7 (999) 123-45-67"
        );
        assert!(Phone::parse("89991234567").is_ok());
    }

    #[test]
    fn test_phone_rejects_letters() {
        assert_eq!(
            Phone::parse("+7 999 CALL-ME"),
            Err(ContactError::PhoneCharacters)
        );
        assert_eq!(Phone::parse("7+9991234567"), Err(ContactError::PhoneCharacters));
    }

    #[test]
    fn test_phone_digit_bounds() {
        assert!(matches!(
            Phone::parse("123-45"),
            Err(ContactError::PhoneDigits { .. })
        ));
        assert!(matches!(
            Phone::parse("1234567890123456"),
            Err(ContactError::PhoneDigits { .. })
        ));
    }

    #[test]
    fn test_serde_transparent() {
        let email = Email::parse("user@example.com").unwrap();
        assert_eq!(
            serde_json::to_string(&email).unwrap(),
            "\"user@example.com\""
        );
    }
}
