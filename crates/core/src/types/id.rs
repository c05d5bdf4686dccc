//! Newtype IDs for type-safe entity references.
//!
//! The Web Larek API identifies products and orders by opaque strings
//! (UUIDs in practice, but never parsed as such). Use the `define_id!`
//! macro to create wrappers that prevent mixing IDs from different
//! entity types.

/// Macro to define a type-safe, string-backed ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<&str>`, `From<String>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use web_larek_core::define_id;
/// define_id!(BasketId);
/// define_id!(ShipmentId);
///
/// let basket = BasketId::new("b-1");
/// let shipment = ShipmentId::new("b-1");
///
/// // These are different types, so this won't compile:
/// // let _: BasketId = shipment;
/// assert_eq!(basket.as_str(), shipment.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from anything string-like.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the underlying identifier.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the underlying string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(ProductId);
define_id!(OrderId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_serialize_as_plain_strings() {
        let id = ProductId::new("854cef69-976d-4c2a-a18c-2aa45046c390");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"854cef69-976d-4c2a-a18c-2aa45046c390\"");

        let order: OrderId = serde_json::from_str("\"28c57cb4\"").unwrap();
        assert_eq!(order.as_str(), "28c57cb4");
    }

    #[test]
    fn test_display_matches_inner() {
        let id = ProductId::from("abc");
        assert_eq!(id.to_string(), "abc");
        assert_eq!(id.into_inner(), "abc");
    }
}
