//! Strongly-typed identifiers for domain entities.
//!
//! These prevent mixing up IDs from different contexts.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier from a string.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Generate a new unique identifier using UUID v4.
            #[must_use]
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            /// Get the inner string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

define_id!(OrderId, "Unique identifier for a placed order.");
define_id!(LineItemId, "Unique identifier for a single order line item.");
define_id!(ProductId, "Identifier of a catalog product.");
define_id!(
    UserId,
    "Identifier of a storefront user (issued by the identity provider)."
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_id_new_and_display() {
        let id = OrderId::new("ord-123");
        assert_eq!(id.as_str(), "ord-123");
        assert_eq!(format!("{id}"), "ord-123");
    }

    #[test]
    fn order_id_generate_is_unique() {
        let id1 = OrderId::generate();
        let id2 = OrderId::generate();
        assert_ne!(id1, id2);
    }

    #[test]
    fn product_id_from_string() {
        let id: ProductId = "prod-1".into();
        assert_eq!(id.as_str(), "prod-1");

        let id: ProductId = String::from("prod-2").into();
        assert_eq!(id.into_inner(), "prod-2");
    }

    #[test]
    fn product_ids_sort_lexically() {
        let mut ids = vec![
            ProductId::new("p-c"),
            ProductId::new("p-a"),
            ProductId::new("p-b"),
        ];
        ids.sort();
        assert_eq!(ids[0].as_str(), "p-a");
        assert_eq!(ids[2].as_str(), "p-c");
    }

    #[test]
    fn user_id_equality() {
        assert_eq!(UserId::new("u-1"), UserId::new("u-1"));
        assert_ne!(UserId::new("u-1"), UserId::new("u-2"));
    }

    #[test]
    fn serde_roundtrip() {
        let id = LineItemId::new("li-123");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"li-123\"");

        let parsed: LineItemId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }
}
