//! Identifier newtypes.
//!
//! Every document id is a string on the wire. Wrapping each kind keeps a
//! `LotId` from being passed where a `ProductId` is expected, which matters
//! in allocation where both travel side by side.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// A fresh random id (32 hex characters).
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().simple().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }
    };
}

id_type!(ProductId);
id_type!(
    /// One received batch of a product.
    LotId
);
id_type!(BusinessId);
id_type!(CustomerId);
id_type!(DelivererId);
id_type!(OrderId);
id_type!(
    /// A pick-up or delivery round.
    LogisticsId
);
id_type!(
    /// Derived from customer and product, so a cart holds one entry per product.
    CartEntryId
);
