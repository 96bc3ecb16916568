//! # Identifiers
//!
//! Inventories, sections and items are keyed by short opaque tokens: the creation
//! time in milliseconds followed by a random suffix, both in base 36. No counter and
//! no collision check; the random part makes clashes within one process negligible.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

const RANDOM_DIGITS: usize = 11;

/// Produces a new identifier token, e.g. `m5x3k2q1a9fj2k4lqz0p`.
pub fn generate_id() -> String {
    let millis = Utc::now().timestamp_millis().max(0) as u128;
    let random = Uuid::new_v4().as_u128();

    let mut id = to_base36(millis);
    let suffix = to_base36(random);
    id.push_str(&suffix[suffix.len().saturating_sub(RANDOM_DIGITS)..]);
    id
}

fn to_base36(mut value: u128) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn generate() -> Self {
                Self(generate_id())
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

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// Key of an [`Inventory`](crate::model::Inventory) within the application state.
    InventoryId
);
string_id!(
    /// Key of a [`Section`](crate::model::Section) within its inventory.
    SectionId
);
string_id!(
    /// Identity of an [`Item`](crate::model::Item) within its section.
    ItemId
);
