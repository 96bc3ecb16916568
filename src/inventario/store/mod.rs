//! # Storage Layer
//!
//! The entire [`AppState`] lives in one durable slot. It is read once at startup and
//! rewritten in full after every mutation; there is no partial update and no batching.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: production storage, a single `sistemaInventario.json` file
//!   written atomically (temp file + rename).
//! - [`memory::InMemoryStore`]: keeps the serialized slot in memory, for tests.
//!
//! Both enforce an optional byte quota. Embedded photos make the slot grow quickly,
//! and running out of room must come back to the caller as an error instead of a
//! silently dropped change.
//!
//! ## Loading never fails
//!
//! A missing or unreadable slot yields an empty state. `FileStore` moves an unreadable
//! slot aside before returning, so the next save does not overwrite it.

use crate::error::{InventarioError, Result};
use crate::model::AppState;

pub mod fs;
pub mod memory;

/// Name of the durable slot.
pub const SLOT_NAME: &str = "sistemaInventario";

/// Abstract interface for the durable state slot.
pub trait StateStore {
    /// Read the slot; absent or unparsable data degrades to an empty state.
    fn load(&self) -> AppState;

    /// Serialize the full state and overwrite the slot.
    fn save(&mut self, state: &AppState) -> Result<()>;
}

/// Serializes `state`, enforcing `quota` on the encoded size.
pub(crate) fn encode_state(state: &AppState, quota: Option<u64>) -> Result<String> {
    let encoded = serde_json::to_string(state).map_err(InventarioError::Serialization)?;
    if let Some(quota) = quota {
        let needed = encoded.len() as u64;
        if needed > quota {
            return Err(InventarioError::QuotaExceeded { needed, quota });
        }
    }
    Ok(encoded)
}

/// Parses slot contents, normalizing a dangling current-inventory reference.
pub(crate) fn decode_state(raw: &str) -> Result<AppState> {
    let mut state: AppState = serde_json::from_str(raw).map_err(InventarioError::Serialization)?;
    if state.normalize() {
        tracing::debug!("cleared current inventory pointing at a missing inventory");
    }
    Ok(state)
}
