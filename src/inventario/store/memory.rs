use super::{decode_state, encode_state, StateStore};
use crate::error::Result;
use crate::model::AppState;

/// In-memory slot for testing and development.
/// Keeps the serialized text so loads go through the same decoding as on disk.
#[derive(Default)]
pub struct InMemoryStore {
    slot: Option<String>,
    quota: Option<u64>,
    saves: usize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with `raw` already in the slot, parsable or not.
    pub fn with_slot(raw: impl Into<String>) -> Self {
        Self {
            slot: Some(raw.into()),
            ..Self::default()
        }
    }

    pub fn with_quota(mut self, quota: Option<u64>) -> Self {
        self.quota = quota;
        self
    }

    pub fn set_quota(&mut self, quota: Option<u64>) {
        self.quota = quota;
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves
    }

    pub fn raw(&self) -> Option<&str> {
        self.slot.as_deref()
    }
}

impl StateStore for InMemoryStore {
    fn load(&self) -> AppState {
        match self.slot.as_deref().map(decode_state) {
            Some(Ok(state)) => state,
            Some(Err(e)) => {
                tracing::warn!(error = %e, "in-memory slot is unreadable, starting empty");
                AppState::new()
            }
            None => AppState::new(),
        }
    }

    fn save(&mut self, state: &AppState) -> Result<()> {
        self.slot = Some(encode_state(state, self.quota)?);
        self.saves += 1;
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use crate::id::{InventoryId, ItemId, SectionId};
    use crate::model::{AppState, Condition, Inventory, Item, Section};

    /// Builds states directly, bypassing validation and persistence.
    #[derive(Default)]
    pub struct StateFixture {
        pub state: AppState,
    }

    impl StateFixture {
        pub fn new() -> Self {
            Self::default()
        }

        /// Adds an inventory and makes it current.
        pub fn with_inventory(mut self, id: &str, name: &str) -> Self {
            let id = InventoryId::from(id);
            self.state.inventories.insert(id.clone(), Inventory::new(name));
            self.state.current = Some(id);
            self
        }

        /// Adds a section to the current inventory.
        pub fn with_section(mut self, id: &str, name: &str) -> Self {
            if let Some(inv) = self.state.current_inventory_mut() {
                inv.sections.insert(SectionId::from(id), Section::new(name));
            }
            self
        }

        /// Appends `count` items to section `section` of the current inventory.
        pub fn with_items(mut self, section: &str, count: usize) -> Self {
            if let Some(sec) = self
                .state
                .current_inventory_mut()
                .and_then(|inv| inv.sections.get_mut(&SectionId::from(section)))
            {
                for _ in 0..count {
                    let n = sec.items.len() + 1;
                    sec.items.push(Item {
                        id: ItemId::from(format!("{}-item-{}", section, n)),
                        name: format!("Item {}", n),
                        quantity: 1,
                        condition: Condition::Bueno,
                        description: None,
                        image: None,
                    });
                }
            }
            self
        }

        pub fn build(self) -> AppState {
            self.state
        }
    }
}
