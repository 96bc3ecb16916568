use crate::commands::photo::is_data_uri;
use crate::commands::{require_name, CmdMessage, CmdResult, CreatedId};
use crate::error::{InventarioError, Result};
use crate::id::{ItemId, SectionId};
use crate::model::{AppState, Condition, Item};

/// Fields of an item about to be added, as entered by the user.
#[derive(Debug, Clone, Default)]
pub struct NewItem {
    pub name: String,
    /// Signed so non-positive input can be rejected with a proper message.
    pub quantity: i64,
    pub condition: Condition,
    pub description: Option<String>,
    /// A `data:` URI, see [`crate::commands::photo::encode_data_uri`].
    pub image: Option<String>,
}

impl NewItem {
    pub fn new(name: impl Into<String>, quantity: i64, condition: Condition) -> Self {
        Self {
            name: name.into(),
            quantity,
            condition,
            description: None,
            image: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    fn validate(self) -> Result<Item> {
        let name = require_name(&self.name, "item")?;
        if self.quantity < 1 {
            return Err(InventarioError::validation(
                "Quantity must be a positive number.",
            ));
        }
        let quantity = u32::try_from(self.quantity)
            .map_err(|_| InventarioError::validation("Quantity is too large."))?;
        if let Some(image) = &self.image {
            if !is_data_uri(image) {
                return Err(InventarioError::validation(
                    "Image must be a base64 data URI.",
                ));
            }
        }
        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        Ok(Item {
            id: ItemId::generate(),
            name,
            quantity,
            condition: self.condition,
            description,
            image: self.image,
        })
    }
}

/// Appends a new item to `section_id` in the current inventory.
pub fn add(state: &mut AppState, section_id: &SectionId, new_item: NewItem) -> Result<CmdResult> {
    let inventory = state
        .current_inventory_mut()
        .ok_or(InventarioError::NoInventorySelected)?;
    let section = inventory
        .sections
        .get_mut(section_id)
        .ok_or_else(|| InventarioError::SectionNotFound(section_id.to_string()))?;

    let item = new_item.validate()?;
    let id = item.id.clone();
    let message = CmdMessage::success(format!(
        "Item added to {}: {} (x{})",
        section.name, item.name, item.quantity
    ));
    section.items.push(item);

    Ok(CmdResult::default()
        .mutated()
        .with_created(CreatedId::Item(id))
        .with_message(message))
}

/// Removes `item_id` from `section_id` in the current inventory.
///
/// Idempotent: an absent inventory, section or item is a no-op, not an error.
pub fn remove(
    state: &mut AppState,
    section_id: &SectionId,
    item_id: &ItemId,
) -> Result<CmdResult> {
    let removed = state
        .current_inventory_mut()
        .and_then(|inv| inv.sections.get_mut(section_id))
        .and_then(|section| {
            let position = section.items.iter().position(|item| &item.id == item_id)?;
            Some(section.items.remove(position))
        });

    match removed {
        Some(item) => Ok(CmdResult::default()
            .mutated()
            .with_message(CmdMessage::success(format!("Item removed: {}", item.name)))),
        None => Ok(CmdResult::default()
            .with_message(CmdMessage::info(format!("No item {} to remove", item_id)))),
    }
}
