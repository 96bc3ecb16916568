use crate::commands::{require_name, CmdMessage, CmdResult, CreatedId, Listed};
use crate::error::{InventarioError, Result};
use crate::id::{InventoryId, SectionId};
use crate::model::{AppState, Section};

/// Adds an empty section to the current inventory.
pub fn create(state: &mut AppState, name: &str) -> Result<CmdResult> {
    let inventory = state
        .current_inventory_mut()
        .ok_or(InventarioError::NoInventorySelected)?;
    let name = require_name(name, "section")?;

    let id = SectionId::generate();
    inventory.sections.insert(id.clone(), Section::new(name.clone()));

    Ok(CmdResult::default()
        .mutated()
        .with_created(CreatedId::Section(id))
        .with_message(CmdMessage::success(format!("Section created: {}", name))))
}

/// Sections of `inventory_id` in creation order; empty for an unknown inventory.
pub fn list(state: &AppState, inventory_id: &InventoryId) -> Result<CmdResult> {
    let listed = state
        .inventories
        .get(inventory_id)
        .map(|inv| {
            inv.sections
                .iter()
                .map(|(id, section)| Listed {
                    id: id.clone(),
                    name: section.name.clone(),
                    children: section.items.len(),
                    is_current: false,
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(CmdResult::default().with_sections(listed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::inventory;

    #[test]
    fn requires_a_current_inventory() {
        let mut state = AppState::new();
        let err = create(&mut state, "Cocina").unwrap_err();
        assert!(matches!(err, InventarioError::NoInventorySelected));
        assert!(err.is_validation());
    }

    #[test]
    fn rejects_blank_name() {
        let mut state = AppState::new();
        inventory::create(&mut state, "Casa").unwrap();
        let before = state.clone();

        assert!(create(&mut state, "  ").unwrap_err().is_validation());
        assert_eq!(state, before);
    }

    #[test]
    fn sections_list_in_creation_order() {
        let mut state = AppState::new();
        let inv = inventory::create(&mut state, "Casa")
            .unwrap()
            .created_inventory()
            .cloned()
            .unwrap();
        for name in ["Salón", "Cocina", "Baño"] {
            create(&mut state, name).unwrap();
        }

        let names: Vec<String> = list(&state, &inv)
            .unwrap()
            .sections
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Salón", "Cocina", "Baño"]);
    }

    #[test]
    fn unknown_inventory_lists_nothing() {
        let state = AppState::new();
        let result = list(&state, &InventoryId::from("missing")).unwrap();
        assert!(result.sections.is_empty());
    }
}
