use crate::commands::{require_name, CmdMessage, CmdResult, CreatedId, Listed};
use crate::error::{InventarioError, Result};
use crate::id::InventoryId;
use crate::model::{AppState, Inventory};

/// Creates an inventory and makes it the current one.
pub fn create(state: &mut AppState, name: &str) -> Result<CmdResult> {
    let name = require_name(name, "inventory")?;

    let id = InventoryId::generate();
    state.inventories.insert(id.clone(), Inventory::new(name.clone()));
    state.current = Some(id.clone());

    Ok(CmdResult::default()
        .mutated()
        .with_created(CreatedId::Inventory(id))
        .with_message(CmdMessage::success(format!("Inventory created: {}", name))))
}

/// Points `current` at `id`, or clears it when `id` is `None`.
///
/// An unknown id is reported and leaves the state unchanged.
pub fn select(state: &mut AppState, id: Option<&InventoryId>) -> Result<CmdResult> {
    let Some(id) = id else {
        state.current = None;
        return Ok(CmdResult::default()
            .mutated()
            .with_message(CmdMessage::info("No inventory selected")));
    };

    let inventory = state
        .inventories
        .get(id)
        .ok_or_else(|| InventarioError::InventoryNotFound(id.to_string()))?;
    let message = CmdMessage::success(format!("Now using inventory: {}", inventory.name));
    state.current = Some(id.clone());

    Ok(CmdResult::default().mutated().with_message(message))
}

/// All inventories in creation order.
pub fn list(state: &AppState) -> Result<CmdResult> {
    let listed = state
        .inventories
        .iter()
        .map(|(id, inv)| Listed {
            id: id.clone(),
            name: inv.name.clone(),
            children: inv.sections.len(),
            is_current: state.current.as_ref() == Some(id),
        })
        .collect();

    Ok(CmdResult::default().with_inventories(listed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_adds_entry_and_makes_it_current() {
        let mut state = AppState::new();
        let result = create(&mut state, "  Enero 2025 ").unwrap();
        let id = result.created_inventory().unwrap().clone();

        let listed = list(&state).unwrap().inventories;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Enero 2025");
        assert_eq!(listed[0].id, id);
        assert!(listed[0].is_current);
        assert_eq!(state.current, Some(id));
    }

    #[test]
    fn create_rejects_blank_names_without_mutation() {
        let mut state = AppState::new();
        for name in ["", "   ", "\t\n"] {
            let err = create(&mut state, name).unwrap_err();
            assert!(err.is_validation());
        }
        assert_eq!(state, AppState::new());
    }

    #[test]
    fn second_inventory_takes_over_current() {
        let mut state = AppState::new();
        create(&mut state, "A").unwrap();
        let b = create(&mut state, "B").unwrap().created_inventory().cloned();

        let names: Vec<String> = list(&state)
            .unwrap()
            .inventories
            .into_iter()
            .map(|l| l.name)
            .collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(state.current, b);
    }

    #[test]
    fn select_switches_and_clears() {
        let mut state = AppState::new();
        let a = create(&mut state, "A")
            .unwrap()
            .created_inventory()
            .cloned()
            .unwrap();
        create(&mut state, "B").unwrap();

        select(&mut state, Some(&a)).unwrap();
        assert_eq!(state.current.as_ref(), Some(&a));

        let result = select(&mut state, None).unwrap();
        assert!(result.mutated);
        assert!(state.current.is_none());
    }

    #[test]
    fn select_unknown_is_reported_and_changes_nothing() {
        let mut state = AppState::new();
        create(&mut state, "A").unwrap();
        let before = state.clone();

        let err = select(&mut state, Some(&InventoryId::from("nope"))).unwrap_err();
        assert!(matches!(err, InventarioError::InventoryNotFound(_)));
        assert_eq!(state, before);
    }
}
