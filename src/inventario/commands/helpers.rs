//! Resolution of user-typed references to inventories and sections.
//!
//! A reference matches, in order: an exact id, exactly one exact name, exactly one
//! case-insensitive name. Anything else is not found, or ambiguous when several
//! names match.

use crate::error::{InventarioError, Result};
use crate::id::{InventoryId, SectionId};
use crate::model::{AppState, Inventory};
use indexmap::IndexMap;
use std::hash::Hash;

fn resolve<'a, Id, V>(
    entries: &'a IndexMap<Id, V>,
    key: &str,
    id_of: impl Fn(&str) -> Id,
    name_of: impl Fn(&V) -> &str,
) -> std::result::Result<Id, Vec<&'a Id>>
where
    Id: Hash + Eq + Clone,
{
    let key = key.trim();
    let as_id = id_of(key);
    if entries.contains_key(&as_id) {
        return Ok(as_id);
    }

    let exact: Vec<&Id> = entries
        .iter()
        .filter(|(_, v)| name_of(*v) == key)
        .map(|(id, _)| id)
        .collect();
    if exact.len() == 1 {
        return Ok(exact[0].clone());
    }
    if exact.len() > 1 {
        return Err(exact);
    }

    let folded: Vec<&Id> = entries
        .iter()
        .filter(|(_, v)| name_of(*v).to_lowercase() == key.to_lowercase())
        .map(|(id, _)| id)
        .collect();
    match folded.len() {
        1 => Ok(folded[0].clone()),
        _ => Err(folded),
    }
}

fn ambiguous<Id: std::fmt::Display>(what: &str, key: &str, ids: &[&Id]) -> InventarioError {
    let ids: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
    InventarioError::Validation(format!(
        "{} '{}' is ambiguous, use one of the ids: {}",
        what,
        key,
        ids.join(", ")
    ))
}

pub fn resolve_inventory(state: &AppState, key: &str) -> Result<InventoryId> {
    resolve(&state.inventories, key, |k| InventoryId::from(k), |inv| inv.name.as_str()).map_err(
        |matches| {
            if matches.is_empty() {
                InventarioError::InventoryNotFound(key.to_string())
            } else {
                ambiguous("Inventory", key, &matches)
            }
        },
    )
}

pub fn resolve_section(inventory: &Inventory, key: &str) -> Result<SectionId> {
    resolve(
        &inventory.sections,
        key,
        |k| SectionId::from(k),
        |s| s.name.as_str(),
    )
    .map_err(|matches| {
        if matches.is_empty() {
            InventarioError::SectionNotFound(key.to_string())
        } else {
            ambiguous("Section", key, &matches)
        }
    })
}
