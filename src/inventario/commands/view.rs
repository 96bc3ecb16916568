//! Flattened, display-ready view of an inventory's items.
//!
//! The projection is computed on demand and never stored or persisted.

use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::id::SectionId;
use crate::model::{AppState, Inventory, Item};
use serde::Serialize;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SectionFilter {
    #[default]
    All,
    Section(SectionId),
}

impl FromStr for SectionFilter {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") || s.eq_ignore_ascii_case("todas") {
            Ok(SectionFilter::All)
        } else {
            Ok(SectionFilter::Section(SectionId::from(s)))
        }
    }
}

impl fmt::Display for SectionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionFilter::All => f.write_str("all"),
            SectionFilter::Section(id) => write!(f, "{}", id),
        }
    }
}

/// An item tagged with the section it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectedItem {
    #[serde(flatten)]
    pub item: Item,
    pub section_id: SectionId,
    pub section_name: String,
}

/// Items of `inventory` in section order, then item order.
///
/// A filter naming a section that no longer exists yields nothing.
pub fn project(inventory: &Inventory, filter: &SectionFilter) -> Vec<ProjectedItem> {
    let tag = |section_id: &SectionId, name: &str, item: &Item| ProjectedItem {
        item: item.clone(),
        section_id: section_id.clone(),
        section_name: name.to_string(),
    };

    match filter {
        SectionFilter::All => inventory
            .sections
            .iter()
            .flat_map(|(id, section)| {
                section
                    .items
                    .iter()
                    .map(move |item| tag(id, &section.name, item))
            })
            .collect(),
        SectionFilter::Section(id) => inventory
            .sections
            .get(id)
            .map(|section| {
                section
                    .items
                    .iter()
                    .map(|item| tag(id, &section.name, item))
                    .collect()
            })
            .unwrap_or_default(),
    }
}

/// Projects the current inventory.
pub fn run(state: &AppState, filter: &SectionFilter) -> Result<CmdResult> {
    let Some((_, inventory)) = state.current_inventory() else {
        return Ok(CmdResult::default().with_message(CmdMessage::info("No inventory selected")));
    };

    let items = project(inventory, filter);
    let mut result = CmdResult::default();
    if items.is_empty() {
        result.add_message(CmdMessage::info("No items in the selected inventory"));
    }
    Ok(result.with_items(items))
}
