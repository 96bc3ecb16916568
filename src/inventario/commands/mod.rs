//! # Command Layer
//!
//! Business logic for every operation, one module per area. Commands take the
//! application state (or one inventory) by reference and return a [`CmdResult`];
//! they never touch storage, stdout or the process. Persisting after a mutation
//! is the API facade's job.
//!
//! Validation happens before any mutation, so a failed command leaves the state
//! exactly as it found it.

use crate::config::InventarioConfig;
use crate::error::{InventarioError, Result};
use crate::id::{InventoryId, ItemId, SectionId};
use crate::report::ReportSummary;

pub mod config;
pub mod helpers;
pub mod inventory;
pub mod item;
pub mod photo;
pub mod section;
pub mod view;

pub use view::{ProjectedItem, SectionFilter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

/// An `(id, name)` pair as shown in selectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listed<Id> {
    pub id: Id,
    pub name: String,
    /// Number of sections (inventories) or items (sections).
    pub children: usize,
    pub is_current: bool,
}

/// Identifier allocated by a create/add command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreatedId {
    Inventory(InventoryId),
    Section(SectionId),
    Item(ItemId),
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub created: Option<CreatedId>,
    /// Whether the command changed the state (and so must be persisted).
    pub mutated: bool,
    pub inventories: Vec<Listed<InventoryId>>,
    pub sections: Vec<Listed<SectionId>>,
    pub items: Vec<ProjectedItem>,
    pub report: Option<ReportSummary>,
    pub config: Option<InventarioConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_message(mut self, message: CmdMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn mutated(mut self) -> Self {
        self.mutated = true;
        self
    }

    pub fn with_created(mut self, created: CreatedId) -> Self {
        self.created = Some(created);
        self
    }

    pub fn with_inventories(mut self, inventories: Vec<Listed<InventoryId>>) -> Self {
        self.inventories = inventories;
        self
    }

    pub fn with_sections(mut self, sections: Vec<Listed<SectionId>>) -> Self {
        self.sections = sections;
        self
    }

    pub fn with_items(mut self, items: Vec<ProjectedItem>) -> Self {
        self.items = items;
        self
    }

    pub fn with_report(mut self, report: ReportSummary) -> Self {
        self.report = Some(report);
        self
    }

    pub fn with_config(mut self, config: InventarioConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn created_inventory(&self) -> Option<&InventoryId> {
        match &self.created {
            Some(CreatedId::Inventory(id)) => Some(id),
            _ => None,
        }
    }

    pub fn created_section(&self) -> Option<&SectionId> {
        match &self.created {
            Some(CreatedId::Section(id)) => Some(id),
            _ => None,
        }
    }

    pub fn created_item(&self) -> Option<&ItemId> {
        match &self.created {
            Some(CreatedId::Item(id)) => Some(id),
            _ => None,
        }
    }
}

/// Trims `name`, rejecting empty or whitespace-only input.
pub(crate) fn require_name(name: &str, what: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(InventarioError::Validation(format!(
            "Please enter a name for the {}.",
            what
        )));
    }
    Ok(trimmed.to_string())
}
