//! # API Facade
//!
//! `InventarioApi` is the single entry point for every operation, whatever the UI.
//! It owns the in-memory [`AppState`], the [`StateStore`] it was loaded from and the
//! active configuration.
//!
//! ## Responsibilities
//!
//! - **Resolves** user-typed references (ids or names) into ids
//! - **Dispatches** to the command functions in `commands/*.rs`
//! - **Persists** the full state after every command that changed it
//!
//! It does no printing and holds no business rules; those live in the command layer.
//!
//! ## Persistence failures
//!
//! The in-memory state is the source of truth. When a save fails after a mutation
//! the change is kept in memory and the call returns [`InventarioError::Unsaved`]
//! carrying the command's result, so the caller still learns created ids and can
//! warn that the change may not survive a restart.
//!
//! ## Generic Over StateStore
//!
//! - Production: `InventarioApi<FileStore>`
//! - Testing: `InventarioApi<InMemoryStore>`

use crate::commands::{self, helpers, CmdMessage, CmdResult, SectionFilter};
use crate::config::InventarioConfig;
use crate::error::{InventarioError, Result};
use crate::id::{ItemId, SectionId};
use crate::model::AppState;
use crate::report::pdf::LopdfAssembler;
use crate::report::raster::Rasterizer;
use crate::report::{self, ReportOptions};
use crate::store::StateStore;
use std::path::{Path, PathBuf};

pub use crate::commands::config::ConfigAction;
pub use crate::commands::item::NewItem;

pub struct InventarioApi<S: StateStore> {
    store: S,
    state: AppState,
    config: InventarioConfig,
    config_dir: Option<PathBuf>,
}

impl<S: StateStore> InventarioApi<S> {
    /// Loads the state from `store`. A missing or unreadable slot starts empty.
    pub fn open(store: S, config: InventarioConfig) -> Self {
        let state = store.load();
        tracing::debug!(inventories = state.inventories.len(), "state loaded");
        Self {
            store,
            state,
            config,
            config_dir: None,
        }
    }

    /// Directory `config` changes are written to.
    pub fn with_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dir = Some(dir.into());
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn settings(&self) -> &InventarioConfig {
        &self.config
    }

    pub fn create_inventory(&mut self, name: &str) -> Result<CmdResult> {
        let result = commands::inventory::create(&mut self.state, name)?;
        self.persist(result)
    }

    /// Selects the inventory matching `key` (id or name), or clears the selection.
    pub fn select_inventory(&mut self, key: Option<&str>) -> Result<CmdResult> {
        let id = key
            .map(|k| helpers::resolve_inventory(&self.state, k))
            .transpose()?;
        let result = commands::inventory::select(&mut self.state, id.as_ref())?;
        self.persist(result)
    }

    pub fn list_inventories(&self) -> Result<CmdResult> {
        commands::inventory::list(&self.state)
    }

    pub fn create_section(&mut self, name: &str) -> Result<CmdResult> {
        let result = commands::section::create(&mut self.state, name)?;
        self.persist(result)
    }

    /// Sections of the current inventory.
    pub fn list_sections(&self) -> Result<CmdResult> {
        match &self.state.current {
            Some(id) => commands::section::list(&self.state, id),
            None => Ok(CmdResult::default()
                .with_message(CmdMessage::info("No inventory selected"))),
        }
    }

    pub fn add_item(&mut self, section: &str, item: NewItem) -> Result<CmdResult> {
        let (_, inventory) = self
            .state
            .current_inventory()
            .ok_or(InventarioError::NoInventorySelected)?;
        let section_id = helpers::resolve_section(inventory, section)?;
        let result = commands::item::add(&mut self.state, &section_id, item)?;
        self.persist(result)
    }

    /// Removes an item. Unknown sections or items are a no-op.
    pub fn remove_item(&mut self, section: &str, item_id: &str) -> Result<CmdResult> {
        let section_id = self.section_id_or_raw(section);
        let result =
            commands::item::remove(&mut self.state, &section_id, &ItemId::from(item_id.trim()))?;
        self.persist(result)
    }

    /// Items of the current inventory. A section filter may name the section.
    pub fn project(&self, filter: &SectionFilter) -> Result<CmdResult> {
        let filter = match filter {
            SectionFilter::All => SectionFilter::All,
            SectionFilter::Section(key) => {
                SectionFilter::Section(self.section_id_or_raw(key.as_str()))
            }
        };
        commands::view::run(&self.state, &filter)
    }

    /// Exports the current inventory to `out_dir`.
    ///
    /// Works on a copy taken when the call starts.
    pub fn generate_report<R: Rasterizer + ?Sized>(
        &self,
        rasterizer: &R,
        out_dir: &Path,
    ) -> Result<CmdResult> {
        let (_, inventory) = self
            .state
            .current_inventory()
            .ok_or(InventarioError::NoInventorySelected)?;
        let snapshot = inventory.clone();

        let options = ReportOptions::from_config(&self.config, out_dir);
        let summary =
            report::generate_report::<R, LopdfAssembler>(&snapshot, rasterizer, &options)?;
        let message = CmdMessage::success(format!(
            "Report written: {} ({} page{})",
            summary.path.display(),
            summary.pages,
            if summary.pages == 1 { "" } else { "s" }
        ));
        Ok(CmdResult::default().with_report(summary).with_message(message))
    }

    pub fn config(&mut self, action: ConfigAction) -> Result<CmdResult> {
        commands::config::run(&mut self.config, self.config_dir.as_deref(), action)
    }

    fn section_id_or_raw(&self, key: &str) -> SectionId {
        self.state
            .current_inventory()
            .and_then(|(_, inv)| helpers::resolve_section(inv, key).ok())
            .unwrap_or_else(|| SectionId::from(key.trim()))
    }

    fn persist(&mut self, result: CmdResult) -> Result<CmdResult> {
        if !result.mutated {
            return Ok(result);
        }
        match self.store.save(&self.state) {
            Ok(()) => Ok(result),
            Err(e) => {
                tracing::warn!(error = %e, "state changed in memory but could not be saved");
                Err(InventarioError::Unsaved {
                    result: Box::new(result),
                    source: Box::new(e),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Condition;
    use crate::report::region::TempRegion;
    use crate::store::memory::InMemoryStore;
    use image::RgbImage;
    use tempfile::TempDir;

    fn api() -> InventarioApi<InMemoryStore> {
        InventarioApi::open(InMemoryStore::new(), InventarioConfig::default())
    }

    fn api_with_section() -> InventarioApi<InMemoryStore> {
        let mut api = api();
        api.create_inventory("Casa").unwrap();
        api.create_section("Cocina").unwrap();
        api
    }

    struct BlankRasterizer;

    impl Rasterizer for BlankRasterizer {
        fn render(&self, _region: &TempRegion) -> Result<RgbImage> {
            Ok(RgbImage::new(800, 400))
        }
    }

    #[test]
    fn every_mutation_is_saved() {
        let mut api = api_with_section();
        assert_eq!(api.store().save_count(), 2);

        api.add_item("cocina", NewItem::new("Mesa", 1, Condition::Bueno))
            .unwrap();
        assert_eq!(api.store().save_count(), 3);

        api.list_inventories().unwrap();
        api.list_sections().unwrap();
        api.project(&SectionFilter::All).unwrap();
        assert_eq!(api.store().save_count(), 3);
    }

    #[test]
    fn failed_validation_saves_nothing() {
        let mut api = api_with_section();
        let before = api.state().clone();

        let err = api
            .add_item("Cocina", NewItem::new("Mesa", 0, Condition::Bueno))
            .unwrap_err();
        assert!(err.is_validation());
        assert!(api.create_inventory("   ").is_err());
        assert_eq!(api.state(), &before);
        assert_eq!(api.store().save_count(), 2);
    }

    #[test]
    fn remove_of_missing_item_is_a_quiet_noop() {
        let mut api = api_with_section();
        let result = api.remove_item("Cocina", "nope").unwrap();
        assert!(!result.mutated);
        let result = api.remove_item("Garaje", "nope").unwrap();
        assert!(!result.mutated);
        assert_eq!(api.store().save_count(), 2);
    }

    #[test]
    fn add_then_remove_by_id() {
        let mut api = api_with_section();
        let id = api
            .add_item("Cocina", NewItem::new("Mesa", 2, Condition::Nuevo))
            .unwrap()
            .created_item()
            .cloned()
            .unwrap();

        let result = api.remove_item("Cocina", id.as_str()).unwrap();
        assert!(result.mutated);
        assert!(api.project(&SectionFilter::All).unwrap().items.is_empty());
    }

    #[test]
    fn quota_failure_keeps_change_in_memory() {
        let mut api = api_with_section();
        let saved = api.store().raw().unwrap().to_string();
        api.store.set_quota(Some(10));

        let err = api
            .add_item("Cocina", NewItem::new("Mesa", 1, Condition::Bueno))
            .unwrap_err();
        let (result, source) = match err {
            InventarioError::Unsaved { result, source } => (result, source),
            other => panic!("expected an unsaved change, got {:?}", other),
        };
        assert!(matches!(*source, InventarioError::QuotaExceeded { .. }));

        let (_, inventory) = api.state().current_inventory().unwrap();
        let section = inventory.sections.values().next().unwrap();
        assert_eq!(result.created_item(), Some(&section.items[0].id));
        assert_eq!(inventory.item_count(), 1);
        assert_eq!(api.store().raw().unwrap(), saved);
    }

    #[test]
    fn state_survives_reopen() {
        let mut api = api_with_section();
        api.add_item("Cocina", NewItem::new("Mesa", 1, Condition::Malo))
            .unwrap();
        let raw = api.store().raw().unwrap().to_string();

        let reopened =
            InventarioApi::open(InMemoryStore::with_slot(raw), InventarioConfig::default());
        assert_eq!(reopened.state(), api.state());
    }

    #[test]
    fn select_by_name_and_clear() {
        let mut api = api();
        api.create_inventory("Casa").unwrap();
        api.create_inventory("Oficina").unwrap();

        api.select_inventory(Some("casa")).unwrap();
        assert_eq!(api.state().current_inventory().unwrap().1.name, "Casa");

        assert!(matches!(
            api.select_inventory(Some("Garaje")).unwrap_err(),
            InventarioError::InventoryNotFound(_)
        ));
        assert_eq!(api.state().current_inventory().unwrap().1.name, "Casa");

        api.select_inventory(None).unwrap();
        assert!(api.state().current.is_none());
    }

    #[test]
    fn project_filters_by_section_name() {
        let mut api = api_with_section();
        api.create_section("Garaje").unwrap();
        api.add_item("Cocina", NewItem::new("Mesa", 1, Condition::Bueno))
            .unwrap();
        api.add_item("Garaje", NewItem::new("Bici", 1, Condition::Bueno))
            .unwrap();

        let items = api
            .project(&"garaje".parse::<SectionFilter>().unwrap())
            .unwrap()
            .items;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].item.name, "Bici");
    }

    #[test]
    fn report_requires_an_inventory() {
        let dir = TempDir::new().unwrap();
        let err = api()
            .generate_report(&BlankRasterizer, dir.path())
            .unwrap_err();
        assert!(matches!(err, InventarioError::NoInventorySelected));
    }

    #[test]
    fn report_does_not_mutate() {
        let dir = TempDir::new().unwrap();
        let api = api_with_section();
        let before = api.state().clone();

        let result = api.generate_report(&BlankRasterizer, dir.path()).unwrap();
        let summary = result.report.unwrap();
        assert_eq!(summary.pages, 1);
        assert!(summary.path.ends_with("Inventario_Casa.pdf"));
        assert_eq!(api.state(), &before);
        assert_eq!(api.store().save_count(), 2);
    }
}
