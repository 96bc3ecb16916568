use super::{decode_state, encode_state, StateStore, SLOT_NAME};
use crate::error::{InventarioError, Result};
use crate::model::AppState;
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub struct FileStore {
    root: PathBuf,
    quota: Option<u64>,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root, quota: None }
    }

    pub fn with_quota(mut self, quota: Option<u64>) -> Self {
        self.quota = quota;
        self
    }

    pub fn slot_path(&self) -> PathBuf {
        self.root.join(format!("{}.json", SLOT_NAME))
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(InventarioError::Io)?;
        }
        Ok(())
    }

    fn read_slot(&self, path: &Path) -> Result<AppState> {
        let content = fs::read_to_string(path).map_err(InventarioError::Io)?;
        decode_state(&content)
    }

    /// Renames an unreadable slot so it survives the next save.
    fn quarantine(&self, path: &Path) -> Option<PathBuf> {
        let stamp = Utc::now().format("%Y%m%dT%H%M%S");
        let target = self
            .root
            .join(format!("{}.json.corrupt-{}", SLOT_NAME, stamp));
        match fs::rename(path, &target) {
            Ok(()) => Some(target),
            Err(e) => {
                tracing::warn!(error = %e, "could not move unreadable slot aside");
                None
            }
        }
    }
}

impl StateStore for FileStore {
    fn load(&self) -> AppState {
        let path = self.slot_path();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no saved state, starting empty");
            return AppState::new();
        }

        match self.read_slot(&path) {
            Ok(state) => state,
            Err(e) => {
                let moved = self.quarantine(&path);
                tracing::warn!(
                    error = %e,
                    moved_to = ?moved,
                    "saved state is unreadable, starting empty"
                );
                AppState::new()
            }
        }
    }

    fn save(&mut self, state: &AppState) -> Result<()> {
        let encoded = encode_state(state, self.quota)?;
        self.ensure_dir(&self.root)?;

        let tmp_file = self.root.join(format!(".{}-{}.tmp", SLOT_NAME, Uuid::new_v4()));
        if let Err(e) = fs::write(&tmp_file, &encoded) {
            let _ = fs::remove_file(&tmp_file);
            return Err(InventarioError::Io(e));
        }
        if let Err(e) = fs::rename(&tmp_file, self.slot_path()) {
            let _ = fs::remove_file(&tmp_file);
            return Err(InventarioError::Io(e));
        }

        tracing::debug!(bytes = encoded.len(), "state saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::InventoryId;
    use crate::model::Inventory;
    use tempfile::TempDir;

    fn state_with(name: &str) -> AppState {
        let mut state = AppState::new();
        let id = InventoryId::from("inv");
        state.inventories.insert(id.clone(), Inventory::new(name));
        state.current = Some(id);
        state
    }

    fn leftovers(dir: &Path, marker: &str) -> Vec<String> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .filter(|name| name.contains(marker))
            .collect()
    }

    #[test]
    fn missing_slot_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("nested"));
        assert_eq!(store.load(), AppState::new());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::new(dir.path().to_path_buf());
        let state = state_with("Enero 2025");

        store.save(&state).unwrap();

        assert_eq!(store.load(), state);
        assert!(leftovers(dir.path(), ".tmp").is_empty());
    }

    #[test]
    fn garbage_slot_loads_empty_and_is_kept_aside() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().to_path_buf());
        fs::write(store.slot_path(), "{ not json").unwrap();

        assert_eq!(store.load(), AppState::new());
        assert!(!store.slot_path().exists());
        assert_eq!(leftovers(dir.path(), ".corrupt-").len(), 1);
    }

    #[test]
    fn quota_exceeded_leaves_previous_slot_untouched() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::new(dir.path().to_path_buf());
        let small = state_with("A");
        store.save(&small).unwrap();

        let mut store = store.with_quota(Some(80));
        let big = state_with(&"x".repeat(500));
        let err = store.save(&big).unwrap_err();

        assert!(matches!(err, InventarioError::QuotaExceeded { quota: 80, .. }));
        assert_eq!(store.load(), small);
    }

    #[test]
    fn failed_rename_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join(format!("{}.json", SLOT_NAME));
        fs::create_dir(&blocker).unwrap();
        fs::write(blocker.join("keep"), "x").unwrap();

        let mut store = FileStore::new(dir.path().to_path_buf());
        assert!(matches!(
            store.save(&state_with("Casa")),
            Err(InventarioError::Io(_))
        ));
        assert!(leftovers(dir.path(), ".tmp").is_empty());
    }

    #[test]
    fn load_clears_dangling_current() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().to_path_buf());
        fs::write(
            store.slot_path(),
            r#"{"inventarios": {}, "inventarioActual": "missing"}"#,
        )
        .unwrap();

        assert!(store.load().current.is_none());
    }
}
