use crate::api::InventarioApi;
use crate::config::InventarioConfig;
use crate::error::{InventarioError, Result};
use crate::store::fs::FileStore;
use directories::ProjectDirs;
use std::path::PathBuf;

/// Overrides the data directory, mostly for tests and portable installs.
pub const HOME_ENV: &str = "INVENTARIO_HOME";

pub struct InventarioContext {
    pub api: InventarioApi<FileStore>,
    pub data_dir: PathBuf,
}

/// `$INVENTARIO_HOME` when set, else the platform data directory.
pub fn data_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    ProjectDirs::from("com", "inventario", "inventario")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| InventarioError::Api("Could not determine a data directory".to_string()))
}

/// Loads config and state from `data_dir`. An unreadable config falls back to defaults.
pub fn initialize(data_dir: PathBuf) -> InventarioContext {
    let config = InventarioConfig::load(&data_dir).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "config is unreadable, using defaults");
        InventarioConfig::default()
    });
    let store = FileStore::new(data_dir.clone()).with_quota(config.quota());
    let api = InventarioApi::open(store, config).with_config_dir(data_dir.clone());

    InventarioContext { api, data_dir }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn fresh_directory_starts_empty() {
        let dir = TempDir::new().unwrap();
        let ctx = initialize(dir.path().to_path_buf());
        assert!(ctx.api.state().inventories.is_empty());
        assert_eq!(ctx.api.settings(), &InventarioConfig::default());
    }

    #[test]
    fn state_and_config_come_from_the_directory() {
        let dir = TempDir::new().unwrap();
        {
            let mut ctx = initialize(dir.path().to_path_buf());
            ctx.api.create_inventory("Casa").unwrap();
            ctx.api
                .config(crate::api::ConfigAction::Set("page-format".into(), "letter".into()))
                .unwrap();
        }

        let ctx = initialize(dir.path().to_path_buf());
        assert_eq!(ctx.api.state().inventories.len(), 1);
        assert_eq!(ctx.api.settings().page_format.to_string(), "letter");
    }
}
