use crate::commands::{CmdMessage, CmdResult};
use crate::config::InventarioConfig;
use crate::error::Result;
use std::path::Path;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

/// Shows or changes `config`. A successful `Set` is written to `dir` when one is given.
pub fn run(
    config: &mut InventarioConfig,
    dir: Option<&Path>,
    action: ConfigAction,
) -> Result<CmdResult> {
    match action {
        ConfigAction::ShowAll => Ok(CmdResult::default().with_config(config.clone())),
        ConfigAction::ShowKey(key) => {
            let value = config.get(&key)?;
            Ok(CmdResult::default().with_message(CmdMessage::info(value)))
        }
        ConfigAction::Set(key, value) => {
            let mut updated = config.clone();
            updated.set(&key, &value)?;
            if let Some(dir) = dir {
                updated.save(dir)?;
            }
            *config = updated;

            let shown = config.get(&key)?;
            Ok(CmdResult::default()
                .with_config(config.clone())
                .with_message(CmdMessage::success(format!("{} set to {}", key, shown))))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::paginate::Orientation;
    use tempfile::TempDir;

    #[test]
    fn set_persists_and_updates() {
        let dir = TempDir::new().unwrap();
        let mut config = InventarioConfig::default();
        let result = run(
            &mut config,
            Some(dir.path()),
            ConfigAction::Set("orientation".into(), "landscape".into()),
        )
        .unwrap();

        assert_eq!(config.orientation, Orientation::Landscape);
        assert_eq!(result.messages[0].content, "orientation set to landscape");
        let reloaded = InventarioConfig::load(dir.path()).unwrap();
        assert_eq!(reloaded.orientation, Orientation::Landscape);
    }

    #[test]
    fn invalid_value_changes_nothing() {
        let mut config = InventarioConfig::default();
        let err = run(
            &mut config,
            None,
            ConfigAction::Set("raster-width".into(), "wide".into()),
        )
        .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(config, InventarioConfig::default());
    }

    #[test]
    fn show_key() {
        let mut config = InventarioConfig::default();
        let result = run(&mut config, None, ConfigAction::ShowKey("page-format".into())).unwrap();
        assert_eq!(result.messages[0].content, "a4");
        assert!(run(&mut config, None, ConfigAction::ShowKey("nope".into())).is_err());
    }
}
