use crate::error::{InventarioError, Result};
use crate::report::paginate::{Orientation, PageFormat, PageLayout};
use crate::report::pdf::ImageEncoding;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_BOTTOM_MARGIN_MM: f32 = 10.0;
const DEFAULT_RASTERIZER: &str = "wkhtmltoimage";
const DEFAULT_RASTER_WIDTH: u32 = 800;
const DEFAULT_QUOTA_BYTES: u64 = 5 * 1024 * 1024;

/// Keys accepted by `config <key> [value]`.
pub const CONFIG_KEYS: &[&str] = &[
    "page-format",
    "orientation",
    "bottom-margin",
    "band-encoding",
    "rasterizer",
    "raster-width",
    "storage-quota",
];

/// Configuration for inventario, stored in `config.json` next to the data slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventarioConfig {
    #[serde(default)]
    pub page_format: PageFormat,

    #[serde(default)]
    pub orientation: Orientation,

    /// Space left free at the bottom of every report page, in millimetres.
    #[serde(default = "default_bottom_margin")]
    pub bottom_margin_mm: f32,

    #[serde(default)]
    pub band_encoding: ImageEncoding,

    /// Program that turns the report HTML into a PNG.
    #[serde(default = "default_rasterizer")]
    pub rasterizer_program: String,

    /// Viewport width in pixels handed to the rasterizer.
    #[serde(default = "default_raster_width")]
    pub rasterizer_width: u32,

    /// Upper bound for the serialized state; 0 disables the check.
    #[serde(default = "default_quota")]
    pub storage_quota_bytes: u64,
}

fn default_bottom_margin() -> f32 {
    DEFAULT_BOTTOM_MARGIN_MM
}

fn default_rasterizer() -> String {
    DEFAULT_RASTERIZER.to_string()
}

fn default_raster_width() -> u32 {
    DEFAULT_RASTER_WIDTH
}

fn default_quota() -> u64 {
    DEFAULT_QUOTA_BYTES
}

impl Default for InventarioConfig {
    fn default() -> Self {
        Self {
            page_format: PageFormat::default(),
            orientation: Orientation::default(),
            bottom_margin_mm: DEFAULT_BOTTOM_MARGIN_MM,
            band_encoding: ImageEncoding::default(),
            rasterizer_program: DEFAULT_RASTERIZER.to_string(),
            rasterizer_width: DEFAULT_RASTER_WIDTH,
            storage_quota_bytes: DEFAULT_QUOTA_BYTES,
        }
    }
}

impl InventarioConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(InventarioError::Io)?;
        let config: InventarioConfig =
            serde_json::from_str(&content).map_err(InventarioError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(InventarioError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(InventarioError::Serialization)?;
        fs::write(config_path, content).map_err(InventarioError::Io)?;
        Ok(())
    }

    pub fn page_layout(&self) -> PageLayout {
        PageLayout {
            format: self.page_format,
            orientation: self.orientation,
            bottom_margin_mm: self.bottom_margin_mm,
        }
    }

    pub fn quota(&self) -> Option<u64> {
        (self.storage_quota_bytes > 0).then_some(self.storage_quota_bytes)
    }

    pub fn get(&self, key: &str) -> Result<String> {
        let value = match key {
            "page-format" => self.page_format.to_string(),
            "orientation" => self.orientation.to_string(),
            "bottom-margin" => self.bottom_margin_mm.to_string(),
            "band-encoding" => self.band_encoding.to_string(),
            "rasterizer" => self.rasterizer_program.clone(),
            "raster-width" => self.rasterizer_width.to_string(),
            "storage-quota" => self.storage_quota_bytes.to_string(),
            other => return Err(unknown_key(other)),
        };
        Ok(value)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "page-format" => {
                self.page_format = value.parse().map_err(InventarioError::Validation)?
            }
            "orientation" => {
                self.orientation = value.parse().map_err(InventarioError::Validation)?
            }
            "bottom-margin" => {
                let margin: f32 = parse_number(key, value)?;
                if !(0.0..100.0).contains(&margin) {
                    return Err(InventarioError::validation(
                        "bottom-margin must be between 0 and 100 mm",
                    ));
                }
                self.bottom_margin_mm = margin;
            }
            "band-encoding" => {
                self.band_encoding = value.parse().map_err(InventarioError::Validation)?
            }
            "rasterizer" => {
                if value.is_empty() {
                    return Err(InventarioError::validation("rasterizer cannot be empty"));
                }
                self.rasterizer_program = value.to_string();
            }
            "raster-width" => {
                let width: u32 = parse_number(key, value)?;
                if width == 0 {
                    return Err(InventarioError::validation("raster-width must be positive"));
                }
                self.rasterizer_width = width;
            }
            "storage-quota" => self.storage_quota_bytes = parse_number(key, value)?,
            other => return Err(unknown_key(other)),
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| InventarioError::Validation(format!("Invalid value for {}: {}", key, value)))
}

fn unknown_key(key: &str) -> InventarioError {
    InventarioError::Validation(format!(
        "Unknown config key: {} (known keys: {})",
        key,
        CONFIG_KEYS.join(", ")
    ))
}
