use crate::config::InventarioConfig;
use crate::error::{InventarioError, Result};
use crate::report::region::TempRegion;
use image::RgbImage;
use std::process::Command;

/// Turns a rendered region into a single bitmap.
pub trait Rasterizer {
    fn render(&self, region: &TempRegion) -> Result<RgbImage>;
}

/// Runs an external HTML-to-image program (`wkhtmltoimage` compatible flags).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRasterizer {
    program: String,
    width: u32,
}

impl CommandRasterizer {
    pub fn new(program: impl Into<String>, width: u32) -> Self {
        Self {
            program: program.into(),
            width,
        }
    }

    pub fn from_config(config: &InventarioConfig) -> Self {
        Self::new(&config.rasterizer_program, config.rasterizer_width)
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Rasterizer for CommandRasterizer {
    fn render(&self, region: &TempRegion) -> Result<RgbImage> {
        let target = tempfile::Builder::new()
            .prefix("inventario-raster-")
            .suffix(".png")
            .tempfile()?;

        tracing::debug!(program = %self.program, width = self.width, "rasterizing report region");
        let output = Command::new(&self.program)
            .args(["--quiet", "--format", "png", "--enable-local-file-access"])
            .arg("--width")
            .arg(self.width.to_string())
            .arg(region.path())
            .arg(target.path())
            .output()
            .map_err(|e| {
                InventarioError::Rasterize(format!("Failed to launch '{}': {}", self.program, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(InventarioError::Rasterize(format!(
                "'{}' exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        let bitmap = image::open(target.path()).map_err(|e| {
            InventarioError::Rasterize(format!(
                "'{}' produced no usable image: {}",
                self.program, e
            ))
        })?;
        Ok(bitmap.to_rgb8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_program_is_a_rasterize_error() {
        let region = TempRegion::write("<p>x</p>").unwrap();
        let rasterizer = CommandRasterizer::new("inventario-no-such-rasterizer", 800);
        let err = rasterizer.render(&region).unwrap_err();
        assert!(matches!(err, InventarioError::Rasterize(_)));
    }

    #[cfg(unix)]
    #[test]
    fn failing_program_is_a_rasterize_error() {
        let region = TempRegion::write("<p>x</p>").unwrap();
        let err = CommandRasterizer::new("false", 800).render(&region).unwrap_err();
        assert!(err.to_string().contains("exited"));
    }

    #[cfg(unix)]
    #[test]
    fn empty_output_is_a_rasterize_error() {
        let region = TempRegion::write("<p>x</p>").unwrap();
        let err = CommandRasterizer::new("true", 800).render(&region).unwrap_err();
        assert!(matches!(err, InventarioError::Rasterize(_)));
    }

    #[test]
    fn built_from_config() {
        let config = InventarioConfig::default();
        let rasterizer = CommandRasterizer::from_config(&config);
        assert_eq!(rasterizer.program(), "wkhtmltoimage");
    }
}
