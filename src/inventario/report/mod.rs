//! # Report Generation
//!
//! Exports one inventory as a paginated, image-based PDF:
//!
//! 1. [`region`] builds the visual region (title, date, item table, photo gallery)
//!    and writes it to a temporary HTML file.
//! 2. A [`Rasterizer`] turns that file into one bitmap. The temporary file is
//!    dropped right after, whether rasterizing worked or not.
//! 3. [`assemble`] scales the bitmap to the page width and, when it is taller than
//!    the printable height, slices it into bands, one page each ([`paginate`]).
//! 4. The [`DocumentAssembler`] saves the document as `Inventario_<name>.pdf`.
//!
//! Rasterizer and assembler are traits so the pagination step can be tested
//! without external programs.

pub mod paginate;
pub mod pdf;
pub mod raster;
pub mod region;

use crate::config::InventarioConfig;
use crate::error::Result;
use crate::model::Inventory;
use chrono::{DateTime, Local};
use image::{imageops, RgbImage};
use paginate::{plan_bands, PageLayout};
use pdf::{DocumentAssembler, ImageEncoding};
use raster::Rasterizer;
use region::ReportRegion;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub layout: PageLayout,
    pub encoding: ImageEncoding,
    pub out_dir: PathBuf,
    pub generated_at: DateTime<Local>,
}

impl ReportOptions {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            layout: PageLayout::default(),
            encoding: ImageEncoding::default(),
            out_dir: out_dir.into(),
            generated_at: Local::now(),
        }
    }

    pub fn from_config(config: &InventarioConfig, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            layout: config.page_layout(),
            encoding: config.band_encoding,
            ..Self::new(out_dir)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub path: PathBuf,
    pub pages: usize,
}

/// `Inventario_<name>.pdf`, with whitespace runs and path separators replaced by `_`.
pub fn report_file_name(inventory_name: &str) -> String {
    let mut sanitized = String::with_capacity(inventory_name.len());
    let mut in_gap = false;
    for c in inventory_name.chars() {
        if c.is_whitespace() || c == '/' || c == '\\' {
            if !in_gap {
                sanitized.push('_');
            }
            in_gap = true;
        } else {
            sanitized.push(c);
            in_gap = false;
        }
    }
    format!("Inventario_{}.pdf", sanitized)
}

/// Lays `bitmap` out over as many pages as it needs, at page width.
///
/// The first band goes on the document's initial page, every later band on a
/// page of its own.
pub fn assemble<D: DocumentAssembler>(
    bitmap: &RgbImage,
    layout: &PageLayout,
    encoding: ImageEncoding,
) -> Result<D> {
    let mut document = D::new_document(layout);
    let bands = plan_bands(bitmap.width(), bitmap.height(), layout);

    for (index, band) in bands.iter().enumerate() {
        if index > 0 {
            document.add_page()?;
        }
        if band.height_px == 0 || bitmap.width() == 0 {
            continue;
        }
        let slice =
            imageops::crop_imm(bitmap, 0, band.top_px, bitmap.width(), band.height_px).to_image();
        document.add_image(&slice, encoding, 0.0, 0.0, band.width_mm, band.height_mm)?;
    }

    tracing::debug!(
        bands = bands.len(),
        width = bitmap.width(),
        height = bitmap.height(),
        "report paginated"
    );
    Ok(document)
}

/// Renders, rasterizes and paginates `inventory`, then saves the PDF into
/// `options.out_dir`.
///
/// On failure no output file is left behind and the temporary region is gone.
pub fn generate_report<R, D>(
    inventory: &Inventory,
    rasterizer: &R,
    options: &ReportOptions,
) -> Result<ReportSummary>
where
    R: Rasterizer + ?Sized,
    D: DocumentAssembler,
{
    let region = ReportRegion::build(inventory, options.generated_at).materialize()?;
    let rendered = rasterizer.render(&region);
    drop(region);
    let bitmap = rendered?;

    let document: D = assemble(&bitmap, &options.layout, options.encoding)?;
    let pages = document.page_count();
    let path = options.out_dir.join(report_file_name(&inventory.name));
    document.save(&path)?;

    tracing::info!(path = %path.display(), pages, "report written");
    Ok(ReportSummary { path, pages })
}
