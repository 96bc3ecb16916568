//! # Pagination
//!
//! The rasterized report is one tall bitmap. It is scaled to the full page width;
//! if the scaled height fits the printable height it goes on a single page,
//! otherwise it is cut into horizontal bands that each fill one page.
//!
//! Band heights are computed in bitmap pixels from the printable height, so a
//! band never exceeds the printable area. Only the last band can be shorter.
//! A bitmap so narrow that a single row at page width would be taller than the
//! printable height is drawn narrower instead, one row per page.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageFormat {
    #[default]
    A4,
    Letter,
    Legal,
}

impl PageFormat {
    /// Portrait width and height in millimetres.
    pub fn size_mm(&self) -> (f32, f32) {
        match self {
            PageFormat::A4 => (210.0, 297.0),
            PageFormat::Letter => (215.9, 279.4),
            PageFormat::Legal => (215.9, 355.6),
        }
    }
}

impl fmt::Display for PageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PageFormat::A4 => "a4",
            PageFormat::Letter => "letter",
            PageFormat::Legal => "legal",
        })
    }
}

impl FromStr for PageFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a4" => Ok(PageFormat::A4),
            "letter" => Ok(PageFormat::Letter),
            "legal" => Ok(PageFormat::Legal),
            other => Err(format!("Unknown page format: {} (a4, letter, legal)", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Orientation::Portrait => "portrait",
            Orientation::Landscape => "landscape",
        })
    }
}

impl FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "portrait" | "p" => Ok(Orientation::Portrait),
            "landscape" | "l" => Ok(Orientation::Landscape),
            other => Err(format!("Unknown orientation: {} (portrait, landscape)", other)),
        }
    }
}

/// Page geometry of the exported document. All lengths are millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    pub format: PageFormat,
    pub orientation: Orientation,
    pub bottom_margin_mm: f32,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            format: PageFormat::A4,
            orientation: Orientation::Portrait,
            bottom_margin_mm: 10.0,
        }
    }
}

impl PageLayout {
    /// Width and height after applying the orientation.
    pub fn page_size_mm(&self) -> (f32, f32) {
        let (w, h) = self.format.size_mm();
        match self.orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }

    pub fn page_width_mm(&self) -> f32 {
        self.page_size_mm().0
    }

    pub fn printable_height_mm(&self) -> f32 {
        (self.page_size_mm().1 - self.bottom_margin_mm).max(1.0)
    }
}

/// One horizontal slice of the bitmap, placed at the top of its own page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    /// First bitmap row of the band.
    pub top_px: u32,
    pub height_px: u32,
    /// Drawn width. The page width unless the bitmap is extremely narrow.
    pub width_mm: f32,
    pub height_mm: f32,
}

/// Splits a `width` x `height` bitmap into page-sized bands.
///
/// Always returns at least one band; a zero-width bitmap gets a single empty band.
pub fn plan_bands(width: u32, height: u32, layout: &PageLayout) -> Vec<Band> {
    if width == 0 || height == 0 {
        return vec![Band {
            top_px: 0,
            height_px: height,
            width_mm: layout.page_width_mm(),
            height_mm: 0.0,
        }];
    }

    let printable = layout.printable_height_mm();
    let mm_per_px = (layout.page_width_mm() / width as f32).min(printable);
    let width_mm = width as f32 * mm_per_px;
    let scaled_height = height as f32 * mm_per_px;

    if scaled_height <= printable {
        return vec![Band {
            top_px: 0,
            height_px: height,
            width_mm,
            height_mm: scaled_height,
        }];
    }

    let band_px = ((printable / mm_per_px).floor() as u32).max(1);
    let mut bands = Vec::new();
    let mut top = 0;
    while top < height {
        let rows = band_px.min(height - top);
        bands.push(Band {
            top_px: top,
            height_px: rows,
            width_mm,
            height_mm: (rows as f32 * mm_per_px).min(printable),
        });
        top += rows;
    }
    bands
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_bitmap_fits_one_page() {
        let layout = PageLayout::default();
        let bands = plan_bands(800, 400, &layout);
        assert_eq!(bands.len(), 1);
        assert_eq!(bands[0].height_px, 400);
        assert!((bands[0].height_mm - 105.0).abs() < 0.01);
    }

    #[test]
    fn tall_bitmap_is_split_into_bounded_bands() {
        let layout = PageLayout::default();
        let bands = plan_bands(800, 5000, &layout);
        assert!(bands.len() > 1);

        let printable = layout.printable_height_mm();
        for band in &bands {
            assert!(band.height_mm <= printable + f32::EPSILON);
        }
        // Full bands fill the page, only the last may be shorter.
        for band in &bands[..bands.len() - 1] {
            assert!(printable - band.height_mm < layout.page_width_mm() / 800.0);
        }

        let covered: u32 = bands.iter().map(|b| b.height_px).sum();
        assert_eq!(covered, 5000);
        for pair in bands.windows(2) {
            assert_eq!(pair[0].top_px + pair[0].height_px, pair[1].top_px);
        }
    }

    #[test]
    fn band_count_matches_page_math() {
        // A4 portrait, 10 mm margin: 287 mm printable at 210 mm wide.
        // 210 px wide means 1 px = 1 mm, so 1000 px need ceil(1000 / 287) pages.
        let bands = plan_bands(210, 1000, &PageLayout::default());
        assert_eq!(bands.len(), 4);
        assert_eq!(bands[0].height_px, 287);
        assert_eq!(bands[3].height_px, 1000 - 3 * 287);
    }

    #[test]
    fn one_pixel_wide_bitmap_stays_within_printable_height() {
        let layout = PageLayout {
            orientation: Orientation::Landscape,
            ..PageLayout::default()
        };
        let printable = layout.printable_height_mm();
        let bands = plan_bands(1, 10, &layout);

        assert_eq!(bands.len(), 10);
        for band in &bands {
            assert_eq!(band.height_px, 1);
            assert!(band.height_mm <= printable);
            assert!(band.width_mm <= layout.page_width_mm());
        }
    }

    #[test]
    fn regular_bands_span_the_page_width() {
        let layout = PageLayout::default();
        for band in plan_bands(800, 5000, &layout) {
            assert!((band.width_mm - layout.page_width_mm()).abs() < 0.01);
        }
    }

    #[test]
    fn landscape_swaps_dimensions() {
        let layout = PageLayout {
            orientation: Orientation::Landscape,
            ..PageLayout::default()
        };
        assert_eq!(layout.page_size_mm(), (297.0, 210.0));
        assert_eq!(layout.printable_height_mm(), 200.0);
    }

    #[test]
    fn empty_bitmap_still_gets_a_page() {
        assert_eq!(plan_bands(0, 0, &PageLayout::default()).len(), 1);
    }

    #[test]
    fn formats_parse() {
        assert_eq!("Letter".parse::<PageFormat>().unwrap(), PageFormat::Letter);
        assert!("a5".parse::<PageFormat>().is_err());
        assert_eq!("landscape".parse::<Orientation>().unwrap(), Orientation::Landscape);
    }
}
