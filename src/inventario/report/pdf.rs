//! # Document Assembly
//!
//! [`DocumentAssembler`] is the narrow page-and-image interface the report generator
//! draws through. [`LopdfAssembler`] implements it with `lopdf`: every placed bitmap
//! becomes an image XObject on the page that was current when it was added.

use crate::error::{InventarioError, Result};
use crate::report::paginate::PageLayout;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;
use uuid::Uuid;

const PT_PER_MM: f32 = 72.0 / 25.4;
const JPEG_QUALITY: u8 = 90;

/// How a bitmap is encoded inside the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageEncoding {
    /// Lossless, deflate-compressed RGB.
    #[default]
    Png,
    Jpeg,
}

impl fmt::Display for ImageEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ImageEncoding::Png => "png",
            ImageEncoding::Jpeg => "jpeg",
        })
    }
}

impl FromStr for ImageEncoding {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(ImageEncoding::Png),
            "jpeg" | "jpg" => Ok(ImageEncoding::Jpeg),
            other => Err(format!("Unknown band encoding: {} (png, jpeg)", other)),
        }
    }
}

/// A paginated, image-based document under construction.
///
/// A new document starts with one empty page. Coordinates are millimetres from
/// the top-left corner of the current page.
pub trait DocumentAssembler: Sized {
    fn new_document(layout: &PageLayout) -> Self;

    /// Closes the current page, then appends a new one and makes it current.
    fn add_page(&mut self) -> Result<()>;

    fn add_image(
        &mut self,
        image: &RgbImage,
        encoding: ImageEncoding,
        x_mm: f32,
        y_mm: f32,
        width_mm: f32,
        height_mm: f32,
    ) -> Result<()>;

    fn page_count(&self) -> usize;

    /// Writes the document to `path`. On failure nothing is left at `path`.
    fn save(self, path: &Path) -> Result<()>;
}

#[derive(Default)]
struct PageBuilder {
    operations: Vec<Operation>,
    xobjects: Dictionary,
}

pub struct LopdfAssembler {
    document: Document,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
    page_size_pt: (f32, f32),
    current: PageBuilder,
    image_count: usize,
}

impl LopdfAssembler {
    fn finish_page(&mut self) -> Result<()> {
        let page = std::mem::take(&mut self.current);
        let content = Content {
            operations: page.operations,
        };

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&content.encode()?)?;
        let compressed = encoder.finish()?;
        let content_id = self
            .document
            .add_object(Stream::new(dictionary! { "Filter" => "FlateDecode" }, compressed));

        let (width, height) = self.page_size_pt;
        let page_id = self.document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
            "Contents" => content_id,
            "Resources" => dictionary! { "XObject" => page.xobjects },
        });
        self.page_ids.push(page_id);
        Ok(())
    }

    fn image_stream(image: &RgbImage, encoding: ImageEncoding) -> Result<Stream> {
        let (filter, data) = match encoding {
            ImageEncoding::Png => {
                let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(image.as_raw())?;
                ("FlateDecode", encoder.finish()?)
            }
            ImageEncoding::Jpeg => {
                let mut data = Vec::new();
                JpegEncoder::new_with_quality(&mut data, JPEG_QUALITY).encode_image(image)?;
                ("DCTDecode", data)
            }
        };

        Ok(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => image.width() as i64,
                "Height" => image.height() as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => filter,
            },
            data,
        ))
    }

    fn write_to(mut self, path: &Path) -> Result<()> {
        self.finish_page()?;

        let kids: Vec<Object> = self.page_ids.iter().map(|id| Object::from(*id)).collect();
        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => self.page_ids.len() as i64,
        };
        self.document
            .objects
            .insert(self.pages_id, Object::Dictionary(pages_dict));
        let catalog_id = self.document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.document.trailer.set("Root", catalog_id);

        let mut writer = BufWriter::new(File::create(path)?);
        self.document.save_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

impl DocumentAssembler for LopdfAssembler {
    fn new_document(layout: &PageLayout) -> Self {
        let mut document = Document::with_version("1.7");
        let pages_id = document.new_object_id();
        let (width, height) = layout.page_size_mm();

        Self {
            document,
            pages_id,
            page_ids: Vec::new(),
            page_size_pt: (width * PT_PER_MM, height * PT_PER_MM),
            current: PageBuilder::default(),
            image_count: 0,
        }
    }

    fn add_page(&mut self) -> Result<()> {
        self.finish_page()
    }

    fn add_image(
        &mut self,
        image: &RgbImage,
        encoding: ImageEncoding,
        x_mm: f32,
        y_mm: f32,
        width_mm: f32,
        height_mm: f32,
    ) -> Result<()> {
        if image.width() == 0 || image.height() == 0 {
            return Ok(());
        }

        let stream = Self::image_stream(image, encoding)?;
        let image_id = self.document.add_object(stream);
        self.image_count += 1;
        let name = format!("Im{}", self.image_count);
        self.current.xobjects.set(name.as_bytes().to_vec(), image_id);

        let page_height = self.page_size_pt.1;
        let width = width_mm * PT_PER_MM;
        let height = height_mm * PT_PER_MM;
        let x = x_mm * PT_PER_MM;
        let y = page_height - (y_mm * PT_PER_MM + height);

        self.current.operations.extend([
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    width.into(),
                    0.into(),
                    0.into(),
                    height.into(),
                    x.into(),
                    y.into(),
                ],
            ),
            Operation::new("Do", vec![Object::Name(name.into_bytes())]),
            Operation::new("Q", vec![]),
        ]);
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.page_ids.len() + 1
    }

    fn save(self, path: &Path) -> Result<()> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| {
                InventarioError::Api(format!("Invalid output path: {}", path.display()))
            })?;
        let tmp = path.with_file_name(format!(".{}.{}.tmp", file_name, Uuid::new_v4()));

        if let Err(e) = self.write_to(&tmp) {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
        fs::rename(&tmp, path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            InventarioError::Io(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn band(height: u32) -> RgbImage {
        RgbImage::from_pixel(40, height, image::Rgb([30, 90, 120]))
    }

    #[test]
    fn starts_with_one_page() {
        let doc = LopdfAssembler::new_document(&PageLayout::default());
        assert_eq!(doc.page_count(), 1);
    }

    #[test]
    fn writes_a_multi_page_pdf() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.pdf");

        let mut doc = LopdfAssembler::new_document(&PageLayout::default());
        doc.add_image(&band(60), ImageEncoding::Png, 0.0, 0.0, 210.0, 287.0).unwrap();
        doc.add_page().unwrap();
        doc.add_image(&band(20), ImageEncoding::Jpeg, 0.0, 0.0, 210.0, 95.0).unwrap();
        assert_eq!(doc.page_count(), 2);
        doc.save(&path).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["out.pdf".to_string()]);
    }

    #[test]
    fn failed_save_leaves_nothing_behind() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing-dir").join("out.pdf");

        let doc = LopdfAssembler::new_document(&PageLayout::default());
        assert!(doc.save(&path).is_err());
        assert!(!path.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn encoding_parses() {
        assert_eq!("JPG".parse::<ImageEncoding>().unwrap(), ImageEncoding::Jpeg);
        assert!("tiff".parse::<ImageEncoding>().is_err());
    }
}
