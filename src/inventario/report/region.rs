//! The visual region that gets rasterized: a title, the generation date, one table
//! row per item and a gallery of the items that carry a photo.
//!
//! The region is rendered to HTML through an embedded template and written to a
//! [`TempRegion`], which removes its file when dropped.

use crate::commands::photo::is_data_uri;
use crate::commands::view::{project, SectionFilter};
use crate::error::Result;
use crate::model::Inventory;
use chrono::{DateTime, Local};
use minijinja::Environment;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

const REPORT_TEMPLATE: &str = include_str!("templates/report.html");

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub section: String,
    pub name: String,
    pub quantity: u32,
    pub condition: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleryTile {
    pub image: String,
    pub caption: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportRegion {
    pub title: String,
    pub generated_at: String,
    pub rows: Vec<ReportRow>,
    pub gallery: Vec<GalleryTile>,
}

impl ReportRegion {
    pub fn build(inventory: &Inventory, generated_at: DateTime<Local>) -> Self {
        let projected = project(inventory, &SectionFilter::All);

        let rows = projected
            .iter()
            .map(|p| ReportRow {
                section: p.section_name.clone(),
                name: p.item.name.clone(),
                quantity: p.item.quantity,
                condition: p.item.condition.to_string(),
                description: p.item.description.clone().unwrap_or_default(),
            })
            .collect();

        let gallery = projected
            .iter()
            .filter_map(|p| {
                let image = p.item.image.as_ref().filter(|uri| is_data_uri(uri))?;
                Some(GalleryTile {
                    image: image.clone(),
                    caption: format!("{} ({})", p.item.name, p.section_name),
                })
            })
            .collect();

        Self {
            title: format!("Inventario: {}", inventory.name),
            generated_at: generated_at.format("%d/%m/%Y %H:%M").to_string(),
            rows,
            gallery,
        }
    }

    pub fn render_html(&self) -> Result<String> {
        let mut env = Environment::new();
        // The .html name turns on auto-escaping.
        env.add_template("report.html", REPORT_TEMPLATE)?;
        let html = env.get_template("report.html")?.render(self)?;
        Ok(html)
    }

    /// Renders the region and writes it to a temporary file.
    pub fn materialize(&self) -> Result<TempRegion> {
        TempRegion::write(&self.render_html()?)
    }
}

/// A rendered region on disk. The file is deleted when this value is dropped.
pub struct TempRegion {
    file: NamedTempFile,
    html: String,
}

impl TempRegion {
    pub fn write(html: &str) -> Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("inventario-report-")
            .suffix(".html")
            .tempfile()?;
        file.write_all(html.as_bytes())?;
        file.flush()?;
        tracing::debug!(
            path = %file.path().display(),
            bytes = html.len(),
            "report region written"
        );
        Ok(Self {
            file,
            html: html.to_string(),
        })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn html(&self) -> &str {
        &self.html
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::{ItemId, SectionId};
    use crate::model::{Condition, Item, Section};

    fn item(id: &str, name: &str, image: Option<&str>) -> Item {
        Item {
            id: ItemId::from(id),
            name: name.into(),
            quantity: 2,
            condition: Condition::Regular,
            description: None,
            image: image.map(String::from),
        }
    }

    fn inventory() -> Inventory {
        let mut inv = Inventory::new("Casa");
        let mut kitchen = Section::new("Cocina");
        kitchen.items.push(item("1", "Mesa", None));
        kitchen
            .items
            .push(item("2", "Silla", Some("data:image/png;base64,AAAA")));
        let mut garage = Section::new("Garaje");
        garage.items.push(item("3", "Bici", Some("not-a-uri")));
        inv.sections.insert(SectionId::from("a"), kitchen);
        inv.sections.insert(SectionId::from("b"), garage);
        inv
    }

    #[test]
    fn rows_follow_projection_order() {
        let region = ReportRegion::build(&inventory(), Local::now());
        assert_eq!(region.title, "Inventario: Casa");
        let names: Vec<&str> = region.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Mesa", "Silla", "Bici"]);
        assert_eq!(region.rows[2].section, "Garaje");
        assert_eq!(region.rows[0].condition, "Regular");
    }

    #[test]
    fn gallery_only_has_items_with_photos() {
        let region = ReportRegion::build(&inventory(), Local::now());
        assert_eq!(region.gallery.len(), 1);
        assert_eq!(region.gallery[0].caption, "Silla (Cocina)");
    }

    #[test]
    fn empty_inventory_renders_empty_table() {
        let region = ReportRegion::build(&Inventory::new("Vacío"), Local::now());
        let html = region.render_html().unwrap();
        assert!(html.contains("<table>"));
        assert!(!html.contains("<tr><td>"));
        assert!(!html.contains("class=\"gallery\""));
    }

    #[test]
    fn html_is_escaped() {
        let mut inv = Inventory::new("<b>Casa</b>");
        let mut section = Section::new("S");
        section.items.push(item("1", "<script>x</script>", None));
        inv.sections.insert(SectionId::from("s"), section);

        let html = ReportRegion::build(&inv, Local::now()).render_html().unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<b>Casa</b>"));
    }

    #[test]
    fn temp_region_is_removed_on_drop() {
        let region = TempRegion::write("<p>hola</p>").unwrap();
        let path = region.path().to_path_buf();
        assert!(path.exists());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<p>hola</p>");
        drop(region);
        assert!(!path.exists());
    }
}
