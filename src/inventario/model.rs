//! # Data Model
//!
//! The whole application state is one owned aggregate:
//!
//! ```text
//! AppState
//! ├── inventories: InventoryId → Inventory
//! │                               ├── name
//! │                               └── sections: SectionId → Section
//! │                                                          ├── name
//! │                                                          └── items: [Item]
//! └── current: Option<InventoryId>
//! ```
//!
//! Inventories and sections live in insertion-ordered maps, items in a plain `Vec`,
//! so listing order is always creation order and deletions never reorder anything.
//!
//! The serialized form keeps the field names of the original storage slot
//! (`inventarios`, `secciones`, `articulos`, ...), so existing data loads as is.

use crate::id::{InventoryId, ItemId, SectionId};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    #[serde(rename = "inventarios", default)]
    pub inventories: IndexMap<InventoryId, Inventory>,
    #[serde(rename = "inventarioActual", default)]
    pub current: Option<InventoryId>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears `current` when it points at an inventory that does not exist.
    /// Returns true if anything changed.
    pub fn normalize(&mut self) -> bool {
        match &self.current {
            Some(id) if !self.inventories.contains_key(id) => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    pub fn current_inventory(&self) -> Option<(&InventoryId, &Inventory)> {
        let id = self.current.as_ref()?;
        self.inventories.get_key_value(id)
    }

    pub fn current_inventory_mut(&mut self) -> Option<&mut Inventory> {
        let id = self.current.as_ref()?;
        self.inventories.get_mut(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "secciones", default)]
    pub sections: IndexMap<SectionId, Section>,
}

impl Inventory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sections: IndexMap::new(),
        }
    }

    pub fn item_count(&self) -> usize {
        self.sections.values().map(|s| s.items.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "articulos", default)]
    pub items: Vec<Item>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "cantidad")]
    pub quantity: u32,
    #[serde(rename = "estado", default)]
    pub condition: Condition,
    // Stored as "" when absent, like the original slot format.
    #[serde(
        rename = "descripcion",
        default,
        serialize_with = "empty_when_none",
        deserialize_with = "none_when_empty"
    )]
    pub description: Option<String>,
    /// A `data:<mime>;base64,...` URI.
    #[serde(rename = "imagen", default)]
    pub image: Option<String>,
}

fn empty_when_none<S: Serializer>(
    value: &Option<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(value.as_deref().unwrap_or(""))
}

fn none_when_empty<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

/// Physical state of a catalogued item.
///
/// Reads accept any letter case, writes always use the capitalized name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Condition {
    #[default]
    Nuevo,
    Bueno,
    Regular,
    Malo,
}

impl Condition {
    pub const ALL: [Condition; 4] = [
        Condition::Nuevo,
        Condition::Bueno,
        Condition::Regular,
        Condition::Malo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Nuevo => "Nuevo",
            Condition::Bueno => "Bueno",
            Condition::Regular => "Regular",
            Condition::Malo => "Malo",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Condition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Condition::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                let names: Vec<&str> = Condition::ALL.iter().map(|c| c.as_str()).collect();
                format!("Unknown condition '{}' (expected one of: {})", s, names.join(", "))
            })
    }
}

impl<'de> Deserialize<'de> for Condition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_state() -> AppState {
        let mut section = Section::new("Dormitorio 1");
        section.items.push(Item {
            id: ItemId::from("it1"),
            name: "Cama".into(),
            quantity: 1,
            condition: Condition::Bueno,
            description: Some("Cama de madera".into()),
            image: None,
        });
        let mut inventory = Inventory::new("Enero 2025");
        inventory.sections.insert(SectionId::from("s1"), section);

        let mut state = AppState::new();
        state.inventories.insert(InventoryId::from("inv1"), inventory);
        state.current = Some(InventoryId::from("inv1"));
        state
    }

    #[test]
    fn serializes_with_slot_field_names() {
        let json = serde_json::to_value(sample_state()).unwrap();
        let item = &json["inventarios"]["inv1"]["secciones"]["s1"]["articulos"][0];
        assert_eq!(json["inventarioActual"], "inv1");
        assert_eq!(json["inventarios"]["inv1"]["nombre"], "Enero 2025");
        assert_eq!(item["nombre"], "Cama");
        assert_eq!(item["cantidad"], 1);
        assert_eq!(item["estado"], "Bueno");
        assert_eq!(item["imagen"], serde_json::Value::Null);
    }

    #[test]
    fn missing_description_is_written_as_empty_string() {
        let mut state = sample_state();
        state.current_inventory_mut().unwrap().sections[0].items[0].description = None;
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(
            json["inventarios"]["inv1"]["secciones"]["s1"]["articulos"][0]["descripcion"],
            ""
        );

        let back: AppState = serde_json::from_value(json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn reads_slot_written_by_older_versions() {
        let raw = r#"{
            "inventarios": {
                "a": { "nombre": "Casa", "secciones": {
                    "z": { "nombre": "Cocina", "articulos": [] },
                    "b": { "nombre": "Baño", "articulos": [
                        { "id": "x", "nombre": "Espejo", "cantidad": 2, "estado": "Regular",
                          "descripcion": null, "imagen": null }
                    ] }
                } }
            },
            "inventarioActual": null
        }"#;
        let state: AppState = serde_json::from_str(raw).unwrap();
        let inv = &state.inventories[0];
        let names: Vec<&str> = inv.sections.values().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Cocina", "Baño"]);
        assert_eq!(inv.sections[1].items[0].description, None);
        assert!(state.current.is_none());
    }

    #[test]
    fn normalize_clears_dangling_current() {
        let mut state = sample_state();
        assert!(!state.normalize());

        state.current = Some(InventoryId::from("gone"));
        assert!(state.normalize());
        assert!(state.current.is_none());
    }

    #[test]
    fn condition_parses_case_insensitively() {
        assert_eq!("bueno".parse::<Condition>().unwrap(), Condition::Bueno);
        assert_eq!(" MALO ".parse::<Condition>().unwrap(), Condition::Malo);
        assert!("roto".parse::<Condition>().is_err());
    }

    #[test]
    fn condition_reads_any_case_and_writes_canonical() {
        let parsed: Vec<Condition> =
            serde_json::from_str(r#"["bueno", "MALO", "Regular"]"#).unwrap();
        assert_eq!(parsed, vec![Condition::Bueno, Condition::Malo, Condition::Regular]);
        assert_eq!(serde_json::to_string(&Condition::Bueno).unwrap(), r#""Bueno""#);
        assert!(serde_json::from_str::<Condition>(r#""roto""#).is_err());
    }
}
