//! Named terminal styles for the CLI.
//!
//! Templates only ever refer to the semantic names in [`names`]; the colours behind
//! them are defined once in [`INVENTARIO_STYLES`]. A name missing from the table is
//! rendered with a `(!?)` prefix so template typos show up immediately.

use console::Style;
use once_cell::sync::Lazy;
use std::collections::HashMap;

pub mod names {
    pub const INFO: &str = "info";
    pub const SUCCESS: &str = "success";
    pub const WARNING: &str = "warning";
    pub const TITLE: &str = "title";
    pub const MUTED: &str = "muted";
    pub const CURRENT: &str = "current";
    pub const SECTION: &str = "section";
    pub const QUANTITY: &str = "quantity";
    pub const CONDITION_NEW: &str = "condition_new";
    pub const CONDITION_GOOD: &str = "condition_good";
    pub const CONDITION_FAIR: &str = "condition_fair";
    pub const CONDITION_POOR: &str = "condition_poor";
}

pub const MISSING_STYLE_INDICATOR: &str = "(!?)";

pub static INVENTARIO_STYLES: Lazy<HashMap<&'static str, Style>> = Lazy::new(|| {
    HashMap::from([
        (names::INFO, Style::new()),
        (names::SUCCESS, Style::new().green()),
        (names::WARNING, Style::new().yellow()),
        (names::TITLE, Style::new().bold()),
        (names::MUTED, Style::new().color256(246)),
        (names::CURRENT, Style::new().yellow().bold()),
        (names::SECTION, Style::new().cyan()),
        (names::QUANTITY, Style::new().bold()),
        (names::CONDITION_NEW, Style::new().green().bold()),
        (names::CONDITION_GOOD, Style::new().green()),
        (names::CONDITION_FAIR, Style::new().yellow()),
        (names::CONDITION_POOR, Style::new().red()),
    ])
});

/// Applies style `name` to `text`, or returns `text` untouched when color is off.
pub fn apply(name: &str, text: &str, use_color: bool) -> String {
    match INVENTARIO_STYLES.get(name) {
        Some(style) if use_color => style
            .apply_to(text)
            .force_styling(true)
            .to_string(),
        Some(_) => text.to_string(),
        None => format!("{} {}", MISSING_STYLE_INDICATOR, text),
    }
}
