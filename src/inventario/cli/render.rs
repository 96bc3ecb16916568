//! # Rendering
//!
//! Turns `CmdResult` data into terminal text through the templates in
//! [`super::templates`]. Widths and truncation are computed here with
//! `unicode-width`; templates only pick styles.
//!
//! Every `render_*` function returns a `String` so output can be tested without a
//! terminal. The [`Output`] value decides once whether styles become ANSI codes.

use super::styles::{self, names};
use super::templates::{ITEMS_TEMPLATE, LISTING_TEMPLATE, MESSAGES_TEMPLATE, TEXT_LIST_TEMPLATE};
use inventario::commands::{CmdMessage, Listed, MessageLevel, ProjectedItem};
use inventario::model::Condition;
use minijinja::{Environment, Value};
use serde::Serialize;
use std::fmt::Display;
use unicode_width::UnicodeWidthStr;

pub const NAME_WIDTH: usize = 32;
pub const SECTION_WIDTH: usize = 18;
const CURRENT_MARKER: &str = "*";

#[derive(Serialize)]
struct ListingEntry {
    marker: String,
    name: String,
    name_style: String,
    padding: String,
    detail: String,
    id: String,
}

#[derive(Serialize)]
struct ListingData {
    title: String,
    entries: Vec<ListingEntry>,
    empty: bool,
    empty_message: String,
}

#[derive(Serialize)]
struct ItemRow {
    section: String,
    section_padding: String,
    name: String,
    name_padding: String,
    quantity: String,
    condition: String,
    condition_style: String,
    condition_padding: String,
    id: String,
    has_photo: bool,
    description: String,
    indent: String,
}

#[derive(Serialize)]
struct ItemsData {
    title: String,
    rows: Vec<ItemRow>,
    empty: bool,
    empty_message: String,
}

#[derive(Serialize)]
struct TextListData {
    lines: Vec<String>,
    empty_message: String,
}

#[derive(Serialize)]
struct MessageData {
    content: String,
    style: String,
}

#[derive(Serialize)]
struct MessagesData {
    messages: Vec<MessageData>,
}

/// Template environment with the `style` filter bound to one color decision.
pub struct Output {
    env: Environment<'static>,
}

impl Output {
    pub fn new(use_color: bool) -> Self {
        let mut env = Environment::new();
        env.add_filter("style", move |value: Value, name: String| -> String {
            styles::apply(&name, &value.to_string(), use_color)
        });
        for (name, source) in [
            ("listing.tmp", LISTING_TEMPLATE),
            ("items.tmp", ITEMS_TEMPLATE),
            ("text_list.tmp", TEXT_LIST_TEMPLATE),
            ("messages.tmp", MESSAGES_TEMPLATE),
        ] {
            if let Err(e) = env.add_template(name, source) {
                tracing::error!(template = name, error = %e, "invalid template");
            }
        }
        Self { env }
    }

    fn render<T: Serialize>(&self, name: &str, data: &T) -> Option<String> {
        let template = self.env.get_template(name).ok()?;
        match template.render(data) {
            Ok(output) => Some(output),
            Err(e) => {
                tracing::error!(template = name, error = %e, "render failed");
                None
            }
        }
    }

    /// Inventories or sections, one per line, the current one marked.
    pub fn render_listing<Id: Display>(
        &self,
        title: &str,
        entries: &[Listed<Id>],
        child_label: (&str, &str),
        empty_message: &str,
    ) -> String {
        let data = ListingData {
            title: title.to_string(),
            entries: entries
                .iter()
                .map(|entry| {
                    let name = truncate_to_width(&entry.name, NAME_WIDTH);
                    let label = if entry.children == 1 {
                        child_label.0
                    } else {
                        child_label.1
                    };
                    ListingEntry {
                        marker: (if entry.is_current { CURRENT_MARKER } else { " " }).to_string(),
                        padding: padding_for(&name, NAME_WIDTH),
                        name,
                        name_style: (if entry.is_current {
                            names::CURRENT
                        } else {
                            names::INFO
                        })
                        .to_string(),
                        detail: format!("{} {}", entry.children, label),
                        id: entry.id.to_string(),
                    }
                })
                .collect(),
            empty: entries.is_empty(),
            empty_message: empty_message.to_string(),
        };

        self.render("listing.tmp", &data)
            .unwrap_or_else(|| plain_listing(entries, empty_message))
    }

    pub fn render_items(&self, title: &str, items: &[ProjectedItem]) -> String {
        let quantity_width = items
            .iter()
            .map(|p| p.item.quantity.to_string().len())
            .max()
            .unwrap_or(1);
        let condition_width = Condition::ALL
            .iter()
            .map(|c| c.as_str().len())
            .max()
            .unwrap_or(0);
        let indent = " ".repeat(SECTION_WIDTH + 2);

        let rows = items
            .iter()
            .map(|p| {
                let section = truncate_to_width(&p.section_name, SECTION_WIDTH);
                let name = truncate_to_width(&p.item.name, NAME_WIDTH);
                let condition = p.item.condition.as_str().to_string();
                ItemRow {
                    section_padding: padding_for(&section, SECTION_WIDTH),
                    section,
                    name_padding: padding_for(&name, NAME_WIDTH),
                    name,
                    quantity: format!("x{:<width$}", p.item.quantity, width = quantity_width),
                    condition_style: condition_style(p.item.condition).to_string(),
                    condition_padding: padding_for(&condition, condition_width),
                    condition,
                    id: p.item.id.to_string(),
                    has_photo: p.item.image.is_some(),
                    description: p.item.description.clone().unwrap_or_default(),
                    indent: indent.clone(),
                }
            })
            .collect();

        let data = ItemsData {
            title: title.to_string(),
            rows,
            empty: items.is_empty(),
            empty_message: "No items.".to_string(),
        };
        self.render("items.tmp", &data).unwrap_or_else(|| {
            items
                .iter()
                .map(|p| format!("{}\t{}\t{}\n", p.section_name, p.item.name, p.item.quantity))
                .collect()
        })
    }

    pub fn render_text_list(&self, lines: &[String], empty_message: &str) -> String {
        let data = TextListData {
            lines: lines.to_vec(),
            empty_message: empty_message.to_string(),
        };
        self.render("text_list.tmp", &data)
            .unwrap_or_else(|| lines.iter().map(|l| format!("{}\n", l)).collect())
    }

    pub fn render_messages(&self, messages: &[CmdMessage]) -> String {
        if messages.is_empty() {
            return String::new();
        }

        let data = MessagesData {
            messages: messages
                .iter()
                .map(|msg| MessageData {
                    content: msg.content.clone(),
                    style: message_style(&msg.level).to_string(),
                })
                .collect(),
        };

        self.render("messages.tmp", &data).unwrap_or_else(|| {
            messages
                .iter()
                .map(|m| format!("{}\n", m.content))
                .collect()
        })
    }

    /// Prints command messages to stdout.
    pub fn print_messages(&self, messages: &[CmdMessage]) {
        let output = self.render_messages(messages);
        if !output.is_empty() {
            print!("{}", output);
        }
    }
}

fn message_style(level: &MessageLevel) -> &'static str {
    match level {
        MessageLevel::Info => names::INFO,
        MessageLevel::Success => names::SUCCESS,
        MessageLevel::Warning => names::WARNING,
    }
}

fn condition_style(condition: Condition) -> &'static str {
    match condition {
        Condition::Nuevo => names::CONDITION_NEW,
        Condition::Bueno => names::CONDITION_GOOD,
        Condition::Regular => names::CONDITION_FAIR,
        Condition::Malo => names::CONDITION_POOR,
    }
}

fn plain_listing<Id: Display>(entries: &[Listed<Id>], empty_message: &str) -> String {
    if entries.is_empty() {
        return format!("{}\n", empty_message);
    }
    entries
        .iter()
        .map(|e| format!("{}\t{}\n", e.name, e.id))
        .collect()
}

fn padding_for(text: &str, width: usize) -> String {
    " ".repeat(width.saturating_sub(text.width()))
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthChar;

    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    let limit = max_width.saturating_sub(1);

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > limit {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}
