//! # CLI Templates
//!
//! Terminal output is rendered from minijinja templates kept in `templates/` and
//! embedded here at compile time.
//!
//! Templates do not rely on trailing newlines: every line break is written
//! explicitly inside the template, so loops and conditionals stay predictable.
//! Layout math (widths, truncation) happens in Rust; templates only choose styles
//! through the `style` filter.

pub const LISTING_TEMPLATE: &str = include_str!("templates/listing.tmp");
pub const ITEMS_TEMPLATE: &str = include_str!("templates/items.tmp");
pub const TEXT_LIST_TEMPLATE: &str = include_str!("templates/text_list.tmp");
pub const MESSAGES_TEMPLATE: &str = include_str!("templates/messages.tmp");
