//! # CLI Behavior
//!
//! This is **one possible UI client** for inventario, not the application itself.
//! The CLI is the only place that knows about terminal I/O, exit codes, logging
//! setup and output formatting.
//!
//! ## Naked Execution (`inventario`)
//!
//! Running `inventario` with no arguments defaults to `inventario show`: the items
//! of the current inventory, grouped by section.
//!
//! ## Names or Ids
//!
//! Wherever a command takes an inventory or a section, either its id or its name
//! works; names match case-insensitively when unambiguous. Items are always
//! addressed by id, as printed by `show`.
//!
//! ## Data Location
//!
//! State and configuration live in `$INVENTARIO_HOME` when set, otherwise in the
//! platform data directory.
//!
//! ## Module Structure
//!
//! - `commands`: Per-command handlers that call the API and print results
//! - `render`: Output formatting through templates
//! - `setup`: Argument parsing via clap, grouped help
//! - `styles`: Terminal styles
//! - `templates`: Embedded output templates

mod commands;
mod render;
pub mod setup;
mod styles;
mod templates;

pub use commands::run;
