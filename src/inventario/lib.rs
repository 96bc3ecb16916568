//! # Inventario Architecture
//!
//! Inventario catalogues physical belongings: named **inventories**, each split into
//! **sections**, each section holding **items** with a quantity, a condition, an
//! optional description and an optional photo. It can export an inventory as a
//! paginated, image-based PDF report.
//!
//! It is a library that happens to have a CLI client, not the other way round.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, renders output, owns exit codes        │
//! │  - Installs the tracing subscriber                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Resolves names to ids, dispatches to commands            │
//! │  - Saves the whole state after every mutation               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)    Report (report/)          │
//! │  - Pure operations on AppState    - region → bitmap → PDF   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - StateStore trait: one slot, read once, rewritten fully   │
//! │  - FileStore (production), InMemoryStore (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! From `api.rs` inward nothing writes to stdout or stderr and nothing exits the
//! process. Diagnostics go through `tracing`; whoever embeds the library decides
//! where they end up.
//!
//! ## Testing Strategy
//!
//! 1. **Commands**: unit tests against plain `AppState` values and the
//!    `StateFixture` builder.
//! 2. **API**: dispatch and persistence, driven by `InMemoryStore`.
//! 3. **Report**: pagination with fake rasterizer and assembler implementations.
//! 4. **CLI**: end-to-end runs of the binary in `tests/`.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each operation
//! - [`report`]: Report rendering, pagination and PDF assembly
//! - [`store`]: Storage abstraction and implementations
//! - [`model`]: Core data types (`AppState`, `Inventory`, `Section`, `Item`)
//! - [`id`]: Identifier generation
//! - [`config`]: Configuration management
//! - [`init`]: Data directory discovery and context setup
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod id;
pub mod init;
pub mod model;
pub mod report;
pub mod store;
