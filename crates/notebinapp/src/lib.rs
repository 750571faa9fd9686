//! # Notebin Architecture
//!
//! Notebin is a **UI-agnostic knowledge-base core**: pages, folders and page
//! blocks, scoped to the signed-in owner, with a transactional trash. The `notebin`
//! binary is one client of this library; a web backend would be another.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Ownership guard, input parsing, dispatch                 │
//! │  - Uniform ActionResult shaping + failure logging           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs, hierarchy.rs)                │
//! │  - Trash lifecycle, moves, folder views, search             │
//! │  - Each multi-row transition runs in one unit of work       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - StorageBackend trait                                     │
//! │  - SqliteBackend (production), MemBackend (testing)         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! Nothing in this crate writes to stdout or exits the process. Diagnostics go
//! through `tracing`; the client decides whether and where to print them.
//!
//! ## Module Overview
//!
//! - [`api`]: The facade all clients call
//! - [`auth`]: Session lookup and the owner guard
//! - [`commands`]: Business logic, one module per operation family
//! - [`config`]: Layered configuration (env, TOML file, defaults)
//! - [`error`]: The crate error type
//! - [`hierarchy`]: Forest building from flat entry lists
//! - [`model`]: Entries, blocks, owners, patches
//! - [`store`]: Storage trait and backends

pub mod api;
pub mod auth;
pub mod commands;
pub mod config;
pub mod error;
pub mod hierarchy;
pub mod model;
pub mod store;
