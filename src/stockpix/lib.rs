//! # Stockpix Architecture
//!
//! Stockpix searches Unsplash, Pexels and Pixabay at once and saves the chosen photo into
//! a notes vault together with a block of attribution and print metadata. It is a
//! **UI-agnostic library** with a CLI client on top.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, renders output, runs the browse loop   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Owns settings, adapters and vault for one session        │
//! │  - Returns structured Result types                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Turns outcomes into CmdResult data + messages            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!               ┌──────────────┼───────────────┐
//!               ▼              ▼               ▼
//!         aggregator.rs     save/          browse.rs
//!         (fan-out)      (download,      (paging state,
//!               │         file, block)    no I/O)
//!               ▼              │
//!         providers/ ──► http.rs ◄─┘      store/ (Vault)
//! ```
//!
//! ## No I/O Assumptions in Core
//!
//! From `api.rs` inward, code never prints and never exits. Network access goes through
//! [`http::HttpTransport`] and file access through [`store::Vault`], so every layer can be
//! tested with scripted doubles. Diagnostics go through `tracing`; the binary decides
//! where they end up.
//!
//! ## Module Overview
//!
//! - [`api`]: The facade, entry point for all operations
//! - [`commands`]: One module per operation
//! - [`aggregator`]: Concurrent multi-provider search and single-photo lookup
//! - [`providers`]: Unsplash, Pexels and Pixabay adapters
//! - [`url_detect`]: Recognizes pasted photo URLs
//! - [`browse`]: Per-provider pagination as a message-driven state machine
//! - [`save`]: Download, filename choice, metadata block, note insertion
//! - [`store`]: Vault abstraction and implementations
//! - [`http`]: Transport abstraction over `reqwest`
//! - [`config`]: Settings file
//! - [`model`]: Core data types (`Photo`, `PhotoSource`, `SearchPage`)
//! - [`init`]: Vault discovery and context wiring
//! - [`error`]: Error types

pub mod aggregator;
pub mod api;
pub mod browse;
pub mod commands;
pub mod config;
pub mod error;
pub mod http;
pub mod init;
pub mod model;
pub mod providers;
pub mod save;
pub mod store;
pub mod url_detect;
