//! # CLI
//!
//! **One possible UI client** for stockpix. The CLI is the only place that knows about
//! terminal I/O, exit codes and output formatting.
//!
//! ## Commands
//!
//! - `search <query…>`: one-shot aggregated search, grouped by provider with the
//!   configured default provider first. A pasted photo URL fetches just that photo.
//! - `browse <query…>`: the same search in an interactive session. Each provider tab
//!   pages on its own; photos are saved straight from the listing.
//! - `save <url-or-id>`: download one photo, optionally inserting its details block into
//!   a note.
//! - `config`, `init`: settings in `<vault>/.stockpix/settings.json`.
//!
//! Errors and warnings go to stderr, rendered output to stdout. Logs (`-v` or
//! `RUST_LOG`) also go to stderr.
//!
//! ## Module Structure
//!
//! - `commands`: Context wiring, dispatch and per-command handlers
//! - `browse`: The interactive browse loop
//! - `render`: Output formatting through templates
//! - `setup`: Argument parsing via clap
//! - `styles`: Terminal styling
//! - `templates`: Output templates

mod browse;
mod commands;
mod render;
pub mod setup;
mod styles;
mod templates;

pub use commands::run;
