//! Output templates, embedded at compile time.
//!
//! Templates are rendered by `outstanding` with minijinja's default whitespace handling,
//! so every newline in a template is output. Block tags therefore share lines with
//! content. Layout math (widths, truncation, padding) is done in `render.rs`; templates
//! only place values and pick styles.

pub const SEARCH_TEMPLATE: &str = include_str!("templates/search.jinja");
pub const BROWSE_TEMPLATE: &str = include_str!("templates/browse.jinja");
pub const SETTINGS_TEMPLATE: &str = include_str!("templates/settings.jinja");
pub const MESSAGES_TEMPLATE: &str = include_str!("templates/messages.jinja");
pub const SAVED_TEMPLATE: &str = include_str!("templates/saved.jinja");
