//! Named terminal styles.
//!
//! Templates refer to styles by the names in [`names`]; the actual colors live only here.
//! A name missing from the theme is flagged in the output by `outstanding`.

use console::Style;
use once_cell::sync::Lazy;
use outstanding::{rgb_to_ansi256, Theme};

/// Style identifiers shared between templates and renderers.
pub mod names {
    pub const MUTED: &str = "muted";
    pub const ERROR: &str = "error";
    pub const WARNING: &str = "warning";
    pub const SUCCESS: &str = "success";
    pub const INFO: &str = "info";
    pub const TITLE: &str = "title";
    pub const TAB: &str = "tab";
    pub const TAB_ACTIVE: &str = "tab-active";
    pub const INDEX: &str = "list-index";
    pub const PHOTO_ID: &str = "photo-id";
    pub const KEY: &str = "config-key";
}

pub static STOCKPIX_THEME: Lazy<Theme> = Lazy::new(|| {
    let muted = Style::new().color256(rgb_to_ansi256((140, 140, 140)));
    let accent = Style::new().color256(rgb_to_ansi256((229, 185, 0)));

    Theme::new()
        .add(names::MUTED, muted.clone())
        .add(names::ERROR, Style::new().red().bold())
        .add(names::WARNING, Style::new().yellow().bold())
        .add(names::SUCCESS, Style::new().green())
        .add(names::INFO, muted.clone())
        .add(names::TITLE, Style::new().bold())
        .add(names::TAB, muted)
        .add(names::TAB_ACTIVE, accent.clone().bold().underlined())
        .add(names::INDEX, accent)
        .add(names::PHOTO_ID, Style::new().cyan())
        .add(names::KEY, Style::new().bold())
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_defines_every_name() {
        let styles = STOCKPIX_THEME.styles();
        for name in [
            names::MUTED,
            names::ERROR,
            names::WARNING,
            names::SUCCESS,
            names::INFO,
            names::TITLE,
            names::TAB,
            names::TAB_ACTIVE,
            names::INDEX,
            names::PHOTO_ID,
            names::KEY,
        ] {
            assert!(styles.has(name), "missing style {}", name);
        }
        assert_eq!(styles.len(), 11);
    }
}
