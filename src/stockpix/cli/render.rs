//! # Rendering
//!
//! Styled terminal output using the `outstanding` crate. Templates apply the semantic
//! style names from `styles.rs` through its `style` filter, which emits plain text when
//! the terminal does not support color.
//!
//! Layout calculations (width, truncation, padding) stay in Rust because they need
//! Unicode-aware processing. Templates decide what goes where and which style it gets.

use super::styles::{names, STOCKPIX_THEME};
use super::templates::{
    BROWSE_TEMPLATE, MESSAGES_TEMPLATE, SAVED_TEMPLATE, SEARCH_TEMPLATE, SETTINGS_TEMPLATE,
};
use outstanding::{render, render_with_color, ThemeChoice};
use serde::Serialize;
use stockpix::aggregator::AggregateResult;
use stockpix::browse::{BrowseState, ProviderTab};
use stockpix::commands::{CmdMessage, MessageLevel};
use stockpix::config::SearchSettings;
use stockpix::model::{Photo, PhotoSource};
use stockpix::save::SavedPhoto;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const LINE_WIDTH: usize = 100;
const BYLINE_WIDTH: usize = 34;

#[derive(Serialize)]
struct PhotoLine {
    index: String,
    id: String,
    title: String,
    padding: String,
    byline: String,
}

#[derive(Serialize)]
struct TabSection {
    name: String,
    summary: String,
    photos: Vec<PhotoLine>,
}

#[derive(Serialize)]
struct SearchData {
    query: String,
    direct: Option<String>,
    tabs: Vec<TabSection>,
}

#[derive(Serialize)]
struct TabLabel {
    label: String,
    style: &'static str,
}

#[derive(Serialize)]
struct BrowseData {
    tabs: Vec<TabLabel>,
    photos: Vec<PhotoLine>,
    pager: String,
}

#[derive(Serialize)]
struct SettingLine {
    key: String,
    padding: String,
    value: String,
}

#[derive(Serialize)]
struct SettingsData {
    entries: Vec<SettingLine>,
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

#[derive(Serialize)]
struct SavedData {
    path: String,
    block: Option<String>,
}

/// Renders through the shared theme. `None` lets `outstanding` detect color support on
/// stdout; tests pass `Some(..)` to pin it.
fn render_template<T: Serialize>(
    template: &str,
    data: &T,
    use_color: Option<bool>,
) -> Result<String, String> {
    let theme = ThemeChoice::from(&*STOCKPIX_THEME);
    let rendered = match use_color {
        Some(c) => render_with_color(template, data, theme, c),
        None => render(template, data, theme),
    };
    rendered
        .map(|mut output| {
            if !output.is_empty() && !output.ends_with('\n') {
                output.push('\n');
            }
            output
        })
        .map_err(|e| e.to_string())
}

/// Results grouped by provider, `preferred` first, numbered continuously.
pub fn render_search(result: &AggregateResult, preferred: PhotoSource) -> String {
    render_search_internal(result, preferred, None)
}

fn render_search_internal(
    result: &AggregateResult,
    preferred: PhotoSource,
    use_color: Option<bool>,
) -> String {
    let mut next_index = 1;
    let tabs = result
        .tabs(preferred)
        .into_iter()
        .filter_map(|source| result.pages.get(&source))
        .map(|page| {
            let photos = photo_lines(&page.photos, next_index);
            next_index += page.photos.len();
            TabSection {
                name: page.source.display_name().to_string(),
                summary: format!(
                    "({} results, page {}/{})",
                    page.total_results,
                    page.page,
                    page.total_pages.max(1)
                ),
                photos,
            }
        })
        .collect();

    let data = SearchData {
        query: result.query.clone(),
        direct: result.direct.as_ref().map(|r| r.to_string()),
        tabs,
    };
    render_template(SEARCH_TEMPLATE, &data, use_color)
        .unwrap_or_else(|e| format!("Render error: {}\n", e))
}

/// The active tab of a browse session with a tab bar and pager line.
pub fn render_browse(state: &BrowseState) -> String {
    render_browse_internal(state, None)
}

fn render_browse_internal(state: &BrowseState, use_color: Option<bool>) -> String {
    let active = state.active_tab().map(|t| t.source);
    let tabs = state
        .tabs()
        .iter()
        .map(|tab| TabLabel {
            label: format!("{} ({})", tab.source.display_name(), tab.total_results),
            style: if Some(tab.source) == active {
                names::TAB_ACTIVE
            } else {
                names::TAB
            },
        })
        .collect();

    let (photos, pager) = match state.active_tab() {
        Some(tab) => (photo_lines(&tab.photos, 1), pager_line(tab)),
        None => (Vec::new(), "No results.".to_string()),
    };

    let data = BrowseData {
        tabs,
        photos,
        pager,
    };
    render_template(BROWSE_TEMPLATE, &data, use_color)
        .unwrap_or_else(|e| format!("Render error: {}\n", e))
}

fn pager_line(tab: &ProviderTab) -> String {
    let p = &tab.pagination;
    let status = if p.is_loading { "  loading..." } else { "" };
    format!(
        "page {}/{}{}   [n]ext [p]rev [t <provider>] [s <n>] save [q]uit",
        p.current_page,
        p.total_pages.max(1),
        status
    )
}

pub fn render_settings(settings: &SearchSettings) -> String {
    render_settings_internal(settings, None)
}

fn render_settings_internal(settings: &SearchSettings, use_color: Option<bool>) -> String {
    let entries = settings.list_all();
    let key_width = entries.iter().map(|(k, _)| k.width()).max().unwrap_or(0);
    let data = SettingsData {
        entries: entries
            .into_iter()
            .map(|(key, value)| SettingLine {
                padding: " ".repeat(key_width - key.width()),
                key: key.to_string(),
                value,
            })
            .collect(),
    };
    render_template(SETTINGS_TEMPLATE, &data, use_color)
        .unwrap_or_else(|e| format!("Render error: {}\n", e))
}

pub fn render_saved(saved: &SavedPhoto) -> String {
    render_saved_internal(saved, None)
}

fn render_saved_internal(saved: &SavedPhoto, use_color: Option<bool>) -> String {
    let data = SavedData {
        path: saved.path.display().to_string(),
        // The block is echoed only when it did not go into a note.
        block: saved
            .note
            .is_none()
            .then(|| saved.markdown.trim_end().to_string()),
    };
    render_template(SAVED_TEMPLATE, &data, use_color)
        .unwrap_or_else(|e| format!("Render error: {}\n", e))
}

/// Renders command messages using the template system with themed styles.
pub fn render_messages(messages: &[CmdMessage]) -> String {
    render_messages_internal(messages, None)
}

fn render_messages_internal(messages: &[CmdMessage], use_color: Option<bool>) -> String {
    if messages.is_empty() {
        return String::new();
    }

    let data = MessagesData {
        messages: messages
            .iter()
            .map(|msg| MessageData {
                content: msg.content.clone(),
                style: match msg.level {
                    MessageLevel::Info => names::INFO,
                    MessageLevel::Success => names::SUCCESS,
                    MessageLevel::Warning => names::WARNING,
                    MessageLevel::Error => names::ERROR,
                }
                .to_string(),
            })
            .collect(),
    };

    render_template(MESSAGES_TEMPLATE, &data, use_color).unwrap_or_else(|_| {
        messages
            .iter()
            .map(|m| format!("{}\n", m.content))
            .collect()
    })
}

/// Prints command messages; errors and warnings go to stderr.
pub fn print_messages(messages: &[CmdMessage]) {
    let (problems, others): (Vec<CmdMessage>, Vec<CmdMessage>) = messages
        .iter()
        .cloned()
        .partition(|m| matches!(m.level, MessageLevel::Error | MessageLevel::Warning));
    print!("{}", render_messages(&others));
    eprint!("{}", render_messages(&problems));
}

fn photo_lines(photos: &[Photo], first_index: usize) -> Vec<PhotoLine> {
    photos
        .iter()
        .enumerate()
        .map(|(i, photo)| {
            let index = format!("{:>3}.", first_index + i);
            let byline = truncate_to_width(
                &format!("{}  {}×{}", photo.photographer, photo.width, photo.height),
                BYLINE_WIDTH,
            );
            let fixed = index.width() + 1 + photo.id.width() + 2 + 2 + byline.width();
            let available = LINE_WIDTH.saturating_sub(fixed);
            let title = truncate_to_width(&photo.title(), available);
            let padding = " ".repeat(available.saturating_sub(title.width()) + 2);
            PhotoLine {
                index,
                id: photo.id.clone(),
                title,
                padding,
                byline,
            }
        })
        .collect()
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
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
