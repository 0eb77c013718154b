//! Metadata block written next to a saved photo.

use crate::model::Photo;
use chrono::NaiveDate;
use std::path::Path;

const PRINT_DPI: f64 = 300.0;
const CM_PER_INCH: f64 = 2.54;

/// Largest print at 300 DPI, as `("10.0in × 6.7in", "25.4cm × 16.9cm")`.
pub fn print_size(width: u32, height: u32) -> (String, String) {
    let w_in = f64::from(width) / PRINT_DPI;
    let h_in = f64::from(height) / PRINT_DPI;
    (
        format!("{:.1}in × {:.1}in", w_in, h_in),
        format!("{:.1}cm × {:.1}cm", w_in * CM_PER_INCH, h_in * CM_PER_INCH),
    )
}

/// Byte count in binary units: `512 B`, `1.5 KB`, `2.3 MB`.
pub fn human_size(bytes: usize) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

/// Text for the "AI Generated" line. Unknown status reads differently depending on
/// whether AI images were being filtered out.
pub fn ai_status(flag: Option<bool>, include_ai: bool) -> &'static str {
    match (flag, include_ai) {
        (Some(true), _) => "Yes",
        (Some(false), _) => "No",
        (None, false) => "No (filtered)",
        (None, true) => "Unknown",
    }
}

pub struct MetadataInput<'a> {
    pub photo: &'a Photo,
    pub image_path: &'a Path,
    pub file_size: usize,
    pub query: &'a str,
    pub include_ai: bool,
    pub saved_on: NaiveDate,
}

/// Markdown block: the image embed followed by a details callout.
pub fn render_block(input: &MetadataInput<'_>) -> String {
    let photo = input.photo;
    let embed_path = input.image_path.to_string_lossy().replace('\\', "/");
    let (print_in, print_cm) = print_size(photo.width, photo.height);

    let photographer = match &photo.photographer_url {
        Some(url) => format!("[{}]({})", photo.photographer, url),
        None => photo.photographer.clone(),
    };

    let mut lines = vec![
        format!("![{}]({})", alt_text(photo), embed_path),
        String::new(),
        "> [!info] Photo details".to_string(),
        format!("> - **Photographer:** {}", photographer),
        format!(
            "> - **Source:** [{}]({})",
            photo.source.display_name(),
            photo.url
        ),
        format!("> - **Dimensions:** {} × {} px", photo.width, photo.height),
        format!("> - **File size:** {}", human_size(input.file_size)),
        format!("> - **Max print size (300 DPI):** {} ({})", print_in, print_cm),
        format!(
            "> - **AI Generated:** {}",
            ai_status(photo.is_ai_generated, input.include_ai)
        ),
    ];
    if !photo.tags.is_empty() {
        lines.push(format!("> - **Tags:** {}", photo.tags.join(", ")));
    }
    if let Some(description) = &photo.description {
        lines.push(format!("> - **Description:** {}", description));
    }
    if !input.query.trim().is_empty() {
        lines.push(format!("> - **Search query:** {}", input.query.trim()));
    }
    lines.push(format!("> - **Saved:** {}", input.saved_on.format("%Y-%m-%d")));

    let mut block = lines.join("\n");
    block.push('\n');
    block
}

fn alt_text(photo: &Photo) -> String {
    photo
        .title()
        .replace(['[', ']'], "")
        .chars()
        .take(120)
        .collect()
}
