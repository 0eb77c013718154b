//! # URL Detection
//!
//! Decides whether user input points at a single photo on one of the supported sites.
//! Anything that does not match is a free-text query.
//!
//! Input may be a bare URL, a markdown line that contains one, or a provider-prefixed
//! id (`pexels-2014422`) as printed by `search`.

use crate::model::PhotoSource;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

static UNSPLASH_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:https?://)?(?:www\.)?unsplash\.com/photos/([A-Za-z0-9_-]+)/?$")
        .expect("valid unsplash pattern")
});

static PEXELS_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:https?://)?(?:www\.)?pexels\.com/(?:[a-z]{2}(?:-[a-z]{2})?/)?photo/(?:[a-z0-9-]*-)?(\d+)/?$",
    )
    .expect("valid pexels pattern")
});

static PIXABAY_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:https?://)?(?:www\.)?pixabay\.com/(?:[a-z]{2}/)?(?:photos|illustrations|vectors)/(?:[a-z0-9-]*-)?(\d+)/?$",
    )
    .expect("valid pixabay pattern")
});

/// Length of a bare Unsplash photo id.
const UNSPLASH_ID_LEN: usize = 11;

/// A reference to one photo on one provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoRef {
    pub source: PhotoSource,
    pub id: String,
}

impl PhotoRef {
    pub fn new(source: PhotoSource, id: impl Into<String>) -> Self {
        Self {
            source,
            id: id.into(),
        }
    }
}

impl fmt::Display for PhotoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source.prefixed_id(&self.id))
    }
}

impl FromStr for PhotoRef {
    type Err = String;

    /// Accepts a supported photo URL or a prefixed id (`unsplash-<id>`, `pexels:<id>`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(found) = detect(s) {
            return Ok(found);
        }

        let trimmed = s.trim();
        let (prefix, id) = trimmed
            .split_once(['-', ':'])
            .ok_or_else(|| format!("Not a photo URL or id: {}", trimmed))?;
        let source: PhotoSource = prefix.parse()?;
        if id.is_empty() {
            return Err(format!("Missing photo id in '{}'", trimmed));
        }
        let valid = match source {
            PhotoSource::Unsplash => id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
            PhotoSource::Pexels | PhotoSource::Pixabay => id.chars().all(|c| c.is_ascii_digit()),
        };
        if !valid {
            return Err(format!("Invalid {} photo id: {}", source.display_name(), id));
        }
        Ok(PhotoRef::new(source, id))
    }
}

/// Returns the first supported photo URL found in `input`, or `None` when the
/// input should be treated as a search query.
pub fn detect(input: &str) -> Option<PhotoRef> {
    input.split_whitespace().find_map(detect_token)
}

fn detect_token(token: &str) -> Option<PhotoRef> {
    let token = token.trim_matches(|c| matches!(c, '<' | '>' | '(' | ')' | '[' | ']' | '"' | '\''));
    let bare = strip_query_and_fragment(token);

    if let Some(caps) = UNSPLASH_URL.captures(bare) {
        return Some(PhotoRef::new(PhotoSource::Unsplash, unsplash_id(&caps[1])));
    }
    if let Some(caps) = PEXELS_URL.captures(bare) {
        return Some(PhotoRef::new(PhotoSource::Pexels, &caps[1]));
    }
    if let Some(caps) = PIXABAY_URL.captures(bare) {
        return Some(PhotoRef::new(PhotoSource::Pixabay, &caps[1]));
    }
    None
}

fn strip_query_and_fragment(s: &str) -> &str {
    match s.find(['?', '#']) {
        Some(idx) => &s[..idx],
        None => s,
    }
}

/// Unsplash slugs read `words-<id>`; the id is the trailing 11 characters.
fn unsplash_id(slug: &str) -> String {
    let len = slug.len();
    if len > UNSPLASH_ID_LEN && slug.as_bytes()[len - UNSPLASH_ID_LEN - 1] == b'-' {
        slug[len - UNSPLASH_ID_LEN..].to_string()
    } else {
        slug.to_string()
    }
}
