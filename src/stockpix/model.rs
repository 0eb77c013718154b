use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Results per page requested from every provider.
pub const PAGE_SIZE: u32 = 20;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum PhotoSource {
    #[default]
    Unsplash,
    Pexels,
    Pixabay,
}

impl PhotoSource {
    pub const ALL: [PhotoSource; 3] = [
        PhotoSource::Unsplash,
        PhotoSource::Pexels,
        PhotoSource::Pixabay,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PhotoSource::Unsplash => "unsplash",
            PhotoSource::Pexels => "pexels",
            PhotoSource::Pixabay => "pixabay",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PhotoSource::Unsplash => "Unsplash",
            PhotoSource::Pexels => "Pexels",
            PhotoSource::Pixabay => "Pixabay",
        }
    }

    /// Environment variable that overrides the stored API key.
    pub fn key_env_var(&self) -> &'static str {
        match self {
            PhotoSource::Unsplash => "UNSPLASH_ACCESS_KEY",
            PhotoSource::Pexels => "PEXELS_API_KEY",
            PhotoSource::Pixabay => "PIXABAY_API_KEY",
        }
    }

    pub fn home_url(&self) -> &'static str {
        match self {
            PhotoSource::Unsplash => "https://unsplash.com",
            PhotoSource::Pexels => "https://www.pexels.com",
            PhotoSource::Pixabay => "https://pixabay.com",
        }
    }

    /// Builds the globally unique photo id, e.g. `pexels-1234`.
    pub fn prefixed_id(&self, raw_id: &str) -> String {
        format!("{}-{}", self.name(), raw_id)
    }
}

impl fmt::Display for PhotoSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for PhotoSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "unsplash" => Ok(PhotoSource::Unsplash),
            "pexels" => Ok(PhotoSource::Pexels),
            "pixabay" => Ok(PhotoSource::Pixabay),
            other => Err(format!(
                "Unknown provider '{}' (expected unsplash, pexels or pixabay)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImageSize {
    Small,
    #[default]
    Medium,
    Large,
    Original,
}

impl ImageSize {
    pub fn name(&self) -> &'static str {
        match self {
            ImageSize::Small => "small",
            ImageSize::Medium => "medium",
            ImageSize::Large => "large",
            ImageSize::Original => "original",
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ImageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "small" => Ok(ImageSize::Small),
            "medium" => Ok(ImageSize::Medium),
            "large" => Ok(ImageSize::Large),
            "original" => Ok(ImageSize::Original),
            other => Err(format!(
                "Unknown image size '{}' (expected small, medium, large or original)",
                other
            )),
        }
    }
}

/// A photo as returned by any provider, normalized to a common shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    /// Provider-prefixed id (`unsplash-abc`, `pexels-123`).
    pub id: String,
    /// Photo page on the provider's site.
    pub url: String,
    pub preview_url: String,
    pub download_url: String,
    pub photographer: String,
    pub photographer_url: Option<String>,
    pub source: PhotoSource,
    pub tags: Vec<String>,
    pub description: Option<String>,
    pub width: u32,
    pub height: u32,
    pub is_ai_generated: Option<bool>,
    /// Unsplash asks clients to ping this endpoint whenever a photo is downloaded.
    pub download_location: Option<String>,
}

impl Photo {
    /// The provider's own id, without the source prefix.
    pub fn raw_id(&self) -> &str {
        self.id
            .strip_prefix(self.source.name())
            .and_then(|rest| rest.strip_prefix('-'))
            .unwrap_or(&self.id)
    }

    /// Short human label used in listings.
    pub fn title(&self) -> String {
        match &self.description {
            Some(desc) if !desc.trim().is_empty() => desc.trim().to_string(),
            _ if !self.tags.is_empty() => self.tags.join(", "),
            _ => format!("{} photo {}", self.source.display_name(), self.raw_id()),
        }
    }
}

/// One page of results from a single provider.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPage {
    pub source: PhotoSource,
    pub photos: Vec<Photo>,
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u64,
}

impl SearchPage {
    pub fn empty(source: PhotoSource) -> Self {
        Self {
            source,
            photos: Vec::new(),
            page: 1,
            total_pages: 0,
            total_results: 0,
        }
    }

    pub fn has_more(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Number of pages needed to show `total` results at [`PAGE_SIZE`] per page.
pub fn page_count(total: u64) -> u32 {
    let pages = total.div_ceil(u64::from(PAGE_SIZE));
    u32::try_from(pages).unwrap_or(u32::MAX)
}
