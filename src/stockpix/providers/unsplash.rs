//! Unsplash adapter.
//!
//! [API documentation](https://unsplash.com/documentation)

use super::{get_json, get_json_optional, non_empty, PhotoProvider, ProviderOptions};
use crate::error::{Result, StockError};
use crate::http::{HttpRequest, HttpTransport};
use crate::model::{ImageSize, Photo, PhotoSource, SearchPage, PAGE_SIZE};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

pub const BASE_URL: &str = "https://api.unsplash.com";

pub struct UnsplashProvider {
    api_key: Option<String>,
    transport: Arc<dyn HttpTransport>,
    options: ProviderOptions,
    base_url: String,
}

impl UnsplashProvider {
    pub fn new(
        api_key: Option<String>,
        transport: Arc<dyn HttpTransport>,
        options: ProviderOptions,
    ) -> Self {
        Self {
            api_key,
            transport,
            options,
            base_url: BASE_URL.to_string(),
        }
    }

    /// Points the adapter at another host (mock servers in tests).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn request(&self, path: &str) -> Result<HttpRequest> {
        let key = self
            .api_key
            .as_deref()
            .ok_or(StockError::MissingApiKey(PhotoSource::Unsplash))?;
        Ok(HttpRequest::get(format!("{}{}", self.base_url, path))
            .header("Accept-Version", "v1")
            .header("Authorization", format!("Client-ID {}", key)))
    }

    fn to_photo(&self, raw: UnsplashPhoto) -> Photo {
        let download_url = match self.options.image_size {
            ImageSize::Small => raw.urls.small,
            ImageSize::Medium => raw.urls.regular,
            ImageSize::Large => raw.urls.full,
            ImageSize::Original => raw.urls.raw,
        };

        Photo {
            id: PhotoSource::Unsplash.prefixed_id(&raw.id),
            url: raw.links.html,
            preview_url: raw.urls.thumb,
            download_url,
            photographer: raw.user.name,
            photographer_url: Some(raw.user.links.html),
            source: PhotoSource::Unsplash,
            tags: raw.tags.into_iter().map(|t| t.title).collect(),
            description: non_empty(raw.description).or_else(|| non_empty(raw.alt_description)),
            width: raw.width,
            height: raw.height,
            // The API carries no AI-generation flag.
            is_ai_generated: None,
            download_location: non_empty(raw.links.download_location),
        }
    }
}

#[async_trait]
impl PhotoProvider for UnsplashProvider {
    fn source(&self) -> PhotoSource {
        PhotoSource::Unsplash
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn search(&self, query: &str, page: u32) -> Result<SearchPage> {
        let request = self
            .request("/search/photos")?
            .query("query", query)
            .query("page", page)
            .query("per_page", PAGE_SIZE);

        let response: UnsplashSearchResponse =
            get_json(self.transport.as_ref(), PhotoSource::Unsplash, request).await?;
        debug!(query, page, total = response.total, "unsplash search");

        let photos = response
            .results
            .into_iter()
            .map(|raw| self.to_photo(raw))
            .collect();

        Ok(SearchPage {
            source: PhotoSource::Unsplash,
            photos,
            page,
            total_pages: response.total_pages,
            total_results: response.total,
        })
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Option<Photo>> {
        let request = self.request(&format!("/photos/{}", id))?;
        let raw: Option<UnsplashPhoto> =
            get_json_optional(self.transport.as_ref(), PhotoSource::Unsplash, request).await?;
        Ok(raw.map(|raw| self.to_photo(raw)))
    }

    async fn track_download(&self, photo: &Photo) -> Result<()> {
        let Some(location) = &photo.download_location else {
            return Ok(());
        };
        let key = self
            .api_key
            .as_deref()
            .ok_or(StockError::MissingApiKey(PhotoSource::Unsplash))?;
        let request = HttpRequest::get(location.as_str())
            .header("Authorization", format!("Client-ID {}", key));

        let response = self.transport.get(request).await?;
        if !response.is_success() {
            return Err(StockError::provider(
                PhotoSource::Unsplash,
                format!("download tracking returned HTTP {}", response.status),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct UnsplashSearchResponse {
    total: u64,
    total_pages: u32,
    results: Vec<UnsplashPhoto>,
}

#[derive(Debug, Deserialize)]
struct UnsplashPhoto {
    id: String,
    width: u32,
    height: u32,
    description: Option<String>,
    alt_description: Option<String>,
    urls: UnsplashUrls,
    links: UnsplashLinks,
    user: UnsplashUser,
    #[serde(default)]
    tags: Vec<UnsplashTag>,
}

#[derive(Debug, Deserialize)]
struct UnsplashUrls {
    raw: String,
    full: String,
    regular: String,
    small: String,
    thumb: String,
}

#[derive(Debug, Deserialize)]
struct UnsplashLinks {
    html: String,
    #[serde(default)]
    download_location: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UnsplashUser {
    name: String,
    links: UnsplashUserLinks,
}

#[derive(Debug, Deserialize)]
struct UnsplashUserLinks {
    html: String,
}

#[derive(Debug, Deserialize)]
struct UnsplashTag {
    title: String,
}
