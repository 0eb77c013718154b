//! Pixabay adapter.
//!
//! [API documentation](https://pixabay.com/api/docs/)
//!
//! Pixabay is the only provider that flags AI-generated images, so it is the only
//! adapter that filters results on that flag.

use super::{apply_ai_filter, decode_json_optional, get_json, PhotoProvider, ProviderOptions};
use crate::error::{Result, StockError};
use crate::http::{HttpRequest, HttpResponse, HttpTransport};
use crate::model::{page_count, ImageSize, Photo, PhotoSource, SearchPage, PAGE_SIZE};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

pub const BASE_URL: &str = "https://pixabay.com/api/";

pub struct PixabayProvider {
    api_key: Option<String>,
    transport: Arc<dyn HttpTransport>,
    options: ProviderOptions,
    base_url: String,
}

impl PixabayProvider {
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
        self.base_url = format!("{}/api/", base_url.trim_end_matches('/'));
        self
    }

    fn request(&self) -> Result<HttpRequest> {
        let key = self
            .api_key
            .as_deref()
            .ok_or(StockError::MissingApiKey(PhotoSource::Pixabay))?;
        Ok(HttpRequest::get(self.base_url.as_str()).query("key", key))
    }

    fn to_photo(&self, raw: PixabayHit) -> Photo {
        let download_url = match self.options.image_size {
            ImageSize::Small => raw.webformat_url.replace("_640.", "_340."),
            ImageSize::Medium => raw.webformat_url.clone(),
            ImageSize::Large => raw.large_image_url.clone(),
            ImageSize::Original => raw
                .image_url
                .clone()
                .or_else(|| raw.full_hd_url.clone())
                .unwrap_or_else(|| raw.large_image_url.clone()),
        };
        let tags = raw
            .tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();

        Photo {
            id: PhotoSource::Pixabay.prefixed_id(&raw.id.to_string()),
            url: raw.page_url,
            preview_url: raw.preview_url,
            download_url,
            photographer_url: Some(format!(
                "https://pixabay.com/users/{}-{}/",
                raw.user, raw.user_id
            )),
            photographer: raw.user,
            source: PhotoSource::Pixabay,
            tags,
            description: None,
            width: raw.image_width,
            height: raw.image_height,
            is_ai_generated: raw.is_ai_generated,
            download_location: None,
        }
    }
}

#[async_trait]
impl PhotoProvider for PixabayProvider {
    fn source(&self) -> PhotoSource {
        PhotoSource::Pixabay
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn search(&self, query: &str, page: u32) -> Result<SearchPage> {
        let request = self
            .request()?
            .query("q", query)
            .query("page", page)
            .query("per_page", PAGE_SIZE)
            .query("image_type", "photo")
            .query("safesearch", "true");

        let response: PixabayResponse =
            get_json(self.transport.as_ref(), PhotoSource::Pixabay, request).await?;
        debug!(query, page, total = response.total_hits, "pixabay search");

        let photos = response
            .hits
            .into_iter()
            .map(|raw| self.to_photo(raw))
            .collect();

        Ok(SearchPage {
            source: PhotoSource::Pixabay,
            photos: apply_ai_filter(photos, self.options.include_ai),
            page,
            total_pages: page_count(response.total_hits),
            total_results: response.total_hits,
        })
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Option<Photo>> {
        let request = self.request()?.query("id", id);
        let response = self
            .transport
            .get(request)
            .await
            .map_err(|e| StockError::provider(PhotoSource::Pixabay, e.to_string()))?;
        if is_unknown_id(&response) {
            return Ok(None);
        }
        let response: Option<PixabayResponse> =
            decode_json_optional(PhotoSource::Pixabay, response)?;

        // A direct lookup is an explicit choice, so the AI filter does not apply here.
        Ok(response
            .and_then(|r| r.hits.into_iter().next())
            .map(|raw| self.to_photo(raw)))
    }
}

/// Pixabay answers a lookup of a missing id with HTTP 400 and
/// `[ERROR 400] "id" is out of range.` instead of a 404.
fn is_unknown_id(response: &HttpResponse) -> bool {
    response.status == 400 && String::from_utf8_lossy(&response.body).contains("out of range")
}

#[derive(Debug, Deserialize)]
struct PixabayResponse {
    #[serde(rename = "totalHits")]
    total_hits: u64,
    hits: Vec<PixabayHit>,
}

#[derive(Debug, Deserialize)]
struct PixabayHit {
    id: u64,
    #[serde(rename = "pageURL")]
    page_url: String,
    #[serde(default)]
    tags: String,
    #[serde(rename = "previewURL")]
    preview_url: String,
    #[serde(rename = "webformatURL")]
    webformat_url: String,
    #[serde(rename = "largeImageURL")]
    large_image_url: String,
    #[serde(rename = "fullHDURL", default)]
    full_hd_url: Option<String>,
    #[serde(rename = "imageURL", default)]
    image_url: Option<String>,
    #[serde(rename = "imageWidth")]
    image_width: u32,
    #[serde(rename = "imageHeight")]
    image_height: u32,
    user: String,
    user_id: u64,
    #[serde(rename = "isAiGenerated", default)]
    is_ai_generated: Option<bool>,
}
