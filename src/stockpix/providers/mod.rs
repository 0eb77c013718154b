//! # Provider Adapters
//!
//! One adapter per stock-photo site. Each adapter knows its site's endpoints, its
//! authentication scheme and its JSON shape, and converts responses into [`Photo`]s.
//!
//! | site     | auth                                   | id shape     |
//! |----------|----------------------------------------|--------------|
//! | Unsplash | `Authorization: Client-ID <key>` header | alphanumeric |
//! | Pexels   | `Authorization: <key>` header           | numeric      |
//! | Pixabay  | `key=<key>` query parameter             | numeric      |
//!
//! Adapters are always constructed, with or without a key. An adapter without a key
//! reports `is_configured() == false` and fails every request with
//! [`StockError::MissingApiKey`]; the aggregator skips such adapters up front.

use crate::config::SearchSettings;
use crate::error::{Result, StockError};
use crate::http::{HttpRequest, HttpResponse, HttpTransport};
use crate::model::{ImageSize, Photo, PhotoSource, SearchPage};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::sync::Arc;

pub mod pexels;
pub mod pixabay;
pub mod unsplash;

pub use pexels::PexelsProvider;
pub use pixabay::PixabayProvider;
pub use unsplash::UnsplashProvider;

/// Options shared by every adapter, taken from [`SearchSettings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProviderOptions {
    pub image_size: ImageSize,
    pub include_ai: bool,
}

impl From<&SearchSettings> for ProviderOptions {
    fn from(settings: &SearchSettings) -> Self {
        Self {
            image_size: settings.image_size,
            include_ai: settings.include_ai,
        }
    }
}

#[async_trait]
pub trait PhotoProvider: Send + Sync {
    fn source(&self) -> PhotoSource;

    /// True when an API key is available.
    fn is_configured(&self) -> bool;

    /// One page of results for a free-text query.
    async fn search(&self, query: &str, page: u32) -> Result<SearchPage>;

    /// A single photo by the provider's own id. `Ok(None)` when it does not exist.
    async fn fetch_by_id(&self, id: &str) -> Result<Option<Photo>>;

    /// Header to retry a failed image download with, for CDNs that sometimes want it.
    fn download_auth(&self) -> Option<(String, String)> {
        None
    }

    /// Reports a completed download to the provider, where its terms require that.
    async fn track_download(&self, _photo: &Photo) -> Result<()> {
        Ok(())
    }
}

/// Builds all three adapters from the settings, sharing one transport.
pub fn build_all(
    settings: &SearchSettings,
    transport: Arc<dyn HttpTransport>,
) -> Vec<Arc<dyn PhotoProvider>> {
    let options = ProviderOptions::from(settings);
    let key = |source: PhotoSource| settings.api_key(source).map(str::to_string);

    vec![
        Arc::new(UnsplashProvider::new(
            key(PhotoSource::Unsplash),
            Arc::clone(&transport),
            options,
        )),
        Arc::new(PexelsProvider::new(
            key(PhotoSource::Pexels),
            Arc::clone(&transport),
            options,
        )),
        Arc::new(PixabayProvider::new(
            key(PhotoSource::Pixabay),
            transport,
            options,
        )),
    ]
}

/// Sends `request` and decodes a JSON body. Any non-2xx status is a provider error.
pub(crate) async fn get_json<T: DeserializeOwned>(
    transport: &dyn HttpTransport,
    source: PhotoSource,
    request: HttpRequest,
) -> Result<T> {
    get_json_optional(transport, source, request)
        .await?
        .ok_or_else(|| StockError::provider(source, "HTTP 404 Not Found"))
}

/// Like [`get_json`], but maps HTTP 404 to `Ok(None)`.
pub(crate) async fn get_json_optional<T: DeserializeOwned>(
    transport: &dyn HttpTransport,
    source: PhotoSource,
    request: HttpRequest,
) -> Result<Option<T>> {
    let response = transport
        .get(request)
        .await
        .map_err(|e| StockError::provider(source, e.to_string()))?;
    decode_json_optional(source, response)
}

/// Decodes a JSON body already received. HTTP 404 is `Ok(None)`, any other non-2xx
/// status is a provider error.
pub(crate) fn decode_json_optional<T: DeserializeOwned>(
    source: PhotoSource,
    response: HttpResponse,
) -> Result<Option<T>> {

    if response.status == 404 {
        return Ok(None);
    }
    if !response.is_success() {
        return Err(StockError::provider(
            source,
            format!("HTTP {}: {}", response.status, response.body_snippet()),
        ));
    }

    serde_json::from_slice(&response.body)
        .map(Some)
        .map_err(|e| StockError::provider(source, format!("malformed response: {}", e)))
}

/// Drops AI-generated photos unless the user opted in. Unknown status is kept.
pub(crate) fn apply_ai_filter(photos: Vec<Photo>, include_ai: bool) -> Vec<Photo> {
    if include_ai {
        return photos;
    }
    photos
        .into_iter()
        .filter(|p| p.is_ai_generated != Some(true))
        .collect()
}

pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
