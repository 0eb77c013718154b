//! Pexels adapter.
//!
//! [API documentation](https://www.pexels.com/api/documentation/)

use super::{get_json, get_json_optional, non_empty, PhotoProvider, ProviderOptions};
use crate::error::{Result, StockError};
use crate::http::{HttpRequest, HttpTransport};
use crate::model::{page_count, ImageSize, Photo, PhotoSource, SearchPage, PAGE_SIZE};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

pub const BASE_URL: &str = "https://api.pexels.com/v1";

pub struct PexelsProvider {
    api_key: Option<String>,
    transport: Arc<dyn HttpTransport>,
    options: ProviderOptions,
    base_url: String,
}

impl PexelsProvider {
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
            .ok_or(StockError::MissingApiKey(PhotoSource::Pexels))?;
        Ok(HttpRequest::get(format!("{}{}", self.base_url, path)).header("Authorization", key))
    }

    fn to_photo(&self, raw: PexelsPhoto) -> Photo {
        let download_url = match self.options.image_size {
            ImageSize::Small => raw.src.medium,
            ImageSize::Medium => raw.src.large,
            ImageSize::Large => raw.src.large2x,
            ImageSize::Original => raw.src.original,
        };
        let id = raw.id.to_string();

        Photo {
            id: PhotoSource::Pexels.prefixed_id(&id),
            url: raw.url,
            preview_url: raw.src.tiny,
            download_url,
            photographer: raw.photographer,
            photographer_url: non_empty(raw.photographer_url),
            source: PhotoSource::Pexels,
            tags: Vec::new(),
            description: non_empty(raw.alt),
            width: raw.width,
            height: raw.height,
            // Pexels does not expose whether a photo is AI generated.
            is_ai_generated: None,
            download_location: None,
        }
    }
}

#[async_trait]
impl PhotoProvider for PexelsProvider {
    fn source(&self) -> PhotoSource {
        PhotoSource::Pexels
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn search(&self, query: &str, page: u32) -> Result<SearchPage> {
        let request = self
            .request("/search")?
            .query("query", query)
            .query("page", page)
            .query("per_page", PAGE_SIZE);

        let response: PexelsSearchResponse =
            get_json(self.transport.as_ref(), PhotoSource::Pexels, request).await?;
        debug!(query, page, total = response.total_results, "pexels search");

        let photos = response
            .photos
            .into_iter()
            .map(|raw| self.to_photo(raw))
            .collect();

        Ok(SearchPage {
            source: PhotoSource::Pexels,
            photos,
            page,
            total_pages: page_count(response.total_results),
            total_results: response.total_results,
        })
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Option<Photo>> {
        let request = self.request(&format!("/photos/{}", id))?;
        let raw: Option<PexelsPhoto> =
            get_json_optional(self.transport.as_ref(), PhotoSource::Pexels, request).await?;
        Ok(raw.map(|raw| self.to_photo(raw)))
    }

    fn download_auth(&self) -> Option<(String, String)> {
        self.api_key
            .as_ref()
            .map(|key| ("Authorization".to_string(), key.clone()))
    }
}

#[derive(Debug, Deserialize)]
struct PexelsSearchResponse {
    total_results: u64,
    photos: Vec<PexelsPhoto>,
}

#[derive(Debug, Deserialize)]
struct PexelsPhoto {
    id: u64,
    width: u32,
    height: u32,
    url: String,
    photographer: String,
    #[serde(default)]
    photographer_url: Option<String>,
    src: PexelsPhotoSrc,
    #[serde(default)]
    alt: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PexelsPhotoSrc {
    original: String,
    large2x: String,
    large: String,
    medium: String,
    tiny: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::{json, status, FakeTransport};

    const PHOTO: &str = r##"{
        "id": 2014422,
        "width": 3024,
        "height": 3024,
        "url": "https://www.pexels.com/photo/brown-rocks-during-golden-hour-2014422/",
        "photographer": "Joey Farina",
        "photographer_url": "https://www.pexels.com/@joey",
        "photographer_id": 680589,
        "avg_color": "#978E82",
        "src": {
            "original": "https://images.pexels.com/photos/2014422/pexels-photo-2014422.jpeg",
            "large2x": "https://images.pexels.com/photos/2014422/pexels-photo-2014422.jpeg?w=1880",
            "large": "https://images.pexels.com/photos/2014422/pexels-photo-2014422.jpeg?h=650",
            "medium": "https://images.pexels.com/photos/2014422/pexels-photo-2014422.jpeg?h=350",
            "small": "https://images.pexels.com/photos/2014422/pexels-photo-2014422.jpeg?h=130",
            "portrait": "https://images.pexels.com/photos/2014422/pexels-photo-2014422.jpeg?portrait",
            "landscape": "https://images.pexels.com/photos/2014422/pexels-photo-2014422.jpeg?landscape",
            "tiny": "https://images.pexels.com/photos/2014422/pexels-photo-2014422.jpeg?tiny"
        },
        "liked": false,
        "alt": "Brown Rocks During Golden Hour"
    }"##;

    fn provider(transport: Arc<FakeTransport>) -> PexelsProvider {
        PexelsProvider::new(
            Some("pexels-secret".into()),
            transport,
            ProviderOptions {
                image_size: ImageSize::Original,
                include_ai: false,
            },
        )
    }

    #[tokio::test]
    async fn search_maps_photos_and_computes_pages() {
        let body = format!(
            r#"{{"total_results": 41, "page": 1, "per_page": 20, "photos": [{}], "next_page": "x"}}"#,
            PHOTO
        );
        let transport = Arc::new(FakeTransport::new(move |_| json(&body)));
        let adapter = provider(transport.clone());

        let page = adapter.search("rocks", 1).await.unwrap();

        assert_eq!(page.total_pages, 3);
        assert!(page.has_more());
        let photo = &page.photos[0];
        assert_eq!(photo.id, "pexels-2014422");
        assert_eq!(photo.photographer, "Joey Farina");
        assert_eq!(photo.description.as_deref(), Some("Brown Rocks During Golden Hour"));
        assert_eq!(
            photo.download_url,
            "https://images.pexels.com/photos/2014422/pexels-photo-2014422.jpeg"
        );

        let requests = transport.requests.lock().unwrap();
        assert_eq!(requests[0].url, "https://api.pexels.com/v1/search");
        assert!(requests[0]
            .headers
            .contains(&("Authorization".into(), "pexels-secret".into())));
    }

    #[tokio::test]
    async fn server_errors_become_provider_errors() {
        let transport = Arc::new(FakeTransport::new(|_| status(429)));
        let err = provider(transport).search("rocks", 1).await.unwrap_err();
        assert!(matches!(
            err,
            StockError::Provider {
                provider: PhotoSource::Pexels,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn fetch_by_id_hits_photo_endpoint() {
        let transport = Arc::new(FakeTransport::new(|_| json(PHOTO)));
        let adapter = provider(transport.clone());

        let photo = adapter.fetch_by_id("2014422").await.unwrap().unwrap();
        assert_eq!(photo.width, 3024);
        assert_eq!(
            transport.requests.lock().unwrap()[0].url,
            "https://api.pexels.com/v1/photos/2014422"
        );
    }

    #[test]
    fn download_auth_uses_raw_key() {
        let transport = Arc::new(FakeTransport::new(|_| json("{}")));
        assert_eq!(
            provider(transport).download_auth(),
            Some(("Authorization".to_string(), "pexels-secret".to_string()))
        );
    }
}
