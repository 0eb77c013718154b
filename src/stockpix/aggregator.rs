//! # Aggregator
//!
//! Fans one user query out to every configured provider and collects the answers.
//!
//! - A pasted photo URL short-circuits the fan-out: exactly one provider is asked for
//!   exactly one photo, and a miss is reported as [`StockError::NotFound`] rather than
//!   falling back to a text search.
//! - Text queries go to all configured providers at once. A provider that fails is
//!   logged and listed in [`AggregateResult::failures`]; the others still return.
//! - Results stay grouped by provider. There is no ranking across providers and no
//!   de-duplication.

use crate::error::{Result, StockError};
use crate::model::{Photo, PhotoSource, SearchPage};
use crate::providers::PhotoProvider;
use crate::url_detect::{self, PhotoRef};
use futures::future::join_all;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderFailure {
    pub source: PhotoSource,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct AggregateResult {
    pub query: String,
    /// Set when the input was a photo URL rather than a text query.
    pub direct: Option<PhotoRef>,
    pub pages: BTreeMap<PhotoSource, SearchPage>,
    pub failures: Vec<ProviderFailure>,
}

impl AggregateResult {
    pub fn total_photos(&self) -> usize {
        self.pages.values().map(|p| p.photos.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_photos() == 0
    }

    pub fn photos(&self) -> impl Iterator<Item = &Photo> {
        self.pages.values().flat_map(|p| p.photos.iter())
    }

    /// Providers with results, `preferred` first and the rest in canonical order.
    pub fn tabs(&self, preferred: PhotoSource) -> Vec<PhotoSource> {
        let mut tabs: Vec<PhotoSource> = self.pages.keys().copied().collect();
        tabs.sort_by_key(|s| (*s != preferred, *s));
        tabs
    }
}

pub struct Aggregator {
    providers: Vec<Arc<dyn PhotoProvider>>,
}

impl Aggregator {
    pub fn new(providers: Vec<Arc<dyn PhotoProvider>>) -> Self {
        Self { providers }
    }

    pub fn configured_sources(&self) -> Vec<PhotoSource> {
        self.providers
            .iter()
            .filter(|p| p.is_configured())
            .map(|p| p.source())
            .collect()
    }

    /// The adapter for `source`, if it has a key.
    pub fn provider(&self, source: PhotoSource) -> Result<&Arc<dyn PhotoProvider>> {
        self.providers
            .iter()
            .find(|p| p.source() == source && p.is_configured())
            .ok_or(StockError::MissingApiKey(source))
    }

    /// Runs a search from raw user input: a photo URL or a free-text query.
    pub async fn search(&self, input: &str) -> Result<AggregateResult> {
        let query = input.trim();
        if query.is_empty() {
            return Err(StockError::Api("Search query cannot be empty".to_string()));
        }

        if let Some(photo_ref) = url_detect::detect(query) {
            debug!(%photo_ref, "input is a photo URL");
            let photo = self.fetch(&photo_ref).await?;
            let mut page = SearchPage::empty(photo_ref.source);
            page.photos.push(photo);
            page.total_pages = 1;
            page.total_results = 1;

            let mut pages = BTreeMap::new();
            pages.insert(photo_ref.source, page);
            return Ok(AggregateResult {
                query: query.to_string(),
                direct: Some(photo_ref),
                pages,
                failures: Vec::new(),
            });
        }

        self.search_text(query, None).await
    }

    /// Text search across configured providers, or only `only` when given.
    pub async fn search_text(
        &self,
        query: &str,
        only: Option<PhotoSource>,
    ) -> Result<AggregateResult> {
        let active: Vec<&Arc<dyn PhotoProvider>> = self
            .providers
            .iter()
            .filter(|p| p.is_configured())
            .filter(|p| only.map_or(true, |s| p.source() == s))
            .collect();

        if active.is_empty() {
            return Err(match only {
                Some(source) => StockError::MissingApiKey(source),
                None => StockError::Configuration(
                    "No API keys configured. Set at least one of unsplash-key, pexels-key or pixabay-key".to_string(),
                ),
            });
        }

        let searches = active.iter().map(|provider| async move {
            (provider.source(), provider.search(query, 1).await)
        });
        let outcomes = join_all(searches).await;

        let mut result = AggregateResult {
            query: query.to_string(),
            ..AggregateResult::default()
        };
        for (source, outcome) in outcomes {
            match outcome {
                Ok(page) => {
                    debug!(%source, photos = page.photos.len(), "provider answered");
                    result.pages.insert(source, page);
                }
                Err(e) => {
                    warn!(%source, error = %e, "provider search failed");
                    result.failures.push(ProviderFailure {
                        source,
                        message: e.to_string(),
                    });
                }
            }
        }
        Ok(result)
    }

    /// One page from one provider (pagination).
    pub async fn search_provider(
        &self,
        source: PhotoSource,
        query: &str,
        page: u32,
    ) -> Result<SearchPage> {
        self.provider(source)?.search(query, page).await
    }

    /// A single photo; a missing photo is an error.
    pub async fn fetch(&self, photo_ref: &PhotoRef) -> Result<Photo> {
        self.provider(photo_ref.source)?
            .fetch_by_id(&photo_ref.id)
            .await?
            .ok_or_else(|| StockError::NotFound {
                provider: photo_ref.source,
                id: photo_ref.id.clone(),
            })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted providers for aggregator and command tests.

    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    pub struct StubProvider {
        pub source: PhotoSource,
        pub configured: bool,
        pub fail: bool,
        pub photos_per_page: usize,
        pub total_pages: u32,
        /// Time each search takes before answering.
        pub delay: Option<Duration>,
        pub calls: AtomicUsize,
    }

    impl StubProvider {
        pub fn ok(source: PhotoSource) -> Self {
            Self {
                source,
                configured: true,
                fail: false,
                photos_per_page: 2,
                total_pages: 3,
                delay: None,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn failing(source: PhotoSource) -> Self {
            Self {
                fail: true,
                ..Self::ok(source)
            }
        }

        pub fn slow(source: PhotoSource, delay: Duration) -> Self {
            Self {
                delay: Some(delay),
                ..Self::ok(source)
            }
        }

        pub fn unconfigured(source: PhotoSource) -> Self {
            Self {
                configured: false,
                ..Self::ok(source)
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    pub fn stub_photo(source: PhotoSource, raw_id: &str) -> Photo {
        Photo {
            id: source.prefixed_id(raw_id),
            url: format!("{}/photo/{}", source.home_url(), raw_id),
            preview_url: format!("https://cdn.example/{}-thumb.jpg", raw_id),
            download_url: format!("https://cdn.example/{}.jpg", raw_id),
            photographer: "Test Photographer".to_string(),
            photographer_url: None,
            source,
            tags: vec!["test".to_string()],
            description: None,
            width: 3000,
            height: 2000,
            is_ai_generated: None,
            download_location: None,
        }
    }

    #[async_trait]
    impl PhotoProvider for StubProvider {
        fn source(&self) -> PhotoSource {
            self.source
        }

        fn is_configured(&self) -> bool {
            self.configured
        }

        async fn search(&self, query: &str, page: u32) -> Result<SearchPage> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if !self.configured {
                return Err(StockError::MissingApiKey(self.source));
            }
            if self.fail {
                return Err(StockError::provider(self.source, "HTTP 503: unavailable"));
            }
            let photos = (0..self.photos_per_page)
                .map(|i| stub_photo(self.source, &format!("{}{}{}", query.len(), page, i)))
                .collect();
            Ok(SearchPage {
                source: self.source,
                photos,
                page,
                total_pages: self.total_pages,
                total_results: u64::from(self.total_pages) * self.photos_per_page as u64,
            })
        }

        async fn fetch_by_id(&self, id: &str) -> Result<Option<Photo>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(StockError::provider(self.source, "HTTP 503: unavailable"));
            }
            if id == "404" {
                return Ok(None);
            }
            Ok(Some(stub_photo(self.source, id)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::StubProvider;
    use super::*;

    fn aggregator(stubs: Vec<Arc<StubProvider>>) -> Aggregator {
        Aggregator::new(
            stubs
                .into_iter()
                .map(|s| s as Arc<dyn PhotoProvider>)
                .collect(),
        )
    }

    #[tokio::test]
    async fn no_configured_providers_is_a_configuration_error_without_requests() {
        let stubs: Vec<Arc<StubProvider>> = PhotoSource::ALL
            .into_iter()
            .map(|s| Arc::new(StubProvider::unconfigured(s)))
            .collect();
        let agg = aggregator(stubs.clone());

        let err = agg.search("mountains").await.unwrap_err();

        assert!(matches!(err, StockError::Configuration(_)));
        assert!(stubs.iter().all(|s| s.calls() == 0));
    }

    #[tokio::test]
    async fn one_failure_keeps_the_other_results() {
        let unsplash = Arc::new(StubProvider::ok(PhotoSource::Unsplash));
        let pexels = Arc::new(StubProvider::failing(PhotoSource::Pexels));
        let pixabay = Arc::new(StubProvider::ok(PhotoSource::Pixabay));
        let agg = aggregator(vec![unsplash, pexels, pixabay]);

        let result = agg.search("mountains").await.unwrap();

        assert_eq!(result.total_photos(), 4);
        assert_eq!(
            result.pages.keys().copied().collect::<Vec<_>>(),
            vec![PhotoSource::Unsplash, PhotoSource::Pixabay]
        );
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].source, PhotoSource::Pexels);
        assert!(result.failures[0].message.contains("503"));
        assert!(result
            .photos()
            .all(|p| p.id.starts_with(p.source.name())));
    }

    #[tokio::test]
    async fn providers_are_searched_concurrently() {
        let delay = std::time::Duration::from_millis(200);
        let stubs: Vec<Arc<StubProvider>> = PhotoSource::ALL
            .into_iter()
            .map(|s| Arc::new(StubProvider::slow(s, delay)))
            .collect();
        let agg = aggregator(stubs.clone());

        let started = std::time::Instant::now();
        let result = agg.search("harbor").await.unwrap();
        let elapsed = started.elapsed();

        assert_eq!(result.pages.len(), 3);
        assert!(stubs.iter().all(|s| s.calls() == 1));
        // One at a time would take at least 600ms.
        assert!(elapsed < delay * 2, "searches ran one after another: {:?}", elapsed);
    }

    #[tokio::test]
    async fn slow_provider_does_not_hold_back_failures() {
        let slow = Arc::new(StubProvider::slow(
            PhotoSource::Unsplash,
            std::time::Duration::from_millis(150),
        ));
        let failing = Arc::new(StubProvider::failing(PhotoSource::Pexels));
        let agg = aggregator(vec![slow, failing]);

        let result = agg.search("harbor").await.unwrap();
        assert!(result.pages.contains_key(&PhotoSource::Unsplash));
        assert_eq!(result.failures.len(), 1);
    }

    #[tokio::test]
    async fn unconfigured_providers_are_skipped() {
        let unsplash = Arc::new(StubProvider::unconfigured(PhotoSource::Unsplash));
        let pexels = Arc::new(StubProvider::ok(PhotoSource::Pexels));
        let agg = aggregator(vec![unsplash.clone(), pexels]);

        let result = agg.search("lake").await.unwrap();

        assert_eq!(unsplash.calls(), 0);
        assert!(result.failures.is_empty());
        assert_eq!(agg.configured_sources(), vec![PhotoSource::Pexels]);
    }

    #[tokio::test]
    async fn url_input_fetches_one_photo_from_one_provider() {
        let unsplash = Arc::new(StubProvider::ok(PhotoSource::Unsplash));
        let pexels = Arc::new(StubProvider::ok(PhotoSource::Pexels));
        let agg = aggregator(vec![unsplash.clone(), pexels.clone()]);

        let result = agg
            .search("https://www.pexels.com/photo/brown-rocks-2014422/?utm=1")
            .await
            .unwrap();

        assert_eq!(result.direct, Some(PhotoRef::new(PhotoSource::Pexels, "2014422")));
        assert_eq!(result.total_photos(), 1);
        assert_eq!(result.photos().next().unwrap().id, "pexels-2014422");
        assert_eq!(unsplash.calls(), 0);
        assert_eq!(pexels.calls(), 1);
    }

    #[tokio::test]
    async fn url_miss_is_not_found_and_does_not_fall_back() {
        let pexels = Arc::new(StubProvider::ok(PhotoSource::Pexels));
        let agg = aggregator(vec![pexels.clone()]);

        let err = agg
            .search("https://www.pexels.com/photo/404/")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            StockError::NotFound {
                provider: PhotoSource::Pexels,
                ..
            }
        ));
        assert_eq!(pexels.calls(), 1);
    }

    #[tokio::test]
    async fn url_for_unconfigured_provider_reports_missing_key() {
        let agg = aggregator(vec![Arc::new(StubProvider::ok(PhotoSource::Pexels))]);
        let err = agg
            .search("https://unsplash.com/photos/eOLpJytrbsQ")
            .await
            .unwrap_err();
        assert!(matches!(err, StockError::MissingApiKey(PhotoSource::Unsplash)));
    }

    #[tokio::test]
    async fn search_text_can_target_one_provider() {
        let unsplash = Arc::new(StubProvider::ok(PhotoSource::Unsplash));
        let pexels = Arc::new(StubProvider::ok(PhotoSource::Pexels));
        let agg = aggregator(vec![unsplash.clone(), pexels.clone()]);

        let result = agg
            .search_text("fog", Some(PhotoSource::Pexels))
            .await
            .unwrap();

        assert_eq!(result.pages.len(), 1);
        assert_eq!(unsplash.calls(), 0);
    }

    #[tokio::test]
    async fn empty_query_is_rejected() {
        let agg = aggregator(vec![Arc::new(StubProvider::ok(PhotoSource::Pexels))]);
        assert!(matches!(
            agg.search("   ").await.unwrap_err(),
            StockError::Api(_)
        ));
    }

    #[test]
    fn tabs_put_preferred_provider_first() {
        let mut result = AggregateResult::default();
        for source in PhotoSource::ALL {
            result.pages.insert(source, SearchPage::empty(source));
        }
        assert_eq!(
            result.tabs(PhotoSource::Pixabay),
            vec![
                PhotoSource::Pixabay,
                PhotoSource::Unsplash,
                PhotoSource::Pexels
            ]
        );
    }
}
