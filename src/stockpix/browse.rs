//! # Browse Session State
//!
//! Results grouped into one tab per provider, each paging independently. The state is
//! driven by [`Msg`] values through [`BrowseState::update`], which mutates the state and
//! returns the [`Effect`]s the event loop must perform. It does no I/O itself.
//!
//! ## Per-tab lifecycle
//!
//! ```text
//! loaded(page N) --Next/Previous--> loading(page M) --Loaded--> loaded(page M)
//!                                                  \--Failed--> loaded(page N)
//! ```
//!
//! A tab has at most one fetch in flight; paging requests while it is loading are
//! ignored. The loading flag is always cleared before a render is requested, so the
//! renderer never shows a stale spinner. After [`Msg::Close`] every message is dropped.

use crate::aggregator::AggregateResult;
use crate::model::{Photo, PhotoSource, SearchPage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaginationState {
    pub current_page: u32,
    pub total_pages: u32,
    pub is_loading: bool,
}

impl PaginationState {
    pub fn has_more(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderTab {
    pub source: PhotoSource,
    pub photos: Vec<Photo>,
    pub total_results: u64,
    pub pagination: PaginationState,
}

impl ProviderTab {
    pub fn from_page(page: SearchPage) -> Self {
        Self {
            source: page.source,
            total_results: page.total_results,
            pagination: PaginationState {
                current_page: page.page,
                total_pages: page.total_pages,
                is_loading: false,
            },
            photos: page.photos,
        }
    }

    fn apply(&mut self, page: SearchPage) {
        self.pagination.current_page = page.page;
        self.pagination.total_pages = page.total_pages;
        self.total_results = page.total_results;
        self.photos = page.photos;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    Next(PhotoSource),
    Previous(PhotoSource),
    Loaded(SearchPage),
    Failed {
        source: PhotoSource,
        page: u32,
        error: String,
    },
    SelectTab(PhotoSource),
    Close,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Fetch { source: PhotoSource, page: u32 },
    Render,
    Notify(String),
}

#[derive(Debug, Clone)]
pub struct BrowseState {
    query: String,
    tabs: Vec<ProviderTab>,
    active: usize,
    closed: bool,
}

impl BrowseState {
    /// Tabs from an aggregate search, `preferred` first when it has results.
    pub fn new(result: AggregateResult, preferred: PhotoSource) -> Self {
        let order = result.tabs(preferred);
        let mut pages = result.pages;
        let tabs = order
            .into_iter()
            .filter_map(|source| pages.remove(&source))
            .map(ProviderTab::from_page)
            .collect();
        Self {
            query: result.query,
            tabs,
            active: 0,
            closed: false,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn tabs(&self) -> &[ProviderTab] {
        &self.tabs
    }

    pub fn active_tab(&self) -> Option<&ProviderTab> {
        self.tabs.get(self.active)
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn is_loading(&self, source: PhotoSource) -> bool {
        self.tab(source).is_some_and(|t| t.pagination.is_loading)
    }

    fn tab(&self, source: PhotoSource) -> Option<&ProviderTab> {
        self.tabs.iter().find(|t| t.source == source)
    }

    fn tab_mut(&mut self, source: PhotoSource) -> Option<&mut ProviderTab> {
        self.tabs.iter_mut().find(|t| t.source == source)
    }

    pub fn update(&mut self, msg: Msg) -> Vec<Effect> {
        if self.closed {
            return Vec::new();
        }

        match msg {
            Msg::Next(source) => self.request_page(source, 1),
            Msg::Previous(source) => self.request_page(source, -1),
            Msg::Loaded(page) => {
                let Some(tab) = self.tab_mut(page.source) else {
                    return Vec::new();
                };
                if !tab.pagination.is_loading {
                    return Vec::new();
                }
                tab.pagination.is_loading = false;
                tab.apply(page);
                vec![Effect::Render]
            }
            Msg::Failed {
                source,
                page,
                error,
            } => {
                let Some(tab) = self.tab_mut(source) else {
                    return Vec::new();
                };
                if !tab.pagination.is_loading {
                    return Vec::new();
                }
                // The previous page's photos and cursor were never replaced.
                tab.pagination.is_loading = false;
                vec![
                    Effect::Notify(format!(
                        "Could not load page {} from {}: {}",
                        page, source, error
                    )),
                    Effect::Render,
                ]
            }
            Msg::SelectTab(source) => match self.tabs.iter().position(|t| t.source == source) {
                Some(index) => {
                    self.active = index;
                    vec![Effect::Render]
                }
                None => vec![Effect::Notify(format!("No results from {}", source))],
            },
            Msg::Close => {
                self.closed = true;
                Vec::new()
            }
        }
    }

    fn request_page(&mut self, source: PhotoSource, step: i32) -> Vec<Effect> {
        let Some(tab) = self.tab_mut(source) else {
            return Vec::new();
        };
        let pagination = &mut tab.pagination;
        if pagination.is_loading {
            return Vec::new();
        }
        let target = match step {
            s if s > 0 && pagination.has_more() => pagination.current_page + 1,
            s if s < 0 && pagination.has_previous() => pagination.current_page - 1,
            _ => return Vec::new(),
        };
        pagination.is_loading = true;
        vec![Effect::Fetch {
            source,
            page: target,
        }]
    }
}
