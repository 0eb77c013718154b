//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single entry point
//! for every stockpix operation, whatever the UI.
//!
//! The facade:
//! - **Owns** the settings, the provider adapters and the vault for one session
//! - **Dispatches** to the matching command function
//! - **Returns structured types** (`Result<CmdResult>`), never formatted text
//!
//! Settings are read once, when the facade is built, and handed to the adapters. The
//! `config` operation edits the settings file and does not touch the running session.
//!
//! `StockApi<V: Vault>` is generic over the vault so the whole surface can be exercised
//! against `MemoryVault` and scripted providers.

use crate::aggregator::Aggregator;
use crate::commands::{self, config::ConfigAction, CmdResult, VaultPaths};
use crate::config::SearchSettings;
use crate::error::Result;
use crate::http::HttpTransport;
use crate::model::{Photo, PhotoSource, SearchPage};
use crate::providers::{self, PhotoProvider};
use crate::save::{Insertion, SaveOptions, Saver};
use crate::store::Vault;
use std::sync::Arc;

pub struct StockApi<V: Vault> {
    vault: V,
    paths: VaultPaths,
    settings: SearchSettings,
    transport: Arc<dyn HttpTransport>,
    aggregator: Aggregator,
}

impl<V: Vault> StockApi<V> {
    pub fn new(
        vault: V,
        paths: VaultPaths,
        settings: SearchSettings,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        let adapters = providers::build_all(&settings, Arc::clone(&transport));
        Self::with_providers(vault, paths, settings, transport, adapters)
    }

    /// Builds the facade around an explicit set of adapters.
    pub fn with_providers(
        vault: V,
        paths: VaultPaths,
        settings: SearchSettings,
        transport: Arc<dyn HttpTransport>,
        adapters: Vec<Arc<dyn PhotoProvider>>,
    ) -> Self {
        Self {
            vault,
            paths,
            settings,
            transport,
            aggregator: Aggregator::new(adapters),
        }
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    pub fn paths(&self) -> &VaultPaths {
        &self.paths
    }

    pub fn vault(&self) -> &V {
        &self.vault
    }

    /// Provider whose results are listed first.
    pub fn preferred_provider(&self) -> PhotoSource {
        self.settings.default_provider
    }

    pub async fn search(&self, query: &str, only: Option<PhotoSource>) -> Result<CmdResult> {
        commands::search::run(&self.aggregator, query, only).await
    }

    /// One more page from one provider, for browsing.
    pub async fn fetch_page(
        &self,
        source: PhotoSource,
        query: &str,
        page: u32,
    ) -> Result<SearchPage> {
        self.aggregator.search_provider(source, query, page).await
    }

    pub async fn save(&self, target: &str, query: &str, insertion: &Insertion) -> Result<CmdResult> {
        let saver = self.saver();
        commands::save::run(&self.aggregator, &saver, target, query, insertion).await
    }

    pub async fn save_photo(
        &self,
        photo: &Photo,
        query: &str,
        insertion: &Insertion,
    ) -> Result<CmdResult> {
        let saver = self.saver();
        commands::save::save_photo(&self.aggregator, &saver, photo, query, insertion).await
    }

    pub fn config(&self, action: ConfigAction) -> Result<CmdResult> {
        commands::config::run(&self.paths, action)
    }

    pub fn init(&self) -> Result<CmdResult> {
        commands::init::run(&self.paths)
    }

    fn saver(&self) -> Saver<'_> {
        Saver::new(
            &self.vault,
            self.transport.as_ref(),
            SaveOptions::from(&self.settings),
        )
    }
}
