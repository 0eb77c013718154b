//! # Commands
//!
//! One module per user-facing operation. Commands do the work and report back through
//! [`CmdResult`]: structured data for the renderer plus [`CmdMessage`]s.
//!
//! Expected failures (no keys configured, a photo that does not exist, a failed
//! download) become error messages on an otherwise normal result. Only unexpected
//! failures, such as an unreadable settings file, are returned as `Err`.

use crate::aggregator::AggregateResult;
use crate::config::SearchSettings;
use crate::model::Photo;
use crate::save::SavedPhoto;
use std::path::PathBuf;

pub mod config;
pub mod init;
pub mod save;
pub mod search;

/// Locations of one vault.
#[derive(Debug, Clone)]
pub struct VaultPaths {
    pub root: PathBuf,
    /// `<root>/.stockpix`, holding `settings.json`.
    pub config_dir: PathBuf,
}

impl VaultPaths {
    pub const CONFIG_DIR_NAME: &'static str = ".stockpix";

    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let config_dir = root.join(Self::CONFIG_DIR_NAME);
        Self { root, config_dir }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub search: Option<AggregateResult>,
    pub photo: Option<Photo>,
    pub saved: Option<SavedPhoto>,
    pub settings: Option<SearchSettings>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_search(mut self, search: AggregateResult) -> Self {
        self.search = Some(search);
        self
    }

    pub fn with_photo(mut self, photo: Photo) -> Self {
        self.photo = Some(photo);
        self
    }

    pub fn with_saved(mut self, saved: SavedPhoto) -> Self {
        self.saved = Some(saved);
        self
    }

    pub fn with_settings(mut self, settings: SearchSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn has_errors(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.level == MessageLevel::Error)
    }
}
