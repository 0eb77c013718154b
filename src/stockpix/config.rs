use crate::error::{Result, StockError};
use crate::model::{ImageSize, PhotoSource};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const SETTINGS_FILENAME: &str = "settings.json";
const DEFAULT_SAVE_FOLDER: &str = "attachments/stock";

/// Keys accepted by `config get/set`, in display order.
pub const SETTING_KEYS: [&str; 7] = [
    "unsplash-key",
    "pexels-key",
    "pixabay-key",
    "save-folder",
    "image-size",
    "include-ai",
    "default-provider",
];

/// User settings, stored in `<vault>/.stockpix/settings.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchSettings {
    #[serde(default)]
    pub unsplash_key: Option<String>,

    #[serde(default)]
    pub pexels_key: Option<String>,

    #[serde(default)]
    pub pixabay_key: Option<String>,

    /// Vault-relative folder that receives downloaded images
    #[serde(default = "default_save_folder")]
    pub save_folder: String,

    #[serde(default)]
    pub image_size: ImageSize,

    /// Keep photos the provider flags as AI generated
    #[serde(default)]
    pub include_ai: bool,

    /// Tab shown first when results are grouped by provider
    #[serde(default)]
    pub default_provider: PhotoSource,
}

fn default_save_folder() -> String {
    DEFAULT_SAVE_FOLDER.to_string()
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            unsplash_key: None,
            pexels_key: None,
            pixabay_key: None,
            save_folder: default_save_folder(),
            image_size: ImageSize::default(),
            include_ai: false,
            default_provider: PhotoSource::default(),
        }
    }
}

impl SearchSettings {
    /// Load settings from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let path = config_dir.as_ref().join(SETTINGS_FILENAME);

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(StockError::Io)?;
        let settings: SearchSettings =
            serde_json::from_str(&content).map_err(StockError::Serialization)?;
        Ok(settings)
    }

    /// Save settings to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(StockError::Io)?;
        }

        let path = config_dir.join(SETTINGS_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(StockError::Serialization)?;
        fs::write(path, content).map_err(StockError::Io)?;
        Ok(())
    }

    /// Replaces stored keys with values found through `lookup` (normally `std::env::var`).
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        for source in PhotoSource::ALL {
            if let Some(key) = lookup(source.key_env_var()).filter(|k| !k.trim().is_empty()) {
                self.set_api_key(source, Some(key));
            }
        }
        self
    }

    /// The API key for `source`, ignoring blank values.
    pub fn api_key(&self, source: PhotoSource) -> Option<&str> {
        let key = match source {
            PhotoSource::Unsplash => &self.unsplash_key,
            PhotoSource::Pexels => &self.pexels_key,
            PhotoSource::Pixabay => &self.pixabay_key,
        };
        key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    pub fn set_api_key(&mut self, source: PhotoSource, key: Option<String>) {
        let key = key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        match source {
            PhotoSource::Unsplash => self.unsplash_key = key,
            PhotoSource::Pexels => self.pexels_key = key,
            PhotoSource::Pixabay => self.pixabay_key = key,
        }
    }

    /// Providers that have a key, in canonical order.
    pub fn configured_sources(&self) -> Vec<PhotoSource> {
        PhotoSource::ALL
            .into_iter()
            .filter(|s| self.api_key(*s).is_some())
            .collect()
    }

    /// Display value for a key. API keys are masked.
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "unsplash-key" => mask_key(self.api_key(PhotoSource::Unsplash)),
            "pexels-key" => mask_key(self.api_key(PhotoSource::Pexels)),
            "pixabay-key" => mask_key(self.api_key(PhotoSource::Pixabay)),
            "save-folder" => self.save_folder.clone(),
            "image-size" => self.image_size.to_string(),
            "include-ai" => self.include_ai.to_string(),
            "default-provider" => self.default_provider.name().to_string(),
            _ => return None,
        };
        Some(value)
    }

    /// Sets a key from its string form. An empty value clears an API key.
    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        match key {
            "unsplash-key" => self.set_api_key(PhotoSource::Unsplash, Some(value.to_string())),
            "pexels-key" => self.set_api_key(PhotoSource::Pexels, Some(value.to_string())),
            "pixabay-key" => self.set_api_key(PhotoSource::Pixabay, Some(value.to_string())),
            "save-folder" => {
                let folder = value.trim().trim_matches('/');
                if folder.is_empty() || folder.split('/').any(|part| part == "..") {
                    return Err(format!("Invalid save folder: '{}'", value));
                }
                self.save_folder = folder.to_string();
            }
            "image-size" => self.image_size = value.parse()?,
            "include-ai" => {
                self.include_ai = match value.trim().to_lowercase().as_str() {
                    "true" | "yes" | "on" | "1" => true,
                    "false" | "no" | "off" | "0" => false,
                    _ => return Err(format!("Invalid boolean for include-ai: '{}'", value)),
                }
            }
            "default-provider" => self.default_provider = value.parse()?,
            _ => return Err(format!("Unknown config key: {}", key)),
        }
        Ok(())
    }

    pub fn list_all(&self) -> Vec<(&'static str, String)> {
        SETTING_KEYS
            .iter()
            .filter_map(|k| self.get(k).map(|v| (*k, v)))
            .collect()
    }
}

fn mask_key(key: Option<&str>) -> String {
    match key {
        None => "(not set)".to_string(),
        Some(k) if k.chars().count() <= 4 => "****".to_string(),
        Some(k) => {
            let tail: String = k.chars().skip(k.chars().count() - 4).collect();
            format!("****{}", tail)
        }
    }
}
