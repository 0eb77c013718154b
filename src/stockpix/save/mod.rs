//! # Saving Photos
//!
//! Turns a chosen [`Photo`] into a file in the vault plus a metadata block:
//!
//! 1. ensure the save folder exists
//! 2. download the image (retrying once with provider credentials when the provider
//!    offers them)
//! 3. pick a free filename, `<query>-<photo id>.<ext>`, suffixing `-1`, `-2`, ... on
//!    collision
//! 4. write the image
//! 5. render the metadata block and insert it into a note, if asked to
//!
//! A failed download writes nothing. A failed image write inserts nothing.

use crate::config::SearchSettings;
use crate::error::{Result, StockError};
use crate::http::{HttpRequest, HttpResponse, HttpTransport};
use crate::model::Photo;
use crate::providers::PhotoProvider;
use crate::store::Vault;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

pub mod metadata;

const DEFAULT_EXTENSION: &str = "jpg";
const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "webp", "gif", "avif"];
const MAX_STEM_LEN: usize = 60;

/// Where the metadata block goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insertion {
    /// Before the zero-based line `line` of `note`; past the end means append.
    Line { note: PathBuf, line: usize },
    Append { note: PathBuf },
    /// Only return the block.
    None,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SavedPhoto {
    /// Vault-relative image path.
    pub path: PathBuf,
    pub markdown: String,
    pub bytes: usize,
    /// Note that received the block, if any.
    pub note: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOptions {
    pub folder: PathBuf,
    pub include_ai: bool,
}

impl From<&SearchSettings> for SaveOptions {
    fn from(settings: &SearchSettings) -> Self {
        Self {
            folder: PathBuf::from(&settings.save_folder),
            include_ai: settings.include_ai,
        }
    }
}

pub struct Saver<'a> {
    vault: &'a dyn Vault,
    transport: &'a dyn HttpTransport,
    options: SaveOptions,
}

impl<'a> Saver<'a> {
    pub fn new(vault: &'a dyn Vault, transport: &'a dyn HttpTransport, options: SaveOptions) -> Self {
        Self {
            vault,
            transport,
            options,
        }
    }

    pub async fn save(
        &self,
        provider: &dyn PhotoProvider,
        photo: &Photo,
        query: &str,
        insertion: &Insertion,
    ) -> Result<SavedPhoto> {
        let result = self.save_inner(provider, photo, query, insertion).await;
        if let Err(e) = &result {
            error!(photo = %photo.id, error = %e, "save failed");
        }
        result
    }

    async fn save_inner(
        &self,
        provider: &dyn PhotoProvider,
        photo: &Photo,
        query: &str,
        insertion: &Insertion,
    ) -> Result<SavedPhoto> {
        let folder = &self.options.folder;
        self.vault
            .create_dir_all(folder)
            .map_err(|source| StockError::Write {
                path: self.vault.resolve(folder),
                source,
            })?;

        let response = self.download(provider, &photo.download_url).await?;

        let ext = image_extension(&photo.download_url, response.content_type.as_deref());
        let path = self.free_path(&file_stem(query, &photo.id), ext);
        self.vault
            .write_binary(&path, &response.body)
            .map_err(|source| StockError::Write {
                path: self.vault.resolve(&path),
                source,
            })?;
        debug!(path = %path.display(), bytes = response.body.len(), "image written");

        if let Err(e) = provider.track_download(photo).await {
            warn!(photo = %photo.id, error = %e, "download tracking failed");
        }

        let markdown = metadata::render_block(&metadata::MetadataInput {
            photo,
            image_path: &path,
            file_size: response.body.len(),
            query,
            include_ai: self.options.include_ai,
            saved_on: chrono::Local::now().date_naive(),
        });

        let note = self.insert(&markdown, insertion)?;
        Ok(SavedPhoto {
            path,
            markdown,
            bytes: response.body.len(),
            note,
        })
    }

    async fn download(&self, provider: &dyn PhotoProvider, url: &str) -> Result<HttpResponse> {
        match self.fetch(HttpRequest::get(url)).await {
            Ok(response) => Ok(response),
            Err(first) => match provider.download_auth() {
                Some((header, value)) => {
                    warn!(url, error = %first, "download failed, retrying with credentials");
                    self.fetch(HttpRequest::get(url).header(&header, value))
                        .await
                }
                None => Err(first),
            },
        }
    }

    async fn fetch(&self, request: HttpRequest) -> Result<HttpResponse> {
        let url = request.url.clone();
        let response = self
            .transport
            .get(request)
            .await
            .map_err(|e| StockError::Download {
                url: url.clone(),
                message: e.to_string(),
            })?;

        if !response.is_success() {
            return Err(StockError::Download {
                url,
                message: format!("HTTP {}", response.status),
            });
        }
        if response.body.is_empty() {
            return Err(StockError::Download {
                url,
                message: "empty response body".to_string(),
            });
        }
        Ok(response)
    }

    /// First of `stem.ext`, `stem-1.ext`, `stem-2.ext`, ... not present in the vault.
    fn free_path(&self, stem: &str, ext: &str) -> PathBuf {
        let folder = &self.options.folder;
        let mut candidate = folder.join(format!("{}.{}", stem, ext));
        let mut n = 1;
        while self.vault.exists(&candidate) {
            candidate = folder.join(format!("{}-{}.{}", stem, n, ext));
            n += 1;
        }
        candidate
    }

    fn insert(&self, block: &str, insertion: &Insertion) -> Result<Option<PathBuf>> {
        let (note, line) = match insertion {
            Insertion::None => return Ok(None),
            Insertion::Line { note, line } => (note, Some(*line)),
            Insertion::Append { note } => (note, None),
        };

        let write_err = |source| StockError::Write {
            path: self.vault.resolve(note),
            source,
        };
        let existing = self.vault.read_text(note).map_err(write_err)?;
        let updated = insert_block(existing.as_deref().unwrap_or(""), block, line);
        self.vault.write_text(note, &updated).map_err(write_err)?;
        Ok(Some(note.clone()))
    }
}

/// Inserts `block` before line `line` (zero-based), or appends when `line` is `None`
/// or past the end. The block is kept apart from neighbouring text by blank lines.
pub fn insert_block(content: &str, block: &str, line: Option<usize>) -> String {
    let newline = if content.contains("\r\n") { "\r\n" } else { "\n" };
    let lines: Vec<&str> = content.lines().collect();
    let at = line.unwrap_or(lines.len()).min(lines.len());
    let block = block.trim_end_matches('\n').replace('\n', newline);
    let block = block.as_str();

    let mut out: Vec<&str> = Vec::with_capacity(lines.len() + 4);
    out.extend_from_slice(&lines[..at]);
    if out.last().is_some_and(|l| !l.trim().is_empty()) {
        out.push("");
    }
    out.push(block);
    if lines.get(at).is_some_and(|l| !l.trim().is_empty()) {
        out.push("");
    }
    out.extend_from_slice(&lines[at..]);

    let mut result = out.join(newline);
    result.push_str(newline);
    result
}

/// `<query>-<photo id>`, lowercased, with anything unsafe collapsed to dashes.
pub fn file_stem(query: &str, photo_id: &str) -> String {
    let cleaned = sanitize_filename::sanitize(query);
    let mut slug = String::with_capacity(cleaned.len());
    for c in cleaned.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            slug.push(c);
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug: String = slug.trim_matches('-').chars().take(MAX_STEM_LEN).collect();
    let slug = slug.trim_end_matches('-');

    let id = sanitize_filename::sanitize(photo_id);
    if slug.is_empty() {
        id
    } else {
        format!("{}-{}", slug, id)
    }
}

/// Extension from the URL path, then an `fm=` query parameter, then the content type.
pub fn image_extension(url: &str, content_type: Option<&str>) -> &'static str {
    if let Ok(parsed) = url::Url::parse(url) {
        let from_path = parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .and_then(|name| name.rsplit_once('.'))
            .and_then(|(_, ext)| known_extension(ext));
        if let Some(ext) = from_path {
            return ext;
        }
        let from_query = parsed
            .query_pairs()
            .find(|(key, _)| key == "fm")
            .and_then(|(_, value)| known_extension(&value));
        if let Some(ext) = from_query {
            return ext;
        }
    }

    match content_type.map(|ct| ct.split(';').next().unwrap_or("").trim()) {
        Some("image/png") => "png",
        Some("image/webp") => "webp",
        Some("image/gif") => "gif",
        Some("image/avif") => "avif",
        _ => DEFAULT_EXTENSION,
    }
}

fn known_extension(ext: &str) -> Option<&'static str> {
    let ext = ext.to_ascii_lowercase();
    IMAGE_EXTENSIONS.into_iter().find(|known| *known == ext)
}

/// Vault-relative form of `path` when it lies inside `root`.
pub fn vault_relative(root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(root)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf())
}
