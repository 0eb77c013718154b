//! # Vault Storage
//!
//! Everything stockpix writes lands inside the user's vault: downloaded images and the
//! notes that receive metadata blocks. The [`Vault`] trait keeps the saver independent
//! of the filesystem.
//!
//! ## Implementations
//!
//! - [`fs::FsVault`]: the real vault directory on disk. Writes go to a temporary file
//!   first and are renamed into place, so a failed write never leaves half an image.
//! - [`memory::MemoryVault`]: an in-memory vault for tests, with switchable write
//!   failures.
//!
//! All paths are relative to the vault root. An absolute path is used as given.

use std::io;
use std::path::{Path, PathBuf};

pub mod fs;
pub mod memory;

pub use fs::FsVault;
pub use memory::MemoryVault;

pub trait Vault {
    /// Absolute location of the vault root, used in messages.
    fn root(&self) -> &Path;

    fn exists(&self, path: &Path) -> bool;

    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Writes (or replaces) a binary file.
    fn write_binary(&self, path: &Path, bytes: &[u8]) -> io::Result<()>;

    /// Reads a text file. `Ok(None)` when it does not exist.
    fn read_text(&self, path: &Path) -> io::Result<Option<String>>;

    fn write_text(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Absolute form of a vault-relative path.
    fn resolve(&self, path: &Path) -> PathBuf {
        self.root().join(path)
    }
}
