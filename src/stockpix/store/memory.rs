use super::Vault;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};

/// In-memory vault for tests.
///
/// Uses `RefCell` since the CLI drives a single-threaded event loop.
pub struct MemoryVault {
    root: PathBuf,
    files: RefCell<BTreeMap<PathBuf, Vec<u8>>>,
    dirs: RefCell<BTreeSet<PathBuf>>,
    simulate_write_error: RefCell<bool>,
}

impl Default for MemoryVault {
    fn default() -> Self {
        Self {
            root: PathBuf::from("/vault"),
            files: RefCell::new(BTreeMap::new()),
            dirs: RefCell::new(BTreeSet::new()),
            simulate_write_error: RefCell::new(false),
        }
    }
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent write fail.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    /// Vault-relative paths of all stored files, sorted.
    pub fn files(&self) -> Vec<PathBuf> {
        self.files.borrow().keys().cloned().collect()
    }

    pub fn read_binary(&self, path: &Path) -> Option<Vec<u8>> {
        self.files.borrow().get(path).cloned()
    }

    fn check_writable(&self) -> io::Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "Simulated write error",
            ));
        }
        Ok(())
    }

    fn store(&self, path: &Path, bytes: Vec<u8>) -> io::Result<()> {
        self.check_writable()?;
        if let Some(parent) = path.parent() {
            self.dirs.borrow_mut().insert(parent.to_path_buf());
        }
        self.files.borrow_mut().insert(path.to_path_buf(), bytes);
        Ok(())
    }
}

impl Vault for MemoryVault {
    fn root(&self) -> &Path {
        &self.root
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.borrow().contains_key(path) || self.dirs.borrow().contains(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        self.check_writable()?;
        self.dirs.borrow_mut().insert(path.to_path_buf());
        Ok(())
    }

    fn write_binary(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        self.store(path, bytes.to_vec())
    }

    fn read_text(&self, path: &Path) -> io::Result<Option<String>> {
        self.files
            .borrow()
            .get(path)
            .map(|bytes| {
                String::from_utf8(bytes.clone())
                    .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
            })
            .transpose()
    }

    fn write_text(&self, path: &Path, content: &str) -> io::Result<()> {
        self.store(path, content.as_bytes().to_vec())
    }
}
