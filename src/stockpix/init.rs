use crate::api::StockApi;
use crate::commands::VaultPaths;
use crate::config::SearchSettings;
use crate::error::Result;
use crate::http::ReqwestTransport;
use crate::store::FsVault;
use directories::BaseDirs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Directories that mark a vault root.
const VAULT_MARKERS: [&str; 2] = [VaultPaths::CONFIG_DIR_NAME, ".obsidian"];

pub struct StockContext {
    pub api: StockApi<FsVault>,
}

/// Find the vault root by walking up from cwd looking for a directory that has
/// `.stockpix` or `.obsidian`. Returns None if none is found before reaching home or
/// root.
pub fn find_vault_root(cwd: &Path) -> Option<PathBuf> {
    let home_dir = BaseDirs::new().map(|bd| bd.home_dir().to_path_buf());
    let mut current = cwd.to_path_buf();

    loop {
        if VAULT_MARKERS.iter().any(|m| current.join(m).is_dir()) {
            return Some(current);
        }

        if let Some(ref home) = home_dir {
            if &current == home {
                return None;
            }
        }

        match current.parent() {
            Some(parent) if parent != current => {
                current = parent.to_path_buf();
            }
            _ => return None,
        }
    }
}

/// Resolves the vault, loads its settings (environment keys win) and builds the API.
pub fn initialize(cwd: &Path, vault_override: Option<&Path>) -> Result<StockContext> {
    let root = match vault_override {
        Some(dir) if dir.is_absolute() => dir.to_path_buf(),
        Some(dir) => cwd.join(dir),
        None => find_vault_root(cwd).unwrap_or_else(|| cwd.to_path_buf()),
    };
    debug!(vault = %root.display(), "using vault");

    let paths = VaultPaths::new(&root);
    let settings =
        SearchSettings::load(&paths.config_dir)?.with_env_overrides(|name| std::env::var(name).ok());
    let transport = Arc::new(ReqwestTransport::new()?);

    let api = StockApi::new(FsVault::new(root), paths, settings, transport);
    Ok(StockContext { api })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn finds_stockpix_marker() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir(root.join(".stockpix")).unwrap();

        assert_eq!(find_vault_root(root), Some(root.to_path_buf()));
    }

    #[test]
    fn walks_up_to_obsidian_vault() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        let nested = root.join("journal/2026");
        fs::create_dir_all(&nested).unwrap();
        fs::create_dir(root.join(".obsidian")).unwrap();

        assert_eq!(find_vault_root(&nested), Some(root.to_path_buf()));
    }

    #[test]
    fn marker_file_is_not_a_vault() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("plain");
        fs::create_dir(&root).unwrap();
        fs::write(root.join(".obsidian"), "").unwrap();

        assert_ne!(find_vault_root(&root), Some(root.clone()));
    }

    #[test]
    fn override_wins_over_discovery() {
        let temp = TempDir::new().unwrap();
        let cwd = temp.path();
        fs::create_dir(cwd.join(".obsidian")).unwrap();

        let ctx = initialize(cwd, Some(Path::new("other"))).unwrap();
        assert_eq!(ctx.api.paths().root, cwd.join("other"));
        assert_eq!(ctx.api.paths().config_dir, cwd.join("other/.stockpix"));
    }
}
