use crate::commands::{CmdMessage, CmdResult, VaultPaths};
use crate::config::SearchSettings;
use crate::error::Result;
use std::fs;

pub fn run(paths: &VaultPaths) -> Result<CmdResult> {
    fs::create_dir_all(&paths.config_dir)?;
    let settings = SearchSettings::load(&paths.config_dir)?;
    settings.save(&paths.config_dir)?;

    let mut result = CmdResult::default().with_settings(settings);
    result.add_message(CmdMessage::success(format!(
        "Initialized stockpix in {}",
        paths.config_dir.display()
    )));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn creates_settings_file_and_keeps_existing_values() {
        let dir = tempdir().unwrap();
        let paths = VaultPaths::new(dir.path());

        run(&paths).unwrap();
        assert!(paths.config_dir.join("settings.json").exists());

        let mut settings = SearchSettings::load(&paths.config_dir).unwrap();
        settings.set("save-folder", "img").unwrap();
        settings.save(&paths.config_dir).unwrap();

        let result = run(&paths).unwrap();
        assert_eq!(result.settings.unwrap().save_folder, "img");
    }
}
