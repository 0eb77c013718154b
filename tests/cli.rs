use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

/// The binary pointed at `vault`, with no API keys leaking in from the environment.
fn stockpix(vault: &Path) -> Command {
    let mut cmd = Command::cargo_bin("stockpix").unwrap();
    cmd.current_dir(vault)
        .env_remove("UNSPLASH_ACCESS_KEY")
        .env_remove("PEXELS_API_KEY")
        .env_remove("PIXABAY_API_KEY")
        .env_remove("RUST_LOG")
        .env("STOCKPIX_VAULT", vault);
    cmd
}

#[test]
fn init_creates_settings_folder() {
    let temp = tempfile::tempdir().unwrap();

    stockpix(temp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized stockpix"));

    assert!(temp.path().join(".stockpix/settings.json").exists());
}

#[test]
fn config_set_then_show() {
    let temp = tempfile::tempdir().unwrap();

    stockpix(temp.path())
        .args(["config", "pexels-key", "abcdef123456"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pexels-key set to ****3456"))
        .stdout(predicate::str::contains("abcdef").not());

    stockpix(temp.path())
        .args(["config", "pexels-key"])
        .assert()
        .success()
        .stdout(predicate::str::contains("****3456"));

    stockpix(temp.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("pexels-key"))
        .stdout(predicate::str::contains("save-folder"))
        .stdout(predicate::str::contains("attachments/stock"));
}

#[test]
fn config_rejects_bad_values() {
    let temp = tempfile::tempdir().unwrap();

    stockpix(temp.path())
        .args(["config", "image-size", "huge"])
        .assert()
        .failure();

    stockpix(temp.path())
        .args(["config", "colour"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key: colour"));
}

#[test]
fn search_without_keys_explains_setup() {
    let temp = tempfile::tempdir().unwrap();

    stockpix(temp.path())
        .args(["search", "misty", "forest"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No API keys configured"));
}

#[test]
fn single_provider_search_names_the_missing_key() {
    let temp = tempfile::tempdir().unwrap();

    stockpix(temp.path())
        .args(["search", "-p", "pixabay", "fox"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("PIXABAY_API_KEY"));
}

#[test]
fn save_rejects_unknown_targets() {
    let temp = tempfile::tempdir().unwrap();

    stockpix(temp.path())
        .args(["save", "https://example.com/cat.jpg"])
        .assert()
        .failure();

    assert!(!temp.path().join("attachments").exists());
}

#[test]
fn line_requires_note() {
    let temp = tempfile::tempdir().unwrap();

    stockpix(temp.path())
        .args(["save", "pexels-1", "--line", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--note"));
}
