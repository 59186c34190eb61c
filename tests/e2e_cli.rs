//! CLI end-to-end tests
//!
//! Tests for the episodist command-line interface.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::{tempdir, TempDir};

/// Get a command for the episodist binary
#[allow(deprecated)]
fn episodist_cmd() -> Command {
    let mut cmd = Command::cargo_bin("episodist").unwrap();
    for var in [
        "EPISODIST_EXTENSIONS",
        "EPISODIST_YEAR",
        "EPISODIST_SEASON",
        "EPISODIST_EPISODE",
        "EPISODIST_EPISODE_PADDING",
        "EPISODIST_MKVPROPEDIT",
        "EPISODIST_MKVEXTRACT",
        "EPISODIST_LOG_LEVEL",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

/// Episode files whose contents are their own names, plus a config beside them.
fn episode_dir(names: &[&str]) -> (TempDir, PathBuf, PathBuf) {
    let temp = tempdir().unwrap();
    let media = temp.path().join("media");
    fs::create_dir(&media).unwrap();
    for name in names {
        fs::write(media.join(name), name.as_bytes()).unwrap();
    }
    let config = temp.path().join("episodist.toml");
    fs::write(&config, "[naming]\ndefault_year = 2020\n").unwrap();
    (temp, media, config)
}

fn names_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

#[test]
fn test_cli_no_args_shows_help() {
    let mut cmd = episodist_cmd();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_help_flag() {
    let mut cmd = episodist_cmd();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("episodist"))
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("Rename and tag TV episode files"));
}

#[test]
fn test_cli_version_flag() {
    let mut cmd = episodist_cmd();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("episodist"));
}

#[test]
fn test_cli_version_command() {
    let mut cmd = episodist_cmd();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_process_help() {
    let mut cmd = episodist_cmd();
    cmd.args(["process", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Number, rename and tag"))
        .stdout(predicate::str::contains("--dry-run"));
}

#[test]
fn test_cli_genres_lists_labels() {
    let mut cmd = episodist_cmd();
    cmd.arg("genres")
        .assert()
        .success()
        .stdout(predicate::str::contains("Science Fiction"))
        .stdout(predicate::str::contains("Drama"));
}

#[test]
fn test_cli_check_tools_command() {
    let (_temp, _media, config) = episode_dir(&[]);
    let mut cmd = episodist_cmd();
    cmd.arg("check-tools")
        .arg("-c")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("mkvpropedit"));
}

#[test]
fn test_cli_scan_lists_media_files() {
    let (_temp, media, config) = episode_dir(&["Show.S01E02.mkv", "b.mp4", "notes.txt"]);

    let mut cmd = episodist_cmd();
    cmd.arg("scan")
        .arg(&media)
        .arg("-c")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 media files"))
        .stdout(predicate::str::contains("S01E02"))
        .stdout(predicate::str::contains("notes.txt").not());
}

#[test]
fn test_cli_scan_json() {
    let (_temp, media, config) = episode_dir(&["a.mp4"]);

    let output = episodist_cmd()
        .arg("scan")
        .arg(&media)
        .arg("--json")
        .arg("-c")
        .arg(&config)
        .output()
        .unwrap();
    assert!(output.status.success());

    let files: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(files.as_array().unwrap().len(), 1);
}

#[test]
fn test_cli_scan_nonexistent_dir() {
    let (_temp, _media, config) = episode_dir(&[]);
    let mut cmd = episodist_cmd();
    cmd.args(["scan", "/nonexistent/episodes"])
        .arg("-c")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot scan"));
}

#[test]
fn test_cli_process_renames_directory() {
    let (_temp, media, config) = episode_dir(&["a.mp4", "b.mp4", "c.mkv"]);

    let mut cmd = episodist_cmd();
    cmd.arg("process")
        .arg(&media)
        .args(["--title", "Show", "--genre", "drama", "--no-metadata"])
        .arg("-c")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("3 files: 3 succeeded"));

    assert_eq!(
        names_in(&media),
        vec!["Show - S01E01.mp4", "Show - S01E02.mp4", "Show - S01E03.mkv"]
    );
    assert_eq!(
        fs::read_to_string(media.join("Show - S01E03.mkv")).unwrap(),
        "c.mkv"
    );
}

#[test]
fn test_cli_process_explicit_files_keep_argument_order() {
    let (_temp, media, config) = episode_dir(&["a.mp4", "b.mp4"]);

    let mut cmd = episodist_cmd();
    cmd.arg("process")
        .arg(media.join("b.mp4"))
        .arg(media.join("a.mp4"))
        .args(["-t", "Show", "-g", "Comedy", "-s", "2", "-e", "9", "--padding", "3"])
        .arg("--no-metadata")
        .arg("-c")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ S02E009 b.mp4"))
        .stdout(predicate::str::contains("2 renamed"));

    assert_eq!(
        fs::read_to_string(media.join("Show - S02E009.mp4")).unwrap(),
        "b.mp4"
    );
    assert_eq!(
        fs::read_to_string(media.join("Show - S02E010.mp4")).unwrap(),
        "a.mp4"
    );
}

#[test]
fn test_cli_process_dry_run_changes_nothing() {
    let (_temp, media, config) = episode_dir(&["a.mp4", "b.mp4"]);

    let mut cmd = episodist_cmd();
    cmd.arg("process")
        .arg(&media)
        .args(["--title", "Show", "--genre", "Drama", "--dry-run"])
        .arg("-c")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("[DRY RUN] 2 files would be processed"))
        .stdout(predicate::str::contains("a.mp4 -> Show - S01E01.mp4"));

    assert_eq!(names_in(&media), vec!["a.mp4", "b.mp4"]);
}

#[test]
fn test_cli_process_dry_run_honours_padding() {
    let (_temp, media, config) = episode_dir(&["a.mp4", "b.mp4"]);

    let mut cmd = episodist_cmd();
    cmd.arg("process")
        .arg(&media)
        .args(["--title", "Show", "--genre", "Drama", "--padding", "3", "--dry-run"])
        .arg("-c")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("S01E001  a.mp4 -> Show - S01E001.mp4"))
        .stdout(predicate::str::contains("S01E002  b.mp4 -> Show - S01E002.mp4"));

    assert_eq!(names_in(&media), vec!["a.mp4", "b.mp4"]);
}

#[test]
fn test_cli_process_collision_fails() {
    let (_temp, media, config) = episode_dir(&["a.mp4", "b.mp4"]);
    fs::write(media.join("Show - S01E02.mp4"), "taken").unwrap();

    let mut cmd = episodist_cmd();
    cmd.arg("process")
        .arg(media.join("a.mp4"))
        .arg(media.join("b.mp4"))
        .args(["--title", "Show", "--genre", "Drama", "--no-metadata"])
        .arg("-c")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("1 of 2 files failed"));

    assert!(media.join("Show - S01E01.mp4").exists());
    assert!(media.join("b.mp4").exists());
    assert_eq!(
        fs::read_to_string(media.join("Show - S01E02.mp4")).unwrap(),
        "taken"
    );
}

#[test]
fn test_cli_process_invalid_genre() {
    let (_temp, media, config) = episode_dir(&["a.mp4"]);

    let mut cmd = episodist_cmd();
    cmd.arg("process")
        .arg(&media)
        .args(["--title", "Show", "--genre", "Polka"])
        .arg("-c")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown genre"));

    assert_eq!(names_in(&media), vec!["a.mp4"]);
}

#[test]
fn test_cli_process_requires_title() {
    let (_temp, media, _config) = episode_dir(&["a.mp4"]);
    let mut cmd = episodist_cmd();
    cmd.arg("process")
        .arg(&media)
        .args(["--genre", "Drama"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--title"));
}

#[test]
fn test_cli_validate_good_config() {
    let (_temp, _media, config) = episode_dir(&[]);
    let mut cmd = episodist_cmd();
    cmd.arg("validate")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("year 2020"));
}

#[test]
fn test_cli_validate_bad_config() {
    let temp = tempdir().unwrap();
    let config = temp.path().join("bad.toml");
    fs::write(&config, "[naming]\nepisode_padding = 7\n").unwrap();

    let mut cmd = episodist_cmd();
    cmd.arg("validate")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("episode_padding"));
}
