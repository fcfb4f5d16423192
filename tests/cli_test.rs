use assert_cmd::Command;
use predicates::prelude::*;

fn clean_my_mac() -> Command {
    Command::cargo_bin("clean-my-mac").unwrap()
}

// ─── Help & version ──────────────────────────────────────────────────────────

#[test]
fn test_help_flag() {
    clean_my_mac()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("scan"))
        .stdout(predicate::str::contains("clean"))
        .stdout(predicate::str::contains("dup"))
        .stdout(predicate::str::contains("backups"));
}

#[test]
fn test_version_flag() {
    clean_my_mac()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("clean-my-mac"));
}

// ─── Category validation ─────────────────────────────────────────────────────

#[test]
fn test_scan_unknown_category_fails() {
    clean_my_mac()
        .args(["scan", "--categories", "nonexistent_xyz"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown category"))
        .stderr(predicate::str::contains("docker"));
}

#[test]
fn test_clean_unknown_category_fails() {
    clean_my_mac()
        .args(["clean", "--categories", "nonexistent_xyz", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown category"));
}

// ─── Dup command ─────────────────────────────────────────────────────────────

#[test]
fn test_dup_missing_path_fails() {
    clean_my_mac()
        .args(["dup", "/no/such/directory/anywhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_dup_finds_duplicates_in_tempdir() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("one.txt"), "identical file body here").unwrap();
    std::fs::write(dir.path().join("two.txt"), "identical file body here").unwrap();

    clean_my_mac()
        .args(["dup", dir.path().to_str().unwrap(), "--min-size", "1", "--quiet", "--format", "quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("two.txt"));
}

#[test]
fn test_dup_json_output() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("solo.txt"), "nothing matches this").unwrap();

    clean_my_mac()
        .args(["dup", dir.path().to_str().unwrap(), "--format", "json", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("total_wasted"));
}

// ─── Config command ──────────────────────────────────────────────────────────

#[test]
fn test_config_show() {
    clean_my_mac()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("backup_retention_days"))
        .stdout(predicate::str::contains("min_duplicate_size"));
}

#[test]
fn test_config_set_unknown_key_fails() {
    clean_my_mac()
        .args(["config", "set", "nonsense_key", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown config key"));
}

// ─── Completions ─────────────────────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    clean_my_mac()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("clean-my-mac"));
}
