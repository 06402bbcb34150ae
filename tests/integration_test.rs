//! End-to-end runs of the tarbak binary against a throwaway base directory.
//! These spawn the real tar from PATH.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;

const KEY_A: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";

fn tarbak() -> Command {
    Command::cargo_bin("tarbak").unwrap()
}

/// Base dir plus a small target tree worth archiving.
fn fixture() -> (tempfile::TempDir, PathBuf, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("backup");
    let target = dir.path().join("data");
    fs::create_dir_all(&target).unwrap();
    fs::write(target.join("hello.txt"), b"hello backup").unwrap();
    fs::write(target.join("app.log"), b"noise").unwrap();
    (dir, base, target)
}

fn fs_entries(base: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(base.join("fs"))
        .map(|entries| {
            entries
                .flatten()
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

fn artifact_key(file_name: &str) -> &str {
    // db_{key}_{ts}_{tag}.tgz
    file_name.split('_').nth(1).unwrap()
}

#[test]
fn scenario_a_empty_base_produces_full_artifact_and_snar() {
    let (_dir, base, target) = fixture();

    tarbak()
        .args(["-n", "db", "-t"])
        .arg(&target)
        .arg("-b")
        .arg(&base)
        .assert()
        .success()
        .stdout(predicate::str::contains("Generate new key:"))
        .stdout(predicate::str::contains("New full backup:"))
        .stdout(predicate::str::contains("Backup file size:"));

    let entries = fs_entries(&base);
    let artifacts: Vec<&String> = entries.iter().filter(|n| n.ends_with(".tgz")).collect();
    let snars: Vec<&String> = entries.iter().filter(|n| n.ends_with(".snar")).collect();

    assert_eq!(artifacts.len(), 1);
    assert_eq!(snars.len(), 1);

    let artifact = artifacts[0];
    assert!(artifact.starts_with("db_"));
    assert!(artifact.ends_with("_full.tgz"));

    let key = artifact_key(artifact);
    assert_eq!(key.len(), 32);
    assert_eq!(snars[0].as_str(), format!("db_{key}.snar"));
}

#[test]
fn scenario_b_second_run_is_incremental_with_same_key() {
    let (_dir, base, target) = fixture();

    tarbak()
        .args(["-n", "db", "-t"])
        .arg(&target)
        .arg("-b")
        .arg(&base)
        .assert()
        .success();

    let first_key = {
        let entries = fs_entries(&base);
        let full = entries.iter().find(|n| n.ends_with("_full.tgz")).unwrap();
        artifact_key(full).to_string()
    };

    fs::write(target.join("more.txt"), b"changed since full").unwrap();

    tarbak()
        .args(["-n", "db", "-t"])
        .arg(&target)
        .arg("-b")
        .arg(&base)
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("Existing key: {first_key}")))
        .stdout(predicate::str::contains("New incremental backup:"));

    let entries = fs_entries(&base);
    let incr: Vec<&String> = entries.iter().filter(|n| n.ends_with("_incr.tgz")).collect();
    assert_eq!(incr.len(), 1);
    assert_eq!(artifact_key(incr[0]), first_key);
}

#[test]
fn chain_is_recovered_from_artifact_filename_without_a_record() {
    let (_dir, base, target) = fixture();
    fs::create_dir_all(base.join("fs")).unwrap();
    fs::write(
        base.join("fs").join(format!("db_{KEY_A}_2024-01-01-00-00-00_full.tgz")),
        b"",
    )
    .unwrap();

    tarbak()
        .args(["-n", "db", "-t"])
        .arg(&target)
        .arg("-b")
        .arg(&base)
        .assert()
        .success()
        .stdout(predicate::str::contains("Found full backup:"))
        .stdout(predicate::str::contains(format!("Existing key: {KEY_A}")));

    // no snar for that key existed, so the run is still tagged full
    let entries = fs_entries(&base);
    assert!(entries
        .iter()
        .any(|n| n.starts_with(&format!("db_{KEY_A}_")) && n.ends_with("_full.tgz") && !n.contains("2024-01-01")));
}

#[test]
fn scenario_c_force_starts_a_new_chain() {
    let (_dir, base, target) = fixture();

    tarbak()
        .args(["-n", "db", "-t"])
        .arg(&target)
        .arg("-b")
        .arg(&base)
        .assert()
        .success();

    let first_key = {
        let entries = fs_entries(&base);
        let full = entries.iter().find(|n| n.ends_with("_full.tgz")).unwrap();
        artifact_key(full).to_string()
    };

    tarbak()
        .args(["-n", "db", "-f", "-t"])
        .arg(&target)
        .arg("-b")
        .arg(&base)
        .assert()
        .success()
        .stdout(predicate::str::contains("Forced full backup"))
        .stdout(predicate::str::contains("Generate new key:"));

    let entries = fs_entries(&base);
    let fulls: Vec<&String> = entries.iter().filter(|n| n.ends_with("_full.tgz")).collect();
    assert_eq!(fulls.len(), 2);
    assert!(fulls.iter().any(|n| artifact_key(n) != first_key));
}

#[test]
fn scenario_d_missing_exclude_file_exits_3_without_artifacts() {
    let (_dir, base, target) = fixture();

    tarbak()
        .args(["-n", "db", "-e", "/no/such/file", "-t"])
        .arg(&target)
        .arg("-b")
        .arg(&base)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("/no/such/file"));

    let entries = fs_entries(&base);
    assert!(!entries.iter().any(|n| n.ends_with(".tgz")));
    assert!(!entries.iter().any(|n| n.ends_with(".snar")));

    // the aborted run must not have recorded a chain either
    assert!(!base.join("conf").join("db.chain").exists());
}

#[test]
fn aborted_run_preserves_the_existing_chain_record() {
    let (_dir, base, target) = fixture();

    tarbak()
        .args(["-n", "db", "-t"])
        .arg(&target)
        .arg("-b")
        .arg(&base)
        .assert()
        .success();

    let record_path = base.join("conf").join("db.chain");
    let before = fs::read_to_string(&record_path).unwrap();

    // forced run that trips over the exclude check before tar
    tarbak()
        .args(["-n", "db", "-f", "-e", "/no/such/file", "-t"])
        .arg(&target)
        .arg("-b")
        .arg(&base)
        .assert()
        .code(3);

    assert_eq!(fs::read_to_string(&record_path).unwrap(), before);
}

#[test]
fn exclude_patterns_are_echoed_and_honored() {
    let (dir, base, target) = fixture();
    let exclude = dir.path().join("exclude.txt");
    fs::write(&exclude, "*.log\n").unwrap();

    tarbak()
        .args(["-n", "db", "-t"])
        .arg(&target)
        .arg("-b")
        .arg(&base)
        .arg("-e")
        .arg(&exclude)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exclude file(s): *.log"));
}

#[test]
fn missing_name_or_target_exits_1_with_usage() {
    tarbak()
        .args(["-n", "db"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("-n <name> -t <target>"));

    tarbak()
        .args(["-t", "/data"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("-n <name> -t <target>"));
}

#[test]
fn unknown_flag_exits_2() {
    tarbak().args(["--bogus"]).assert().code(2);
}
