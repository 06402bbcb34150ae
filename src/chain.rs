//! Chain resolution.
//!
//! Decides whether a run continues an existing full-backup chain
//! (incremental) or starts a new one (full). The resolved key names the
//! chain: it is embedded in every artifact filename and selects the snar
//! file tar uses for incremental tracking.
//!
//! Resolution order:
//! 1. `--force` always generates a fresh key, no lookups.
//! 2. The explicit chain record under `conf/` is the source of truth.
//! 3. For bases written before records existed, fall back to recovering the
//!    key from the newest full artifact's filename.
//! 4. Otherwise generate a fresh key.
//!
//! Resolution only reads. The winning key is persisted by the caller once
//! the archive invocation has been validated, so a run that aborts before
//! tar can be invoked leaves the previous chain's record untouched.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::config::Layout;
use crate::error::Result;
use crate::naming;

/// Explicit chain state, one JSON record per backup name under `conf/`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChainRecord {
    pub key: String,
    pub created: String,
}

pub struct Resolution {
    pub key: String,
    /// True when an existing chain key was reused. The run will then be
    /// incremental as long as the matching snar file is still in place.
    pub reused: bool,
}

/// 32 lowercase hex chars, the same rendering tar sees in filenames.
pub fn generate_key() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

pub fn resolve(layout: &Layout, name: &str, force: bool) -> Resolution {
    if force {
        println!("Forced full backup");
    } else {
        if let Some(record) = read_record(&layout.chain_record_path(name)) {
            println!("Existing key: {}", record.key);
            return Resolution { key: record.key, reused: true };
        }

        if let Some((key, artifact)) = scan_full_artifacts(&layout.fs_dir, name) {
            println!("Found full backup: {}", artifact.display());
            println!("Existing key: {key}");
            return Resolution { key, reused: true };
        }
    }

    let key = generate_key();
    println!("Generate new key: {key}");
    Resolution { key, reused: false }
}

/// Write the resolved key back to the chain record. Called after the
/// archive invocation is planned; also repairs records recovered from the
/// filename fallback or lost to corruption.
pub fn persist(layout: &Layout, name: &str, key: &str, now: &DateTime<Local>) -> Result<()> {
    let record = ChainRecord {
        key: key.to_string(),
        created: naming::timestamp(now),
    };
    fs::write(layout.chain_record_path(name), serde_json::to_string(&record)?)?;
    Ok(())
}

/// Recover the chain key from the newest `{name}*_full.tgz` in `fs/`.
///
/// Reverse lexicographic order equals reverse chronological order only while
/// the key and timestamp fields stay fixed-width. Only the newest candidate
/// is tried: if its name fails the strict pattern, there is no usable chain
/// to continue and a fresh key is generated instead.
fn scan_full_artifacts(fs_dir: &Path, name: &str) -> Option<(String, PathBuf)> {
    let entries = fs::read_dir(fs_dir).ok()?;

    let mut candidates: Vec<String> = entries
        .flatten()
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|file_name| naming::is_full_artifact_candidate(name, file_name))
        .collect();

    candidates.sort();
    let newest = candidates.pop()?;

    let key = naming::parse_full_artifact(name, &newest)?;
    Some((key, fs_dir.join(newest)))
}

/// A corrupt or unreadable record is treated as absent; the filename
/// fallback then repairs it on the next persist.
fn read_record(path: &Path) -> Option<ChainRecord> {
    let text = fs::read_to_string(path).ok()?;
    serde_json::from_str(&text).ok()
}
