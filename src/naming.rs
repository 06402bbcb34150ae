//! Filename conventions for artifacts, snar files and their parsing.
//!
//! Layout under `{base}/fs/`:
//! - `{name}_{key}.snar` — per-chain snapshot state, updated in place by tar
//! - `{name}_{key}_{timestamp}_{full|incr}.tgz` — one artifact per run
//!
//! The timestamp is fixed-width (`YYYY-MM-DD-HH-MM-SS`) and the key is always
//! 32 hex chars, so plain lexicographic filename order is chronological order.

use chrono::{DateTime, Local};
use regex::Regex;

pub const ARCHIVE_EXT: &str = "tgz";
pub const SNAR_EXT: &str = "snar";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Full,
    Incr,
}

impl ArtifactKind {
    pub fn tag(&self) -> &'static str {
        match self {
            ArtifactKind::Full => "full",
            ArtifactKind::Incr => "incr",
        }
    }
}

/// Fixed-width artifact timestamp, one-second resolution. Two runs for the
/// same (name, key) within the same second collide on the artifact name;
/// serializing runs is the caller's responsibility.
pub fn timestamp(dt: &DateTime<Local>) -> String {
    dt.format("%Y-%m-%d-%H-%M-%S").to_string()
}

pub fn snar_file_name(name: &str, key: &str) -> String {
    format!("{name}_{key}.{SNAR_EXT}")
}

pub fn artifact_file_name(name: &str, key: &str, ts: &str, kind: ArtifactKind) -> String {
    format!("{name}_{key}_{ts}_{}.{ARCHIVE_EXT}", kind.tag())
}

/// Loose pre-filter matching the `{name}*_full.tgz` glob. Candidates still
/// have to pass [`parse_full_artifact`] before their key is trusted.
pub fn is_full_artifact_candidate(name: &str, file_name: &str) -> bool {
    file_name.starts_with(name) && file_name.ends_with(&format!("_full.{ARCHIVE_EXT}"))
}

/// Extract the chain key from a full-artifact filename, or None if the name
/// does not match the strict pattern exactly. Anything unexpected (wrong key
/// width, uppercase hex, mangled timestamp) is treated as absent rather than
/// partially parsed.
pub fn parse_full_artifact(name: &str, file_name: &str) -> Option<String> {
    let pattern = format!(
        r"^{}_([a-f0-9]{{32}})_\d{{4}}-\d{{2}}-\d{{2}}-\d{{2}}-\d{{2}}-\d{{2}}_full\.{}$",
        regex::escape(name),
        ARCHIVE_EXT
    );
    let re = Regex::new(&pattern).ok()?;
    re.captures(file_name).map(|caps| caps[1].to_string())
}
