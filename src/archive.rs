//! External tar invocation.
//!
//! Builds the argv for one archiving run and executes it. Whether the run is
//! full or incremental is decided here, solely by whether the chain's snar
//! file already exists on disk: that is the authoritative signal for the
//! filename tag and the log line, independent of what the chain resolver
//! concluded. The two normally agree; if an operator deletes a snar file by
//! hand, tar falls back to a full archive and the tag follows suit.
//!
//! The invocation blocks until tar exits, with no timeout and no
//! cancellation. tar's own exit status is deliberately not inspected: a run
//! that produced no artifact fails the size check afterwards instead.

use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;
use std::process::Command;

use chrono::{DateTime, Local};

use crate::config::Config;
use crate::error::{BackupError, Result};
use crate::naming::{self, ArtifactKind};

/// Fully computed tar invocation, split from execution so tests can assert
/// on the argv without spawning anything.
#[derive(Debug)]
pub struct ArchivePlan {
    pub artifact: PathBuf,
    pub snar: PathBuf,
    pub kind: ArtifactKind,
    pub program: String,
    pub args: Vec<OsString>,
    /// Whitespace-trimmed patterns from the exclusion file, printed for
    /// audit visibility before the run starts.
    pub exclude_patterns: Option<Vec<String>>,
}

pub fn plan(config: &Config, key: &str, now: &DateTime<Local>) -> Result<ArchivePlan> {
    let layout = config.layout();

    let snar = layout.snar_path(&config.name, key);
    let kind = if snar.exists() { ArtifactKind::Incr } else { ArtifactKind::Full };

    let ts = naming::timestamp(now);
    let artifact = layout.artifact_path(&config.name, key, &ts, kind);

    let mut args: Vec<OsString> = vec![
        "-c".into(),
        "--one-file-system".into(),
        "-z".into(),
        "-f".into(),
        artifact.clone().into(),
        "-g".into(),
        snar.clone().into(),
        "-C".into(),
        config.target.clone().into(),
    ];

    let mut exclude_patterns = None;
    if let Some(exclude) = &config.exclude {
        if !exclude.exists() {
            return Err(BackupError::MissingResource(exclude.clone()));
        }
        args.push("-X".into());
        args.push(exclude.clone().into());

        let text = fs::read_to_string(exclude)?;
        exclude_patterns = Some(text.lines().map(|line| line.trim().to_string()).collect());
    }

    for include in &config.includes {
        args.push(include.clone().into());
    }

    Ok(ArchivePlan {
        artifact,
        snar,
        kind,
        program: config.tar_binary.clone(),
        args,
        exclude_patterns,
    })
}

/// Run the planned invocation and report the produced artifact's byte size.
/// A missing artifact afterwards surfaces as an io error (generic failure),
/// which is how an archiver crash is observed.
pub fn invoke(plan: &ArchivePlan) -> Result<u64> {
    let _status = Command::new(&plan.program)
        .args(&plan.args)
        .status()
        .map_err(|e| BackupError::Archiver(format!("failed to run {}: {e}", plan.program)))?;

    let metadata = fs::metadata(&plan.artifact)?;
    Ok(metadata.len())
}
