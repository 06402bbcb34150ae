use std::path::PathBuf;
use thiserror::Error;

/// Failure kinds for a backup run. Each kind maps to a distinct process
/// exit code; malformed command-line options exit 2 via clap before any of
/// these can occur.
#[derive(Error, Debug)]
pub enum BackupError {
    /// Name and target are jointly required; absence prints usage to stderr.
    #[error("Help: -n <name> -t <target>")]
    Usage,

    /// The exclusion file was given but does not exist. Detected before the
    /// archiver is invoked, so no artifact is produced.
    #[error("No such file or directory: {}", .0.display())]
    MissingResource(PathBuf),

    /// The archiver process could not be spawned at all.
    #[error("archiver failed: {0}")]
    Archiver(String),

    /// Chain state record could not be serialized.
    #[error("chain state error: {0}")]
    State(#[from] serde_json::Error),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl BackupError {
    /// Exit code contract: 1 usage, 2 bad options (clap), 3 missing
    /// resource, 4 anything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            BackupError::Usage => 1,
            BackupError::MissingResource(_) => 3,
            _ => 4,
        }
    }
}

pub type Result<T> = std::result::Result<T, BackupError>;
