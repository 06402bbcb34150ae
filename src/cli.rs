use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tarbak")]
#[command(about = "Incremental tar backup orchestrator")]
#[command(version)]
pub struct Cli {
    /// Backup name, used as the artifact filename prefix
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Directory to archive
    #[arg(long, short = 't')]
    pub target: Option<PathBuf>,

    /// Base storage directory, expects fs/ and conf/ subdirectories
    #[arg(long, short = 'b')]
    pub base: Option<PathBuf>,

    /// Path to include, relative to the target directory (repeatable)
    #[arg(long, short = 'i')]
    pub include: Vec<PathBuf>,

    /// File with exclusion patterns, one per line
    #[arg(long, short = 'e')]
    pub exclude: Option<PathBuf>,

    /// Force a new full backup, starting a new chain
    #[arg(long, short = 'f', default_value_t = false)]
    pub force: bool,
}
