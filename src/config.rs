use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::cli::Cli;
use crate::error::{BackupError, Result};
use crate::naming::{self, ArtifactKind};

pub const DEFAULT_BASE: &str = "/backup";
pub const DEFAULT_TAR: &str = "tar";

/// Optional settings file (~/.config/tarbak/config.toml or platform
/// equivalent). Every key has a CLI or built-in fallback, so a missing or
/// unreadable file is not an error.
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    pub base: Option<PathBuf>,
    pub exclude: Option<PathBuf>,
    pub tar: Option<String>,
}

impl Settings {
    pub fn load() -> Self {
        let Some(dirs) = directories::ProjectDirs::from("", "", "tarbak") else {
            return Settings::default();
        };
        Self::load_from(&dirs.config_dir().join("config.toml"))
    }

    fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(text) => toml::from_str(&text).unwrap_or_default(),
            Err(_) => Settings::default(),
        }
    }
}

/// Resolved runtime configuration for one backup run.
/// Precedence: CLI flag > settings file > built-in default.
#[derive(Debug)]
pub struct Config {
    pub name: String,
    pub target: PathBuf,
    pub base: PathBuf,
    pub includes: Vec<PathBuf>,
    pub exclude: Option<PathBuf>,
    pub force: bool,
    pub tar_binary: String,
}

impl Config {
    pub fn from_args(args: &Cli, settings: &Settings) -> Result<Self> {
        let (Some(name), Some(target)) = (args.name.clone(), args.target.clone()) else {
            return Err(BackupError::Usage);
        };

        let base = args
            .base
            .clone()
            .or_else(|| settings.base.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_BASE));

        let mut includes = args.include.clone();
        if includes.is_empty() {
            includes.push(PathBuf::from("."));
        }

        let exclude = args.exclude.clone().or_else(|| settings.exclude.clone());

        Ok(Config {
            name,
            target,
            base,
            includes,
            exclude,
            force: args.force,
            tar_binary: settings.tar.clone().unwrap_or_else(|| DEFAULT_TAR.to_string()),
        })
    }

    pub fn layout(&self) -> Layout {
        Layout::new(&self.base)
    }
}

/// On-disk layout under the base directory: `fs/` holds artifacts and snar
/// files, `conf/` holds chain state records.
pub struct Layout {
    pub fs_dir: PathBuf,
    pub conf_dir: PathBuf,
}

impl Layout {
    pub fn new(base: &Path) -> Self {
        Layout {
            fs_dir: base.join("fs"),
            conf_dir: base.join("conf"),
        }
    }

    pub fn ensure(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.fs_dir)?;
        fs::create_dir_all(&self.conf_dir)
    }

    pub fn snar_path(&self, name: &str, key: &str) -> PathBuf {
        self.fs_dir.join(naming::snar_file_name(name, key))
    }

    pub fn artifact_path(&self, name: &str, key: &str, ts: &str, kind: ArtifactKind) -> PathBuf {
        self.fs_dir.join(naming::artifact_file_name(name, key, ts, kind))
    }

    pub fn chain_record_path(&self, name: &str) -> PathBuf {
        self.conf_dir.join(format!("{name}.chain"))
    }
}
