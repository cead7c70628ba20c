use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

pub struct Config {
    pub db_path: PathBuf,
}

impl Config {
    /// Resolve the data directory, creating it on first run.
    pub fn load() -> Result<Self> {
        let proj_dirs =
            ProjectDirs::from("", "", "pour").context("Could not determine home directory")?;
        Self::in_dir(proj_dirs.data_dir())
    }

    pub fn in_dir(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
        tracing::debug!("using data directory {}", data_dir.display());

        Ok(Config {
            db_path: data_dir.join("pour.db"),
        })
    }
}
