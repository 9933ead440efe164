use anyhow::{anyhow, Result};
use std::fs;
use std::path::PathBuf;

pub struct AppPaths;

impl AppPaths {
    pub fn data_dir() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow!("Cannot determine data directory"))?
            .join("shorten-cli");

        fs::create_dir_all(&data_dir)?;
        Ok(data_dir)
    }

    /// Log directory, falling back to the temp dir when there is no data dir
    pub fn log_dir() -> PathBuf {
        let log_dir = Self::data_dir()
            .map(|dir| dir.join("logs"))
            .unwrap_or_else(|_| std::env::temp_dir().join("shorten-cli"));

        let _ = fs::create_dir_all(&log_dir);
        log_dir
    }
}
