//! Path management for muzee

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Filesystem locations used by the server
#[derive(Debug, Clone)]
pub struct Paths {
    /// Config directory path
    config_dir: PathBuf,
}

impl Paths {
    /// Resolve and create the config directory
    pub fn new(config_override: Option<PathBuf>) -> Result<Self> {
        let config_parent = if let Some(path) = config_override {
            path
        } else if let Ok(exe) = std::env::current_exe() {
            exe.parent().unwrap_or(Path::new(".")).to_path_buf()
        } else {
            directories::ProjectDirs::from("", "", "muzee")
                .map(|dirs| dirs.config_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from("."))
        };

        // hidden folder when living directly in a home directory
        let config_dir_name = if is_home_dir(&config_parent) {
            ".muzee"
        } else {
            "muzee"
        };

        let config_dir = config_parent.join(config_dir_name);
        std::fs::create_dir_all(&config_dir)
            .with_context(|| format!("Failed to create {}", config_dir.display()))?;

        Ok(Self { config_dir })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Main database path
    pub fn app_db_path(&self) -> PathBuf {
        self.config_dir.join("muzee.db")
    }

    /// Settings file path
    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }
}

fn is_home_dir(path: &Path) -> bool {
    directories::UserDirs::new()
        .map(|dirs| path == dirs.home_dir())
        .unwrap_or(false)
}
