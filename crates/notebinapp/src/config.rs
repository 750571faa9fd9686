//! # Configuration
//!
//! Notebin configuration is loaded with [`confique`], layered in priority order:
//!
//! 1. **Environment variables**: `NOTEBIN_DB`, `NOTEBIN_USER`, `NOTEBIN_LOG`.
//! 2. **Config file**: `notebin.toml` in the OS config directory (via the
//!    `directories` crate), or an explicit path.
//! 3. **Compiled defaults**: via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Env | Default | Description |
//! |-----|-----|---------|-------------|
//! | `database` | `NOTEBIN_DB` | `<data dir>/notebin.db` | SQLite database file |
//! | `user` | `NOTEBIN_USER` | none | Signed-in user id |
//! | `log_level` | `NOTEBIN_LOG` | `warn` | Default tracing filter |

use confique::Config;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{NotebinError, Result};

pub const CONFIG_FILE_NAME: &str = "notebin.toml";
pub const DATABASE_FILE_NAME: &str = "notebin.db";

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NotebinConfig {
    /// Path to the SQLite database file.
    #[config(env = "NOTEBIN_DB")]
    pub database: Option<PathBuf>,

    /// Id of the signed-in user. Without one every command is unauthorized.
    #[config(env = "NOTEBIN_USER")]
    pub user: Option<String>,

    /// Tracing filter used when `RUST_LOG` is not set.
    #[config(env = "NOTEBIN_LOG", default = "warn")]
    pub log_level: String,
}

impl Default for NotebinConfig {
    fn default() -> Self {
        Self {
            database: None,
            user: None,
            log_level: "warn".to_string(),
        }
    }
}

impl NotebinConfig {
    /// Loads env vars over `path` (or the default config file) over defaults.
    /// A missing file is not an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Self::builder().env();
        if let Some(file) = path.map(Path::to_path_buf).or_else(default_config_file) {
            builder = builder.file(file);
        }
        builder
            .load()
            .map_err(|e| NotebinError::Config(e.to_string()))
    }

    /// The configured database path, or `notebin.db` in the OS data directory.
    pub fn resolve_database(&self) -> Result<PathBuf> {
        if let Some(path) = &self.database {
            return Ok(path.clone());
        }
        project_dirs()
            .map(|dirs| dirs.data_dir().join(DATABASE_FILE_NAME))
            .ok_or_else(|| {
                NotebinError::Config("Could not determine a data directory".to_string())
            })
    }

    /// The configured user id, ignoring blank values.
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref().map(str::trim).filter(|u| !u.is_empty())
    }
}

pub fn default_config_file() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "notebin")
}
