//! Configuration loading and parsing.
//!
//! Parses `fncomment.toml` (or an override path provided by the binary) and
//! extracts `[toggle] preferred_style = "block" | "single"`, the style the
//! generic toggle uses to comment a clean function. A missing file, an
//! unreadable file, or a parse error all yield defaults; unknown fields are
//! ignored so older binaries tolerate newer files.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{debug, warn};

const FILE_NAME: &str = "fncomment.toml";

/// Comment style named in the config file.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StyleSetting {
    Single,
    #[default]
    Block,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ToggleConfig {
    #[serde(default)]
    pub preferred_style: StyleSetting,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub toggle: ToggleConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub path: Option<PathBuf>, // file the values came from, if any
    pub file: ConfigFile,
}

impl Config {
    pub fn preferred_style(&self) -> StyleSetting {
        self.file.toggle.preferred_style
    }
}

/// Best-effort config path: working directory first, then the platform config dir.
pub fn discover() -> PathBuf {
    let local = PathBuf::from(FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("fncomment").join(FILE_NAME);
    }
    local
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        debug!(target: "config", path = %path.display(), "config_absent");
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            debug!(target: "config", path = %path.display(), style = ?file.toggle.preferred_style, "config_loaded");
            Ok(Config {
                path: Some(path),
                file,
            })
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed");
            Ok(Config::default())
        }
    }
}
