use crate::core::publisher::FtpSettings;
use crate::core::render::PageSettings;
use crate::extractors::sheets::export_url;
use crate::extractors::youtube::DEFAULT_API_BASE;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output: PathBuf,
    /// Per-request timeout in seconds.
    pub timeout: u64,
    pub placeholder_image: String,
    pub source: SourceSettings,
    pub youtube: YouTubeSettings,
    pub page: PageSettings,
    pub ftp: Option<FtpSettings>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    pub sheet_id: String,
    pub gid: String,
    /// Full CSV URL; takes precedence over `sheet_id`/`gid`.
    pub csv_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YouTubeSettings {
    pub api_key: Option<String>,
    pub api_base: String,
}

impl Default for YouTubeSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: PathBuf::from("index.html"),
            timeout: 20,
            placeholder_image: String::new(),
            source: SourceSettings::default(),
            youtube: YouTubeSettings::default(),
            page: PageSettings::default(),
            ftp: None,
        }
    }
}

impl Config {
    /// Read `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Reading {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Parsing {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// URL of the CSV the gallery is built from.
    pub fn source_url(&self) -> Result<String> {
        if let Some(url) = self.source.csv_url.as_deref().filter(|u| !u.trim().is_empty()) {
            return Ok(url.trim().to_string());
        }
        if self.source.sheet_id.trim().is_empty() {
            anyhow::bail!("source.sheet_id (or source.csv_url) is not set");
        }
        Ok(export_url(self.source.sheet_id.trim(), self.source.gid.trim()))
    }
}
