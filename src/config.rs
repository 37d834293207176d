use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{PrviewError, Result};
use crate::types::MergeMethod;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Write logs here instead of stderr, which the TUI draws over.
    pub log_file: Option<PathBuf>,
    pub tick_rate_ms: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_file: None,
            tick_rate_ms: 250,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    pub api_url: String,
    pub web_url: String,
    pub token_env: Option<String>,
    pub token_command: Option<String>,
    pub merge_method: MergeMethod,
    pub comments_limit: u32,
    pub commits_limit: u32,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            web_url: "https://github.com".to_string(),
            token_env: Some("GITHUB_TOKEN".to_string()),
            token_command: Some("gh auth token".to_string()),
            merge_method: MergeMethod::default(),
            comments_limit: 50,
            commits_limit: 100,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub github: GitHubConfig,
}

fn config_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("prview").join("config.toml"))
}

impl Config {
    /// Load from an explicit path, or from the default location.
    ///
    /// A missing default file yields the defaults; an explicit path that
    /// cannot be read, or any file that fails to parse, is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match config_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Config::default()),
            },
        };

        let content = std::fs::read_to_string(&path)
            .map_err(|e| PrviewError::Config(format!("{}: {}", path.display(), e)))?;

        Self::parse(&content).map_err(|e| match e {
            PrviewError::Config(msg) => PrviewError::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str::<Config>(content).map_err(|e| PrviewError::Config(e.to_string()))
    }
}
