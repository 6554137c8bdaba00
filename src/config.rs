use anyhow::{bail, Context, Result};
use reqwest::Url;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_CONFIG_FILE: &str = "school-locator.toml";
pub const API_BASE_URL_ENV: &str = "SCHOOL_LOCATOR_API_BASE_URL";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Resolved client settings
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Base of the school API, without trailing slash
    pub api_base_url: String,
    pub request_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

/// Contents of the TOML config file
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FileSettings {
    pub api_base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

impl FileSettings {
    pub fn parse(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("Invalid config file")
    }

    /// Read `path`, or the default file if it exists. An explicit path must exist.
    pub fn load(path: Option<&Path>) -> Result<Option<Self>> {
        let (path, explicit) = match path {
            Some(p) => (p, true),
            None => (Path::new(DEFAULT_CONFIG_FILE), false),
        };

        if !explicit && !path.exists() {
            debug!("No config file at {}", path.display());
            return Ok(None);
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let parsed = Self::parse(&raw)
            .with_context(|| format!("Failed to load config file {}", path.display()))?;

        info!("Loaded config from {}", path.display());
        Ok(Some(parsed))
    }
}

impl Settings {
    /// Layer defaults, file, environment and command line, later wins
    pub fn layered(
        file: Option<FileSettings>,
        env_base_url: Option<String>,
        cli_base_url: Option<String>,
    ) -> Result<Self> {
        let mut settings = Settings::default();

        if let Some(file) = file {
            if let Some(url) = file.api_base_url {
                settings.api_base_url = url;
            }
            if let Some(secs) = file.request_timeout_secs {
                if secs == 0 {
                    bail!("requestTimeoutSecs must be greater than zero");
                }
                settings.request_timeout = Duration::from_secs(secs);
            }
        }

        if let Some(url) = env_base_url.filter(|v| !v.trim().is_empty()) {
            settings.api_base_url = url;
        }
        if let Some(url) = cli_base_url {
            settings.api_base_url = url;
        }

        settings.api_base_url = normalize_base_url(&settings.api_base_url)?;
        Ok(settings)
    }

    pub fn load(config_path: Option<&Path>, cli_base_url: Option<String>) -> Result<Self> {
        let file = FileSettings::load(config_path)?;
        let env_base_url = std::env::var(API_BASE_URL_ENV).ok();
        Self::layered(file, env_base_url, cli_base_url)
    }
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed).with_context(|| format!("Invalid apiBaseUrl {:?}", raw))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("apiBaseUrl must be http or https, got {:?}", raw);
    }
    Ok(trimmed.to_string())
}
