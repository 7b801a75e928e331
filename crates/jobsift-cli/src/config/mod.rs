//! Configuration loading and resolution.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use jobsift::{ReportColumns, ReportFormat, SiftConfig};

/// Default search: frontend roles in New York.
pub const DEFAULT_SEARCH_URL: &str =
    "https://www.indeed.com/jobs?q=frontend+engineer&l=New+York%2C+NY&from=searchOnHP";

/// Full runtime configuration for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Listing-search URL the traversal starts from.
    pub url: String,
    pub browser: BrowserSettings,
    pub output: OutputSettings,
    pub sift: SiftConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SEARCH_URL.to_string(),
            browser: BrowserSettings::default(),
            output: OutputSettings::default(),
            sift: SiftConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    pub headless: bool,
    pub viewport: Viewport,
    /// Upper bound for navigations and visibility waits. `None` waits forever.
    pub navigation_timeout_ms: Option<u64>,
    /// Explicit browser binary; discovered when unset.
    pub chromium_path: Option<PathBuf>,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: false,
            viewport: Viewport::default(),
            navigation_timeout_ms: None,
            chromium_path: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1440,
            height: 1000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub path: PathBuf,
    pub format: ReportFormat,
    pub columns: ReportColumns,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("output.txt"),
            format: ReportFormat::default(),
            columns: ReportColumns::default(),
        }
    }
}

impl AppConfig {
    /// Resolve, read and validate the configuration.
    ///
    /// Falls back to built-in defaults when no file is found. Environment
    /// overrides are applied on top of the file.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match resolve_config_path(explicit)? {
            Some(path) => {
                tracing::info!("Config: {}", path.display());
                Self::from_file(&path)?
            }
            None => {
                tracing::info!("Config: built-in defaults");
                Self::default()
            }
        };
        config.apply_env();
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }

    /// `JOBSIFT_URL` and `JOBSIFT_OUTPUT` win over file values.
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("JOBSIFT_URL") {
            if !url.trim().is_empty() {
                self.url = url;
            }
        }
        if let Ok(path) = std::env::var("JOBSIFT_OUTPUT") {
            if !path.trim().is_empty() {
                self.output.path = PathBuf::from(path);
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            bail!("no search URL configured");
        }
        if self.browser.viewport.width == 0 || self.browser.viewport.height == 0 {
            bail!("viewport dimensions must be non-zero");
        }
        self.sift
            .validate()
            .context("invalid pipeline configuration")?;
        Ok(())
    }
}

/// Resolve the config file path.
///
/// Order: explicit flag, `JOBSIFT_CONFIG`, `./jobsift.json`,
/// `~/.jobsift/config.json`. An explicit path that does not exist is an error;
/// the implicit locations are simply skipped.
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        if !path.exists() {
            bail!("config file not found: {}", path.display());
        }
        return Ok(Some(path.to_path_buf()));
    }

    if let Ok(env_path) = std::env::var("JOBSIFT_CONFIG") {
        let path = PathBuf::from(env_path);
        if !path.exists() {
            bail!("JOBSIFT_CONFIG points at a missing file: {}", path.display());
        }
        return Ok(Some(path));
    }

    let cwd_config = PathBuf::from("jobsift.json");
    if cwd_config.exists() {
        return Ok(Some(cwd_config));
    }

    Ok(default_config_path().filter(|p| p.exists()))
}

fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".jobsift").join("config.json"))
}
