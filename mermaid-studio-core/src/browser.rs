//! Headless-browser launch configuration.
//!
//! mermaid-cli drives Chrome through Puppeteer. When Puppeteer's bundled
//! browser is missing (or sandboxing fails) the renderer needs a JSON file
//! passed with `-p` telling it which browser binary to launch. We never read
//! this file at render time; we only locate, write, and hand its path over.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name used inside the settings directory.
pub const BROWSER_CONFIG_FILE: &str = "puppeteer.json";

const SYSTEM_BROWSERS: &[&str] = &[
    "/usr/bin/google-chrome-stable",
    "/usr/bin/google-chrome",
    "/usr/bin/chromium",
    "/usr/bin/chromium-browser",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserConfig {
    pub executable_path: PathBuf,
    #[serde(default)]
    pub args: Vec<String>,
}

impl BrowserConfig {
    /// A config for `executable` with the sandbox disabled, which is what
    /// containerised and snap-confined setups need.
    pub fn for_executable(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable_path: executable.into(),
            args: vec!["--no-sandbox".to_string()],
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read browser config {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Invalid browser config {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let body = serde_json::to_string_pretty(self)?;
        std::fs::write(path, body)
            .with_context(|| format!("Failed to write browser config {}", path.display()))
    }
}

/// Find a Chrome/Chromium binary: Puppeteer's own download cache first
/// (newest version wins), then the usual system locations.
pub fn find_browser(home: &Path) -> Option<PathBuf> {
    find_in_puppeteer_cache(home).or_else(|| {
        SYSTEM_BROWSERS
            .iter()
            .map(PathBuf::from)
            .find(|p| p.exists())
    })
}

fn find_in_puppeteer_cache(home: &Path) -> Option<PathBuf> {
    let cache = home.join(".cache").join("puppeteer").join("chrome");
    let entries = std::fs::read_dir(&cache).ok()?;

    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path().join("chrome-linux64").join("chrome"))
        .filter(|p| p.is_file())
        .collect();

    candidates.sort();
    candidates.pop()
}

/// The current user's home directory.
pub fn user_home() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

/// Write a browser config into `config_dir` if none exists yet and a
/// browser can be found. Returns the path of the config in effect.
pub fn ensure_browser_config(config_dir: &Path, home: &Path) -> Result<Option<PathBuf>> {
    let path = config_dir.join(BROWSER_CONFIG_FILE);
    if path.exists() {
        return Ok(Some(path));
    }

    let Some(browser) = find_browser(home) else {
        tracing::debug!("No Chrome/Chromium found; leaving browser config unset");
        return Ok(None);
    };

    tracing::info!("Writing browser config for {}", browser.display());
    BrowserConfig::for_executable(browser).save(&path)?;
    Ok(Some(path))
}
