//! User settings persisted as JSON in the per-user config directory.

mod recent;

pub use recent::{MAX_RECENT, RecentFiles};

use crate::bridge::{DEFAULT_TIMEOUT, DEFAULT_WIDTH, DiagramTheme, RenderOptions};
use crate::locate::RENDERER_BINARY;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const SETTINGS_FILE: &str = "settings.json";

// ════════════════════════════════════════════════════════════════════
// UI theme
// ════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UiTheme {
    #[default]
    Light,
    Dark,
}

impl UiTheme {
    pub fn toggled(self) -> Self {
        match self {
            UiTheme::Light => UiTheme::Dark,
            UiTheme::Dark => UiTheme::Light,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UiTheme::Light => "Light",
            UiTheme::Dark => "Dark",
        }
    }

    /// Background colour for the renderer, matching the preview pane so the
    /// image blends into it.
    pub fn preview_background(&self) -> &'static str {
        match self {
            UiTheme::Light => "#f5f5f5",
            UiTheme::Dark => "#1e1e1e",
        }
    }
}

// ════════════════════════════════════════════════════════════════════
// Settings
// ════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Explicit mmdc path. `None` means "look it up on PATH".
    pub renderer_path: Option<PathBuf>,
    /// Puppeteer launch config handed to the renderer with `-p`.
    pub browser_config: Option<PathBuf>,
    pub ui_theme: UiTheme,
    pub diagram_theme: DiagramTheme,
    pub sketch_mode: bool,
    pub auto_render: bool,
    pub render_width: u32,
    pub render_timeout_secs: u64,
    pub recent_files: RecentFiles,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            renderer_path: None,
            browser_config: None,
            ui_theme: UiTheme::Light,
            diagram_theme: DiagramTheme::Default,
            sketch_mode: false,
            auto_render: true,
            render_width: DEFAULT_WIDTH,
            render_timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            recent_files: RecentFiles::new(),
        }
    }
}

impl Settings {
    /// Renderer options derived from the current settings.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            renderer: self
                .renderer_path
                .clone()
                .unwrap_or_else(|| PathBuf::from(RENDERER_BINARY)),
            theme: self.diagram_theme,
            background: self.ui_theme.preview_background().to_string(),
            sketch: self.sketch_mode,
            width: self.render_width.max(1),
            browser_config: self.browser_config.clone(),
            timeout: Duration::from_secs(self.render_timeout_secs.max(1)),
        }
    }
}

// ════════════════════════════════════════════════════════════════════
// Store
// ════════════════════════════════════════════════════════════════════

/// Where settings live on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsStore {
    dir: PathBuf,
}

impl SettingsStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `~/.config/mermaid-studio` on Linux, the platform equivalent elsewhere.
    pub fn for_user() -> Self {
        match ProjectDirs::from("io", "mermaid-studio", "mermaid-studio") {
            Some(dirs) => Self::new(dirs.config_dir()),
            None => {
                tracing::warn!("No home directory; settings will not survive a restart");
                Self::new(std::env::temp_dir().join("mermaid-studio-config"))
            }
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(SETTINGS_FILE)
    }

    /// Load settings. A missing file gives defaults; a corrupt one is
    /// logged and also gives defaults rather than blocking startup.
    pub fn load(&self) -> Settings {
        let path = self.path();
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Settings::default(),
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", path.display(), e);
                return Settings::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Ignoring corrupt settings file {}: {}", path.display(), e);
                Settings::default()
            }
        }
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;
        let body = serde_json::to_string_pretty(settings)?;
        let path = self.path();
        std::fs::write(&path, body)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::debug!("Settings saved to {}", path.display());
        Ok(())
    }
}
