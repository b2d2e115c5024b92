use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Output width handed to the renderer (`-w`).
pub const DEFAULT_WIDTH: u32 = 2048;

/// How long a renderer may run before it is killed.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(45);

// ════════════════════════════════════════════════════════════════════
// Diagram theme
// ════════════════════════════════════════════════════════════════════

/// The Mermaid theme passed to the renderer with `-t`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramTheme {
    #[default]
    Default,
    Forest,
    Dark,
    Neutral,
}

impl DiagramTheme {
    pub fn all() -> &'static [DiagramTheme] {
        &[
            DiagramTheme::Default,
            DiagramTheme::Forest,
            DiagramTheme::Dark,
            DiagramTheme::Neutral,
        ]
    }

    /// The value mermaid-cli expects on its command line.
    pub fn as_arg(&self) -> &'static str {
        match self {
            DiagramTheme::Default => "default",
            DiagramTheme::Forest => "forest",
            DiagramTheme::Dark => "dark",
            DiagramTheme::Neutral => "neutral",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DiagramTheme::Default => "Default",
            DiagramTheme::Forest => "Forest",
            DiagramTheme::Dark => "Dark",
            DiagramTheme::Neutral => "Neutral",
        }
    }

    pub fn parse(s: &str) -> Option<DiagramTheme> {
        match s.trim().to_lowercase().as_str() {
            "default" => Some(DiagramTheme::Default),
            "forest" => Some(DiagramTheme::Forest),
            "dark" => Some(DiagramTheme::Dark),
            "neutral" => Some(DiagramTheme::Neutral),
            _ => None,
        }
    }
}

impl std::fmt::Display for DiagramTheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ════════════════════════════════════════════════════════════════════
// Options and request
// ════════════════════════════════════════════════════════════════════

/// Everything about a render except the diagram text and where it lands.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// `mmdc` on PATH, or an explicit path to the executable.
    pub renderer: PathBuf,
    pub theme: DiagramTheme,
    /// Any CSS colour mermaid-cli accepts for `-b`.
    pub background: String,
    /// Hand-drawn look, passed through a Mermaid config file.
    pub sketch: bool,
    pub width: u32,
    /// Puppeteer launch configuration (`-p`).
    pub browser_config: Option<PathBuf>,
    pub timeout: Duration,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            renderer: PathBuf::from("mmdc"),
            theme: DiagramTheme::Default,
            background: "white".to_string(),
            sketch: false,
            width: DEFAULT_WIDTH,
            browser_config: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// One render invocation. Built from a snapshot of the document and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    source: String,
    output: PathBuf,
    options: RenderOptions,
}

impl RenderRequest {
    pub fn new(source: impl Into<String>, output: impl Into<PathBuf>, options: RenderOptions) -> Self {
        Self {
            source: source.into(),
            output: output.into(),
            options,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Arguments for the renderer, given where the scratch input, the
    /// resolved output and the optional Mermaid config file live.
    ///
    /// The renderer runs inside the cache directory, so `output` should be
    /// absolute.
    pub fn command_args(
        &self,
        scratch: &Path,
        output: &Path,
        mermaid_config: Option<&Path>,
    ) -> Vec<OsString> {
        let opts = &self.options;
        let mut args: Vec<OsString> = vec![
            "-i".into(),
            scratch.as_os_str().to_owned(),
            "-o".into(),
            output.as_os_str().to_owned(),
            "-t".into(),
            opts.theme.as_arg().into(),
            "-b".into(),
            opts.background.clone().into(),
            "-w".into(),
            opts.width.to_string().into(),
        ];

        if let Some(config) = mermaid_config {
            args.push("-c".into());
            args.push(config.as_os_str().to_owned());
        }

        if let Some(browser) = &opts.browser_config {
            args.push("-p".into());
            args.push(browser.as_os_str().to_owned());
        }

        args
    }
}
