pub mod bridge;
pub mod browser;
pub mod cache;
pub mod diagnostics;
pub mod document;
pub mod editing;
pub mod gallery;
pub mod locate;
pub mod search;
pub mod settings;
pub mod syntax;

// Re-export the main types so the UI can just use `mermaid_studio_core::RenderScheduler`
pub use bridge::{
    DiagramTheme, RenderBridge, RenderError, RenderOptions, RenderOutcome, RenderRequest,
    RenderResult, RenderScheduler, RenderedImage,
};
pub use cache::CacheDir;
pub use document::DiagramDocument;
pub use settings::{RecentFiles, Settings, SettingsStore, UiTheme};
