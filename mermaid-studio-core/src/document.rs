use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// The diagram shown when the application starts.
pub const STARTER_DIAGRAM: &str = "flowchart LR
    A[Objective] --> B[Steps]
    B[Steps] --> C[Expected result]
    C[Expected result] --> D[Severity if failed]";

/// The Mermaid source being edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagramDocument {
    text: String,
    path: Option<PathBuf>,
    dirty: bool,
}

impl DiagramDocument {
    /// A new, unsaved, clean document.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            path: None,
            dirty: false,
        }
    }

    /// Read a document from disk, verbatim.
    pub fn open(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Could not open {}", path.display()))?;
        Ok(Self {
            text,
            path: Some(path.to_path_buf()),
            dirty: false,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Replace the buffer. Any edit marks the document dirty, even one
    /// that happens to restore the saved text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.dirty = true;
    }

    /// Write to the document's own path. Fails for documents that were
    /// never saved; use `save_as` for those.
    pub fn save(&mut self) -> Result<PathBuf> {
        let path = self
            .path
            .clone()
            .context("Document has no file path yet")?;
        self.write_to(&path)?;
        Ok(path)
    }

    /// Write to `path` and adopt it as the document's path.
    pub fn save_as(&mut self, path: &Path) -> Result<()> {
        self.write_to(path)?;
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    fn write_to(&mut self, path: &Path) -> Result<()> {
        std::fs::write(path, &self.text)
            .with_context(|| format!("Could not save {}", path.display()))?;
        self.dirty = false;
        tracing::info!("Saved {}", path.display());
        Ok(())
    }

    /// File name for the title bar.
    pub fn display_name(&self) -> String {
        self.path
            .as_deref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Untitled".to_string())
    }

    /// Suggested name when exporting the rendered PNG.
    pub fn export_file_name(&self) -> String {
        self.path
            .as_deref()
            .and_then(|p| p.file_stem())
            .map(|stem| format!("{}.png", stem.to_string_lossy()))
            .unwrap_or_else(|| "diagram.png".to_string())
    }
}

/// Copy a rendered PNG to `dest` byte for byte.
pub fn export_png(rendered: &Path, dest: &Path) -> Result<u64> {
    if !rendered.is_file() {
        anyhow::bail!("Nothing rendered yet: {} does not exist", rendered.display());
    }
    std::fs::copy(rendered, dest)
        .with_context(|| format!("Could not export PNG to {}", dest.display()))
}
