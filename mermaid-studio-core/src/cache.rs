//! The per-user cache directory that holds the renderer's scratch files.
//!
//! Layout:
//! - `scratch.mmd`: the diagram text handed to the renderer
//! - `mermaid-config.json`: only present while sketch mode is on
//! - `preview.png`: the image the preview pane shows

use directories::ProjectDirs;
use serde_json::json;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const SCRATCH_FILE: &str = "scratch.mmd";
const MERMAID_CONFIG_FILE: &str = "mermaid-config.json";
const PREVIEW_FILE: &str = "preview.png";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheDir {
    root: PathBuf,
}

impl CacheDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `~/.cache/mermaid-studio` on Linux, the platform equivalent elsewhere.
    /// Falls back to the system temp dir when no home directory is known.
    pub fn for_user() -> Self {
        match ProjectDirs::from("io", "mermaid-studio", "mermaid-studio") {
            Some(dirs) => Self::new(dirs.cache_dir()),
            None => {
                tracing::warn!("No home directory; using temp dir for the render cache");
                Self::new(std::env::temp_dir().join("mermaid-studio"))
            }
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn scratch_path(&self) -> PathBuf {
        self.root.join(SCRATCH_FILE)
    }

    pub fn mermaid_config_path(&self) -> PathBuf {
        self.root.join(MERMAID_CONFIG_FILE)
    }

    pub fn preview_path(&self) -> PathBuf {
        self.root.join(PREVIEW_FILE)
    }

    pub fn ensure(&self) -> io::Result<()> {
        fs::create_dir_all(&self.root)
    }

    /// Overwrite the scratch file with `text`, byte for byte.
    pub fn write_scratch(&self, text: &str) -> io::Result<PathBuf> {
        self.ensure()?;
        let path = self.scratch_path();
        fs::write(&path, text)?;
        make_world_readable(&path)?;
        Ok(path)
    }

    /// Write (sketch on) or remove (sketch off) the Mermaid config file.
    pub fn write_mermaid_config(&self, sketch: bool) -> io::Result<Option<PathBuf>> {
        let path = self.mermaid_config_path();
        if !sketch {
            remove_if_exists(&path)?;
            return Ok(None);
        }

        self.ensure()?;
        let body = json!({ "look": "handDrawn" });
        fs::write(&path, serde_json::to_vec_pretty(&body)?)?;
        make_world_readable(&path)?;
        Ok(Some(path))
    }

    /// Remove every PNG left in the cache from earlier renders.
    pub fn clear_outputs(&self) -> io::Result<usize> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e),
        };

        let mut removed = 0;
        for entry in entries {
            let path = entry?.path();
            let is_png = path
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case("png"))
                .unwrap_or(false);
            if is_png && path.is_file() {
                fs::remove_file(&path)?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    pub fn contains(&self, path: &Path) -> bool {
        path.starts_with(&self.root)
    }
}

pub(crate) fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

// Sandboxed renderers (snap/flatpak installs) run as a different profile.
#[cfg(unix)]
fn make_world_readable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn make_world_readable(_path: &Path) -> io::Result<()> {
    Ok(())
}
