//! Finding and validating the mermaid-cli executable.

use crate::bridge::RenderError;
use std::path::{Path, PathBuf};

/// Name of the mermaid-cli binary as installed by npm.
pub const RENDERER_BINARY: &str = "mmdc";

/// Look `mmdc` up on PATH.
pub fn find_renderer() -> Option<PathBuf> {
    match which::which(RENDERER_BINARY) {
        Ok(path) => Some(path),
        Err(e) => {
            tracing::debug!("{} not on PATH: {}", RENDERER_BINARY, e);
            None
        }
    }
}

/// Turn a configured renderer path into something we can spawn.
///
/// A bare name (`mmdc`) is searched on PATH. Anything with a directory
/// component must point at an existing executable file.
pub fn resolve_renderer(configured: &Path) -> Result<PathBuf, RenderError> {
    let fail = |reason: &str| RenderError::Configuration {
        path: configured.to_path_buf(),
        reason: reason.to_string(),
    };

    if configured.as_os_str().is_empty() {
        return Err(fail("no renderer path configured"));
    }

    let is_bare_name = configured
        .parent()
        .map(|p| p.as_os_str().is_empty())
        .unwrap_or(true);

    if is_bare_name {
        return which::which(configured).map_err(|_| fail("not found on PATH"));
    }

    let meta = match std::fs::metadata(configured) {
        Ok(meta) => meta,
        Err(_) => return Err(fail("no such file")),
    };

    if !meta.is_file() {
        return Err(fail("not a regular file"));
    }

    if !is_executable(&meta) {
        return Err(fail("file is not executable"));
    }

    Ok(configured.to_path_buf())
}

#[cfg(unix)]
fn is_executable(meta: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_meta: &std::fs::Metadata) -> bool {
    true
}
