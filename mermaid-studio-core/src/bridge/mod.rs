//! The Render Bridge: diagram text in, PNG path (or a structured failure) out.
//!
//! One call = one child process. The bridge writes the scratch file, spawns
//! mermaid-cli with the request's options, waits with a deadline and a
//! cancellation token, and classifies whatever happened into a `RenderResult`.
//! Serializing calls is the job of [`RenderScheduler`].

mod error;
mod process;
mod request;
mod scheduler;

pub use error::RenderError;
pub use request::{DEFAULT_TIMEOUT, DEFAULT_WIDTH, DiagramTheme, RenderOptions, RenderRequest};
pub use scheduler::{RenderOutcome, RenderScheduler};

use crate::cache::{CacheDir, remove_if_exists};
use crate::locate::resolve_renderer;
use process::RendererProcess;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// A successfully rendered diagram on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

pub type RenderResult = Result<RenderedImage, RenderError>;

#[derive(Debug, Clone)]
pub struct RenderBridge {
    cache: CacheDir,
}

impl RenderBridge {
    pub fn new(cache: CacheDir) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &CacheDir {
        &self.cache
    }

    /// Render `request`, killing the renderer if `cancel` fires or the
    /// request's timeout elapses.
    ///
    /// Callers must not run two renders against the same cache at once;
    /// they share the scratch file.
    pub async fn render(&self, request: &RenderRequest, cancel: &CancellationToken) -> RenderResult {
        let opts = request.options();

        // Configuration problems surface before anything touches the disk.
        let renderer = resolve_renderer(&opts.renderer)?;

        if cancel.is_cancelled() {
            return Err(RenderError::Cancelled);
        }

        let output_path = std::path::absolute(request.output())
            .map_err(|e| RenderError::io("Failed to resolve output path", &e))?;

        let scratch = self
            .cache
            .write_scratch(request.source())
            .map_err(|e| RenderError::io("Failed to write scratch file", &e))?;

        let mermaid_config = self
            .cache
            .write_mermaid_config(opts.sketch)
            .map_err(|e| RenderError::io("Failed to write Mermaid config", &e))?;

        self.clear_stale_output(&output_path)?;

        let mut command = tokio::process::Command::new(&renderer);
        command
            .args(request.command_args(&scratch, &output_path, mermaid_config.as_deref()))
            .current_dir(self.cache.root())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut process = match RendererProcess::spawn(&mut command) {
            Ok(process) => process,
            Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::PermissionDenied) => {
                return Err(RenderError::Configuration {
                    path: renderer,
                    reason: e.to_string(),
                });
            }
            Err(e) => return Err(RenderError::io("Failed to launch renderer", &e)),
        };

        tracing::info!(
            "Rendering {} bytes with {} (theme={}, sketch={})",
            request.source().len(),
            renderer.display(),
            opts.theme.as_arg(),
            opts.sketch
        );
        let started = Instant::now();

        let waited = tokio::select! {
            biased;
            _ = cancel.cancelled() => Waited::Cancelled,
            waited = tokio::time::timeout(opts.timeout, process.wait_with_output()) => match waited {
                Err(_) => Waited::TimedOut,
                Ok(result) => Waited::Exited(result),
            },
        };

        let output = match waited {
            Waited::Exited(Ok(output)) => output,
            Waited::Exited(Err(e)) => {
                process.terminate().await;
                return Err(RenderError::io("Failed waiting for renderer", &e));
            }
            Waited::Cancelled => {
                process.terminate().await;
                tracing::info!("Render cancelled after {:?}", started.elapsed());
                return Err(RenderError::Cancelled);
            }
            Waited::TimedOut => {
                process.terminate().await;
                tracing::warn!("Renderer timed out after {:?}", opts.timeout);
                return Err(RenderError::TimedOut {
                    secs: opts.timeout.as_secs(),
                });
            }
        };

        let result = interpret_output(output, &output_path);
        match &result {
            Ok(image) => tracing::info!(
                "Rendered {}x{} in {:?}",
                image.width,
                image.height,
                started.elapsed()
            ),
            Err(e) => tracing::warn!("Render failed: {}", e),
        }
        result
    }

    fn clear_stale_output(&self, output: &Path) -> Result<(), RenderError> {
        if self.cache.contains(output) {
            self.cache
                .clear_outputs()
                .map_err(|e| RenderError::io("Failed to clear render cache", &e))?;
        }

        if let Some(parent) = output.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| RenderError::io("Failed to create output directory", &e))?;
        }

        remove_if_exists(output).map_err(|e| RenderError::io("Failed to remove stale output", &e))
    }
}

enum Waited {
    Exited(std::io::Result<Output>),
    Cancelled,
    TimedOut,
}

/// Classify a finished renderer process.
fn interpret_output(output: Output, target: &Path) -> RenderResult {
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
        // Captured stderr is reported byte for byte, whitespace included.
        let diagnostics = if !stderr.is_empty() {
            stderr
        } else {
            let stdout = String::from_utf8_lossy(&output.stdout);
            if stdout.trim().is_empty() {
                "renderer exited with a non-zero status".to_string()
            } else {
                stdout.into_owned()
            }
        };
        return Err(RenderError::Render {
            exit_code: output.status.code(),
            diagnostics,
        });
    }

    if !target.is_file() {
        let diagnostics = if stderr.is_empty() {
            "renderer finished but produced no output image".to_string()
        } else {
            stderr
        };
        return Err(RenderError::Render {
            exit_code: output.status.code(),
            diagnostics,
        });
    }

    let (width, height) = image::image_dimensions(target).map_err(|e| RenderError::Io {
        context: format!("Failed to read rendered image {}", target.display()),
        message: e.to_string(),
    })?;

    Ok(RenderedImage {
        path: target.to_path_buf(),
        width,
        height,
    })
}
