use std::path::PathBuf;

use thiserror::Error;

/// Every way a render can fail. Nothing past the bridge boundary ever sees
/// a panic or a raw `io::Error`; it sees one of these.
///
/// The type is `Clone` because it travels inside UI messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The renderer executable could not be found or launched.
    #[error("renderer not usable at {}: {reason}", path.display())]
    Configuration { path: PathBuf, reason: String },

    /// The renderer ran and rejected the diagram.
    #[error("render failed{}: {diagnostics}", exit_suffix(*exit_code))]
    Render {
        exit_code: Option<i32>,
        diagnostics: String,
    },

    /// The renderer ran past its deadline and was killed.
    #[error("renderer timed out after {secs}s and was killed")]
    TimedOut { secs: u64 },

    /// A newer request or shutdown cancelled this render; the child was killed.
    #[error("render cancelled; renderer process was killed")]
    Cancelled,

    /// A scratch or output file could not be written or read.
    #[error("{context}: {message}")]
    Io { context: String, message: String },
}

fn exit_suffix(code: Option<i32>) -> String {
    match code {
        Some(c) => format!(" (exit code {})", c),
        None => " (terminated by signal)".to_string(),
    }
}

impl RenderError {
    pub(crate) fn io(context: impl Into<String>, err: &std::io::Error) -> Self {
        RenderError::Io {
            context: context.into(),
            message: err.to_string(),
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, RenderError::Configuration { .. })
    }

    /// Process-level failures: the renderer was killed rather than finishing.
    pub fn is_process(&self) -> bool {
        matches!(self, RenderError::TimedOut { .. } | RenderError::Cancelled)
    }

    /// The renderer's own error text, if the failure carried any.
    pub fn diagnostics(&self) -> Option<&str> {
        match self {
            RenderError::Render { diagnostics, .. } => Some(diagnostics),
            _ => None,
        }
    }
}
