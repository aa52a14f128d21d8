use std::backtrace::{Backtrace, BacktraceStatus};

use thiserror::Error;

/// Errors raised while rendering an element tree.
///
/// Component failures are never recovered inside the pipeline; they travel
/// back through `?` to the nearest [`App`](crate::app::App) render boundary.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A component (or one of its hooks) failed.
    #[error("{message}")]
    Component {
        message: String,
        trace: Option<String>,
    },

    /// `App::render` was called on an application without a body component.
    #[error("no body component is configured for this application")]
    MissingBody,

    /// An ad-hoc component was rendered on an application that already has a body.
    #[error("application already has a body component; ad-hoc components cannot be rendered")]
    BodyConflict,

    /// The application was rendered before being attached to a mount point.
    #[error("application is not attached to a mount point")]
    NotAttached,

    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl RenderError {
    /// Create a component error, capturing a backtrace when the environment
    /// enables one (`RUST_BACKTRACE`/`RUST_LIB_BACKTRACE`).
    pub fn msg(message: impl Into<String>) -> Self {
        let backtrace = Backtrace::capture();
        let trace = match backtrace.status() {
            BacktraceStatus::Captured => Some(backtrace.to_string()),
            _ => None,
        };
        Self::Component {
            message: message.into(),
            trace,
        }
    }

    /// Create a component error carrying an explicit trace.
    pub fn with_trace(message: impl Into<String>, trace: impl Into<String>) -> Self {
        Self::Component {
            message: message.into(),
            trace: Some(trace.into()),
        }
    }

    /// Wrap any other error.
    pub fn other(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Other(Box::new(err))
    }

    /// The trace attached to this error, if any.
    pub fn trace(&self) -> Option<&str> {
        match self {
            Self::Component { trace, .. } => trace.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_is_displayed_verbatim() {
        let err = RenderError::with_trace("boom <b>", "at main");
        assert_eq!(err.to_string(), "boom <b>");
        assert_eq!(err.trace(), Some("at main"));
    }

    #[test]
    fn test_other_errors_forward_display() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing template");
        let err = RenderError::other(io);
        assert_eq!(err.to_string(), "missing template");
        assert!(err.trace().is_none());
    }

    #[test]
    fn test_structural_errors_have_no_trace() {
        assert!(RenderError::MissingBody.trace().is_none());
        assert!(RenderError::NotAttached.trace().is_none());
    }
}
