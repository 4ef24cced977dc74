use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Render(String),

    #[error("{0}")]
    Path(String),

    #[error("{0}")]
    Persistence(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ChartError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::InvalidConfig(_) => ErrorKind::Validation,
            Self::InvalidViewport { .. } | Self::Render(_) => ErrorKind::Render,
            Self::Path(_) => ErrorKind::Path,
            Self::Persistence(_) => ErrorKind::Persistence,
        }
    }

    pub(crate) fn validation(reason: impl Into<String>) -> Self {
        Self::Validation(reason.into())
    }

    pub(crate) fn render(reason: impl Into<String>) -> Self {
        Self::Render(reason.into())
    }
}

/// Wire-level failure taxonomy reported in error tool results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    #[serde(rename = "validation_error")]
    Validation,
    #[serde(rename = "render_error")]
    Render,
    #[serde(rename = "path_error")]
    Path,
    #[serde(rename = "persistence_error")]
    Persistence,
}

impl ErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "ValidationError",
            Self::Render => "RenderError",
            Self::Path => "PathError",
            Self::Persistence => "PersistenceError",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of the optional interactive display step.
///
/// Never converted into `ChartError`: a figure that could not be shown is
/// still a saved figure.
#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("no display surface available: {0}")]
    Unavailable(String),

    #[error("failed to launch viewer `{program}`: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },
}
