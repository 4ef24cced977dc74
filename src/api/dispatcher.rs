use std::fmt;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, info_span, warn};

use crate::error::{ChartError, ChartResult, ErrorKind};

use super::{
    ChartKind, ChartRequest, DisplaySurface, FigureBuilder, FigureSink, OutputArtifact,
    OutputNamer, ServerConfig, validate,
};

/// Where a tool call is, or where it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Received,
    Validating,
    Rendering,
    Persisting,
    Completed,
}

impl PipelineStage {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Received => "intake",
            Self::Validating => "validation",
            Self::Rendering => "rendering",
            Self::Persisting => "persistence",
            Self::Completed => "completion",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uniform answer to every tool call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ToolResult {
    Success {
        kind: ChartKind,
        path: PathBuf,
        displayed: bool,
        message: String,
    },
    Error {
        kind: ErrorKind,
        stage: PipelineStage,
        message: String,
    },
}

impl ToolResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Success { message, .. } | Self::Error { message, .. } => message,
        }
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Success { path, .. } => Some(path),
            Self::Error { .. } => None,
        }
    }

    #[must_use]
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Success { .. } => None,
            Self::Error { kind, .. } => Some(*kind),
        }
    }

    fn failure(chart: ChartKind, stage: PipelineStage, error: &ChartError) -> Self {
        Self::Error {
            kind: error.kind(),
            stage,
            message: format!("{} failed during {stage}: {error}", chart.display_name()),
        }
    }
}

/// Runs tool calls through validation, rendering, persistence and display.
///
/// Calls are handled one at a time; callers that share a dispatcher across
/// threads must serialize access.
#[derive(Debug)]
pub struct ToolDispatcher {
    builder: FigureBuilder,
    namer: OutputNamer,
    sink: FigureSink,
}

impl ToolDispatcher {
    /// Dispatcher with the display surface chosen by `config.display`.
    pub fn new(config: &ServerConfig) -> ChartResult<Self> {
        Self::with_display(config, config.display.clone().into_surface())
    }

    pub fn with_display(
        config: &ServerConfig,
        display: Box<dyn DisplaySurface>,
    ) -> ChartResult<Self> {
        config.validate()?;
        Ok(Self {
            builder: FigureBuilder::new(config.layout_seed, config.layout_params()),
            namer: OutputNamer::new(&config.output_dir)?,
            sink: FigureSink::new(config.dpi, display),
        })
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        self.namer.directory()
    }

    pub fn dispatch(&mut self, request: ChartRequest) -> ToolResult {
        let kind = request.kind();
        self.dispatch_with(kind, || Ok(request))
    }

    /// Dispatches the raw argument object of a `kind` tool call; decoding
    /// failures are reported at the validation stage.
    pub fn dispatch_arguments(&mut self, kind: ChartKind, arguments: Value) -> ToolResult {
        self.dispatch_with(kind, || ChartRequest::from_arguments(kind, arguments))
    }

    fn dispatch_with(
        &mut self,
        kind: ChartKind,
        decode: impl FnOnce() -> ChartResult<ChartRequest>,
    ) -> ToolResult {
        let span = info_span!("tool_call", tool = kind.tool_name());
        let _entered = span.enter();
        debug!(stage = %PipelineStage::Received, "tool call received");

        match self.run(decode) {
            Ok((artifact, displayed)) => {
                let path = artifact.path.display();
                let message = if displayed {
                    format!("{} saved to: {path} and displayed", kind.display_name())
                } else {
                    format!("{} saved to: {path} (display unavailable)", kind.display_name())
                };
                info!(stage = %PipelineStage::Completed, path = %path, displayed, "tool call completed");
                ToolResult::Success {
                    kind,
                    path: artifact.path,
                    displayed,
                    message,
                }
            }
            Err((stage, error)) => {
                warn!(stage = %stage, error_kind = %error.kind(), reason = %error, "tool call failed");
                ToolResult::failure(kind, stage, &error)
            }
        }
    }

    fn run(
        &mut self,
        decode: impl FnOnce() -> ChartResult<ChartRequest>,
    ) -> Result<(OutputArtifact, bool), (PipelineStage, ChartError)> {
        let at = |stage: PipelineStage| move |error: ChartError| (stage, error);

        debug!(stage = %PipelineStage::Validating, "validating request");
        let request = decode().map_err(at(PipelineStage::Validating))?;
        let normalized = validate(request).map_err(at(PipelineStage::Validating))?;

        debug!(stage = %PipelineStage::Rendering, "building figure");
        let figure = self
            .builder
            .build(&normalized)
            .map_err(at(PipelineStage::Rendering))?;

        debug!(stage = %PipelineStage::Persisting, "persisting figure");
        let artifact = self
            .namer
            .reserve(figure.kind, Local::now())
            .map_err(at(PipelineStage::Persisting))?;
        self.sink
            .persist(&figure, &artifact)
            .map_err(at(PipelineStage::Persisting))?;

        let displayed = self.sink.display(&artifact);
        Ok((artifact, displayed))
    }
}
