//! MCP front end: one tool per chart kind, all funnelled into a shared
//! [`ToolDispatcher`].

use std::borrow::Cow;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, PoisonError};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use schemars::{JsonSchema, Schema, SchemaGenerator};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{error, warn};

use crate::api::{
    ChartKind, ChartRequest, ClassificationRequest, HeatmapRequest, HistogramRequest,
    LinePlotRequest, PipelineStage, Plot3dRequest, RelationshipGraphRequest, ScatterRequest,
    ServerConfig, ToolDispatcher, ToolResult,
};
use crate::error::{ChartResult, ErrorKind};

const INSTRUCTIONS: &str = "Chart rendering tools. Every tool validates its input, draws the \
figure, saves it as a 300 DPI PNG in the output directory and answers with the absolute path \
of the saved file plus the image itself. Invalid input is reported as an error result naming \
the failing stage.";

const PNG_MIME_TYPE: &str = "image/png";

/// Tool arguments advertised with `T`'s schema but kept undecoded, so that
/// missing or mistyped fields reach the dispatcher as validation failures.
pub struct ToolArguments<T> {
    value: Value,
    request: PhantomData<fn() -> T>,
}

impl<T> ToolArguments<T> {
    #[must_use]
    pub fn into_value(self) -> Value {
        self.value
    }
}

impl<'de, T> Deserialize<'de> for ToolArguments<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(|value| Self {
            value,
            request: PhantomData,
        })
    }
}

impl<T: JsonSchema> JsonSchema for ToolArguments<T> {
    fn schema_name() -> Cow<'static, str> {
        T::schema_name()
    }

    fn schema_id() -> Cow<'static, str> {
        T::schema_id()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        T::json_schema(generator)
    }
}

#[derive(Clone)]
pub struct ChartToolServer {
    dispatcher: Arc<Mutex<ToolDispatcher>>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl ChartToolServer {
    pub fn new(dispatcher: ToolDispatcher) -> Self {
        Self {
            dispatcher: Arc::new(Mutex::new(dispatcher)),
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        description = "Create a relationship graph. `nodes` are unique names, `edges` are [source, target] pairs of node names. Optional: title, node_size (marker area, default 1000), font_size (default 12), directed (draw arrowheads)."
    )]
    async fn create_relationship_graph(
        &self,
        Parameters(arguments): Parameters<ToolArguments<RelationshipGraphRequest>>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.call_tool(ChartKind::RelationshipGraph, arguments.into_value()).await)
    }

    #[tool(
        description = "Create a scatter plot from equal-length x_data and y_data. Optional: per-point labels, per-point colors (names or #rrggbb), title, x_label, y_label, size (marker area, default 50)."
    )]
    async fn create_scatter_plot(
        &self,
        Parameters(arguments): Parameters<ToolArguments<ScatterRequest>>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.call_tool(ChartKind::Scatter, arguments.into_value()).await)
    }

    #[tool(
        description = "Create a scatter plot colored by category. x_data, y_data and categories must have equal length; each distinct category gets a color and a legend entry."
    )]
    async fn create_classification_plot(
        &self,
        Parameters(arguments): Parameters<ToolArguments<ClassificationRequest>>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.call_tool(ChartKind::ClassificationScatter, arguments.into_value()).await)
    }

    #[tool(
        description = "Create a 3D plot from equal-length x_data, y_data and z_data. plot_type is scatter (default), surface or wireframe; surface and wireframe need the points to form a complete x/y grid."
    )]
    async fn create_3d_plot(
        &self,
        Parameters(arguments): Parameters<ToolArguments<Plot3dRequest>>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.call_tool(ChartKind::Plot3d, arguments.into_value()).await)
    }

    #[tool(
        description = "Create a histogram of `data` with `bins` equal-width bins (default 30). Optional: title, x_label, y_label, color."
    )]
    async fn create_histogram(
        &self,
        Parameters(arguments): Parameters<ToolArguments<HistogramRequest>>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.call_tool(ChartKind::Histogram, arguments.into_value()).await)
    }

    #[tool(
        description = "Create a line chart joining (x_data, y_data) points in the given order. Optional: line_style (-, --, -., :), color, title, x_label, y_label."
    )]
    async fn create_line_plot(
        &self,
        Parameters(arguments): Parameters<ToolArguments<LinePlotRequest>>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.call_tool(ChartKind::LinePlot, arguments.into_value()).await)
    }

    #[tool(
        description = "Create a heatmap from a rectangular data_matrix (row 0 drawn on top). Optional: x_labels (one per column), y_labels (one per row), title, colormap (default viridis)."
    )]
    async fn create_heatmap(
        &self,
        Parameters(arguments): Parameters<ToolArguments<HeatmapRequest>>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.call_tool(ChartKind::Heatmap, arguments.into_value()).await)
    }
}

impl ChartToolServer {
    pub fn from_config(config: &ServerConfig) -> ChartResult<Self> {
        Ok(Self::new(ToolDispatcher::new(config)?))
    }

    /// Runs one typed request on a blocking worker. Requests are serialized
    /// by the dispatcher lock.
    pub async fn handle(&self, request: ChartRequest) -> ToolResult {
        let kind = request.kind();
        self.run_blocking(kind, move |dispatcher| dispatcher.dispatch(request))
            .await
    }

    /// Same as [`ChartToolServer::handle`] for an undecoded argument object.
    pub async fn handle_arguments(&self, kind: ChartKind, arguments: Value) -> ToolResult {
        self.run_blocking(kind, move |dispatcher| {
            dispatcher.dispatch_arguments(kind, arguments)
        })
        .await
    }

    /// Answers a tool call: the result message as text and, on success, the
    /// saved PNG as inline image content.
    pub async fn call_tool(&self, kind: ChartKind, arguments: Value) -> CallToolResult {
        let result = self.handle_arguments(kind, arguments).await;
        let mut content = vec![Content::text(result.message().to_owned())];
        let Some(path) = result.path() else {
            return CallToolResult::error(content);
        };
        match tokio::fs::read(path).await {
            Ok(png) => content.push(Content::image(STANDARD.encode(png), PNG_MIME_TYPE)),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "saved chart could not be read back for inline content");
            }
        }
        CallToolResult::success(content)
    }

    async fn run_blocking(
        &self,
        kind: ChartKind,
        job: impl FnOnce(&mut ToolDispatcher) -> ToolResult + Send + 'static,
    ) -> ToolResult {
        let dispatcher = Arc::clone(&self.dispatcher);
        let joined = tokio::task::spawn_blocking(move || {
            let mut dispatcher = dispatcher.lock().unwrap_or_else(PoisonError::into_inner);
            job(&mut dispatcher)
        })
        .await;

        joined.unwrap_or_else(|join_error| {
            error!(tool = kind.tool_name(), error = %join_error, "tool worker aborted");
            ToolResult::Error {
                kind: ErrorKind::Render,
                stage: PipelineStage::Rendering,
                message: format!(
                    "{} failed during rendering: worker aborted: {join_error}",
                    kind.display_name()
                ),
            }
        })
    }
}

#[tool_handler]
impl ServerHandler for ChartToolServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
