//! chart-mcp: chart rendering tools served over the Model Context Protocol.
//!
//! Each tool call is validated into a normalized request, drawn into a
//! backend-agnostic `RenderFrame`, rasterized with cairo into a PNG under the
//! output directory and answered with a uniform `ToolResult`.

pub mod api;
pub mod core;
pub mod error;
pub mod render;
pub mod server;
pub mod telemetry;

pub use api::{ChartKind, ChartRequest, ServerConfig, ToolDispatcher, ToolResult};
pub use error::{ChartError, ChartResult, ErrorKind};
pub use server::ChartToolServer;
