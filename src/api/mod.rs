//! Tool pipeline: request decoding, validation, figure building, output
//! naming, persistence and dispatch.

mod axes;
mod cartesian_figures;
mod config;
mod dispatcher;
mod figure;
mod figure_builder;
mod graph_figure;
mod heatmap_figure;
mod normalized;
mod output_namer;
mod plot3d_figure;
mod request;
mod sink;
mod validation;

pub use config::{
    CONFIG_PATH_ENV, DISPLAY_ENV, DPI_ENV, LAYOUT_SEED_ENV, MAX_DPI, MIN_DPI, OUTPUT_DIR_ENV,
    ServerConfig, parse_layout_seed,
};
pub use dispatcher::{PipelineStage, ToolDispatcher, ToolResult};
pub use figure::{Figure, LegendEntry};
pub use figure_builder::FigureBuilder;
pub use normalized::{
    ChartText, NormalizedClassification, NormalizedGraph, NormalizedHeatmap, NormalizedHistogram,
    NormalizedLinePlot, NormalizedPlot3d, NormalizedRequest, NormalizedScatter, Plot3dStyle,
};
pub use output_namer::{OutputArtifact, OutputNamer};
pub use request::{
    ChartKind, ChartRequest, ClassificationRequest, FigureSize, HeatmapRequest, HistogramRequest,
    LinePlotRequest, POINTS_PER_INCH, Plot3dRequest, RelationshipGraphRequest, ScatterRequest,
};
pub use sink::{
    CommandDisplay, DEFAULT_DPI, DisplayMode, DisplaySurface, FigureSink, HeadlessDisplay,
};
pub use validation::{
    DEFAULT_BINS, DEFAULT_COLORMAP, DEFAULT_FONT_SIZE, DEFAULT_NODE_SIZE, DEFAULT_POINT_SIZE,
    MAX_BINS, MAX_GRAPH_NODES, MAX_HEATMAP_CELLS, parse_line_style, validate,
};
