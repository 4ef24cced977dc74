use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};

/// The seven supported chart kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum ChartKind {
    #[serde(rename = "relationship_graph")]
    RelationshipGraph,
    #[serde(rename = "scatter")]
    Scatter,
    #[serde(rename = "classification_scatter")]
    ClassificationScatter,
    #[serde(rename = "3d_plot")]
    Plot3d,
    #[serde(rename = "histogram")]
    Histogram,
    #[serde(rename = "line_plot")]
    LinePlot,
    #[serde(rename = "heatmap")]
    Heatmap,
}

impl ChartKind {
    pub const ALL: [Self; 7] = [
        Self::RelationshipGraph,
        Self::Scatter,
        Self::ClassificationScatter,
        Self::Plot3d,
        Self::Histogram,
        Self::LinePlot,
        Self::Heatmap,
    ];

    #[must_use]
    pub const fn tool_name(self) -> &'static str {
        match self {
            Self::RelationshipGraph => "create_relationship_graph",
            Self::Scatter => "create_scatter_plot",
            Self::ClassificationScatter => "create_classification_plot",
            Self::Plot3d => "create_3d_plot",
            Self::Histogram => "create_histogram",
            Self::LinePlot => "create_line_plot",
            Self::Heatmap => "create_heatmap",
        }
    }

    /// Prefix of the output file name.
    #[must_use]
    pub const fn file_tag(self) -> &'static str {
        match self {
            Self::RelationshipGraph => "relationship_graph",
            Self::Scatter => "scatter_plot",
            Self::ClassificationScatter => "classification_plot",
            Self::Plot3d => "3d_plot",
            Self::Histogram => "histogram",
            Self::LinePlot => "line_plot",
            Self::Heatmap => "heatmap",
        }
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::RelationshipGraph => "Relationship graph",
            Self::Scatter => "Scatter plot",
            Self::ClassificationScatter => "Classification plot",
            Self::Plot3d => "3D plot",
            Self::Histogram => "Histogram",
            Self::LinePlot => "Line chart",
            Self::Heatmap => "Heatmap",
        }
    }

    /// Figure size in inches.
    #[must_use]
    pub const fn figure_size(self) -> FigureSize {
        match self {
            Self::RelationshipGraph | Self::Scatter | Self::ClassificationScatter => {
                FigureSize::new(10.0, 8.0)
            }
            Self::Plot3d => FigureSize::new(12.0, 9.0),
            Self::Histogram | Self::LinePlot => FigureSize::new(10.0, 6.0),
            Self::Heatmap => FigureSize::new(10.0, 8.0),
        }
    }
}

impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.file_tag())
    }
}

/// Physical figure size in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FigureSize {
    pub width_in: f64,
    pub height_in: f64,
}

impl FigureSize {
    #[must_use]
    pub const fn new(width_in: f64, height_in: f64) -> Self {
        Self {
            width_in,
            height_in,
        }
    }

    /// Frame viewport in points.
    #[must_use]
    pub fn viewport(self) -> Viewport {
        Viewport::new(
            (self.width_in * POINTS_PER_INCH).round() as u32,
            (self.height_in * POINTS_PER_INCH).round() as u32,
        )
    }

    /// Raster size in pixels at `dpi`.
    #[must_use]
    pub fn pixels(self, dpi: u32) -> (i32, i32) {
        (
            (self.width_in * f64::from(dpi)).round() as i32,
            (self.height_in * f64::from(dpi)).round() as i32,
        )
    }
}

pub const POINTS_PER_INCH: f64 = 72.0;

// Request payloads as they arrive over the wire. Enumerated options stay
// strings here; `validation` parses them so bad values become validation
// errors instead of transport-level decode failures.

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct RelationshipGraphRequest {
    /// Unique node names.
    pub nodes: Vec<String>,
    /// Edges as `[source, target]` pairs of node names.
    pub edges: Vec<Vec<String>>,
    /// Chart title. Default: "Relationship Graph".
    #[serde(default)]
    pub title: Option<String>,
    /// Node marker area in square points. Default: 1000.
    #[serde(default)]
    pub node_size: Option<f64>,
    /// Node label font size in points. Default: 12.
    #[serde(default)]
    pub font_size: Option<f64>,
    /// Draw arrowheads from source to target. Default: false.
    #[serde(default)]
    pub directed: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct ScatterRequest {
    pub x_data: Vec<f64>,
    pub y_data: Vec<f64>,
    /// Optional per-point text annotations.
    #[serde(default)]
    pub labels: Option<Vec<String>>,
    /// Optional per-point colors (names like "red" or hex "#1f77b4").
    #[serde(default)]
    pub colors: Option<Vec<String>>,
    /// Default: "Scatter Plot".
    #[serde(default)]
    pub title: Option<String>,
    /// Default: "X-axis".
    #[serde(default)]
    pub x_label: Option<String>,
    /// Default: "Y-axis".
    #[serde(default)]
    pub y_label: Option<String>,
    /// Marker area in square points. Default: 50.
    #[serde(default)]
    pub size: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct ClassificationRequest {
    pub x_data: Vec<f64>,
    pub y_data: Vec<f64>,
    /// Category of each point; one legend entry per distinct value.
    pub categories: Vec<String>,
    /// Default: "Classification Scatter Plot".
    #[serde(default)]
    pub title: Option<String>,
    /// Default: "Feature 1".
    #[serde(default)]
    pub x_label: Option<String>,
    /// Default: "Feature 2".
    #[serde(default)]
    pub y_label: Option<String>,
    /// Marker area in square points. Default: 60.
    #[serde(default)]
    pub size: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Plot3dRequest {
    pub x_data: Vec<f64>,
    pub y_data: Vec<f64>,
    pub z_data: Vec<f64>,
    /// "scatter", "surface" or "wireframe". Default: "scatter". Surface and
    /// wireframe need the points to form a complete x/y grid.
    #[serde(default)]
    pub plot_type: Option<String>,
    /// Default: "3D Plot".
    #[serde(default)]
    pub title: Option<String>,
    /// Default: "X-axis".
    #[serde(default)]
    pub x_label: Option<String>,
    /// Default: "Y-axis".
    #[serde(default)]
    pub y_label: Option<String>,
    /// Default: "Z-axis".
    #[serde(default)]
    pub z_label: Option<String>,
    /// Colormap used for point and surface colors. Default: "viridis".
    #[serde(default)]
    pub colormap: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct HistogramRequest {
    pub data: Vec<f64>,
    /// Number of equal-width bins, a whole number. Default: 30.
    #[serde(default)]
    pub bins: Option<f64>,
    /// Default: "Histogram".
    #[serde(default)]
    pub title: Option<String>,
    /// Default: "Value".
    #[serde(default)]
    pub x_label: Option<String>,
    /// Default: "Frequency".
    #[serde(default)]
    pub y_label: Option<String>,
    /// Bar fill color. Default: "skyblue".
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct LinePlotRequest {
    pub x_data: Vec<f64>,
    pub y_data: Vec<f64>,
    /// Default: "Line Chart".
    #[serde(default)]
    pub title: Option<String>,
    /// Default: "X-axis".
    #[serde(default)]
    pub x_label: Option<String>,
    /// Default: "Y-axis".
    #[serde(default)]
    pub y_label: Option<String>,
    /// "-", "--", "-.", ":" (or solid/dashed/dashdot/dotted). Default: "-".
    #[serde(default)]
    pub line_style: Option<String>,
    /// Default: "blue".
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct HeatmapRequest {
    /// Rectangular matrix; row 0 is drawn at the top.
    #[serde(alias = "data")]
    pub data_matrix: Vec<Vec<f64>>,
    /// One label per column.
    #[serde(default)]
    pub x_labels: Option<Vec<String>>,
    /// One label per row.
    #[serde(default)]
    pub y_labels: Option<Vec<String>>,
    /// Default: "Heatmap".
    #[serde(default)]
    pub title: Option<String>,
    /// Default: "viridis".
    #[serde(default)]
    pub colormap: Option<String>,
}

/// One tool invocation, tagged by chart kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ChartRequest {
    #[serde(rename = "relationship_graph")]
    RelationshipGraph(RelationshipGraphRequest),
    #[serde(rename = "scatter")]
    Scatter(ScatterRequest),
    #[serde(rename = "classification_scatter")]
    ClassificationScatter(ClassificationRequest),
    #[serde(rename = "3d_plot")]
    Plot3d(Plot3dRequest),
    #[serde(rename = "histogram")]
    Histogram(HistogramRequest),
    #[serde(rename = "line_plot")]
    LinePlot(LinePlotRequest),
    #[serde(rename = "heatmap")]
    Heatmap(HeatmapRequest),
}

impl ChartRequest {
    #[must_use]
    pub fn kind(&self) -> ChartKind {
        match self {
            Self::RelationshipGraph(_) => ChartKind::RelationshipGraph,
            Self::Scatter(_) => ChartKind::Scatter,
            Self::ClassificationScatter(_) => ChartKind::ClassificationScatter,
            Self::Plot3d(_) => ChartKind::Plot3d,
            Self::Histogram(_) => ChartKind::Histogram,
            Self::LinePlot(_) => ChartKind::LinePlot,
            Self::Heatmap(_) => ChartKind::Heatmap,
        }
    }

    /// Decodes the untyped argument object of a `kind` tool call. Missing
    /// fields and mistyped values are validation errors.
    pub fn from_arguments(kind: ChartKind, arguments: Value) -> ChartResult<Self> {
        Ok(match kind {
            ChartKind::RelationshipGraph => Self::RelationshipGraph(decode(arguments)?),
            ChartKind::Scatter => Self::Scatter(decode(arguments)?),
            ChartKind::ClassificationScatter => Self::ClassificationScatter(decode(arguments)?),
            ChartKind::Plot3d => Self::Plot3d(decode(arguments)?),
            ChartKind::Histogram => Self::Histogram(decode(arguments)?),
            ChartKind::LinePlot => Self::LinePlot(decode(arguments)?),
            ChartKind::Heatmap => Self::Heatmap(decode(arguments)?),
        })
    }
}

fn decode<T: DeserializeOwned>(arguments: Value) -> ChartResult<T> {
    serde_json::from_value(arguments)
        .map_err(|err| ChartError::validation(format!("invalid arguments: {err}")))
}
