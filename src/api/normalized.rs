use crate::core::{Colormap, DataPoint, Point3};
use crate::render::{Color, LineStrokeStyle};

use super::ChartKind;

/// Title and axis captions after defaults are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartText {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedGraph {
    pub nodes: Vec<String>,
    /// Edges as indices into `nodes`.
    pub edges: Vec<(usize, usize)>,
    pub title: String,
    pub node_size: f64,
    pub font_size: f64,
    pub directed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedScatter {
    pub points: Vec<DataPoint>,
    pub point_labels: Option<Vec<String>>,
    pub colors: Option<Vec<Color>>,
    pub text: ChartText,
    pub marker_area: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedClassification {
    pub points: Vec<DataPoint>,
    pub categories: Vec<String>,
    pub text: ChartText,
    pub marker_area: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Plot3dStyle {
    #[default]
    Scatter,
    Surface,
    Wireframe,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedPlot3d {
    pub points: Vec<Point3>,
    pub style: Plot3dStyle,
    pub text: ChartText,
    pub z_label: String,
    pub colormap: Colormap,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedHistogram {
    pub data: Vec<f64>,
    pub bins: usize,
    pub text: ChartText,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedLinePlot {
    pub points: Vec<DataPoint>,
    pub text: ChartText,
    pub stroke_style: LineStrokeStyle,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedHeatmap {
    /// Row-major, rectangular.
    pub matrix: Vec<Vec<f64>>,
    pub x_labels: Option<Vec<String>>,
    pub y_labels: Option<Vec<String>>,
    pub title: String,
    pub colormap: Colormap,
}

impl NormalizedHeatmap {
    #[must_use]
    pub fn rows(&self) -> usize {
        self.matrix.len()
    }

    #[must_use]
    pub fn columns(&self) -> usize {
        self.matrix.first().map_or(0, Vec::len)
    }
}

/// A `ChartRequest` that passed validation, with every default filled in.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedRequest {
    RelationshipGraph(NormalizedGraph),
    Scatter(NormalizedScatter),
    ClassificationScatter(NormalizedClassification),
    Plot3d(NormalizedPlot3d),
    Histogram(NormalizedHistogram),
    LinePlot(NormalizedLinePlot),
    Heatmap(NormalizedHeatmap),
}

impl NormalizedRequest {
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
}
