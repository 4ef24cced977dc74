use std::collections::HashMap;

use crate::core::{Colormap, DataPoint, Point3};
use crate::error::{ChartError, ChartResult};
use crate::render::{Color, LineStrokeStyle};

use super::{
    ChartRequest, ChartText, ClassificationRequest, HeatmapRequest, HistogramRequest,
    LinePlotRequest, NormalizedClassification, NormalizedGraph, NormalizedHeatmap,
    NormalizedHistogram, NormalizedLinePlot, NormalizedPlot3d, NormalizedRequest,
    NormalizedScatter, Plot3dRequest, Plot3dStyle, RelationshipGraphRequest, ScatterRequest,
};

pub const DEFAULT_NODE_SIZE: f64 = 1000.0;
pub const DEFAULT_FONT_SIZE: f64 = 12.0;
pub const DEFAULT_BINS: usize = 30;
pub const DEFAULT_POINT_SIZE: f64 = 50.0;
pub const DEFAULT_CLASSIFICATION_POINT_SIZE: f64 = 60.0;
pub const DEFAULT_LINE_STYLE: &str = "-";
pub const DEFAULT_LINE_COLOR: &str = "blue";
pub const DEFAULT_HISTOGRAM_COLOR: &str = "skyblue";
pub const DEFAULT_COLORMAP: &str = "viridis";

pub const MAX_BINS: usize = 10_000;
pub const MAX_GRAPH_NODES: usize = 2_000;
pub const MAX_HEATMAP_CELLS: usize = 250_000;
const MIN_GRID_POINTS: usize = 4;

/// Checks a raw request and fills in every default.
///
/// Pure and deterministic: the same request always yields the same
/// normalized request or the same `ChartError::Validation`.
pub fn validate(request: ChartRequest) -> ChartResult<NormalizedRequest> {
    Ok(match request {
        ChartRequest::RelationshipGraph(request) => {
            NormalizedRequest::RelationshipGraph(validate_relationship_graph(request)?)
        }
        ChartRequest::Scatter(request) => NormalizedRequest::Scatter(validate_scatter(request)?),
        ChartRequest::ClassificationScatter(request) => {
            NormalizedRequest::ClassificationScatter(validate_classification(request)?)
        }
        ChartRequest::Plot3d(request) => NormalizedRequest::Plot3d(validate_plot_3d(request)?),
        ChartRequest::Histogram(request) => {
            NormalizedRequest::Histogram(validate_histogram(request)?)
        }
        ChartRequest::LinePlot(request) => NormalizedRequest::LinePlot(validate_line_plot(request)?),
        ChartRequest::Heatmap(request) => NormalizedRequest::Heatmap(validate_heatmap(request)?),
    })
}

fn validate_relationship_graph(request: RelationshipGraphRequest) -> ChartResult<NormalizedGraph> {
    if request.nodes.is_empty() {
        return Err(ChartError::validation("nodes must not be empty"));
    }
    if request.nodes.len() > MAX_GRAPH_NODES {
        return Err(ChartError::validation(format!(
            "at most {MAX_GRAPH_NODES} nodes are supported, got {}",
            request.nodes.len()
        )));
    }

    let mut index_of: HashMap<&str, usize> = HashMap::with_capacity(request.nodes.len());
    for (index, name) in request.nodes.iter().enumerate() {
        if name.trim().is_empty() {
            return Err(ChartError::validation(format!(
                "node at position {index} has an empty name"
            )));
        }
        if index_of.insert(name.as_str(), index).is_some() {
            return Err(ChartError::validation(format!("duplicate node `{name}`")));
        }
    }

    let mut edges = Vec::with_capacity(request.edges.len());
    for (position, edge) in request.edges.iter().enumerate() {
        let [source, target] = edge.as_slice() else {
            return Err(ChartError::validation(format!(
                "edge at position {position} must have exactly 2 endpoints, got {}",
                edge.len()
            )));
        };
        let lookup = |name: &String| {
            index_of.get(name.as_str()).copied().ok_or_else(|| {
                ChartError::validation(format!(
                    "edge at position {position} references unknown node `{name}`"
                ))
            })
        };
        edges.push((lookup(source)?, lookup(target)?));
    }

    let node_size = positive_or_default("node_size", request.node_size, DEFAULT_NODE_SIZE)?;
    let font_size = positive_or_default("font_size", request.font_size, DEFAULT_FONT_SIZE)?;

    Ok(NormalizedGraph {
        nodes: request.nodes,
        edges,
        title: request
            .title
            .unwrap_or_else(|| "Relationship Graph".to_owned()),
        node_size,
        font_size,
        directed: request.directed.unwrap_or(false),
    })
}

fn validate_scatter(request: ScatterRequest) -> ChartResult<NormalizedScatter> {
    let points = paired_points(&request.x_data, &request.y_data)?;
    if let Some(labels) = &request.labels {
        expect_len("labels", labels.len(), "x_data", points.len())?;
    }
    let colors = request
        .colors
        .as_deref()
        .map(|colors| -> ChartResult<Vec<Color>> {
            expect_len("colors", colors.len(), "x_data", points.len())?;
            colors.iter().map(|color| Color::parse(color)).collect()
        })
        .transpose()?;

    Ok(NormalizedScatter {
        points,
        point_labels: request.labels,
        colors,
        text: chart_text(
            request.title,
            "Scatter Plot",
            request.x_label,
            "X-axis",
            request.y_label,
            "Y-axis",
        ),
        marker_area: positive_or_default("size", request.size, DEFAULT_POINT_SIZE)?,
    })
}

fn validate_classification(
    request: ClassificationRequest,
) -> ChartResult<NormalizedClassification> {
    let points = paired_points(&request.x_data, &request.y_data)?;
    expect_len("categories", request.categories.len(), "x_data", points.len())?;
    if let Some(index) = request
        .categories
        .iter()
        .position(|category| category.trim().is_empty())
    {
        return Err(ChartError::validation(format!(
            "category at position {index} is empty"
        )));
    }

    Ok(NormalizedClassification {
        points,
        categories: request.categories,
        text: chart_text(
            request.title,
            "Classification Scatter Plot",
            request.x_label,
            "Feature 1",
            request.y_label,
            "Feature 2",
        ),
        marker_area: positive_or_default(
            "size",
            request.size,
            DEFAULT_CLASSIFICATION_POINT_SIZE,
        )?,
    })
}

fn validate_plot_3d(request: Plot3dRequest) -> ChartResult<NormalizedPlot3d> {
    finite_series("x_data", &request.x_data)?;
    finite_series("y_data", &request.y_data)?;
    finite_series("z_data", &request.z_data)?;
    expect_len("y_data", request.y_data.len(), "x_data", request.x_data.len())?;
    expect_len("z_data", request.z_data.len(), "x_data", request.x_data.len())?;

    let style = match request.plot_type.as_deref().map(str::trim) {
        None | Some("scatter") => Plot3dStyle::Scatter,
        Some("surface") => Plot3dStyle::Surface,
        Some("wireframe") => Plot3dStyle::Wireframe,
        Some(other) => {
            return Err(ChartError::validation(format!(
                "plot_type must be one of scatter, surface, wireframe; got `{other}`"
            )));
        }
    };
    if style != Plot3dStyle::Scatter && request.x_data.len() < MIN_GRID_POINTS {
        return Err(ChartError::validation(format!(
            "surface and wireframe plots need at least {MIN_GRID_POINTS} grid points, got {}",
            request.x_data.len()
        )));
    }

    let points = request
        .x_data
        .iter()
        .zip(&request.y_data)
        .zip(&request.z_data)
        .map(|((x, y), z)| Point3::new(*x, *y, *z))
        .collect();

    Ok(NormalizedPlot3d {
        points,
        style,
        text: chart_text(
            request.title,
            "3D Plot",
            request.x_label,
            "X-axis",
            request.y_label,
            "Y-axis",
        ),
        z_label: request.z_label.unwrap_or_else(|| "Z-axis".to_owned()),
        colormap: Colormap::parse(request.colormap.as_deref().unwrap_or(DEFAULT_COLORMAP))?,
    })
}

fn validate_histogram(request: HistogramRequest) -> ChartResult<NormalizedHistogram> {
    finite_series("data", &request.data)?;
    let bins = match request.bins {
        None => DEFAULT_BINS,
        Some(bins)
            if bins.is_finite() && bins.fract() == 0.0 && (1.0..=MAX_BINS as f64).contains(&bins) =>
        {
            bins as usize
        }
        Some(bins) => {
            return Err(ChartError::validation(format!(
                "bins must be a positive integer no greater than {MAX_BINS}, got {bins}"
            )));
        }
    };

    Ok(NormalizedHistogram {
        data: request.data,
        bins,
        text: chart_text(
            request.title,
            "Histogram",
            request.x_label,
            "Value",
            request.y_label,
            "Frequency",
        ),
        color: Color::parse(request.color.as_deref().unwrap_or(DEFAULT_HISTOGRAM_COLOR))?,
    })
}

fn validate_line_plot(request: LinePlotRequest) -> ChartResult<NormalizedLinePlot> {
    let points = paired_points(&request.x_data, &request.y_data)?;
    let stroke_style =
        parse_line_style(request.line_style.as_deref().unwrap_or(DEFAULT_LINE_STYLE))?;

    Ok(NormalizedLinePlot {
        points,
        text: chart_text(
            request.title,
            "Line Chart",
            request.x_label,
            "X-axis",
            request.y_label,
            "Y-axis",
        ),
        stroke_style,
        color: Color::parse(request.color.as_deref().unwrap_or(DEFAULT_LINE_COLOR))?,
    })
}

fn validate_heatmap(request: HeatmapRequest) -> ChartResult<NormalizedHeatmap> {
    let rows = request.data_matrix.len();
    let columns = request.data_matrix.first().map_or(0, Vec::len);
    if rows == 0 || columns == 0 {
        return Err(ChartError::validation("data_matrix must not be empty"));
    }
    if let Some(row) = request
        .data_matrix
        .iter()
        .position(|values| values.len() != columns)
    {
        return Err(ChartError::validation(format!(
            "data_matrix must be rectangular: row 0 has {columns} values but row {row} has {}",
            request.data_matrix[row].len()
        )));
    }
    if rows * columns > MAX_HEATMAP_CELLS {
        return Err(ChartError::validation(format!(
            "data_matrix has {} cells, at most {MAX_HEATMAP_CELLS} are supported",
            rows * columns
        )));
    }
    for (row, values) in request.data_matrix.iter().enumerate() {
        if let Some(column) = values.iter().position(|value| !value.is_finite()) {
            return Err(ChartError::validation(format!(
                "data_matrix[{row}][{column}] is not a finite number"
            )));
        }
    }
    if let Some(labels) = &request.x_labels {
        expect_len("x_labels", labels.len(), "the column count", columns)?;
    }
    if let Some(labels) = &request.y_labels {
        expect_len("y_labels", labels.len(), "the row count", rows)?;
    }

    Ok(NormalizedHeatmap {
        matrix: request.data_matrix,
        x_labels: request.x_labels,
        y_labels: request.y_labels,
        title: request.title.unwrap_or_else(|| "Heatmap".to_owned()),
        colormap: Colormap::parse(request.colormap.as_deref().unwrap_or(DEFAULT_COLORMAP))?,
    })
}

/// Parses matplotlib-style line style shorthands.
pub fn parse_line_style(style: &str) -> ChartResult<LineStrokeStyle> {
    match style.trim() {
        "-" | "solid" => Ok(LineStrokeStyle::Solid),
        "--" | "dashed" => Ok(LineStrokeStyle::Dashed),
        "-." | "dashdot" => Ok(LineStrokeStyle::DashDot),
        ":" | "dotted" => Ok(LineStrokeStyle::Dotted),
        other => Err(ChartError::validation(format!(
            "line_style must be one of `-`, `--`, `-.`, `:`; got `{other}`"
        ))),
    }
}

fn paired_points(x_data: &[f64], y_data: &[f64]) -> ChartResult<Vec<DataPoint>> {
    finite_series("x_data", x_data)?;
    finite_series("y_data", y_data)?;
    expect_len("y_data", y_data.len(), "x_data", x_data.len())?;
    Ok(x_data
        .iter()
        .zip(y_data)
        .map(|(x, y)| DataPoint::new(*x, *y))
        .collect())
}

fn finite_series(field: &str, values: &[f64]) -> ChartResult<()> {
    if values.is_empty() {
        return Err(ChartError::validation(format!("{field} must not be empty")));
    }
    if let Some(index) = values.iter().position(|value| !value.is_finite()) {
        return Err(ChartError::validation(format!(
            "{field}[{index}] is not a finite number"
        )));
    }
    Ok(())
}

fn expect_len(field: &str, actual: usize, reference: &str, expected: usize) -> ChartResult<()> {
    if actual != expected {
        return Err(ChartError::validation(format!(
            "{field} has length {actual} but {reference} has length {expected}"
        )));
    }
    Ok(())
}

fn positive_or_default(field: &str, value: Option<f64>, default: f64) -> ChartResult<f64> {
    match value {
        None => Ok(default),
        Some(value) if value.is_finite() && value > 0.0 => Ok(value),
        Some(value) => Err(ChartError::validation(format!(
            "{field} must be a positive number, got {value}"
        ))),
    }
}

fn chart_text(
    title: Option<String>,
    default_title: &str,
    x_label: Option<String>,
    default_x_label: &str,
    y_label: Option<String>,
    default_y_label: &str,
) -> ChartText {
    ChartText {
        title: title.unwrap_or_else(|| default_title.to_owned()),
        x_label: x_label.unwrap_or_else(|| default_x_label.to_owned()),
        y_label: y_label.unwrap_or_else(|| default_y_label.to_owned()),
    }
}
