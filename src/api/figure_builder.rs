use tracing::debug;

use crate::core::{Camera, LayoutSeedPolicy, SpringLayoutParams};
use crate::error::ChartResult;

use super::cartesian_figures::{
    build_classification, build_histogram, build_line_plot, build_scatter,
};
use super::graph_figure::build_graph;
use super::heatmap_figure::build_heatmap;
use super::plot3d_figure::build_plot_3d;
use super::{Figure, NormalizedRequest};

/// Turns validated requests into drawn figures.
///
/// Stateless apart from its settings; every call starts from a blank figure.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FigureBuilder {
    layout_seed: LayoutSeedPolicy,
    layout: SpringLayoutParams,
    camera: Camera,
}

impl FigureBuilder {
    #[must_use]
    pub fn new(layout_seed: LayoutSeedPolicy, layout: SpringLayoutParams) -> Self {
        Self {
            layout_seed,
            layout,
            camera: Camera::default(),
        }
    }

    pub fn build(&self, request: &NormalizedRequest) -> ChartResult<Figure> {
        let mut figure = Figure::new(request.kind());
        match request {
            NormalizedRequest::RelationshipGraph(graph) => {
                let seed = self.layout_seed.resolve(&graph.nodes, &graph.edges);
                build_graph(&mut figure, graph, self.layout, seed)?;
            }
            NormalizedRequest::Scatter(scatter) => build_scatter(&mut figure, scatter)?,
            NormalizedRequest::ClassificationScatter(classification) => {
                build_classification(&mut figure, classification)?;
            }
            NormalizedRequest::Plot3d(plot) => build_plot_3d(&mut figure, plot, self.camera)?,
            NormalizedRequest::Histogram(histogram) => build_histogram(&mut figure, histogram)?,
            NormalizedRequest::LinePlot(line) => build_line_plot(&mut figure, line)?,
            NormalizedRequest::Heatmap(heatmap) => build_heatmap(&mut figure, heatmap)?,
        }

        figure.frame.validate()?;
        debug!(
            kind = %figure.kind,
            data_marks = figure.data_marks,
            primitives = figure.frame.primitive_count(),
            "built figure"
        );
        Ok(figure)
    }
}
