use crate::render::{Color, RenderFrame};

use super::{ChartKind, FigureSize};

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: Color,
}

/// A drawn chart, ready to be rasterized.
///
/// Built fresh for every request and owned by the call that built it.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub kind: ChartKind,
    pub size: FigureSize,
    pub frame: RenderFrame,
    /// Data items drawn: points, nodes, bars or cells depending on the kind.
    pub data_marks: usize,
    pub legend: Vec<LegendEntry>,
}

impl Figure {
    #[must_use]
    pub fn new(kind: ChartKind) -> Self {
        let size = kind.figure_size();
        Self {
            kind,
            size,
            frame: RenderFrame::new(size.viewport()),
            data_marks: 0,
            legend: Vec::new(),
        }
    }
}
