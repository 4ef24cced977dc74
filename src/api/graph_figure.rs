use crate::core::{SpringLayoutParams, spring_layout};
use crate::error::ChartResult;
use crate::render::{
    CirclePrimitive, Color, LinePrimitive, PolygonPrimitive, TextHAlign, TextPrimitive,
    TextVAlign,
};

use super::axes::{Margins, PlotArea, TEXT_COLOR, push_title};
use super::{Figure, NormalizedGraph};

const NODE_COLOR: Color = Color::from_rgb8(173, 216, 230).with_alpha(0.8);
const EDGE_COLOR: Color = Color::from_rgb8(128, 128, 128);
const EDGE_WIDTH: f64 = 1.0;
const ARROW_LENGTH: f64 = 10.0;
const ARROW_HALF_WIDTH: f64 = 4.0;

const GRAPH_MARGINS: Margins = Margins {
    left: 24.0,
    top: 40.0,
    right: 24.0,
    bottom: 24.0,
};

/// Nodes placed by the spring layout, no axes.
pub(super) fn build_graph(
    figure: &mut Figure,
    graph: &NormalizedGraph,
    params: SpringLayoutParams,
    seed: Option<u64>,
) -> ChartResult<()> {
    let positions = spring_layout(graph.nodes.len(), &graph.edges, params, seed)?;
    let area = PlotArea::inside(figure.frame.viewport, GRAPH_MARGINS);
    let radius = graph.node_size.sqrt() / 2.0;

    // Keep markers and their labels inside the area.
    let (center_x, center_y) = area.center();
    let reach_x = (area.width / 2.0 - radius).max(1.0);
    let reach_y = (area.height / 2.0 - radius).max(1.0);
    let screen: Vec<(f64, f64)> = positions
        .iter()
        .map(|&(x, y)| (center_x + x * reach_x, center_y - y * reach_y))
        .collect();

    let frame = &mut figure.frame;
    for &(source, target) in &graph.edges {
        if source == target {
            continue;
        }
        let (x1, y1) = screen[source];
        let (x2, y2) = screen[target];
        frame.push_line(LinePrimitive::new(x1, y1, x2, y2, EDGE_WIDTH, EDGE_COLOR));
        if graph.directed {
            if let Some(arrow) = arrowhead((x1, y1), (x2, y2), radius) {
                frame.push_polygon(arrow);
            }
        }
    }

    for (name, &(x, y)) in graph.nodes.iter().zip(&screen) {
        frame.push_circle(CirclePrimitive::new(x, y, radius, NODE_COLOR));
        frame.push_text(
            TextPrimitive::new(name.as_str(), x, y, graph.font_size, TEXT_COLOR, TextHAlign::Center)
                .with_v_align(TextVAlign::Middle)
                .bold(),
        );
    }

    push_title(frame, &graph.title);
    figure.data_marks = graph.nodes.len();
    Ok(())
}

/// Triangle whose tip touches the target marker's rim.
fn arrowhead(from: (f64, f64), to: (f64, f64), target_radius: f64) -> Option<PolygonPrimitive> {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let length = dx.hypot(dy);
    if length <= target_radius + ARROW_LENGTH {
        return None;
    }
    let (ux, uy) = (dx / length, dy / length);
    let tip = (to.0 - ux * target_radius, to.1 - uy * target_radius);
    let base = (tip.0 - ux * ARROW_LENGTH, tip.1 - uy * ARROW_LENGTH);
    let (nx, ny) = (-uy * ARROW_HALF_WIDTH, ux * ARROW_HALF_WIDTH);
    Some(PolygonPrimitive::new(
        [tip, (base.0 + nx, base.1 + ny), (base.0 - nx, base.1 - ny)],
        EDGE_COLOR,
    ))
}

#[cfg(test)]
mod tests {
    use super::arrowhead;

    #[test]
    fn arrowhead_tip_sits_on_target_rim() {
        let arrow = arrowhead((0.0, 0.0), (100.0, 0.0), 10.0).expect("arrow");
        assert_eq!(arrow.points[0], (90.0, 0.0));
        assert_eq!(arrow.points.len(), 3);
    }

    #[test]
    fn overlapping_nodes_get_no_arrowhead() {
        assert!(arrowhead((0.0, 0.0), (5.0, 0.0), 10.0).is_none());
    }
}
