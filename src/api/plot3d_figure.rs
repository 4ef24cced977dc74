use crate::core::{
    Camera, Colormap, CubeNormalizer, Extent, Point3, StructuredGrid, format_tick, nice_ticks,
};
use crate::error::{ChartError, ChartResult};
use crate::render::{
    CirclePrimitive, Color, LinePrimitive, PolygonPrimitive, RenderFrame, TextHAlign,
    TextPrimitive, TextVAlign,
};

use super::axes::{
    AXIS_LABEL_FONT_SIZE, GRID_COLOR, Margins, PlotArea, SPINE_COLOR, TEXT_COLOR,
    TICK_LABEL_FONT_SIZE, push_colorbar, push_title,
};
use super::{Figure, NormalizedPlot3d, Plot3dStyle};

const PLOT_MARGINS: Margins = Margins {
    left: 48.0,
    top: 48.0,
    right: 120.0,
    bottom: 40.0,
};
const COLORBAR_WIDTH: f64 = 16.0;
const MARKER_RADIUS: f64 = 3.5;
const MARKER_ALPHA: f64 = 0.9;
const SURFACE_ALPHA: f64 = 0.8;
const WIREFRAME_COLOR: Color = Color::from_rgb8(31, 119, 180).with_alpha(0.8);
const TICK_LABEL_OFFSET: f64 = 14.0;
const AXIS_LABEL_OFFSET: f64 = 34.0;

const CUBE_EDGES: [([f64; 3], [f64; 3]); 12] = [
    ([-1.0, -1.0, -1.0], [1.0, -1.0, -1.0]),
    ([-1.0, 1.0, -1.0], [1.0, 1.0, -1.0]),
    ([-1.0, -1.0, 1.0], [1.0, -1.0, 1.0]),
    ([-1.0, 1.0, 1.0], [1.0, 1.0, 1.0]),
    ([-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0]),
    ([1.0, -1.0, -1.0], [1.0, 1.0, -1.0]),
    ([-1.0, -1.0, 1.0], [-1.0, 1.0, 1.0]),
    ([1.0, -1.0, 1.0], [1.0, 1.0, 1.0]),
    ([-1.0, -1.0, -1.0], [-1.0, -1.0, 1.0]),
    ([1.0, -1.0, -1.0], [1.0, -1.0, 1.0]),
    ([-1.0, 1.0, -1.0], [-1.0, 1.0, 1.0]),
    ([1.0, 1.0, -1.0], [1.0, 1.0, 1.0]),
];

/// Projects the unit cube onto the plot area, preserving aspect ratio.
#[derive(Debug, Clone, Copy)]
struct Viewer {
    camera: Camera,
    normalizer: CubeNormalizer,
    scale: f64,
    screen_center: (f64, f64),
    projected_center: (f64, f64),
}

impl Viewer {
    fn fit(camera: Camera, normalizer: CubeNormalizer, area: PlotArea) -> Self {
        let corners = CUBE_EDGES
            .iter()
            .flat_map(|(from, to)| [*from, *to])
            .map(|[x, y, z]| camera.project(Point3::new(x, y, z)));
        let (mut min_x, mut max_x, mut min_y, mut max_y) = (f64::MAX, f64::MIN, f64::MAX, f64::MIN);
        for corner in corners {
            min_x = min_x.min(corner.x);
            max_x = max_x.max(corner.x);
            min_y = min_y.min(corner.y);
            max_y = max_y.max(corner.y);
        }
        let scale = (area.width / (max_x - min_x)).min(area.height / (max_y - min_y)) * 0.92;
        Self {
            camera,
            normalizer,
            scale,
            screen_center: area.center(),
            projected_center: ((min_x + max_x) / 2.0, (min_y + max_y) / 2.0),
        }
    }

    /// Screen position and depth of a point already in cube coordinates.
    fn cube_to_screen(&self, point: Point3) -> (f64, f64, f64) {
        let projected = self.camera.project(point);
        (
            self.screen_center.0 + (projected.x - self.projected_center.0) * self.scale,
            self.screen_center.1 - (projected.y - self.projected_center.1) * self.scale,
            projected.depth,
        )
    }

    fn data_to_screen(&self, point: Point3) -> (f64, f64, f64) {
        self.cube_to_screen(self.normalizer.normalize(point))
    }

    /// Pushes `anchor` away from the cube's screen center by `distance`.
    fn outward(&self, anchor: (f64, f64), distance: f64) -> (f64, f64) {
        let (dx, dy) = (anchor.0 - self.screen_center.0, anchor.1 - self.screen_center.1);
        let length = dx.hypot(dy);
        if length < f64::EPSILON {
            return (anchor.0, anchor.1 + distance);
        }
        (anchor.0 + dx / length * distance, anchor.1 + dy / length * distance)
    }
}

pub(super) fn build_plot_3d(
    figure: &mut Figure,
    plot: &NormalizedPlot3d,
    camera: Camera,
) -> ChartResult<()> {
    let normalizer = CubeNormalizer::fit(&plot.points)
        .ok_or_else(|| ChartError::render("3D plot needs finite coordinates"))?;
    let z_range = Extent::of(plot.points.iter().map(|point| point.z))
        .ok_or_else(|| ChartError::render("3D plot needs finite z values"))?;

    let viewport = figure.frame.viewport;
    let area = PlotArea::inside(viewport, PLOT_MARGINS);
    let viewer = Viewer::fit(camera, normalizer, area);

    push_axes_box(&mut figure.frame, &viewer, plot);
    match plot.style {
        Plot3dStyle::Scatter => push_scatter(&mut figure.frame, &viewer, plot, z_range),
        Plot3dStyle::Surface => {
            let grid = StructuredGrid::from_points(&plot.points)?;
            push_surface(&mut figure.frame, &viewer, &grid, plot.colormap, z_range);
        }
        Plot3dStyle::Wireframe => {
            let grid = StructuredGrid::from_points(&plot.points)?;
            push_wireframe(&mut figure.frame, &viewer, &grid);
        }
    }

    if plot.style != Plot3dStyle::Wireframe {
        let bar = PlotArea {
            left: area.right() + 36.0,
            top: area.top + area.height * 0.15,
            width: COLORBAR_WIDTH,
            height: area.height * 0.7,
        };
        push_colorbar(&mut figure.frame, bar, plot.colormap, z_range)?;
    }

    push_title(&mut figure.frame, &plot.text.title);
    figure.data_marks = plot.points.len();
    Ok(())
}

fn push_axes_box(frame: &mut RenderFrame, viewer: &Viewer, plot: &NormalizedPlot3d) {
    for (from, to) in CUBE_EDGES {
        let (x1, y1, _) = viewer.cube_to_screen(Point3::new(from[0], from[1], from[2]));
        let (x2, y2, _) = viewer.cube_to_screen(Point3::new(to[0], to[1], to[2]));
        frame.push_line(LinePrimitive::new(x1, y1, x2, y2, 0.6, GRID_COLOR));
    }

    let normalizer = viewer.normalizer;
    // Each axis runs along a bottom edge (z) or the left vertical edge.
    let axes: [(Extent, &str, fn(f64) -> Point3); 3] = [
        (normalizer.x, plot.text.x_label.as_str(), |t| Point3::new(t, 1.0, -1.0)),
        (normalizer.y, plot.text.y_label.as_str(), |t| Point3::new(-1.0, t, -1.0)),
        (normalizer.z, plot.z_label.as_str(), |t| Point3::new(-1.0, -1.0, t)),
    ];
    for (extent, label, along) in axes {
        let (x1, y1, _) = viewer.cube_to_screen(along(-1.0));
        let (x2, y2, _) = viewer.cube_to_screen(along(1.0));
        frame.push_line(LinePrimitive::new(x1, y1, x2, y2, 0.8, SPINE_COLOR));

        let ticks = nice_ticks(extent.min, extent.max, 5);
        let step = match ticks.as_slice() {
            [first, second, ..] => second - first,
            _ => extent.span(),
        };
        for value in ticks {
            let t = (value - extent.min) / extent.span() * 2.0 - 1.0;
            let (x, y, _) = viewer.cube_to_screen(along(t));
            let (label_x, label_y) = viewer.outward((x, y), TICK_LABEL_OFFSET);
            frame.push_text(
                TextPrimitive::new(
                    format_tick(value, step),
                    label_x,
                    label_y,
                    TICK_LABEL_FONT_SIZE,
                    TEXT_COLOR,
                    TextHAlign::Center,
                )
                .with_v_align(TextVAlign::Middle),
            );
        }

        if !label.trim().is_empty() {
            let (x, y, _) = viewer.cube_to_screen(along(0.0));
            let (label_x, label_y) = viewer.outward((x, y), AXIS_LABEL_OFFSET);
            frame.push_text(
                TextPrimitive::new(
                    label,
                    label_x,
                    label_y,
                    AXIS_LABEL_FONT_SIZE,
                    TEXT_COLOR,
                    TextHAlign::Center,
                )
                .with_v_align(TextVAlign::Middle),
            );
        }
    }
}

fn push_scatter(frame: &mut RenderFrame, viewer: &Viewer, plot: &NormalizedPlot3d, z_range: Extent) {
    let mut markers: Vec<(f64, f64, f64, Color)> = plot
        .points
        .iter()
        .map(|point| {
            let (x, y, depth) = viewer.data_to_screen(*point);
            let color = plot.colormap.map(point.z, z_range.min, z_range.max);
            (x, y, depth, color)
        })
        .collect();
    // Far markers first so near ones paint over them.
    markers.sort_by(|left, right| left.2.total_cmp(&right.2));
    for (x, y, _, color) in markers {
        frame.push_circle(CirclePrimitive::new(
            x,
            y,
            MARKER_RADIUS,
            color.with_alpha(MARKER_ALPHA),
        ));
    }
}

fn push_surface(
    frame: &mut RenderFrame,
    viewer: &Viewer,
    grid: &StructuredGrid,
    colormap: Colormap,
    z_range: Extent,
) {
    let mut patches: Vec<(f64, PolygonPrimitive)> =
        Vec::with_capacity((grid.rows() - 1) * (grid.columns() - 1));
    for row in 0..grid.rows() - 1 {
        for column in 0..grid.columns() - 1 {
            let corners = [
                grid.point(row, column),
                grid.point(row, column + 1),
                grid.point(row + 1, column + 1),
                grid.point(row + 1, column),
            ];
            let mean_z = corners.iter().map(|corner| corner.z).sum::<f64>() / 4.0;
            let mut depth = 0.0;
            let mut outline = [(0.0, 0.0); 4];
            for (slot, corner) in outline.iter_mut().zip(corners) {
                let (x, y, corner_depth) = viewer.data_to_screen(corner);
                *slot = (x, y);
                depth += corner_depth / 4.0;
            }
            let fill = colormap
                .map(mean_z, z_range.min, z_range.max)
                .with_alpha(SURFACE_ALPHA);
            patches.push((
                depth,
                PolygonPrimitive::new(outline, fill).with_border(0.3, Color::rgba(0.0, 0.0, 0.0, 0.3)),
            ));
        }
    }
    patches.sort_by(|left, right| left.0.total_cmp(&right.0));
    for (_, patch) in patches {
        frame.push_polygon(patch);
    }
}

fn push_wireframe(frame: &mut RenderFrame, viewer: &Viewer, grid: &StructuredGrid) {
    let mut segment = |from: Point3, to: Point3| {
        let (x1, y1, _) = viewer.data_to_screen(from);
        let (x2, y2, _) = viewer.data_to_screen(to);
        frame.push_line(LinePrimitive::new(x1, y1, x2, y2, 1.0, WIREFRAME_COLOR));
    };
    for row in 0..grid.rows() {
        for column in 0..grid.columns() {
            if column + 1 < grid.columns() {
                segment(grid.point(row, column), grid.point(row, column + 1));
            }
            if row + 1 < grid.rows() {
                segment(grid.point(row, column), grid.point(row + 1, column));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{PLOT_MARGINS, Viewer};
    use crate::core::{Camera, CubeNormalizer, Point3, Viewport};
    use crate::api::axes::PlotArea;

    #[test]
    fn cube_stays_inside_plot_area() {
        let points = [Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 2.0, 3.0)];
        let normalizer = CubeNormalizer::fit(&points).expect("fit");
        let area = PlotArea::inside(Viewport::new(864, 648), PLOT_MARGINS);
        let viewer = Viewer::fit(Camera::default(), normalizer, area);

        for x in [-1.0, 1.0] {
            for y in [-1.0, 1.0] {
                for z in [-1.0, 1.0] {
                    let (sx, sy, _) = viewer.cube_to_screen(Point3::new(x, y, z));
                    assert!(sx >= area.left && sx <= area.right());
                    assert!(sy >= area.top && sy <= area.bottom());
                }
            }
        }
    }
}
