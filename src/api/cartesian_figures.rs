use indexmap::IndexMap;

use crate::core::{DataPoint, Extent, bin_equal_width, category_color};
use crate::error::{ChartError, ChartResult};
use crate::render::{
    CirclePrimitive, Color, PolylinePrimitive, RectPrimitive, TextHAlign, TextPrimitive,
    TextVAlign,
};

use super::axes::{
    CartesianAxes, GridLines, Margins, PlotArea, TEXT_COLOR, TICK_LABEL_FONT_SIZE,
    estimate_text_width, push_title,
};
use super::{
    ChartText, Figure, LegendEntry, NormalizedClassification, NormalizedHistogram,
    NormalizedLinePlot, NormalizedScatter,
};

const DATA_PADDING: f64 = 0.05;
const DEFAULT_SCATTER_COLOR: Color = Color::from_rgb8(0, 0, 255);
const MARKER_ALPHA: f64 = 0.7;
const MARKER_EDGE_WIDTH: f64 = 0.5;
const ANNOTATION_OFFSET: f64 = 5.0;
const LINE_WIDTH: f64 = 2.0;
const LINE_MARKER_RADIUS: f64 = 2.0;
const BAR_ALPHA: f64 = 0.7;
const BAR_EDGE_WIDTH: f64 = 0.5;
const LEGEND_ROW_HEIGHT: f64 = 18.0;
const LEGEND_SWATCH_RADIUS: f64 = 5.0;

fn marker_radius(area_pt2: f64) -> f64 {
    area_pt2.sqrt() / 2.0
}

fn point_axes(area: PlotArea, points: &[DataPoint]) -> ChartResult<CartesianAxes> {
    let x_extent = Extent::of(points.iter().map(|point| point.x))
        .ok_or_else(|| ChartError::render("no finite x values to plot"))?;
    let y_extent = Extent::of(points.iter().map(|point| point.y))
        .ok_or_else(|| ChartError::render("no finite y values to plot"))?;
    CartesianAxes::fit(
        area,
        x_extent.padded(DATA_PADDING),
        y_extent.padded(DATA_PADDING),
    )
}

fn finish_cartesian(
    figure: &mut Figure,
    axes: &CartesianAxes,
    text: &ChartText,
    grid: GridLines,
) -> ChartResult<()> {
    axes.draw(&mut figure.frame, &text.x_label, &text.y_label, grid)?;
    push_title(&mut figure.frame, &text.title);
    Ok(())
}

pub(super) fn build_scatter(figure: &mut Figure, scatter: &NormalizedScatter) -> ChartResult<()> {
    let area = PlotArea::inside(figure.frame.viewport, Margins::CARTESIAN);
    let axes = point_axes(area, &scatter.points)?;
    let radius = marker_radius(scatter.marker_area);

    for (index, point) in scatter.points.iter().enumerate() {
        let (x, y) = axes.map(point.x, point.y)?;
        let fill = scatter
            .colors
            .as_ref()
            .map_or(DEFAULT_SCATTER_COLOR, |colors| colors[index]);
        figure.frame.push_circle(
            CirclePrimitive::new(x, y, radius, fill.with_alpha(fill.alpha * MARKER_ALPHA))
                .with_border(MARKER_EDGE_WIDTH, Color::BLACK),
        );

        let label = scatter
            .point_labels
            .as_ref()
            .map(|labels| labels[index].as_str())
            .filter(|label| !label.is_empty());
        if let Some(label) = label {
            figure.frame.push_text(
                TextPrimitive::new(
                    label,
                    x + ANNOTATION_OFFSET,
                    y - ANNOTATION_OFFSET,
                    TICK_LABEL_FONT_SIZE,
                    TEXT_COLOR,
                    TextHAlign::Left,
                )
                .with_v_align(TextVAlign::Bottom),
            );
        }
    }

    figure.data_marks = scatter.points.len();
    finish_cartesian(figure, &axes, &scatter.text, GridLines::Both)
}

pub(super) fn build_classification(
    figure: &mut Figure,
    classification: &NormalizedClassification,
) -> ChartResult<()> {
    let mut groups: IndexMap<&str, Vec<DataPoint>> = IndexMap::new();
    for (point, category) in classification.points.iter().zip(&classification.categories) {
        groups.entry(category.as_str()).or_default().push(*point);
    }

    let legend_width = groups
        .keys()
        .map(|label| estimate_text_width(label, TICK_LABEL_FONT_SIZE))
        .fold(0.0_f64, f64::max)
        + 4.0 * LEGEND_SWATCH_RADIUS
        + 12.0;
    let margins = Margins {
        right: Margins::CARTESIAN.right + legend_width + 12.0,
        ..Margins::CARTESIAN
    };
    let area = PlotArea::inside(figure.frame.viewport, margins);
    let axes = point_axes(area, &classification.points)?;
    let radius = marker_radius(classification.marker_area);

    for (index, (label, points)) in groups.iter().enumerate() {
        let color = category_color(index);
        for point in points {
            let (x, y) = axes.map(point.x, point.y)?;
            figure.frame.push_circle(
                CirclePrimitive::new(x, y, radius, color.with_alpha(MARKER_ALPHA))
                    .with_border(MARKER_EDGE_WIDTH, Color::BLACK),
            );
        }
        figure.legend.push(LegendEntry {
            label: (*label).to_owned(),
            color,
        });
    }

    push_legend(figure, area.right() + 12.0, area.top, legend_width);
    figure.data_marks = classification.points.len();
    finish_cartesian(figure, &axes, &classification.text, GridLines::Both)
}

/// Boxed legend anchored at its top-left corner, outside the plot area.
fn push_legend(figure: &mut Figure, left: f64, top: f64, width: f64) {
    if figure.legend.is_empty() {
        return;
    }
    let height = figure.legend.len() as f64 * LEGEND_ROW_HEIGHT + 8.0;
    let frame = &mut figure.frame;
    frame.push_rect(
        RectPrimitive::new(left, top, width, height, Color::WHITE)
            .with_border(0.8, Color::from_rgb8(204, 204, 204)),
    );
    for (row, entry) in figure.legend.iter().enumerate() {
        let y = top + 4.0 + (row as f64 + 0.5) * LEGEND_ROW_HEIGHT;
        let swatch_x = left + 4.0 + LEGEND_SWATCH_RADIUS * 1.5;
        frame.push_circle(
            CirclePrimitive::new(swatch_x, y, LEGEND_SWATCH_RADIUS, entry.color.with_alpha(MARKER_ALPHA))
                .with_border(MARKER_EDGE_WIDTH, Color::BLACK),
        );
        frame.push_text(
            TextPrimitive::new(
                entry.label.as_str(),
                swatch_x + LEGEND_SWATCH_RADIUS * 2.0,
                y,
                TICK_LABEL_FONT_SIZE,
                TEXT_COLOR,
                TextHAlign::Left,
            )
            .with_v_align(TextVAlign::Middle),
        );
    }
}

pub(super) fn build_histogram(
    figure: &mut Figure,
    histogram: &NormalizedHistogram,
) -> ChartResult<()> {
    let bins = bin_equal_width(&histogram.data, histogram.bins)?;
    let (Some(first), Some(last)) = (bins.first(), bins.last()) else {
        return Err(ChartError::render("histogram produced no bins"));
    };
    let tallest = bins.iter().map(|bin| bin.count).max().unwrap_or(0).max(1);

    let area = PlotArea::inside(figure.frame.viewport, Margins::CARTESIAN);
    let x_extent = Extent {
        min: first.left,
        max: last.right,
    }
    .padded(DATA_PADDING / 2.0);
    let y_extent = Extent {
        min: 0.0,
        max: tallest as f64 * (1.0 + DATA_PADDING),
    };
    let axes = CartesianAxes::fit(area, x_extent, y_extent)?;

    let fill = histogram
        .color
        .with_alpha(histogram.color.alpha * BAR_ALPHA);
    for bin in &bins {
        let (left, top) = axes.map(bin.left, bin.count as f64)?;
        let (right, baseline) = axes.map(bin.right, 0.0)?;
        figure.frame.push_rect(
            RectPrimitive::new(left, top, right - left, baseline - top, fill)
                .with_border(BAR_EDGE_WIDTH, Color::BLACK),
        );
    }

    figure.data_marks = bins.len();
    finish_cartesian(figure, &axes, &histogram.text, GridLines::Horizontal)
}

pub(super) fn build_line_plot(figure: &mut Figure, line: &NormalizedLinePlot) -> ChartResult<()> {
    let area = PlotArea::inside(figure.frame.viewport, Margins::CARTESIAN);
    let axes = point_axes(area, &line.points)?;

    let mapped = line
        .points
        .iter()
        .map(|point| axes.map(point.x, point.y))
        .collect::<ChartResult<Vec<_>>>()?;
    if mapped.len() >= 2 {
        figure.frame.push_polyline(
            PolylinePrimitive::new(mapped.iter().copied(), LINE_WIDTH, line.color)
                .with_stroke_style(line.stroke_style),
        );
    }
    for &(x, y) in &mapped {
        figure
            .frame
            .push_circle(CirclePrimitive::new(x, y, LINE_MARKER_RADIUS, line.color));
    }

    figure.data_marks = line.points.len();
    finish_cartesian(figure, &axes, &line.text, GridLines::Both)
}

#[cfg(test)]
mod tests {
    use super::build_histogram;
    use crate::api::{ChartKind, ChartText, Figure, NormalizedHistogram};
    use crate::render::Color;

    #[test]
    fn histogram_bars_rest_on_the_baseline() {
        let mut figure = Figure::new(ChartKind::Histogram);
        let histogram = NormalizedHistogram {
            data: vec![1.0, 2.0, 2.0, 3.0],
            bins: 3,
            text: ChartText {
                title: "Histogram".to_owned(),
                x_label: "Value".to_owned(),
                y_label: "Frequency".to_owned(),
            },
            color: Color::from_rgb8(135, 206, 235),
        };
        build_histogram(&mut figure, &histogram).expect("histogram");

        assert_eq!(figure.data_marks, 3);
        let baseline = figure.frame.rects[0].y + figure.frame.rects[0].height;
        for rect in &figure.frame.rects {
            assert!((rect.y + rect.height - baseline).abs() < 1e-9);
        }
        // The middle bin holds two samples and is the tallest bar.
        assert!(figure.frame.rects[1].height > figure.frame.rects[0].height);
    }
}
