use crate::core::Extent;
use crate::error::{ChartError, ChartResult};
use crate::render::{LinePrimitive, RectPrimitive, TextHAlign, TextPrimitive, TextVAlign};

use super::axes::{
    Margins, PlotArea, SPINE_COLOR, TEXT_COLOR, TICK_LABEL_FONT_SIZE, TICK_LENGTH,
    estimate_text_width, push_colorbar, push_spines, push_title,
};
use super::{Figure, NormalizedHeatmap};

const COLORBAR_GAP: f64 = 20.0;
const COLORBAR_WIDTH: f64 = 18.0;
const COLORBAR_LABEL_ROOM: f64 = 60.0;
/// Minimum spacing between neighbouring tick labels.
const LABEL_PITCH: f64 = 12.0;

fn tick_labels(custom: Option<&Vec<String>>, count: usize) -> Vec<String> {
    match custom {
        Some(labels) => labels.clone(),
        None => (0..count).map(|index| index.to_string()).collect(),
    }
}

/// Labels every `stride`-th cell so dense axes stay legible.
fn label_stride(count: usize, span: f64) -> usize {
    let fit = (span / LABEL_PITCH).floor().max(1.0) as usize;
    count.div_ceil(fit).max(1)
}

pub(super) fn build_heatmap(figure: &mut Figure, heatmap: &NormalizedHeatmap) -> ChartResult<()> {
    let (rows, columns) = (heatmap.rows(), heatmap.columns());
    if rows == 0 || columns == 0 {
        return Err(ChartError::render("heatmap needs at least one cell"));
    }
    let range = Extent::of(heatmap.matrix.iter().flatten().copied())
        .ok_or_else(|| ChartError::render("heatmap values must be finite"))?;

    let x_labels = tick_labels(heatmap.x_labels.as_ref(), columns);
    let y_labels = tick_labels(heatmap.y_labels.as_ref(), rows);
    let widest = |labels: &[String]| {
        labels
            .iter()
            .map(|label| estimate_text_width(label, TICK_LABEL_FONT_SIZE))
            .fold(0.0_f64, f64::max)
    };
    // x labels hang at 45 degrees below the cells.
    let x_label_drop = widest(&x_labels) * std::f64::consts::FRAC_1_SQRT_2;
    let margins = Margins {
        left: (widest(&y_labels) + TICK_LENGTH + 16.0).max(40.0),
        top: 48.0,
        right: COLORBAR_GAP + COLORBAR_WIDTH + COLORBAR_LABEL_ROOM,
        bottom: (x_label_drop + TICK_LABEL_FONT_SIZE + 16.0).max(40.0),
    };
    let area = PlotArea::inside(figure.frame.viewport, margins);
    let cell_width = area.width / columns as f64;
    let cell_height = area.height / rows as f64;

    let frame = &mut figure.frame;
    for (row, values) in heatmap.matrix.iter().enumerate() {
        for (column, &value) in values.iter().enumerate() {
            frame.push_rect(RectPrimitive::new(
                area.left + column as f64 * cell_width,
                area.top + row as f64 * cell_height,
                cell_width,
                cell_height,
                heatmap.colormap.map(value, range.min, range.max),
            ));
        }
    }
    push_spines(frame, area);

    let stride = label_stride(columns, area.width);
    for (column, label) in x_labels.iter().enumerate().step_by(stride) {
        if label.is_empty() {
            continue;
        }
        let x = area.left + (column as f64 + 0.5) * cell_width;
        frame.push_line(LinePrimitive::new(
            x,
            area.bottom(),
            x,
            area.bottom() + TICK_LENGTH,
            0.8,
            SPINE_COLOR,
        ));
        frame.push_text(
            TextPrimitive::new(
                label.as_str(),
                x,
                area.bottom() + TICK_LENGTH + 2.0,
                TICK_LABEL_FONT_SIZE,
                TEXT_COLOR,
                TextHAlign::Right,
            )
            .rotated(45.0),
        );
    }

    let stride = label_stride(rows, area.height);
    for (row, label) in y_labels.iter().enumerate().step_by(stride) {
        if label.is_empty() {
            continue;
        }
        let y = area.top + (row as f64 + 0.5) * cell_height;
        frame.push_line(LinePrimitive::new(
            area.left - TICK_LENGTH,
            y,
            area.left,
            y,
            0.8,
            SPINE_COLOR,
        ));
        frame.push_text(
            TextPrimitive::new(
                label.as_str(),
                area.left - TICK_LENGTH - 2.0,
                y,
                TICK_LABEL_FONT_SIZE,
                TEXT_COLOR,
                TextHAlign::Right,
            )
            .with_v_align(TextVAlign::Middle),
        );
    }

    let bar = PlotArea {
        left: area.right() + COLORBAR_GAP,
        top: area.top + area.height * 0.1,
        width: COLORBAR_WIDTH,
        height: area.height * 0.8,
    };
    push_colorbar(frame, bar, heatmap.colormap, range)?;
    push_title(frame, &heatmap.title);

    figure.data_marks = rows * columns;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{build_heatmap, label_stride};
    use crate::api::{ChartKind, Figure, NormalizedHeatmap};
    use crate::core::Colormap;

    fn heatmap(matrix: Vec<Vec<f64>>) -> NormalizedHeatmap {
        NormalizedHeatmap {
            matrix,
            x_labels: None,
            y_labels: None,
            title: "Heatmap".to_owned(),
            colormap: Colormap::VIRIDIS,
        }
    }

    #[test]
    fn first_row_is_drawn_on_top() {
        let mut figure = Figure::new(ChartKind::Heatmap);
        build_heatmap(&mut figure, &heatmap(vec![vec![0.0, 1.0], vec![2.0, 3.0]]))
            .expect("heatmap");

        assert_eq!(figure.data_marks, 4);
        let cells = &figure.frame.rects[..4];
        assert!(cells[0].y < cells[2].y);
        assert_eq!(cells[0].fill_color, Colormap::VIRIDIS.sample(0.0));
        assert_eq!(cells[3].fill_color, Colormap::VIRIDIS.sample(1.0));
    }

    #[test]
    fn constant_matrix_uses_colormap_midpoint() {
        let mut figure = Figure::new(ChartKind::Heatmap);
        build_heatmap(&mut figure, &heatmap(vec![vec![7.0; 3]; 2])).expect("heatmap");
        let midpoint = Colormap::VIRIDIS.sample(0.5);
        assert!(figure.frame.rects[..6].iter().all(|cell| cell.fill_color == midpoint));
    }

    #[test]
    fn dense_axes_skip_labels() {
        assert_eq!(label_stride(10, 500.0), 1);
        assert!(label_stride(1_000, 500.0) > 1);
    }
}
