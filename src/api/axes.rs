use crate::core::{Colormap, Extent, LinearScale, Viewport, format_tick, nice_ticks};
use crate::error::ChartResult;
use crate::render::{
    Color, LinePrimitive, RectPrimitive, RenderFrame, TextHAlign, TextPrimitive, TextVAlign,
};

pub(super) const TITLE_FONT_SIZE: f64 = 16.0;
pub(super) const AXIS_LABEL_FONT_SIZE: f64 = 12.0;
pub(super) const TICK_LABEL_FONT_SIZE: f64 = 10.0;
pub(super) const TICK_LENGTH: f64 = 3.5;
pub(super) const TICK_TARGET_SPACING: f64 = 80.0;

pub(super) const TEXT_COLOR: Color = Color::BLACK;
pub(super) const SPINE_COLOR: Color = Color::BLACK;
pub(super) const GRID_COLOR: Color = Color::rgba(0.0, 0.0, 0.0, 0.15);

/// Rough advance width of `text`; good enough to reserve margins.
pub(super) fn estimate_text_width(text: &str, font_size: f64) -> f64 {
    text.chars().count() as f64 * font_size * 0.6
}

pub(super) fn push_title(frame: &mut RenderFrame, title: &str) {
    if title.trim().is_empty() {
        return;
    }
    let center = f64::from(frame.viewport.width) / 2.0;
    frame.push_text(
        TextPrimitive::new(
            title,
            center,
            14.0,
            TITLE_FONT_SIZE,
            TEXT_COLOR,
            TextHAlign::Center,
        )
        .bold(),
    );
}

/// Rectangle that data is drawn into, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Margins {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Margins {
    pub const CARTESIAN: Self = Self {
        left: 72.0,
        top: 48.0,
        right: 28.0,
        bottom: 56.0,
    };
}

impl PlotArea {
    pub fn inside(viewport: Viewport, margins: Margins) -> Self {
        let width = (f64::from(viewport.width) - margins.left - margins.right).max(1.0);
        let height = (f64::from(viewport.height) - margins.top - margins.bottom).max(1.0);
        Self {
            left: margins.left,
            top: margins.top,
            width,
            height,
        }
    }

    pub fn right(self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(self) -> f64 {
        self.top + self.height
    }

    pub fn center(self) -> (f64, f64) {
        (self.left + self.width / 2.0, self.top + self.height / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum GridLines {
    Both,
    Horizontal,
}

/// Two linear axes over a plot area, y growing upwards.
#[derive(Debug, Clone, Copy)]
pub(super) struct CartesianAxes {
    pub area: PlotArea,
    pub x_extent: Extent,
    pub y_extent: Extent,
    x_scale: LinearScale,
    y_scale: LinearScale,
}

impl CartesianAxes {
    pub fn fit(area: PlotArea, x_extent: Extent, y_extent: Extent) -> ChartResult<Self> {
        Ok(Self {
            area,
            x_extent,
            y_extent,
            x_scale: LinearScale::from_extent(x_extent, area.left, area.right())?,
            y_scale: LinearScale::from_extent(y_extent, area.bottom(), area.top)?,
        })
    }

    pub fn map(&self, x: f64, y: f64) -> ChartResult<(f64, f64)> {
        Ok((
            self.x_scale.domain_to_pixel(x)?,
            self.y_scale.domain_to_pixel(y)?,
        ))
    }

    /// Spines, ticks, tick labels, grid lines and axis captions.
    pub fn draw(
        &self,
        frame: &mut RenderFrame,
        x_label: &str,
        y_label: &str,
        grid: GridLines,
    ) -> ChartResult<()> {
        let area = self.area;
        let x_ticks = self.ticks(self.x_extent, area.width);
        let y_ticks = self.ticks(self.y_extent, area.height);

        for &(value, ref label) in &x_ticks {
            let x = self.x_scale.domain_to_pixel(value)?;
            if grid == GridLines::Both {
                frame.push_line(LinePrimitive::new(x, area.top, x, area.bottom(), 0.8, GRID_COLOR));
            }
            frame.push_line(LinePrimitive::new(
                x,
                area.bottom(),
                x,
                area.bottom() + TICK_LENGTH,
                0.8,
                SPINE_COLOR,
            ));
            frame.push_text(TextPrimitive::new(
                label.clone(),
                x,
                area.bottom() + TICK_LENGTH + 2.0,
                TICK_LABEL_FONT_SIZE,
                TEXT_COLOR,
                TextHAlign::Center,
            ));
        }

        let mut widest_label = 0.0_f64;
        for &(value, ref label) in &y_ticks {
            let y = self.y_scale.domain_to_pixel(value)?;
            frame.push_line(LinePrimitive::new(area.left, y, area.right(), y, 0.8, GRID_COLOR));
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
                    label.clone(),
                    area.left - TICK_LENGTH - 2.0,
                    y,
                    TICK_LABEL_FONT_SIZE,
                    TEXT_COLOR,
                    TextHAlign::Right,
                )
                .with_v_align(TextVAlign::Middle),
            );
            widest_label = widest_label.max(estimate_text_width(label, TICK_LABEL_FONT_SIZE));
        }

        push_spines(frame, area);

        let (center_x, center_y) = area.center();
        if !x_label.trim().is_empty() {
            frame.push_text(TextPrimitive::new(
                x_label,
                center_x,
                area.bottom() + TICK_LENGTH + TICK_LABEL_FONT_SIZE + 10.0,
                AXIS_LABEL_FONT_SIZE,
                TEXT_COLOR,
                TextHAlign::Center,
            ));
        }
        if !y_label.trim().is_empty() {
            let x = (area.left - TICK_LENGTH - widest_label - 8.0).max(AXIS_LABEL_FONT_SIZE + 2.0);
            frame.push_text(
                TextPrimitive::new(
                    y_label,
                    x,
                    center_y,
                    AXIS_LABEL_FONT_SIZE,
                    TEXT_COLOR,
                    TextHAlign::Center,
                )
                .with_v_align(TextVAlign::Bottom)
                .rotated(90.0),
            );
        }
        Ok(())
    }

    fn ticks(&self, extent: Extent, span_px: f64) -> Vec<(f64, String)> {
        let target = ((span_px / TICK_TARGET_SPACING).floor() as usize).clamp(2, 10);
        let values = nice_ticks(extent.min, extent.max, target);
        let step = match values.as_slice() {
            [first, second, ..] => second - first,
            _ => extent.span(),
        };
        values
            .into_iter()
            .map(|value| (value, format_tick(value, step)))
            .collect()
    }
}

const COLORBAR_STEPS: usize = 64;

/// Vertical color bar spanning `area`, low values at the bottom.
pub(super) fn push_colorbar(
    frame: &mut RenderFrame,
    area: PlotArea,
    colormap: Colormap,
    range: Extent,
) -> ChartResult<()> {
    let step_height = area.height / COLORBAR_STEPS as f64;
    for step in 0..COLORBAR_STEPS {
        let t = (step as f64 + 0.5) / COLORBAR_STEPS as f64;
        let y = area.bottom() - (step + 1) as f64 * step_height;
        // Slight overlap hides seams between neighbouring steps.
        frame.push_rect(RectPrimitive::new(
            area.left,
            y,
            area.width,
            step_height + 0.25,
            colormap.sample(t),
        ));
    }
    push_spines(frame, area);

    let label_x = area.right() + TICK_LENGTH + 2.0;
    if range.span() <= 0.0 {
        frame.push_text(
            TextPrimitive::new(
                format_tick(range.min, range.min.abs().max(1.0) / 100.0),
                label_x,
                area.top + area.height / 2.0,
                TICK_LABEL_FONT_SIZE,
                TEXT_COLOR,
                TextHAlign::Left,
            )
            .with_v_align(TextVAlign::Middle),
        );
        return Ok(());
    }

    let scale = LinearScale::from_extent(range, area.bottom(), area.top)?;
    let ticks = nice_ticks(range.min, range.max, 5);
    let step = match ticks.as_slice() {
        [first, second, ..] => second - first,
        _ => range.span(),
    };
    let labelled: Vec<(f64, String)> = if ticks.len() >= 2 {
        ticks
            .into_iter()
            .map(|value| (value, format_tick(value, step)))
            .collect()
    } else {
        [range.min, range.max]
            .into_iter()
            .map(|value| (value, format_tick(value, range.span() / 10.0)))
            .collect()
    };
    for (value, label) in labelled {
        let y = scale.domain_to_pixel(value)?;
        frame.push_line(LinePrimitive::new(
            area.right(),
            y,
            area.right() + TICK_LENGTH,
            y,
            0.8,
            SPINE_COLOR,
        ));
        frame.push_text(
            TextPrimitive::new(label, label_x, y, TICK_LABEL_FONT_SIZE, TEXT_COLOR, TextHAlign::Left)
                .with_v_align(TextVAlign::Middle),
        );
    }
    Ok(())
}

pub(super) fn push_spines(frame: &mut RenderFrame, area: PlotArea) {
    let (left, top, right, bottom) = (area.left, area.top, area.right(), area.bottom());
    for (x1, y1, x2, y2) in [
        (left, top, right, top),
        (right, top, right, bottom),
        (right, bottom, left, bottom),
        (left, bottom, left, top),
    ] {
        frame.push_line(LinePrimitive::new(x1, y1, x2, y2, 0.8, SPINE_COLOR));
    }
}

#[cfg(test)]
mod tests {
    use super::{CartesianAxes, GridLines, Margins, PlotArea};
    use crate::core::{Extent, Viewport};
    use crate::render::RenderFrame;

    #[test]
    fn maps_extent_corners_to_area_corners() {
        let area = PlotArea::inside(Viewport::new(400, 300), Margins::CARTESIAN);
        let axes = CartesianAxes::fit(
            area,
            Extent { min: 0.0, max: 10.0 },
            Extent { min: -1.0, max: 1.0 },
        )
        .expect("axes");

        assert_eq!(axes.map(0.0, -1.0).expect("map"), (area.left, area.bottom()));
        assert_eq!(axes.map(10.0, 1.0).expect("map"), (area.right(), area.top));
    }

    #[test]
    fn draws_labels_and_ticks() {
        let viewport = Viewport::new(720, 432);
        let area = PlotArea::inside(viewport, Margins::CARTESIAN);
        let axes = CartesianAxes::fit(
            area,
            Extent { min: 0.0, max: 100.0 },
            Extent { min: 0.0, max: 1.0 },
        )
        .expect("axes");
        let mut frame = RenderFrame::new(viewport);
        axes.draw(&mut frame, "Value", "Frequency", GridLines::Horizontal)
            .expect("draw");

        assert!(frame.texts.iter().any(|text| text.text == "Value"));
        assert!(
            frame
                .texts
                .iter()
                .any(|text| text.text == "Frequency" && text.rotation_deg == 90.0)
        );
        frame.validate().expect("valid frame");
    }
}
