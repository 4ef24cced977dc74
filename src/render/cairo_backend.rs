use std::f64::consts::TAU;
use std::io::Write;

use cairo::{Context, Format, ImageSurface};
use pango::FontDescription;

use crate::error::{ChartError, ChartResult};
use crate::render::{Color, LineStrokeStyle, RenderFrame, Renderer, TextHAlign, TextVAlign};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CairoRenderStats {
    pub lines_drawn: usize,
    pub polylines_drawn: usize,
    pub rects_drawn: usize,
    pub polygons_drawn: usize,
    pub circles_drawn: usize,
    pub texts_drawn: usize,
}

/// Cairo + Pango + PangoCairo offscreen renderer.
///
/// Frames are authored in points; `scale` maps points to surface pixels, so a
/// frame rendered with `scale = dpi / 72` yields a raster at `dpi`.
#[derive(Debug)]
pub struct CairoRenderer {
    surface: ImageSurface,
    scale: f64,
    clear_color: Color,
    last_stats: CairoRenderStats,
}

impl CairoRenderer {
    pub fn new(width: i32, height: i32) -> ChartResult<Self> {
        Self::with_scale(width, height, 1.0)
    }

    pub fn with_scale(width: i32, height: i32, scale: f64) -> ChartResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(ChartError::render("cairo surface size must be > 0"));
        }
        if !scale.is_finite() || scale <= 0.0 {
            return Err(ChartError::render("cairo render scale must be finite and > 0"));
        }

        let surface = ImageSurface::create(Format::ARgb32, width, height)
            .map_err(|err| map_backend_error("failed to create cairo surface", err))?;
        Ok(Self {
            surface,
            scale,
            clear_color: Color::WHITE,
            last_stats: CairoRenderStats::default(),
        })
    }

    #[must_use]
    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }

    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    #[must_use]
    pub fn last_stats(&self) -> CairoRenderStats {
        self.last_stats
    }

    /// Encodes the current surface as PNG.
    pub fn write_png<W: Write>(&self, writer: &mut W) -> ChartResult<()> {
        self.surface
            .write_to_png(writer)
            .map_err(|err| ChartError::Persistence(format!("failed to encode png: {err}")))
    }

    /// Releases the surface's backing resources; later draws are no-ops.
    pub fn finish(&self) {
        self.surface.finish();
    }

    fn render_with_context(&mut self, context: &Context, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        self.clear_color.validate()?;

        apply_color(context, self.clear_color);
        context
            .paint()
            .map_err(|err| map_backend_error("failed to clear surface", err))?;
        context.scale(self.scale, self.scale);

        let mut stats = CairoRenderStats::default();

        for line in &frame.lines {
            apply_color(context, line.color);
            context.set_line_width(line.stroke_width);
            apply_dash(context, line.stroke_style, line.stroke_width);
            context.move_to(line.x1, line.y1);
            context.line_to(line.x2, line.y2);
            context
                .stroke()
                .map_err(|err| map_backend_error("failed to stroke line", err))?;
            stats.lines_drawn += 1;
        }
        for polyline in &frame.polylines {
            apply_color(context, polyline.color);
            context.set_line_width(polyline.stroke_width);
            apply_dash(context, polyline.stroke_style, polyline.stroke_width);
            context.set_line_join(cairo::LineJoin::Round);
            let mut points = polyline.points.iter();
            if let Some(&(x, y)) = points.next() {
                context.move_to(x, y);
            }
            for &(x, y) in points {
                context.line_to(x, y);
            }
            context
                .stroke()
                .map_err(|err| map_backend_error("failed to stroke polyline", err))?;
            context.set_line_join(cairo::LineJoin::Miter);
            stats.polylines_drawn += 1;
        }
        context.set_dash(&[], 0.0);

        for rect in &frame.rects {
            context.rectangle(rect.x, rect.y, rect.width, rect.height);
            fill_and_outline(
                context,
                rect.fill_color,
                rect.border_width,
                rect.border_color,
                "rectangle",
            )?;
            stats.rects_drawn += 1;
        }

        for polygon in &frame.polygons {
            context.new_path();
            let mut vertices = polygon.points.iter();
            if let Some(&(x, y)) = vertices.next() {
                context.move_to(x, y);
            }
            for &(x, y) in vertices {
                context.line_to(x, y);
            }
            context.close_path();
            fill_and_outline(
                context,
                polygon.fill_color,
                polygon.border_width,
                polygon.border_color,
                "polygon",
            )?;
            stats.polygons_drawn += 1;
        }

        for circle in &frame.circles {
            context.new_path();
            context.arc(circle.x, circle.y, circle.radius, 0.0, TAU);
            context.close_path();
            fill_and_outline(
                context,
                circle.fill_color,
                circle.border_width,
                circle.border_color,
                "marker",
            )?;
            stats.circles_drawn += 1;
        }

        for text in &frame.texts {
            let layout = pangocairo::functions::create_layout(context);
            let mut font_description = FontDescription::from_string("Sans");
            font_description.set_absolute_size(text.font_size_px * f64::from(pango::SCALE));
            if text.bold {
                font_description.set_weight(pango::Weight::Bold);
            }
            layout.set_font_description(Some(&font_description));
            layout.set_text(&text.text);

            let (text_width, text_height) = layout.pixel_size();
            let dx = match text.h_align {
                TextHAlign::Left => 0.0,
                TextHAlign::Center => -f64::from(text_width) / 2.0,
                TextHAlign::Right => -f64::from(text_width),
            };
            let dy = match text.v_align {
                TextVAlign::Top => 0.0,
                TextVAlign::Middle => -f64::from(text_height) / 2.0,
                TextVAlign::Bottom => -f64::from(text_height),
            };

            context
                .save()
                .map_err(|err| map_backend_error("failed to save text state", err))?;
            apply_color(context, text.color);
            context.translate(text.x, text.y);
            if text.rotation_deg != 0.0 {
                context.rotate(-text.rotation_deg.to_radians());
            }
            context.move_to(dx, dy);
            pangocairo::functions::show_layout(context, &layout);
            context
                .restore()
                .map_err(|err| map_backend_error("failed to restore text state", err))?;
            stats.texts_drawn += 1;
        }

        self.last_stats = stats;
        Ok(())
    }
}

impl Renderer for CairoRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        let context = Context::new(&self.surface)
            .map_err(|err| map_backend_error("failed to create cairo context", err))?;
        self.render_with_context(&context, frame)
    }
}

fn apply_color(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn apply_dash(context: &Context, style: LineStrokeStyle, stroke_width: f64) {
    let dashes: Vec<f64> = style
        .dash_pattern()
        .iter()
        .map(|length| length * stroke_width)
        .collect();
    context.set_dash(&dashes, 0.0);
}

fn fill_and_outline(
    context: &Context,
    fill_color: Color,
    border_width: f64,
    border_color: Color,
    what: &str,
) -> ChartResult<()> {
    apply_color(context, fill_color);
    if border_width > 0.0 {
        context
            .fill_preserve()
            .map_err(|err| map_backend_error(&format!("failed to fill {what}"), err))?;
        apply_color(context, border_color);
        context.set_line_width(border_width);
        context
            .stroke()
            .map_err(|err| map_backend_error(&format!("failed to stroke {what} border"), err))
    } else {
        context
            .fill()
            .map_err(|err| map_backend_error(&format!("failed to fill {what}"), err))
    }
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> ChartError {
    ChartError::Render(format!("{prefix}: {err}"))
}
