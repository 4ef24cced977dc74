use smallvec::SmallVec;

use crate::error::{ChartError, ChartResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    #[must_use]
    pub const fn from_rgb8(red: u8, green: u8, blue: u8) -> Self {
        Self::rgb(
            red as f64 / 255.0,
            green as f64 / 255.0,
            blue as f64 / 255.0,
        )
    }

    #[must_use]
    pub const fn with_alpha(self, alpha: f64) -> Self {
        Self::rgba(self.red, self.green, self.blue, alpha)
    }

    /// Parses a named color (`"blue"`, `"skyblue"`, ...) or a hex literal
    /// (`#rgb`, `#rrggbb`, `#rrggbbaa`).
    pub fn parse(spec: &str) -> ChartResult<Self> {
        let trimmed = spec.trim();
        if let Some(hex) = trimmed.strip_prefix('#') {
            return parse_hex(hex)
                .ok_or_else(|| ChartError::validation(format!("invalid hex color `{spec}`")));
        }

        let lowered = trimmed.to_ascii_lowercase();
        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == lowered)
            .map(|(_, color)| *color)
            .ok_or_else(|| ChartError::validation(format!("unknown color `{spec}`")))
    }

    pub fn validate(self) -> ChartResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ChartError::render(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.is_ascii() {
        return None;
    }
    let channel = |index: usize, width: usize| -> Option<f64> {
        let raw = u8::from_str_radix(&hex[index * width..(index + 1) * width], 16).ok()?;
        let value = if width == 1 { raw * 17 } else { raw };
        Some(f64::from(value) / 255.0)
    };
    match hex.len() {
        3 => Some(Color::rgb(channel(0, 1)?, channel(1, 1)?, channel(2, 1)?)),
        6 => Some(Color::rgb(channel(0, 2)?, channel(1, 2)?, channel(2, 2)?)),
        8 => Some(Color::rgba(
            channel(0, 2)?,
            channel(1, 2)?,
            channel(2, 2)?,
            channel(3, 2)?,
        )),
        _ => None,
    }
}

// Single-letter shorthands and the CSS names most charts ask for.
const NAMED_COLORS: &[(&str, Color)] = &[
    ("b", Color::rgb(0.0, 0.0, 1.0)),
    ("g", Color::rgb(0.0, 0.5, 0.0)),
    ("r", Color::rgb(1.0, 0.0, 0.0)),
    ("c", Color::rgb(0.0, 0.75, 0.75)),
    ("m", Color::rgb(0.75, 0.0, 0.75)),
    ("y", Color::rgb(0.75, 0.75, 0.0)),
    ("k", Color::BLACK),
    ("w", Color::WHITE),
    ("black", Color::BLACK),
    ("white", Color::WHITE),
    ("red", Color::from_rgb8(255, 0, 0)),
    ("green", Color::from_rgb8(0, 128, 0)),
    ("blue", Color::from_rgb8(0, 0, 255)),
    ("yellow", Color::from_rgb8(255, 255, 0)),
    ("orange", Color::from_rgb8(255, 165, 0)),
    ("purple", Color::from_rgb8(128, 0, 128)),
    ("pink", Color::from_rgb8(255, 192, 203)),
    ("brown", Color::from_rgb8(165, 42, 42)),
    ("gray", Color::from_rgb8(128, 128, 128)),
    ("grey", Color::from_rgb8(128, 128, 128)),
    ("lightgray", Color::from_rgb8(211, 211, 211)),
    ("lightgrey", Color::from_rgb8(211, 211, 211)),
    ("darkgray", Color::from_rgb8(169, 169, 169)),
    ("darkgrey", Color::from_rgb8(169, 169, 169)),
    ("cyan", Color::from_rgb8(0, 255, 255)),
    ("magenta", Color::from_rgb8(255, 0, 255)),
    ("navy", Color::from_rgb8(0, 0, 128)),
    ("teal", Color::from_rgb8(0, 128, 128)),
    ("olive", Color::from_rgb8(128, 128, 0)),
    ("maroon", Color::from_rgb8(128, 0, 0)),
    ("lime", Color::from_rgb8(0, 255, 0)),
    ("gold", Color::from_rgb8(255, 215, 0)),
    ("skyblue", Color::from_rgb8(135, 206, 235)),
    ("lightblue", Color::from_rgb8(173, 216, 230)),
    ("steelblue", Color::from_rgb8(70, 130, 180)),
    ("darkblue", Color::from_rgb8(0, 0, 139)),
    ("darkgreen", Color::from_rgb8(0, 100, 0)),
    ("lightgreen", Color::from_rgb8(144, 238, 144)),
    ("darkred", Color::from_rgb8(139, 0, 0)),
    ("coral", Color::from_rgb8(255, 127, 80)),
    ("salmon", Color::from_rgb8(250, 128, 114)),
    ("crimson", Color::from_rgb8(220, 20, 60)),
    ("indigo", Color::from_rgb8(75, 0, 130)),
    ("violet", Color::from_rgb8(238, 130, 238)),
    ("turquoise", Color::from_rgb8(64, 224, 208)),
    ("tomato", Color::from_rgb8(255, 99, 71)),
];

/// Dash pattern applied to stroked lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineStrokeStyle {
    #[default]
    Solid,
    Dashed,
    DashDot,
    Dotted,
}

impl LineStrokeStyle {
    /// Dash lengths in multiples of the stroke width.
    #[must_use]
    pub fn dash_pattern(self) -> &'static [f64] {
        match self {
            Self::Solid => &[],
            Self::Dashed => &[3.7, 1.6],
            Self::DashDot => &[6.4, 1.6, 1.0, 1.6],
            Self::Dotted => &[1.0, 1.65],
        }
    }
}

/// Draw command for one line segment in point space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePrimitive {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke_width: f64,
    pub color: Color,
    pub stroke_style: LineStrokeStyle,
}

impl LinePrimitive {
    #[must_use]
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64, stroke_width: f64, color: Color) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            stroke_width,
            color,
            stroke_style: LineStrokeStyle::Solid,
        }
    }

    #[must_use]
    pub const fn with_stroke_style(mut self, stroke_style: LineStrokeStyle) -> Self {
        self.stroke_style = stroke_style;
        self
    }

    pub fn validate(self) -> ChartResult<()> {
        if !self.x1.is_finite()
            || !self.y1.is_finite()
            || !self.x2.is_finite()
            || !self.y2.is_finite()
        {
            return Err(ChartError::render("line coordinates must be finite"));
        }
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(ChartError::render("line stroke width must be finite and > 0"));
        }
        self.color.validate()
    }
}

/// Open path through `points`, stroked as one shape so a dash pattern runs
/// on across vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct PolylinePrimitive {
    pub points: Vec<(f64, f64)>,
    pub stroke_width: f64,
    pub color: Color,
    pub stroke_style: LineStrokeStyle,
}

impl PolylinePrimitive {
    #[must_use]
    pub fn new(
        points: impl IntoIterator<Item = (f64, f64)>,
        stroke_width: f64,
        color: Color,
    ) -> Self {
        Self {
            points: points.into_iter().collect(),
            stroke_width,
            color,
            stroke_style: LineStrokeStyle::Solid,
        }
    }

    #[must_use]
    pub fn with_stroke_style(mut self, stroke_style: LineStrokeStyle) -> Self {
        self.stroke_style = stroke_style;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.points.len() < 2 {
            return Err(ChartError::render("polyline needs at least 2 points"));
        }
        if self
            .points
            .iter()
            .any(|(x, y)| !x.is_finite() || !y.is_finite())
        {
            return Err(ChartError::render("polyline points must be finite"));
        }
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(ChartError::render("polyline stroke width must be finite and > 0"));
        }
        self.color.validate()
    }
}

/// Filled rectangle with an optional border.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectPrimitive {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill_color: Color,
    pub border_width: f64,
    pub border_color: Color,
}

impl RectPrimitive {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64, fill_color: Color) -> Self {
        Self {
            x,
            y,
            width,
            height,
            fill_color,
            border_width: 0.0,
            border_color: Color::BLACK,
        }
    }

    #[must_use]
    pub const fn with_border(mut self, border_width: f64, border_color: Color) -> Self {
        self.border_width = border_width;
        self.border_color = border_color;
        self
    }

    pub fn validate(self) -> ChartResult<()> {
        if !self.x.is_finite()
            || !self.y.is_finite()
            || !self.width.is_finite()
            || !self.height.is_finite()
        {
            return Err(ChartError::render("rectangle geometry must be finite"));
        }
        if self.width < 0.0 || self.height < 0.0 {
            return Err(ChartError::render("rectangle size must be >= 0"));
        }
        if !self.border_width.is_finite() || self.border_width < 0.0 {
            return Err(ChartError::render("rectangle border width must be finite and >= 0"));
        }
        self.fill_color.validate()?;
        self.border_color.validate()
    }
}

/// Round marker centered on `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CirclePrimitive {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub fill_color: Color,
    pub border_width: f64,
    pub border_color: Color,
}

impl CirclePrimitive {
    #[must_use]
    pub const fn new(x: f64, y: f64, radius: f64, fill_color: Color) -> Self {
        Self {
            x,
            y,
            radius,
            fill_color,
            border_width: 0.0,
            border_color: Color::BLACK,
        }
    }

    #[must_use]
    pub const fn with_border(mut self, border_width: f64, border_color: Color) -> Self {
        self.border_width = border_width;
        self.border_color = border_color;
        self
    }

    pub fn validate(self) -> ChartResult<()> {
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(ChartError::render("marker coordinates must be finite"));
        }
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(ChartError::render("marker radius must be finite and > 0"));
        }
        if !self.border_width.is_finite() || self.border_width < 0.0 {
            return Err(ChartError::render("marker border width must be finite and >= 0"));
        }
        self.fill_color.validate()?;
        self.border_color.validate()
    }
}

/// Closed polygon, used for surface patches and arrowheads.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonPrimitive {
    pub points: SmallVec<[(f64, f64); 4]>,
    pub fill_color: Color,
    pub border_width: f64,
    pub border_color: Color,
}

impl PolygonPrimitive {
    #[must_use]
    pub fn new(points: impl IntoIterator<Item = (f64, f64)>, fill_color: Color) -> Self {
        Self {
            points: points.into_iter().collect(),
            fill_color,
            border_width: 0.0,
            border_color: Color::BLACK,
        }
    }

    #[must_use]
    pub fn with_border(mut self, border_width: f64, border_color: Color) -> Self {
        self.border_width = border_width;
        self.border_color = border_color;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.points.len() < 3 {
            return Err(ChartError::render("polygon needs at least 3 vertices"));
        }
        if self
            .points
            .iter()
            .any(|(x, y)| !x.is_finite() || !y.is_finite())
        {
            return Err(ChartError::render("polygon vertices must be finite"));
        }
        if !self.border_width.is_finite() || self.border_width < 0.0 {
            return Err(ChartError::render("polygon border width must be finite and >= 0"));
        }
        self.fill_color.validate()?;
        self.border_color.validate()
    }
}

/// Horizontal text alignment relative to `TextPrimitive::x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextHAlign {
    Left,
    Center,
    Right,
}

/// Vertical text alignment relative to `TextPrimitive::y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextVAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// Draw command for one label in point space.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPrimitive {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_size_px: f64,
    pub color: Color,
    pub h_align: TextHAlign,
    pub v_align: TextVAlign,
    pub bold: bool,
    /// Counter-clockwise rotation around the anchor, in degrees.
    pub rotation_deg: f64,
}

impl TextPrimitive {
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        x: f64,
        y: f64,
        font_size_px: f64,
        color: Color,
        h_align: TextHAlign,
    ) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            font_size_px,
            color,
            h_align,
            v_align: TextVAlign::Top,
            bold: false,
            rotation_deg: 0.0,
        }
    }

    #[must_use]
    pub fn with_v_align(mut self, v_align: TextVAlign) -> Self {
        self.v_align = v_align;
        self
    }

    #[must_use]
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    #[must_use]
    pub fn rotated(mut self, rotation_deg: f64) -> Self {
        self.rotation_deg = rotation_deg;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.text.is_empty() {
            return Err(ChartError::render("text primitive must not be empty"));
        }
        if !self.x.is_finite() || !self.y.is_finite() || !self.rotation_deg.is_finite() {
            return Err(ChartError::render("text coordinates must be finite"));
        }
        if !self.font_size_px.is_finite() || self.font_size_px <= 0.0 {
            return Err(ChartError::render("font size must be finite and > 0"));
        }
        self.color.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::{Color, LineStrokeStyle, PolygonPrimitive};

    #[test]
    fn parses_named_and_hex_colors() {
        assert_eq!(Color::parse("Blue").expect("named"), Color::from_rgb8(0, 0, 255));
        assert_eq!(Color::parse("#f00").expect("short hex"), Color::rgb(1.0, 0.0, 0.0));
        let translucent = Color::parse("#00ff0080").expect("hex with alpha");
        assert!((translucent.alpha - 128.0 / 255.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_unknown_colors() {
        assert!(Color::parse("not-a-color").is_err());
        assert!(Color::parse("#12345").is_err());
        assert!(Color::parse("#zzzzzz").is_err());
    }

    #[test]
    fn solid_stroke_has_no_dashes() {
        assert!(LineStrokeStyle::Solid.dash_pattern().is_empty());
        assert_eq!(LineStrokeStyle::DashDot.dash_pattern().len(), 4);
    }

    #[test]
    fn degenerate_polygon_is_rejected() {
        let polygon = PolygonPrimitive::new([(0.0, 0.0), (1.0, 1.0)], Color::BLACK);
        assert!(polygon.validate().is_err());
    }
}
