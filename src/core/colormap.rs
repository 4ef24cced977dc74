use crate::error::{ChartError, ChartResult};
use crate::render::Color;

const fn hex(rgb: u32) -> Color {
    Color::from_rgb8((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

const VIRIDIS: &[Color] = &[
    hex(0x440154),
    hex(0x472d7b),
    hex(0x3b528b),
    hex(0x2c728e),
    hex(0x21918c),
    hex(0x28ae80),
    hex(0x5ec962),
    hex(0xaddc30),
    hex(0xfde725),
];
const PLASMA: &[Color] = &[
    hex(0x0d0887),
    hex(0x4c02a1),
    hex(0x7e03a8),
    hex(0xa92395),
    hex(0xcc4778),
    hex(0xe56b5d),
    hex(0xf89441),
    hex(0xfdc328),
    hex(0xf0f921),
];
const INFERNO: &[Color] = &[
    hex(0x000004),
    hex(0x1f0c48),
    hex(0x550f6d),
    hex(0x88226a),
    hex(0xba3655),
    hex(0xe35933),
    hex(0xf98e09),
    hex(0xf9cb35),
    hex(0xfcffa4),
];
const MAGMA: &[Color] = &[
    hex(0x000004),
    hex(0x1c1044),
    hex(0x4f127b),
    hex(0x812581),
    hex(0xb5367a),
    hex(0xe55064),
    hex(0xfb8761),
    hex(0xfec287),
    hex(0xfcfdbf),
];
const CIVIDIS: &[Color] = &[
    hex(0x00224e),
    hex(0x123570),
    hex(0x3b496c),
    hex(0x575d6d),
    hex(0x707173),
    hex(0x8a8678),
    hex(0xa59c74),
    hex(0xc3b369),
    hex(0xfee838),
];
const GRAY: &[Color] = &[hex(0x000000), hex(0xffffff)];
const HOT: &[Color] = &[hex(0x0b0000), hex(0xff0000), hex(0xffff00), hex(0xffffff)];
const COOLWARM: &[Color] = &[
    hex(0x3b4cc0),
    hex(0x7396f5),
    hex(0xb0cbfc),
    hex(0xdddddd),
    hex(0xf6bfa6),
    hex(0xea7b60),
    hex(0xb40426),
];
const BLUES: &[Color] = &[
    hex(0xf7fbff),
    hex(0xdeebf7),
    hex(0xc6dbef),
    hex(0x9ecae1),
    hex(0x6baed6),
    hex(0x4292c6),
    hex(0x2171b5),
    hex(0x08519c),
    hex(0x08306b),
];
const REDS: &[Color] = &[
    hex(0xfff5f0),
    hex(0xfee0d2),
    hex(0xfcbba1),
    hex(0xfc9272),
    hex(0xfb6a4a),
    hex(0xef3b2c),
    hex(0xcb181d),
    hex(0xa50f15),
    hex(0x67000d),
];
const GREENS: &[Color] = &[
    hex(0xf7fcf5),
    hex(0xe5f5e0),
    hex(0xc7e9c0),
    hex(0xa1d99b),
    hex(0x74c476),
    hex(0x41ab5d),
    hex(0x238b45),
    hex(0x006d2c),
    hex(0x00441b),
];

/// Qualitative palette for categorical data (ColorBrewer Set1).
pub const CATEGORY_PALETTE: &[Color] = &[
    hex(0xe41a1c),
    hex(0x377eb8),
    hex(0x4daf4a),
    hex(0x984ea3),
    hex(0xff7f00),
    hex(0xffff33),
    hex(0xa65628),
    hex(0xf781bf),
    hex(0x999999),
];

/// Color for the `index`-th category in first-appearance order.
#[must_use]
pub fn category_color(index: usize) -> Color {
    CATEGORY_PALETTE[index % CATEGORY_PALETTE.len()]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColormapFamily {
    Viridis,
    Plasma,
    Inferno,
    Magma,
    Cividis,
    Gray,
    Hot,
    Coolwarm,
    Blues,
    Reds,
    Greens,
}

impl ColormapFamily {
    fn stops(self) -> &'static [Color] {
        match self {
            Self::Viridis => VIRIDIS,
            Self::Plasma => PLASMA,
            Self::Inferno => INFERNO,
            Self::Magma => MAGMA,
            Self::Cividis => CIVIDIS,
            Self::Gray => GRAY,
            Self::Hot => HOT,
            Self::Coolwarm => COOLWARM,
            Self::Blues => BLUES,
            Self::Reds => REDS,
            Self::Greens => GREENS,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "viridis" => Self::Viridis,
            "plasma" => Self::Plasma,
            "inferno" => Self::Inferno,
            "magma" => Self::Magma,
            "cividis" => Self::Cividis,
            "gray" | "grey" | "greys" => Self::Gray,
            "hot" => Self::Hot,
            "coolwarm" => Self::Coolwarm,
            "blues" => Self::Blues,
            "reds" => Self::Reds,
            "greens" => Self::Greens,
            _ => return None,
        })
    }
}

/// Continuous colormap, optionally reversed (`<name>_r`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Colormap {
    pub family: ColormapFamily,
    pub reversed: bool,
}

impl Default for Colormap {
    fn default() -> Self {
        Self::VIRIDIS
    }
}

impl Colormap {
    pub const VIRIDIS: Self = Self {
        family: ColormapFamily::Viridis,
        reversed: false,
    };

    pub fn parse(name: &str) -> ChartResult<Self> {
        let lowered = name.trim().to_ascii_lowercase();
        let (base, reversed) = match lowered.strip_suffix("_r") {
            Some(base) => (base, true),
            None => (lowered.as_str(), false),
        };
        ColormapFamily::from_name(base)
            .map(|family| Self { family, reversed })
            .ok_or_else(|| ChartError::validation(format!("unknown colormap `{name}`")))
    }

    /// Samples the map at `t` in `[0, 1]`; out-of-range values are clamped.
    #[must_use]
    pub fn sample(self, t: f64) -> Color {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let t = if self.reversed { 1.0 - t } else { t };
        let stops = self.family.stops();
        let position = t * (stops.len() - 1) as f64;
        let lower = position.floor() as usize;
        if lower >= stops.len() - 1 {
            return stops[stops.len() - 1];
        }
        let fraction = position - lower as f64;
        let (from, to) = (stops[lower], stops[lower + 1]);
        Color::rgb(
            from.red + (to.red - from.red) * fraction,
            from.green + (to.green - from.green) * fraction,
            from.blue + (to.blue - from.blue) * fraction,
        )
    }

    /// Maps `value` within `[min, max]` onto the colormap; a degenerate range
    /// maps everything to the midpoint.
    #[must_use]
    pub fn map(self, value: f64, min: f64, max: f64) -> Color {
        if max > min {
            self.sample((value - min) / (max - min))
        } else {
            self.sample(0.5)
        }
    }
}
