use serde::{Deserialize, Serialize};

const RELATIVE_WIDENING: f64 = 1e-9;

/// Drawing area size in points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub x: f64,
    pub y: f64,
}

impl DataPoint {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Inclusive value range of a data axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub min: f64,
    pub max: f64,
}

impl Extent {
    /// Returns `None` for empty input or when any value is not finite.
    #[must_use]
    pub fn of(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut extent: Option<Self> = None;
        for value in values {
            if !value.is_finite() {
                return None;
            }
            extent = Some(match extent {
                None => Self {
                    min: value,
                    max: value,
                },
                Some(current) => Self {
                    min: current.min.min(value),
                    max: current.max.max(value),
                },
            });
        }
        extent
    }

    #[must_use]
    pub fn span(self) -> f64 {
        self.max - self.min
    }

    /// Widens a zero-span extent by ±0.5, or by a margin relative to its
    /// magnitude once ±0.5 falls below the float spacing there.
    #[must_use]
    pub fn widened(self) -> Self {
        if self.span() > 0.0 {
            return self;
        }
        let half = 0.5_f64.max(self.min.abs().max(self.max.abs()) * RELATIVE_WIDENING);
        Self {
            min: self.min - half,
            max: self.max + half,
        }
    }

    /// Grows the extent by `fraction` of its span on both sides; a zero-span
    /// extent is [`widened`](Self::widened) instead so it can back a scale.
    #[must_use]
    pub fn padded(self, fraction: f64) -> Self {
        let span = self.span();
        if span <= 0.0 {
            return self.widened();
        }
        Self {
            min: self.min - span * fraction,
            max: self.max + span * fraction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Extent;

    #[test]
    fn constant_extent_widens_by_half_a_unit() {
        let extent = Extent { min: 3.0, max: 3.0 }.padded(0.05);
        assert_eq!(extent, Extent { min: 2.5, max: 3.5 });
    }

    #[test]
    fn huge_constant_extent_keeps_a_positive_span() {
        for value in [2e16, -2e16, 1e300] {
            let extent = Extent {
                min: value,
                max: value,
            }
            .padded(0.05);
            assert!(extent.span() > 0.0, "{value}: {extent:?}");
            assert!(extent.min < value && value < extent.max);
        }
    }
}
