use crate::core::types::Extent;
use crate::error::{ChartError, ChartResult};

/// Affine map from a data domain onto a pixel range.
///
/// The pixel range may be inverted (`pixel_start > pixel_end`) so y axes can
/// grow upwards on a top-left-origin canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    pixel_start: f64,
    pixel_end: f64,
}

impl LinearScale {
    pub fn with_range(
        domain_start: f64,
        domain_end: f64,
        pixel_start: f64,
        pixel_end: f64,
    ) -> ChartResult<Self> {
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(ChartError::render(
                "scale domain must be finite and non-zero",
            ));
        }
        if !pixel_start.is_finite() || !pixel_end.is_finite() {
            return Err(ChartError::render("scale pixel range must be finite"));
        }

        Ok(Self {
            domain_start,
            domain_end,
            pixel_start,
            pixel_end,
        })
    }

    pub fn from_extent(extent: Extent, pixel_start: f64, pixel_end: f64) -> ChartResult<Self> {
        Self::with_range(extent.min, extent.max, pixel_start, pixel_end)
    }

    pub fn domain_to_pixel(self, value: f64) -> ChartResult<f64> {
        if !value.is_finite() {
            return Err(ChartError::render("value must be finite"));
        }

        let normalized = (value - self.domain_start) / (self.domain_end - self.domain_start);
        Ok(self.pixel_start + normalized * (self.pixel_end - self.pixel_start))
    }

    pub fn pixel_to_domain(self, pixel: f64) -> ChartResult<f64> {
        if !pixel.is_finite() {
            return Err(ChartError::render("pixel must be finite"));
        }
        if self.pixel_start == self.pixel_end {
            return Err(ChartError::render("scale pixel range is empty"));
        }

        let normalized = (pixel - self.pixel_start) / (self.pixel_end - self.pixel_start);
        Ok(self.domain_start + normalized * (self.domain_end - self.domain_start))
    }
}

/// Picks "nice" tick values (1, 2, 2.5, 5 times a power of ten) covering
/// `[min, max]`, aiming at `target_count` ticks.
#[must_use]
pub fn nice_ticks(min: f64, max: f64, target_count: usize) -> Vec<f64> {
    if !min.is_finite() || !max.is_finite() || max <= min || target_count == 0 {
        return Vec::new();
    }

    let raw_step = (max - min) / target_count.max(1) as f64;
    let magnitude = 10f64.powf(raw_step.log10().floor());
    let step = [1.0, 2.0, 2.5, 5.0, 10.0]
        .iter()
        .map(|factor| factor * magnitude)
        .find(|candidate| *candidate >= raw_step)
        .unwrap_or(10.0 * magnitude);

    let first = (min / step).ceil() * step;
    let mut ticks = Vec::new();
    let mut index = 0u32;
    loop {
        let value = first + f64::from(index) * step;
        if value > max + step * 1e-9 {
            break;
        }
        // Snap values like 0.30000000000000004 and -0.0.
        let snapped = (value / step).round() * step;
        ticks.push(if snapped == 0.0 { 0.0 } else { snapped });
        index += 1;
        if index > 1_000 {
            break;
        }
    }
    ticks
}

/// Formats a tick value with just enough decimals for its step.
#[must_use]
pub fn format_tick(value: f64, step: f64) -> String {
    if !step.is_finite() || step <= 0.0 {
        return format!("{value}");
    }
    let decimals = (0..=10)
        .find(|digits| {
            let scaled = step * 10f64.powi(*digits);
            (scaled - scaled.round()).abs() < 1e-6
        })
        .unwrap_or(10) as usize;
    let abs = value.abs();
    if abs != 0.0 && (abs >= 1e6 || abs < 1e-4) {
        return format!("{value:.2e}");
    }
    format!("{value:.decimals$}")
}

#[cfg(test)]
mod tests {
    use super::{LinearScale, format_tick, nice_ticks};

    #[test]
    fn inverted_pixel_range_maps_domain_upwards() {
        let scale = LinearScale::with_range(0.0, 10.0, 400.0, 0.0).expect("scale");
        assert_eq!(scale.domain_to_pixel(0.0).expect("px"), 400.0);
        assert_eq!(scale.domain_to_pixel(10.0).expect("px"), 0.0);
        assert_eq!(scale.pixel_to_domain(200.0).expect("domain"), 5.0);
    }

    #[test]
    fn nice_ticks_use_round_steps() {
        assert_eq!(nice_ticks(0.0, 10.0, 5), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        let ticks = nice_ticks(-0.3, 0.3, 6);
        assert!(ticks.contains(&0.0));
        assert!(ticks.iter().all(|tick| tick.abs() <= 0.3 + 1e-9));
    }

    #[test]
    fn format_tick_matches_step_precision() {
        assert_eq!(format_tick(4.0, 2.0), "4");
        assert_eq!(format_tick(0.5, 0.5), "0.5");
        assert_eq!(format_tick(0.25, 0.25), "0.25");
    }
}
