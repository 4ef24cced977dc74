use serde::{Deserialize, Serialize};

use crate::core::types::Extent;
use crate::error::{ChartError, ChartResult};

/// One equal-width histogram bin; `count` samples fall in `[left, right)`
/// (the last bin also includes its right edge).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub left: f64,
    pub right: f64,
    pub count: u64,
}

/// Bins `data` into `bin_count` equal-width bins spanning `[min, max]`.
///
/// When every sample has the same value the range is widened to
/// `[value - 0.5, value + 0.5]` (more for huge magnitudes) so bins keep a
/// non-zero width.
pub fn bin_equal_width(data: &[f64], bin_count: usize) -> ChartResult<Vec<HistogramBin>> {
    if bin_count == 0 {
        return Err(ChartError::render("histogram needs at least one bin"));
    }
    let extent = Extent::of(data.iter().copied())
        .ok_or_else(|| ChartError::render("histogram data must be non-empty and finite"))?;
    let Extent { min: low, max: high } = extent.widened();

    let width = (high - low) / bin_count as f64;
    let mut bins: Vec<HistogramBin> = (0..bin_count)
        .map(|index| HistogramBin {
            left: low + width * index as f64,
            right: if index + 1 == bin_count {
                high
            } else {
                low + width * (index + 1) as f64
            },
            count: 0,
        })
        .collect();

    for value in data {
        let raw_index = ((value - low) / width).floor();
        let index = if raw_index < 0.0 {
            0
        } else {
            (raw_index as usize).min(bin_count - 1)
        };
        bins[index].count += 1;
    }

    Ok(bins)
}

#[cfg(test)]
mod tests {
    use super::bin_equal_width;

    #[test]
    fn maximum_lands_in_last_bin() {
        let bins = bin_equal_width(&[0.0, 1.0, 2.0, 3.0, 4.0], 4).expect("bins");
        let counts: Vec<u64> = bins.iter().map(|bin| bin.count).collect();
        assert_eq!(counts, vec![1, 1, 1, 2]);
        assert_eq!(bins[0].left, 0.0);
        assert_eq!(bins[3].right, 4.0);
    }

    #[test]
    fn constant_data_is_centered_in_widened_range() {
        let bins = bin_equal_width(&[7.0, 7.0, 7.0], 2).expect("bins");
        assert_eq!(bins[0].left, 6.5);
        assert_eq!(bins[1].right, 7.5);
        assert_eq!(bins.iter().map(|bin| bin.count).sum::<u64>(), 3);
    }

    #[test]
    fn huge_constant_data_still_gets_wide_bins() {
        let bins = bin_equal_width(&[2e16, 2e16], 3).expect("bins");
        assert!(bins.iter().all(|bin| bin.right > bin.left));
        assert_eq!(bins.iter().map(|bin| bin.count).sum::<u64>(), 2);
    }

    #[test]
    fn rejects_zero_bins_and_empty_data() {
        assert!(bin_equal_width(&[1.0], 0).is_err());
        assert!(bin_equal_width(&[], 3).is_err());
    }
}
