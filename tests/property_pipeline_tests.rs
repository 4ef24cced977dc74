use approx::assert_abs_diff_eq;
use chart_mcp::api::{
    ChartKind, ChartRequest, FigureBuilder, HeatmapRequest, OutputNamer, ScatterRequest, validate,
};
use chart_mcp::core::{Colormap, SpringLayoutParams, bin_equal_width, spring_layout};
use chrono::Local;
use proptest::prelude::*;

proptest! {
    #[test]
    fn scatter_marker_count_matches_point_count(
        xs in proptest::collection::vec(-1_000.0f64..1_000.0, 1..64),
        ys in proptest::collection::vec(-1_000.0f64..1_000.0, 1..64),
    ) {
        let len = xs.len().min(ys.len());
        let request = ChartRequest::Scatter(ScatterRequest {
            x_data: xs[..len].to_vec(),
            y_data: ys[..len].to_vec(),
            ..ScatterRequest::default()
        });

        let normalized = validate(request).expect("valid scatter");
        let figure = FigureBuilder::default().build(&normalized).expect("figure");

        prop_assert_eq!(figure.frame.circles.len(), len);
        prop_assert_eq!(figure.data_marks, len);
        let viewport = figure.frame.viewport;
        for circle in &figure.frame.circles {
            prop_assert!(circle.x >= 0.0 && circle.x <= f64::from(viewport.width));
            prop_assert!(circle.y >= 0.0 && circle.y <= f64::from(viewport.height));
        }
    }

    #[test]
    fn binning_conserves_samples_and_tiles_the_range(
        data in proptest::collection::vec(-500.0f64..500.0, 1..256),
        bins in 1usize..64,
    ) {
        let result = bin_equal_width(&data, bins).expect("bins");

        prop_assert_eq!(result.len(), bins);
        prop_assert_eq!(result.iter().map(|bin| bin.count).sum::<u64>(), data.len() as u64);
        for pair in result.windows(2) {
            assert_abs_diff_eq!(pair[0].right, pair[1].left, epsilon = 1e-9);
        }
    }

    #[test]
    fn layout_stays_in_unit_square(
        node_count in 1usize..24,
        raw_edges in proptest::collection::vec((0usize..24, 0usize..24), 0..40),
        seed in any::<u64>(),
    ) {
        let edges: Vec<(usize, usize)> = raw_edges
            .into_iter()
            .map(|(source, target)| (source % node_count, target % node_count))
            .collect();
        let params = SpringLayoutParams { iterations: 20, ..SpringLayoutParams::default() };

        let positions = spring_layout(node_count, &edges, params, Some(seed)).expect("layout");

        prop_assert_eq!(positions.len(), node_count);
        for (x, y) in positions {
            prop_assert!(x.is_finite() && y.is_finite());
            prop_assert!(x.abs() <= 1.0 + 1e-9 && y.abs() <= 1.0 + 1e-9);
        }
    }

    #[test]
    fn heatmap_draws_one_cell_per_value(
        rows in 1usize..12,
        columns in 1usize..12,
        scale in 0.1f64..100.0,
    ) {
        let data_matrix: Vec<Vec<f64>> = (0..rows)
            .map(|row| (0..columns).map(|column| (row * columns + column) as f64 * scale).collect())
            .collect();
        let request = ChartRequest::Heatmap(HeatmapRequest {
            data_matrix,
            ..HeatmapRequest::default()
        });

        let figure = FigureBuilder::default()
            .build(&validate(request).expect("valid heatmap"))
            .expect("figure");

        prop_assert_eq!(figure.data_marks, rows * columns);
        prop_assert!(figure.frame.rects.len() >= rows * columns);
    }

    #[test]
    fn colormap_output_is_always_a_valid_color(
        value in -1_000.0f64..1_000.0,
        low in -100.0f64..100.0,
        width in 0.0f64..100.0,
        reversed in any::<bool>(),
    ) {
        let name = if reversed { "magma_r" } else { "coolwarm" };
        let colormap = Colormap::parse(name).expect("known colormap");

        let color = colormap.map(value, low, low + width);

        prop_assert!(color.validate().is_ok());
    }

    #[test]
    fn reserved_names_never_repeat(calls in 1usize..24) {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut namer = OutputNamer::new(dir.path()).expect("namer");
        let now = Local::now();

        let mut paths: Vec<_> = (0..calls)
            .map(|_| namer.reserve(ChartKind::LinePlot, now).expect("reserve").path)
            .collect();
        paths.sort();
        paths.dedup();

        prop_assert_eq!(paths.len(), calls);
    }
}
