use approx::assert_abs_diff_eq;
use chart_mcp::ChartError;
use chart_mcp::api::{
    ChartKind, ChartRequest, ClassificationRequest, FigureBuilder, HeatmapRequest,
    HistogramRequest, LinePlotRequest, NormalizedRequest, Plot3dRequest, RelationshipGraphRequest,
    ScatterRequest, validate,
};
use chart_mcp::core::{LayoutSeedPolicy, SpringLayoutParams, category_color};
use chart_mcp::render::{LineStrokeStyle, NullRenderer, Renderer};

fn normalized(request: ChartRequest) -> NormalizedRequest {
    validate(request).expect("valid request")
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_owned()).collect()
}

fn graph_request(directed: bool) -> ChartRequest {
    ChartRequest::RelationshipGraph(RelationshipGraphRequest {
        nodes: strings(&["A", "B", "C", "D"]),
        edges: vec![strings(&["A", "B"]), strings(&["B", "C"])],
        directed: Some(directed),
        ..RelationshipGraphRequest::default()
    })
}

#[test]
fn scatter_draws_one_marker_per_point() {
    let request = normalized(ChartRequest::Scatter(ScatterRequest {
        x_data: vec![1.0, 2.0, 3.0, 4.0, 5.0],
        y_data: vec![5.0, 3.0, 4.0, 1.0, 2.0],
        labels: Some(strings(&["a", "b", "c", "d", "e"])),
        ..ScatterRequest::default()
    }));
    let figure = FigureBuilder::default().build(&request).expect("figure");

    assert_eq!(figure.kind, ChartKind::Scatter);
    assert_eq!(figure.data_marks, 5);
    assert_eq!(figure.frame.circles.len(), 5);
    for label in ["a", "b", "c", "d", "e", "Scatter Plot", "X-axis", "Y-axis"] {
        assert!(
            figure.frame.texts.iter().any(|text| text.text == label),
            "missing text `{label}`"
        );
    }
    // Marker area is in square points.
    assert_abs_diff_eq!(figure.frame.circles[0].radius, 50.0_f64.sqrt() / 2.0, epsilon = 1e-12);
}

#[test]
fn scatter_with_huge_constant_coordinates_still_builds() {
    let request = normalized(ChartRequest::Scatter(ScatterRequest {
        x_data: vec![2e16, 2e16, 2e16],
        y_data: vec![1.0, 2.0, 3.0],
        ..ScatterRequest::default()
    }));
    let figure = FigureBuilder::default().build(&request).expect("figure");

    assert_eq!(figure.frame.circles.len(), 3);
    NullRenderer::default()
        .render(&figure.frame)
        .expect("valid frame");
}

#[test]
fn classification_has_one_legend_entry_per_category() {
    let request = normalized(ChartRequest::ClassificationScatter(ClassificationRequest {
        x_data: vec![1.0, 2.0, 3.0],
        y_data: vec![1.0, 2.0, 3.0],
        categories: strings(&["X", "X", "Y"]),
        ..ClassificationRequest::default()
    }));
    let figure = FigureBuilder::default().build(&request).expect("figure");

    assert_eq!(figure.legend.len(), 2);
    assert_eq!(figure.legend[0].label, "X");
    assert_eq!(figure.legend[1].label, "Y");
    assert_eq!(figure.legend[0].color, category_color(0));
    assert_eq!(figure.legend[1].color, category_color(1));
    assert_eq!(figure.data_marks, 3);
}

#[test]
fn category_colors_follow_first_appearance() {
    let request = normalized(ChartRequest::ClassificationScatter(ClassificationRequest {
        x_data: vec![1.0, 2.0, 3.0],
        y_data: vec![1.0, 2.0, 3.0],
        categories: strings(&["dog", "cat", "dog"]),
        ..ClassificationRequest::default()
    }));
    let figure = FigureBuilder::default().build(&request).expect("figure");

    let labels: Vec<&str> = figure.legend.iter().map(|entry| entry.label.as_str()).collect();
    assert_eq!(labels, vec!["dog", "cat"]);
}

#[test]
fn graph_draws_every_node_including_isolated_ones() {
    let figure = FigureBuilder::default()
        .build(&normalized(graph_request(false)))
        .expect("figure");

    assert_eq!(figure.data_marks, 4);
    assert_eq!(figure.frame.circles.len(), 4);
    assert_eq!(figure.frame.lines.len(), 2);
    assert!(figure.frame.polygons.is_empty());
    for name in ["A", "B", "C", "D"] {
        let label = figure
            .frame
            .texts
            .iter()
            .find(|text| text.text == name)
            .expect("node label");
        assert!(label.bold);
    }
}

#[test]
fn directed_graph_gets_arrowheads() {
    let figure = FigureBuilder::default()
        .build(&normalized(graph_request(true)))
        .expect("figure");
    // One per edge unless the two markers overlap.
    assert!(!figure.frame.polygons.is_empty());
    assert!(figure.frame.polygons.len() <= 2);
}

#[test]
fn fixed_seed_layouts_are_reproducible() {
    let builder = FigureBuilder::new(
        LayoutSeedPolicy::Fixed { seed: 7 },
        SpringLayoutParams::default(),
    );
    let request = normalized(graph_request(false));

    let first = builder.build(&request).expect("first");
    let second = builder.build(&request).expect("second");
    assert_eq!(first.frame, second.frame);
}

#[test]
fn histogram_draws_one_bar_per_bin() {
    let request = normalized(ChartRequest::Histogram(HistogramRequest {
        data: (0..100).map(f64::from).collect(),
        bins: Some(10.0),
        ..HistogramRequest::default()
    }));
    let figure = FigureBuilder::default().build(&request).expect("figure");

    assert_eq!(figure.data_marks, 10);
    assert_eq!(figure.frame.rects.len(), 10);
    assert_eq!(figure.size.width_in, 10.0);
    assert_eq!(figure.size.height_in, 6.0);
}

#[test]
fn line_plot_joins_points_in_order() {
    let request = normalized(ChartRequest::LinePlot(LinePlotRequest {
        x_data: vec![3.0, 1.0, 2.0],
        y_data: vec![1.0, 2.0, 3.0],
        line_style: Some(":".to_owned()),
        ..LinePlotRequest::default()
    }));
    let figure = FigureBuilder::default().build(&request).expect("figure");

    // One path per series so the dash pattern runs on across vertices.
    assert_eq!(figure.frame.polylines.len(), 1);
    let series = &figure.frame.polylines[0];
    assert_eq!(series.points.len(), 3);
    assert_eq!(series.stroke_style, LineStrokeStyle::Dotted);
    // x=3 is the rightmost point and comes first.
    assert!(series.points[0].0 > series.points[1].0);
    assert_eq!(figure.frame.circles.len(), 3);
}

#[test]
fn surface_needs_a_complete_grid() {
    let request = normalized(ChartRequest::Plot3d(Plot3dRequest {
        x_data: vec![0.0, 1.0, 2.0, 0.0, 1.0],
        y_data: vec![0.0, 0.0, 0.0, 1.0, 1.0],
        z_data: vec![0.0, 1.0, 2.0, 1.0, 2.0],
        plot_type: Some("surface".to_owned()),
        ..Plot3dRequest::default()
    }));
    let err = FigureBuilder::default()
        .build(&request)
        .expect_err("incomplete grid must fail");
    assert!(matches!(err, ChartError::Render(_)), "{err:?}");
}

#[test]
fn surface_draws_one_patch_per_cell() {
    let mut x_data = Vec::new();
    let mut y_data = Vec::new();
    let mut z_data = Vec::new();
    for y in 0..3 {
        for x in 0..4 {
            x_data.push(f64::from(x));
            y_data.push(f64::from(y));
            z_data.push(f64::from(x * y));
        }
    }
    let request = normalized(ChartRequest::Plot3d(Plot3dRequest {
        x_data,
        y_data,
        z_data,
        plot_type: Some("surface".to_owned()),
        ..Plot3dRequest::default()
    }));
    let figure = FigureBuilder::default().build(&request).expect("figure");

    assert_eq!(figure.frame.polygons.len(), 3 * 2);
    assert_eq!(figure.data_marks, 12);
}

#[test]
fn scatter_3d_draws_every_point() {
    let request = normalized(ChartRequest::Plot3d(Plot3dRequest {
        x_data: vec![0.0, 1.0, 2.0, 3.0],
        y_data: vec![1.0, 0.0, 1.0, 0.0],
        z_data: vec![5.0, 6.0, 7.0, 8.0],
        ..Plot3dRequest::default()
    }));
    let figure = FigureBuilder::default().build(&request).expect("figure");

    assert_eq!(figure.frame.circles.len(), 4);
    assert!(figure.frame.texts.iter().any(|text| text.text == "Z-axis"));
}

#[test]
fn heatmap_uses_custom_labels() {
    let request = normalized(ChartRequest::Heatmap(HeatmapRequest {
        data_matrix: vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]],
        x_labels: Some(strings(&["mon", "tue", "wed"])),
        y_labels: Some(strings(&["am", "pm"])),
        ..HeatmapRequest::default()
    }));
    let figure = FigureBuilder::default().build(&request).expect("figure");

    assert_eq!(figure.data_marks, 6);
    let tue = figure
        .frame
        .texts
        .iter()
        .find(|text| text.text == "tue")
        .expect("x label");
    assert_eq!(tue.rotation_deg, 45.0);
    assert!(figure.frame.texts.iter().any(|text| text.text == "pm"));
}

#[test]
fn every_kind_produces_a_valid_frame() {
    let requests = vec![
        graph_request(true),
        ChartRequest::Scatter(ScatterRequest {
            x_data: vec![0.0],
            y_data: vec![0.0],
            ..ScatterRequest::default()
        }),
        ChartRequest::Histogram(HistogramRequest {
            data: vec![4.0, 4.0, 4.0],
            ..HistogramRequest::default()
        }),
        ChartRequest::LinePlot(LinePlotRequest {
            x_data: vec![1.0],
            y_data: vec![1.0],
            ..LinePlotRequest::default()
        }),
        ChartRequest::Heatmap(HeatmapRequest {
            data_matrix: vec![vec![2.0; 4]; 4],
            ..HeatmapRequest::default()
        }),
    ];

    let mut renderer = NullRenderer::default();
    for request in requests {
        let figure = FigureBuilder::default()
            .build(&normalized(request))
            .expect("figure");
        renderer.render(&figure.frame).expect("valid frame");
        assert!(!figure.frame.is_empty());
    }
}
