use chart_mcp::api::{ChartRequest, FigureBuilder, ScatterRequest, validate};
use chart_mcp::core::{
    LinearScale, Point3, SpringLayoutParams, StructuredGrid, bin_equal_width, spring_layout,
};
use chart_mcp::render::{NullRenderer, Renderer};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn bench_linear_scale_round_trip(c: &mut Criterion) {
    let scale = LinearScale::with_range(0.0, 10_000.0, 72.0, 1_900.0).expect("valid scale");

    c.bench_function("linear_scale_round_trip", |b| {
        b.iter(|| {
            let px = scale.domain_to_pixel(black_box(4_321.123)).expect("to pixel");
            let _ = scale.pixel_to_domain(px).expect("from pixel");
        })
    });
}

fn bench_spring_layout_200_nodes(c: &mut Criterion) {
    let edges: Vec<(usize, usize)> = (0..200).map(|i| (i, (i * 7 + 3) % 200)).collect();

    c.bench_function("spring_layout_200_nodes", |b| {
        b.iter(|| {
            let _ = spring_layout(
                black_box(200),
                black_box(&edges),
                SpringLayoutParams::default(),
                Some(42),
            )
            .expect("layout");
        })
    });
}

fn bench_histogram_binning_100k(c: &mut Criterion) {
    let data: Vec<f64> = (0..100_000)
        .map(|i| ((i as f64) * 0.618_033_988_75).fract() * 50.0)
        .collect();

    c.bench_function("histogram_binning_100k", |b| {
        b.iter(|| {
            let _ = bin_equal_width(black_box(&data), black_box(30)).expect("bins");
        })
    });
}

fn bench_surface_grid_reshape(c: &mut Criterion) {
    let points: Vec<Point3> = (0..100)
        .flat_map(|row| {
            (0..100).map(move |col| {
                let (x, y) = (col as f64, row as f64);
                Point3::new(x, y, (x * 0.1).sin() * (y * 0.1).cos())
            })
        })
        .collect();

    c.bench_function("surface_grid_reshape_10k", |b| {
        b.iter(|| {
            let _ = StructuredGrid::from_points(black_box(&points)).expect("grid");
        })
    });
}

fn bench_scatter_figure_5k(c: &mut Criterion) {
    let request = ChartRequest::Scatter(ScatterRequest {
        x_data: (0..5_000).map(f64::from).collect(),
        y_data: (0..5_000).map(|i| f64::from(i).sqrt()).collect(),
        ..ScatterRequest::default()
    });
    let normalized = validate(request).expect("valid request");
    let builder = FigureBuilder::default();
    let mut renderer = NullRenderer::default();

    c.bench_function("scatter_figure_5k", |b| {
        b.iter(|| {
            let figure = builder.build(black_box(&normalized)).expect("figure");
            renderer.render(&figure.frame).expect("render");
        })
    });
}

criterion_group!(
    benches,
    bench_linear_scale_round_trip,
    bench_spring_layout_200_nodes,
    bench_histogram_binning_100k,
    bench_surface_grid_reshape,
    bench_scatter_figure_5k
);
criterion_main!(benches);
