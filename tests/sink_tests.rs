use std::fs;

use chart_mcp::ChartError;
use chart_mcp::api::{ChartKind, Figure, FigureSink, HeadlessDisplay, OutputNamer};
use chart_mcp::render::{CirclePrimitive, Color, TextHAlign, TextPrimitive};
use chrono::Local;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

fn sink() -> FigureSink {
    FigureSink::new(72, Box::new(HeadlessDisplay))
}

fn labelled_figure(kind: ChartKind) -> Figure {
    let mut figure = Figure::new(kind);
    figure.frame.push_text(TextPrimitive::new(
        "Histogram",
        360.0,
        20.0,
        12.0,
        Color::BLACK,
        TextHAlign::Center,
    ));
    figure
}

#[test]
fn persist_writes_a_png_sized_for_the_dpi() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut namer = OutputNamer::new(dir.path()).expect("namer");
    let artifact = namer
        .reserve(ChartKind::Histogram, Local::now())
        .expect("reserve");

    sink()
        .persist(&labelled_figure(ChartKind::Histogram), &artifact)
        .expect("persist");

    let bytes = fs::read(&artifact.path).expect("png bytes");
    assert_eq!(bytes[..8], PNG_SIGNATURE);
    // IHDR width and height, big endian: 10 x 6 inches at 72 dpi.
    assert_eq!(u32::from_be_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]), 720);
    assert_eq!(u32::from_be_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]), 432);
}

#[test]
fn render_failure_removes_the_reserved_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut namer = OutputNamer::new(dir.path()).expect("namer");
    let artifact = namer
        .reserve(ChartKind::Scatter, Local::now())
        .expect("reserve");
    assert!(artifact.path.exists());

    let mut figure = Figure::new(ChartKind::Scatter);
    figure
        .frame
        .push_circle(CirclePrimitive::new(10.0, 10.0, -1.0, Color::BLACK));

    let err = sink()
        .persist(&figure, &artifact)
        .expect_err("invalid frame must fail");
    assert!(matches!(err, ChartError::Render(_)), "{err:?}");
    assert!(!artifact.path.exists());
}

#[test]
fn unwritable_target_is_a_persistence_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut namer = OutputNamer::new(dir.path()).expect("namer");
    let artifact = namer
        .reserve(ChartKind::Heatmap, Local::now())
        .expect("reserve");
    // A directory squatting on the reserved name cannot be opened as a file.
    fs::remove_file(&artifact.path).expect("remove reservation");
    fs::create_dir(&artifact.path).expect("squat directory");

    let err = sink()
        .persist(&labelled_figure(ChartKind::Heatmap), &artifact)
        .expect_err("directory target must fail");
    assert!(matches!(err, ChartError::Persistence(_)), "{err:?}");
    assert!(artifact.path.is_dir());
}
