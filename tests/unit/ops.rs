use std::path::PathBuf;

use super::*;
use crate::transform::crop::CropAspect;
use crate::transform::resize::{EditedAxis, ResampleFilter};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("rasterkit_ops_{name}_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn job_json_parses_tagged_operations() {
    let json = r##"{
        "input": "in.png",
        "output": "out/result.jpg",
        "quality": 0.8,
        "operations": [
            { "kind": "resize", "params": { "width": 400, "height": 1, "maintain_aspect_ratio": true } },
            { "kind": "crop", "params": { "region": { "x": 0, "y": 0, "width": 50, "height": 50 }, "aspect": "square" } },
            { "kind": "rotate", "params": { "angle_degrees": 90, "flip_horizontal": true } },
            { "kind": "watermark", "params": {
                "source": { "type": "text", "text": "(c) 2024" },
                "position": "top-left"
            } },
            { "kind": "remove_background" }
        ]
    }"##;
    let job = Job::from_reader(json.as_bytes()).unwrap();
    assert_eq!(job.output_format(), OutputFormat::Jpeg);
    assert_eq!(job.quality, Some(0.8));
    assert_eq!(job.operations.len(), 5);
    assert_eq!(
        job.operations[0],
        Operation::Resize(ResizeParams {
            width: 400,
            height: 1,
            maintain_aspect_ratio: true,
            edited: EditedAxis::Width,
            filter: ResampleFilter::Bilinear,
        })
    );
    match &job.operations[1] {
        Operation::Crop(p) => assert_eq!(p.aspect, CropAspect::Square),
        other => panic!("unexpected {other:?}"),
    }
    match &job.operations[3] {
        Operation::Watermark(op) => {
            assert_eq!(op.position, Anchor::TopLeft);
            assert_eq!(op.opacity_percent, 50);
            assert_eq!(
                op.source,
                WatermarkSource::Text {
                    text: "(c) 2024".to_string(),
                    font_size_px: 48.0,
                    color: "#ffffff".to_string(),
                }
            );
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(job.operations[4], Operation::RemoveBackground);
}

#[test]
fn malformed_job_is_a_serde_error() {
    let err = Job::from_reader(&b"{\"input\": 3}"[..]).unwrap_err();
    assert!(matches!(err, RasterkitError::Serde(_)), "{err}");
}

#[test]
fn format_falls_back_to_png() {
    let job = Job {
        input: "a.png".into(),
        output: "b.unknown".into(),
        format: None,
        quality: None,
        operations: Vec::new(),
    };
    assert_eq!(job.output_format(), OutputFormat::Png);
    assert_eq!(format_for_path(Path::new("x.WEBP")), Some(OutputFormat::WebP));
}

#[test]
fn operations_apply_in_order() {
    let fonts = TextRenderer::without_fonts();
    let src = Raster::filled(300, 200, [10, 20, 30, 255]).unwrap();
    let job = Job {
        input: "unused".into(),
        output: "unused.png".into(),
        format: None,
        quality: None,
        operations: vec![
            Operation::Crop(CropParams {
                region: crate::foundation::core::Region::new(0, 0, 120, 80),
                aspect: CropAspect::Free,
            }),
            Operation::Rotate(RotateParams {
                angle_degrees: 90.0,
                ..RotateParams::default()
            }),
        ],
    };
    let out = job.apply(src, &fonts).unwrap();
    assert_eq!(out.dimensions(), (80, 120));
}

#[test]
fn watermark_color_must_be_hex() {
    let op = WatermarkOp {
        source: WatermarkSource::Text {
            text: "x".to_string(),
            font_size_px: 12.0,
            color: "purple-ish".to_string(),
        },
        position: Anchor::Center,
        opacity_percent: 50,
    };
    assert!(op.to_watermark().is_err());
}

#[test]
fn run_writes_output_and_rebases_relative_paths() {
    let dir = scratch_dir("run");
    let src = Raster::filled(40, 30, [200, 100, 50, 255]).unwrap();
    let png = encode(&src, OutputFormat::Png, None).unwrap();
    std::fs::write(dir.join("in.png"), &png).unwrap();
    let job_json = r#"{
        "input": "in.png",
        "output": "nested/out.webp",
        "operations": [
            { "kind": "resize", "params": { "width": 20, "height": 15 } }
        ]
    }"#;
    let job_path = dir.join("job.json");
    std::fs::write(&job_path, job_json).unwrap();

    let job = Job::from_path(&job_path).unwrap();
    assert_eq!(job.input, dir.join("in.png"));
    let report = job.run(&TextRenderer::without_fonts()).unwrap();
    assert_eq!((report.width, report.height), (20, 15));
    assert_eq!(report.format, OutputFormat::WebP);
    assert_eq!(report.input_bytes, png.len() as u64);

    let written = std::fs::read(dir.join("nested/out.webp")).unwrap();
    assert_eq!(written.len() as u64, report.output_bytes);
    let back = decode_image(&written).unwrap();
    assert_eq!(back.dimensions(), (20, 15));
    assert_eq!(back.get_pixel(10, 7), Some([200, 100, 50, 255]));
}

#[test]
fn missing_input_is_reported() {
    let job = Job {
        input: scratch_dir("missing").join("nope.png"),
        output: "never.png".into(),
        format: None,
        quality: None,
        operations: Vec::new(),
    };
    assert!(matches!(
        job.run(&TextRenderer::without_fonts()),
        Err(RasterkitError::Other(_))
    ));
}
