use super::*;
use crate::render::frame::FrameRenderer;
use crate::scene::input::{FrameInput, StemVolumes};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::{Duration, Instant};

const FONT_FIXTURE: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/tests/data/fonts/DejaVuSansMono.ttf"
);

fn plan(width: u32, height: u32, ops: Vec<DrawOp>) -> FramePlan {
    FramePlan {
        canvas: Canvas { width, height },
        frame_counter: 0,
        ops,
        bodies: Vec::new(),
    }
}

fn clear() -> DrawOp {
    DrawOp::Clear {
        color: Rgba8::BLACK,
    }
}

fn render(p: &FramePlan) -> FrameRGBA {
    CpuBackend::new(CpuBackendOpts::default())
        .render_plan(p)
        .unwrap()
}

#[test]
fn clear_paints_opaque_black() {
    let frame = render(&plan(16, 8, vec![clear()]));
    assert_eq!(frame.width, 16);
    assert_eq!(frame.height, 8);
    assert!(frame.premultiplied);
    assert_eq!(frame.data.len(), 16 * 8 * 4);
    for px in frame.data.chunks_exact(4) {
        assert_eq!(px, [0, 0, 0, 255]);
    }
}

#[test]
fn fill_ellipse_covers_its_center_only() {
    let frame = render(&plan(
        64,
        64,
        vec![
            clear(),
            DrawOp::FillEllipse {
                center: Point::new(32.0, 32.0),
                width: 20.0,
                height: 20.0,
                color: Rgba8::new(255, 0, 0, 255),
            },
        ],
    ));
    assert_eq!(frame.pixel(32, 32), Some([255, 0, 0, 255]));
    assert_eq!(frame.pixel(0, 0), Some([0, 0, 0, 255]));
    assert_eq!(frame.pixel(32, 50), Some([0, 0, 0, 255]));
    assert_eq!(frame.pixel(64, 0), None);
}

#[test]
fn negative_diameter_paints_like_its_magnitude() {
    let fill = |d: f64| DrawOp::FillEllipse {
        center: Point::new(20.0, 20.0),
        width: d,
        height: d,
        color: Rgba8::WHITE,
    };
    let pos = render(&plan(40, 40, vec![clear(), fill(12.0)]));
    let neg = render(&plan(40, 40, vec![clear(), fill(-12.0)]));
    assert_eq!(pos.data, neg.data);
}

#[test]
fn degenerate_ellipses_paint_nothing() {
    let blank = render(&plan(32, 32, vec![clear()]));
    let degenerate = render(&plan(
        32,
        32,
        vec![
            clear(),
            DrawOp::FillEllipse {
                center: Point::new(16.0, 16.0),
                width: 0.0,
                height: 0.0,
                color: Rgba8::WHITE,
            },
            DrawOp::FillEllipse {
                center: Point::new(16.0, 16.0),
                width: f64::NAN,
                height: 4.0,
                color: Rgba8::WHITE,
            },
        ],
    ));
    assert_eq!(blank.data, degenerate.data);
}

fn ring_coverage(dash: Option<DashPattern>) -> (usize, usize) {
    let frame = render(&plan(
        100,
        100,
        vec![
            clear(),
            DrawOp::StrokeEllipse {
                center: Point::new(50.0, 50.0),
                width: 80.0,
                height: 80.0,
                rotation_deg: 0.0,
                color: Rgba8::WHITE,
                stroke_width: 3.0,
                dash,
            },
        ],
    ));
    let mut lit = 0;
    let mut dark = 0;
    for deg in 0..360 {
        let a = f64::from(deg).to_radians();
        // Pixel (x, y) spans [x, x + 1), so flooring keeps its center within 0.71px of the arc.
        let x = (50.0 + 40.0 * a.cos()).floor() as u32;
        let y = (50.0 + 40.0 * a.sin()).floor() as u32;
        let px = frame.pixel(x, y).unwrap();
        if px[0] > 128 {
            lit += 1;
        } else {
            dark += 1;
        }
    }
    (lit, dark)
}

#[test]
fn solid_stroke_traces_the_whole_circle() {
    let (lit, dark) = ring_coverage(None);
    assert_eq!(dark, 0, "lit={lit}");
}

#[test]
fn dashed_stroke_leaves_gaps() {
    let (lit, dark) = ring_coverage(Some(DashPattern {
        dash: 10.0,
        gap: 5.0,
    }));
    assert!(lit > dark, "lit={lit} dark={dark}");
    assert!(dark > 30, "lit={lit} dark={dark}");
}

#[test]
fn text_without_font_is_skipped() {
    let blank = render(&plan(64, 64, vec![clear()]));
    let with_text = render(&plan(
        64,
        64,
        vec![
            clear(),
            DrawOp::Text {
                text: "hello".to_owned(),
                anchor: Point::new(32.0, 40.0),
                size_px: 32.0,
                color: Rgba8::WHITE,
            },
        ],
    ));
    assert_eq!(blank.data, with_text.data);
}

#[test]
fn rejects_surfaces_outside_u16() {
    let mut backend = CpuBackend::new(CpuBackendOpts::default());
    let too_wide = plan(70_000, 10, vec![clear()]);
    assert!(matches!(
        backend.render_plan(&too_wide),
        Err(OrreryError::Validation(_))
    ));
    let empty = plan(0, 10, vec![clear()]);
    assert!(backend.render_plan(&empty).is_err());
}

#[test]
fn missing_font_file_is_reported() {
    let err = CpuBackendOpts::default()
        .with_font_file("does/not/exist.ttf")
        .unwrap_err();
    assert!(err.to_string().contains("does/not/exist.ttf"));
}

#[test]
fn full_frame_is_opaque_and_reuses_backend_across_sizes() {
    let renderer = FrameRenderer::new();
    let mut rng = StdRng::seed_from_u64(3);
    let mut backend = CpuBackend::new(CpuBackendOpts::default());

    for (w, h) in [(320, 240), (200, 200)] {
        let p = renderer.render_frame(
            &FrameInput::new("unheard", Default::default(), 10),
            Canvas::new(w, h).unwrap(),
            &mut rng,
        );
        let frame = backend.render_plan(&p).unwrap();
        assert_eq!((frame.width, frame.height), (w, h));
        assert!(frame.data.chunks_exact(4).all(|px| px[3] == 255));
    }
}

#[test]
fn translucent_strokes_over_opaque_clear_stay_opaque() {
    let ring = DrawOp::StrokeEllipse {
        center: Point::new(32.0, 32.0),
        width: 40.0,
        height: 40.0,
        rotation_deg: 0.0,
        color: Rgba8::new(255, 255, 255, 30),
        stroke_width: 1.0,
        dash: None,
    };
    let frame = render(&plan(64, 64, vec![clear(), ring.clone()]));
    assert!(frame.data.chunks_exact(4).all(|px| px[3] == 255));
    let lit = frame.data.chunks_exact(4).filter(|px| px[0] > 0).count();
    assert!(lit > 50, "lit={lit}");

    // Without a clear the surface stays transparent where nothing was painted.
    let bare = render(&plan(64, 64, vec![ring]));
    assert_eq!(bare.pixel(0, 0), Some([0, 0, 0, 0]));
}

#[test]
fn extreme_volumes_render_promptly() {
    let renderer = FrameRenderer::new();
    let mut backend = CpuBackend::new(CpuBackendOpts::default());
    for vocal in [1e300, -1e300, 1e15] {
        let p = renderer.render_frame(
            &FrameInput::new("", StemVolumes::new(vocal, 0.0, 0.0, 0.0), 0),
            Canvas::new(320, 240).unwrap(),
            &mut StdRng::seed_from_u64(1),
        );
        let started = Instant::now();
        let frame = backend.render_plan(&p).unwrap();
        assert!(
            started.elapsed() < Duration::from_secs(10),
            "vocal={vocal} took {:?}",
            started.elapsed()
        );
        // Mercury swallows the whole surface.
        let corner = frame.pixel(0, 0).unwrap();
        assert_ne!(corner, [0, 0, 0, 255], "vocal={vocal}");
        assert_eq!(corner[3], 255);
    }
}

#[test]
fn oversized_fill_matches_a_covering_fill() {
    let fill = |d: f64| DrawOp::FillEllipse {
        center: Point::new(10.0, 10.0),
        width: d,
        height: d,
        color: Rgba8::new(0, 200, 0, 255),
    };
    let covering = render(&plan(48, 32, vec![clear(), fill(400.0)]));
    let huge = render(&plan(48, 32, vec![clear(), fill(1e200)]));
    assert_eq!(covering.data, huge.data);
}

#[test]
fn lyric_is_centered_on_its_anchor_and_sits_on_the_baseline() {
    let opts = CpuBackendOpts::default().with_font_file(FONT_FIXTURE).unwrap();
    let mut backend = CpuBackend::new(opts);
    let frame = backend
        .render_plan(&plan(
            400,
            200,
            vec![
                clear(),
                DrawOp::Text {
                    text: "HELLO WORLD".to_owned(),
                    anchor: Point::new(200.0, 150.0),
                    size_px: 32.0,
                    color: Rgba8::WHITE,
                },
            ],
        ))
        .unwrap();

    let (mut min_x, mut max_x, mut min_y, mut max_y) = (u32::MAX, 0, u32::MAX, 0);
    for y in 0..frame.height {
        for x in 0..frame.width {
            if frame.pixel(x, y).unwrap()[0] > 64 {
                min_x = min_x.min(x);
                max_x = max_x.max(x);
                min_y = min_y.min(y);
                max_y = max_y.max(y);
            }
        }
    }
    assert!(min_x < max_x, "no text pixels drawn");

    let mid_x = f64::from(min_x + max_x) / 2.0;
    assert!((mid_x - 200.0).abs() <= 6.0, "x {min_x}..{max_x}");
    // Capitals have no descenders, so ink ends on the baseline row.
    assert!((145..=150).contains(&max_y), "y {min_y}..{max_y}");
    assert!((18..=28).contains(&(max_y - min_y)), "y {min_y}..{max_y}");
    assert!(frame.data.chunks_exact(4).all(|px| px[3] == 255));
}

#[test]
fn lyric_from_a_frame_plan_lands_above_the_bottom_margin() {
    let opts = CpuBackendOpts::default().with_font_file(FONT_FIXTURE).unwrap();
    let mut backend = CpuBackend::new(opts);
    let canvas = Canvas::new(320, 240).unwrap();
    let mut p = FrameRenderer::new().render_frame(
        &FrameInput::new("la la", StemVolumes::default(), 0),
        canvas,
        &mut StdRng::seed_from_u64(2),
    );
    // Keep only the clear and the lyric so nothing else lights up.
    p.ops.retain(|op| matches!(op, DrawOp::Clear { .. } | DrawOp::Text { .. }));
    let frame = backend.render_plan(&p).unwrap();

    let lit_rows: Vec<u32> = (0..canvas.height)
        .filter(|&y| (0..canvas.width).any(|x| frame.pixel(x, y).unwrap()[0] > 64))
        .collect();
    let last = *lit_rows.last().unwrap();
    assert!((canvas.height - 55..=canvas.height - 50).contains(&last), "rows {lit_rows:?}");
}
