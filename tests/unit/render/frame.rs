use super::*;
use crate::scene::input::StemVolumes;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn canvas() -> Canvas {
    Canvas::new(1280, 720).unwrap()
}

fn plan_for(input: &FrameInput, canvas: Canvas) -> FramePlan {
    let mut rng = StdRng::seed_from_u64(7);
    FrameRenderer::new().render_frame(input, canvas, &mut rng)
}

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-9, "{a} != {b}");
}

#[test]
fn silent_first_frame_places_bodies_at_base_size() {
    let plan = plan_for(&FrameInput::default(), canvas());
    let c = canvas().center();

    for (i, placed) in plan.bodies.iter().enumerate() {
        assert_eq!(placed.size, BODIES[i].base_size);
        assert_eq!(placed.orbit_radius, 70.0 * (i as f64 + 1.0));
    }

    let mercury = plan.body("Mercury").unwrap();
    assert_eq!(mercury.angle_deg, 0.0);
    assert_close(mercury.position.x, c.x + 70.0);
    assert_close(mercury.position.y, c.y);

    let venus = plan.body("Venus").unwrap();
    assert_eq!(venus.angle_deg, 45.0);
    assert_eq!(venus.orbit_radius, 140.0);
    let d = 140.0 * std::f64::consts::FRAC_1_SQRT_2;
    assert_close(venus.position.x, c.x + d);
    assert_close(venus.position.y, c.y + d);
}

#[test]
fn loud_vocal_at_frame_90_points_mercury_south() {
    let input = FrameInput::new("", StemVolumes::new(100.0, 0.0, 0.0, 0.0), 90);
    let plan = plan_for(&input, canvas());
    let c = canvas().center();

    let mercury = plan.body("Mercury").unwrap();
    assert_eq!(mercury.size, 60.0);
    assert_eq!(mercury.angle_deg, 90.0);
    assert_close(mercury.position.x, c.x);
    assert_close(mercury.position.y, c.y + 70.0);

    assert_eq!(plan.body("Venus").unwrap().size, 20.0);
}

#[test]
fn outer_planets_ignore_stem_volumes() {
    let input = FrameInput::new("", StemVolumes::new(100.0, 100.0, 100.0, 100.0), 3);
    let plan = plan_for(&input, canvas());
    for (i, placed) in plan.bodies.iter().enumerate() {
        let expected = if i < 4 {
            BODIES[i].base_size + 50.0
        } else {
            BODIES[i].base_size
        };
        assert_eq!(placed.size, expected, "{}", placed.name);
    }
}

#[test]
fn gradient_endpoints_match_descriptor_colors() {
    for body in BODIES.iter().chain(std::iter::once(&SUN)) {
        let n = body.gradient_steps;
        assert_eq!(gradient_color(body.color_start, body.color_end, 0, n), body.color_start);
        assert_eq!(gradient_color(body.color_start, body.color_end, n, n), body.color_end);
    }
}

#[test]
fn ops_follow_paint_order() {
    let input = FrameInput::new("la la", StemVolumes::default(), 0);
    let plan = plan_for(&input, canvas());
    let ops = &plan.ops;

    assert!(matches!(ops[0], DrawOp::Clear { color } if color == Rgba8::BLACK));

    // Sun: 16 concentric fills shrinking to zero at the center.
    let sun = &ops[1..17];
    let c = canvas().center();
    for (i, op) in sun.iter().enumerate() {
        let DrawOp::FillEllipse { center, width, .. } = op else {
            panic!("sun step {i} is not a fill");
        };
        assert_eq!(*center, c);
        assert_close(*width, 80.0 * (1.0 - i as f64 / 15.0));
    }

    // Stars then dust.
    let particles = &ops[17..17 + STAR_COUNT + DUST_COUNT];
    for (i, op) in particles.iter().enumerate() {
        let DrawOp::FillEllipse {
            center,
            width,
            height,
            color,
        } = op
        else {
            panic!("particle {i} is not a fill");
        };
        assert!(center.x >= 0.0 && center.x < 1280.0);
        assert!(center.y >= 0.0 && center.y < 720.0);
        assert_eq!(width, height);
        if i < STAR_COUNT {
            assert!((1.0..3.0).contains(width));
            assert_eq!(*color, Rgba8::WHITE);
        } else {
            assert!((2.0..5.0).contains(width));
            assert_eq!(color.a, 255);
        }
    }

    let DrawOp::Text {
        text,
        anchor,
        size_px,
        color,
    } = ops.last().unwrap()
    else {
        panic!("last op is not the lyric");
    };
    assert_eq!(text, "la la");
    assert_eq!(*anchor, Point::new(640.0, 670.0));
    assert_eq!(*size_px, 32.0);
    assert_eq!(*color, Rgba8::WHITE);
}

#[test]
fn every_planet_gets_one_dashed_orbit() {
    let plan = plan_for(&FrameInput::default(), canvas());
    let orbits: Vec<f64> = plan
        .ops
        .iter()
        .filter_map(|op| match op {
            DrawOp::StrokeEllipse {
                width,
                dash: Some(d),
                color,
                ..
            } => {
                assert_eq!(*d, DashPattern { dash: 10.0, gap: 5.0 });
                assert_eq!(*color, Rgba8::new(255, 255, 255, 30));
                Some(*width / 2.0)
            }
            _ => None,
        })
        .collect();
    assert_eq!(orbits, [70.0, 140.0, 210.0, 280.0, 350.0, 420.0, 490.0, 560.0]);
}

#[test]
fn ringed_planets_get_ten_tilted_layers() {
    let plan = plan_for(&FrameInput::default(), canvas());
    let saturn = plan.body("Saturn").unwrap().clone();
    let layers: Vec<(f64, f64, f64, u8)> = plan
        .ops
        .iter()
        .filter_map(|op| match op {
            DrawOp::StrokeEllipse {
                center,
                width,
                height,
                rotation_deg,
                color,
                dash: None,
                ..
            } if *center == saturn.position => Some((*width, *height, *rotation_deg, color.a)),
            _ => None,
        })
        .collect();

    assert_eq!(layers.len(), RING_LAYERS as usize);
    for (i, (w, h, rot, a)) in layers.into_iter().enumerate() {
        assert_close(w, 50.0 * 1.2 + i as f64);
        assert_close(h, 50.0 * 1.7 + i as f64);
        assert_eq!(rot, 25.0);
        assert_eq!(a, 80 - 7 * i as u8);
    }

    let unringed = plan
        .ops
        .iter()
        .filter(|op| {
            matches!(op, DrawOp::StrokeEllipse { dash: None, .. })
        })
        .count();
    assert_eq!(unringed, 4 * RING_LAYERS as usize);
}

#[test]
fn empty_lyric_draws_no_text() {
    let plan = plan_for(&FrameInput::default(), canvas());
    assert!(!plan.ops.iter().any(|op| matches!(op, DrawOp::Text { .. })));
}

#[test]
fn negative_volume_passes_through() {
    let input = FrameInput::new("", StemVolumes::new(-100.0, 0.0, 0.0, 0.0), 0);
    let plan = plan_for(&input, canvas());
    assert_eq!(plan.body("Mercury").unwrap().size, -40.0);
}

#[test]
fn resize_recenters_next_frame() {
    let renderer = FrameRenderer::new();
    let mut rng = StdRng::seed_from_u64(1);
    let small = Canvas::new(400, 300).unwrap();
    let large = Canvas::new(1000, 800).unwrap();

    let a = renderer.render_frame(&FrameInput::default(), small, &mut rng);
    let b = renderer.render_frame(&FrameInput::default(), large, &mut rng);

    assert_eq!(a.canvas, small);
    assert_eq!(b.canvas, large);
    assert_close(a.body("Mercury").unwrap().position.x, 200.0 + 70.0);
    assert_close(b.body("Mercury").unwrap().position.x, 500.0 + 70.0);
    let DrawOp::FillEllipse { center, .. } = &b.ops[1] else {
        panic!("sun missing");
    };
    assert_eq!(*center, large.center());
}

#[test]
fn same_seed_same_plan() {
    let input = FrameInput::new("x", StemVolumes::new(10.0, 20.0, 30.0, 40.0), 12);
    assert_eq!(plan_for(&input, canvas()), plan_for(&input, canvas()));
}
