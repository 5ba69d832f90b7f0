//! The per-frame solar system renderer.
//!
//! [`FrameRenderer::render_frame`] paints, in order: a black background, the sun, background
//! stars, cosmic dust, every planet with its orbit path and optional rings, and finally the
//! lyric line. Nothing is cached between frames; every call derives its geometry from the
//! inputs and the surface size it is given.

use crate::foundation::core::{Canvas, Point, Rgb8, Rgba8};
use crate::render::plan::{DashPattern, DrawOp, FramePlan, PlacedBody};
use crate::scene::bodies::{
    BODIES, CelestialBodyDescriptor, SUN, orbit_angle_deg, orbit_radius,
};
use crate::scene::input::FrameInput;
use rand::RngExt;

/// Background stars per frame.
pub const STAR_COUNT: usize = 20;
/// Cosmic-dust particles per frame.
pub const DUST_COUNT: usize = 10;
/// Concentric ellipses per ring system.
pub const RING_LAYERS: u32 = 10;
/// Lyric font size.
pub const LYRIC_SIZE_PX: f32 = 32.0;
/// Distance from the bottom edge to the lyric baseline.
pub const LYRIC_BASELINE_OFFSET_PX: f64 = 50.0;

const STAR_DIAMETER: (f64, f64) = (1.0, 3.0);
const DUST_DIAMETER: (f64, f64) = (2.0, 5.0);

const ORBIT_COLOR: Rgba8 = Rgba8::new(255, 255, 255, 30);
const ORBIT_DASH: DashPattern = DashPattern {
    dash: 10.0,
    gap: 5.0,
};

const RING_COLOR_INNER: Rgba8 = Rgba8::new(255, 255, 255, 80);
const RING_COLOR_OUTER: Rgba8 = Rgba8::new(255, 255, 255, 10);
const RING_WIDTH_SCALE: f64 = 1.2;
const RING_HEIGHT_SCALE: f64 = 1.7;

/// Composes one frame of the visualization into a [`FramePlan`].
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameRenderer;

impl FrameRenderer {
    /// Create a renderer.
    pub fn new() -> Self {
        Self
    }

    /// Paint one complete frame for `input` onto a surface of size `canvas`.
    ///
    /// Background particle positions, sizes, and dust colors are drawn from `rng`. Volumes are
    /// used as given: values outside `0..=100` grow or shrink planets past their nominal range.
    pub fn render_frame<R: RngExt>(
        &self,
        input: &FrameInput,
        canvas: Canvas,
        rng: &mut R,
    ) -> FramePlan {
        let center = canvas.center();
        let mut ops = Vec::with_capacity(256);

        ops.push(DrawOp::Clear {
            color: Rgba8::BLACK,
        });
        push_gradient_ellipse(&mut ops, center, SUN.base_size, &SUN);
        push_stars(&mut ops, canvas, rng);
        push_dust(&mut ops, canvas, rng);

        let mut bodies = Vec::with_capacity(BODIES.len());
        for (orbit_index, body) in BODIES.iter().enumerate() {
            let placed = place_body(
                body,
                orbit_index,
                input.volume_for_orbit(orbit_index),
                input.frame_counter,
                center,
            );
            push_gradient_ellipse(&mut ops, placed.position, placed.size, body);
            push_orbit(&mut ops, center, placed.orbit_radius);
            if let Some(rings) = body.rings {
                push_rings(&mut ops, placed.position, placed.size, rings.tilt_deg);
            }
            bodies.push(placed);
        }

        if !input.lyric.is_empty() {
            ops.push(DrawOp::Text {
                text: input.lyric.clone(),
                anchor: Point::new(
                    f64::from(canvas.width) / 2.0,
                    f64::from(canvas.height) - LYRIC_BASELINE_OFFSET_PX,
                ),
                size_px: LYRIC_SIZE_PX,
                color: Rgba8::WHITE,
            });
        }

        FramePlan {
            canvas,
            frame_counter: input.frame_counter,
            ops,
            bodies,
        }
    }
}

/// Compute where a planet sits this frame and how large it is.
pub fn place_body(
    body: &'static CelestialBodyDescriptor,
    orbit_index: usize,
    volume: f64,
    frame_counter: u64,
    center: Point,
) -> PlacedBody {
    let orbit_radius = orbit_radius(orbit_index);
    let angle_deg = orbit_angle_deg(frame_counter, orbit_index);
    PlacedBody {
        name: body.name,
        orbit_index,
        orbit_radius,
        angle_deg,
        position: screen_position(center, orbit_radius, angle_deg),
        size: body.size_for_volume(volume),
    }
}

/// Polar to screen coordinates. Screen y grows downward, so 90° is due south.
pub fn screen_position(center: Point, radius: f64, angle_deg: f64) -> Point {
    let a = angle_deg.to_radians();
    Point::new(center.x + radius * a.cos(), center.y + radius * a.sin())
}

/// Gradient color at `step` of `steps`. Step 0 is `start`, step `steps` is `end`.
pub fn gradient_color(start: Rgb8, end: Rgb8, step: u32, steps: u32) -> Rgb8 {
    if steps == 0 {
        return start;
    }
    start.lerp(end, f64::from(step) / f64::from(steps))
}

fn push_gradient_ellipse(
    ops: &mut Vec<DrawOp>,
    center: Point,
    size: f64,
    body: &CelestialBodyDescriptor,
) {
    let steps = body.gradient_steps;
    if steps == 0 {
        ops.push(DrawOp::FillEllipse {
            center,
            width: size,
            height: size,
            color: body.color_start.with_alpha(255),
        });
        return;
    }
    for i in 0..=steps {
        let shrink = 1.0 - f64::from(i) / f64::from(steps);
        let d = size * shrink;
        ops.push(DrawOp::FillEllipse {
            center,
            width: d,
            height: d,
            color: gradient_color(body.color_start, body.color_end, i, steps).with_alpha(255),
        });
    }
}

fn push_orbit(ops: &mut Vec<DrawOp>, center: Point, radius: f64) {
    ops.push(DrawOp::StrokeEllipse {
        center,
        width: radius * 2.0,
        height: radius * 2.0,
        rotation_deg: 0.0,
        color: ORBIT_COLOR,
        stroke_width: 1.0,
        dash: Some(ORBIT_DASH),
    });
}

fn push_rings(ops: &mut Vec<DrawOp>, position: Point, size: f64, tilt_deg: f64) {
    let base_w = size * RING_WIDTH_SCALE;
    let base_h = size * RING_HEIGHT_SCALE;
    for i in 0..RING_LAYERS {
        let grow = f64::from(i);
        ops.push(DrawOp::StrokeEllipse {
            center: position,
            width: base_w + grow,
            height: base_h + grow,
            rotation_deg: tilt_deg,
            color: RING_COLOR_INNER.lerp(RING_COLOR_OUTER, grow / f64::from(RING_LAYERS)),
            stroke_width: 1.0,
            dash: None,
        });
    }
}

fn push_stars<R: RngExt>(ops: &mut Vec<DrawOp>, canvas: Canvas, rng: &mut R) {
    for _ in 0..STAR_COUNT {
        let center = random_point(canvas, rng);
        let d = rng.random_range(STAR_DIAMETER.0..STAR_DIAMETER.1);
        ops.push(DrawOp::FillEllipse {
            center,
            width: d,
            height: d,
            color: Rgba8::WHITE,
        });
    }
}

fn push_dust<R: RngExt>(ops: &mut Vec<DrawOp>, canvas: Canvas, rng: &mut R) {
    for _ in 0..DUST_COUNT {
        let center = random_point(canvas, rng);
        let d = rng.random_range(DUST_DIAMETER.0..DUST_DIAMETER.1);
        let color = Rgba8::new(
            random_channel(rng),
            random_channel(rng),
            random_channel(rng),
            255,
        );
        ops.push(DrawOp::FillEllipse {
            center,
            width: d,
            height: d,
            color,
        });
    }
}

fn random_point<R: RngExt>(canvas: Canvas, rng: &mut R) -> Point {
    Point::new(
        random_below(rng, f64::from(canvas.width)),
        random_below(rng, f64::from(canvas.height)),
    )
}

fn random_below<R: RngExt>(rng: &mut R, hi: f64) -> f64 {
    if hi > 0.0 {
        rng.random_range(0.0..hi)
    } else {
        0.0
    }
}

fn random_channel<R: RngExt>(rng: &mut R) -> u8 {
    rng.random_range(0.0..255.0f64).round() as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
