//! Fixed metadata for the sun and the eight planets.
//!
//! Display order is the order of [`BODIES`]; a body's position in that array is its orbit index,
//! which determines both its orbit radius and its initial angular offset.

use crate::foundation::core::Rgb8;
use crate::foundation::math::map_range;

/// Distance between consecutive orbits, in pixels.
pub const ORBIT_SPACING_PX: f64 = 70.0;
/// Angular offset between consecutive orbit indices, in degrees.
pub const ORBIT_PHASE_DEG: f64 = 45.0;
/// Upper bound of the nominal volume domain.
pub const VOLUME_MAX: f64 = 100.0;
/// Size added to a body at [`VOLUME_MAX`].
pub const VOLUME_GROWTH_PX: f64 = 50.0;

/// Ring system drawn around a planet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rings {
    /// Tilt of the ring ellipses in degrees, clockwise in screen space.
    pub tilt_deg: f64,
}

/// Immutable description of one celestial body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CelestialBodyDescriptor {
    /// Display name.
    pub name: &'static str,
    /// Diameter in pixels at zero volume.
    pub base_size: f64,
    /// Gradient color at the outer edge.
    pub color_start: Rgb8,
    /// Gradient color at the core.
    pub color_end: Rgb8,
    /// Number of gradient steps.
    pub gradient_steps: u32,
    /// Ring system, if the body has one.
    pub rings: Option<Rings>,
}

impl CelestialBodyDescriptor {
    /// Whether the body carries a ring system.
    pub fn has_rings(&self) -> bool {
        self.rings.is_some()
    }

    /// Diameter for a given stem volume.
    ///
    /// Volumes map linearly from `[0, 100]` onto `[0, 50]` extra pixels. Values outside the
    /// nominal domain are not clamped.
    pub fn size_for_volume(&self, volume: f64) -> f64 {
        self.base_size + map_range(volume, 0.0, VOLUME_MAX, 0.0, VOLUME_GROWTH_PX)
    }
}

const fn planet(
    name: &'static str,
    base_size: f64,
    start: [u8; 3],
    end: [u8; 3],
    tilt_deg: Option<f64>,
) -> CelestialBodyDescriptor {
    CelestialBodyDescriptor {
        name,
        base_size,
        color_start: Rgb8::new(start[0], start[1], start[2]),
        color_end: Rgb8::new(end[0], end[1], end[2]),
        gradient_steps: 15,
        rings: match tilt_deg {
            Some(tilt_deg) => Some(Rings { tilt_deg }),
            None => None,
        },
    }
}

/// The central body. Its `base_size` is its fixed diameter.
pub const SUN: CelestialBodyDescriptor =
    planet("Sun", 80.0, [255, 255, 100], [255, 200, 100], None);

/// Planets in display order.
pub static BODIES: [CelestialBodyDescriptor; 8] = [
    planet("Mercury", 10.0, [180, 180, 180], [100, 100, 100], None),
    planet("Venus", 20.0, [255, 230, 200], [200, 150, 100], None),
    planet("Earth", 30.0, [20, 100, 150], [50, 150, 200], None),
    planet("Mars", 25.0, [220, 80, 50], [180, 50, 30], None),
    planet("Jupiter", 60.0, [230, 160, 80], [180, 120, 50], Some(15.0)),
    planet("Saturn", 50.0, [255, 215, 0], [255, 140, 0], Some(25.0)),
    planet("Uranus", 40.0, [140, 200, 250], [100, 150, 200], Some(45.0)),
    planet("Neptune", 35.0, [80, 120, 180], [60, 90, 140], Some(60.0)),
];

/// Look up a planet by name (ASCII case-insensitive).
pub fn body(name: &str) -> Option<&'static CelestialBodyDescriptor> {
    BODIES.iter().find(|b| b.name.eq_ignore_ascii_case(name))
}

/// Orbit index of a planet by name.
pub fn orbit_index(name: &str) -> Option<usize> {
    BODIES.iter().position(|b| b.name.eq_ignore_ascii_case(name))
}

/// Orbit radius for an orbit index: `70 * (index + 1)`.
pub fn orbit_radius(orbit_index: usize) -> f64 {
    ORBIT_SPACING_PX * (orbit_index as f64 + 1.0)
}

/// Orbital angle in degrees, normalized to `[0, 360)`.
///
/// The body advances one degree per frame from an initial offset of `45 * orbit_index`.
pub fn orbit_angle_deg(frame_counter: u64, orbit_index: usize) -> f64 {
    let phase = (orbit_index as u64 % 8) * ORBIT_PHASE_DEG as u64;
    ((frame_counter % 360 + phase) % 360) as f64
}

#[cfg(test)]
#[path = "../../tests/unit/scene/bodies.rs"]
mod tests;
