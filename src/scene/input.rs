use crate::scene::bodies::BODIES;

/// A separated audio stem.
///
/// The first four planets in display order are paired with the stems in [`Stem::ALL`] order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stem {
    /// Vocals, drives Mercury.
    Vocal,
    /// Drums, drives Venus.
    Drum,
    /// Bass, drives Earth.
    Bass,
    /// Everything else, drives Mars.
    Other,
}

impl Stem {
    /// All stems in orbit order.
    pub const ALL: [Stem; 4] = [Stem::Vocal, Stem::Drum, Stem::Bass, Stem::Other];

    /// Stem paired with an orbit index, if any.
    pub fn for_orbit(orbit_index: usize) -> Option<Stem> {
        Self::ALL.get(orbit_index).copied()
    }

    /// Lowercase stem name as used in track sheets.
    pub fn name(self) -> &'static str {
        match self {
            Stem::Vocal => "vocal",
            Stem::Drum => "drum",
            Stem::Bass => "bass",
            Stem::Other => "other",
        }
    }
}

/// Volume per stem for one frame. Nominal range is `0..=100`; values are not clamped.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StemVolumes {
    /// Vocal stem volume.
    pub vocal: f64,
    /// Drum stem volume.
    pub drum: f64,
    /// Bass stem volume.
    pub bass: f64,
    /// Remaining-instruments stem volume.
    pub other: f64,
}

impl StemVolumes {
    /// Construct from the four stem volumes.
    pub fn new(vocal: f64, drum: f64, bass: f64, other: f64) -> Self {
        Self {
            vocal,
            drum,
            bass,
            other,
        }
    }

    /// Volume of one stem.
    pub fn get(&self, stem: Stem) -> f64 {
        match stem {
            Stem::Vocal => self.vocal,
            Stem::Drum => self.drum,
            Stem::Bass => self.bass,
            Stem::Other => self.other,
        }
    }
}

/// Everything the frame renderer needs for one frame, besides the surface size.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameInput {
    /// Lyric line for the current instant; empty draws nothing.
    pub lyric: String,
    /// Stem volumes for the current instant.
    pub volumes: StemVolumes,
    /// Monotonic frame counter owned by the host loop.
    pub frame_counter: u64,
}

impl FrameInput {
    /// Construct a frame input.
    pub fn new(lyric: impl Into<String>, volumes: StemVolumes, frame_counter: u64) -> Self {
        Self {
            lyric: lyric.into(),
            volumes,
            frame_counter,
        }
    }

    /// Volume driving the body at `orbit_index`; bodies without a stem read 0.
    pub fn volume_for_orbit(&self, orbit_index: usize) -> f64 {
        debug_assert!(orbit_index < BODIES.len());
        Stem::for_orbit(orbit_index)
            .map(|s| self.volumes.get(s))
            .unwrap_or(0.0)
    }
}
