//! Orrery renders an audio-reactive solar system, one frame at a time.
//!
//! Four separated audio stems (vocal, drum, bass, other) drive the size of the four inner
//! planets while every planet circles a central sun at a fixed angular rate. The current lyric
//! line is overlaid at the bottom of the frame.
//!
//! The public API is layered:
//!
//! - [`FrameRenderer`] turns one [`FrameInput`] into a backend-agnostic [`FramePlan`]
//! - [`CpuBackend`] rasterizes a plan into a [`FrameRGBA`]
//! - [`RenderSession`] drives the frame counter over a [`TrackSheet`] and streams frames into a
//!   [`FrameSink`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Frame sinks (in-memory, PNG sequence, `ffmpeg`).
pub mod encode;
/// Frame planning and rasterization.
pub mod render;
/// Celestial bodies, per-frame inputs, and track sheets.
pub mod scene;
/// Session-oriented rendering API.
pub mod session;

pub use crate::foundation::core::{
    Affine, BezPath, Canvas, Fps, FrameIndex, FrameRange, Point, Rect, Rgb8, Rgba8, Vec2,
};
pub use crate::foundation::error::{OrreryError, OrreryResult};

pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
pub use crate::encode::sink::{
    AudioInputConfig, FrameSink, InMemorySink, PngSequenceSink, SinkConfig,
};
pub use crate::render::backend::{BackendKind, FrameRGBA, RenderBackend, create_backend};
pub use crate::render::cpu::{CpuBackend, CpuBackendOpts};
pub use crate::render::frame::FrameRenderer;
pub use crate::render::plan::{DashPattern, DrawOp, FramePlan, PlacedBody};
pub use crate::scene::bodies::{BODIES, CelestialBodyDescriptor, Rings, SUN};
pub use crate::scene::input::{FrameInput, Stem, StemVolumes};
pub use crate::scene::track::{LyricCue, TrackDef, TrackSheet};
pub use crate::session::render_session::{RenderSession, RenderSessionOpts, RenderStats};
