use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{FrameIndex, FrameRange};
use crate::foundation::error::{OrreryError, OrreryResult};
use crate::render::backend::{FrameRGBA, RenderBackend};
use crate::render::cpu::{CpuBackend, CpuBackendOpts};
use crate::render::frame::FrameRenderer;
use crate::render::plan::FramePlan;
use crate::scene::track::TrackSheet;
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::mpsc;

const MAX_REORDER_BUFFER_BYTES: u64 = 128 * 1024 * 1024;

/// Options controlling `RenderSession` range rendering behavior.
#[derive(Clone, Debug)]
pub struct RenderSessionOpts {
    /// Enable frame-level parallelism (rayon), using a dedicated thread pool.
    pub parallel: bool,
    /// Frames handed to the worker pool at a time.
    pub chunk_size: usize,
    /// Override the number of rayon worker threads. `None` uses rayon defaults.
    pub threads: Option<usize>,
    /// Bounded channel capacity between render workers and the encoder thread.
    pub channel_capacity: usize,
    /// Pass the track's audio file to the sink.
    pub enable_audio: bool,
}

impl Default for RenderSessionOpts {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 64,
            threads: None,
            channel_capacity: 4,
            enable_audio: true,
        }
    }
}

/// Range render statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Total frames in the requested range.
    pub frames_total: u64,
    /// Frames rendered and delivered to the sink.
    pub frames_rendered: u64,
}

/// Renders frames of a [`TrackSheet`].
///
/// Each frame draws its background particles from an RNG seeded by the session seed and the
/// frame index, so a frame renders to the same pixels regardless of render order or thread.
pub struct RenderSession {
    track: TrackSheet,
    renderer: FrameRenderer,
    backend_opts: CpuBackendOpts,
    backend: CpuBackend,
    seed: u64,
    opts: RenderSessionOpts,
}

impl RenderSession {
    /// Load the track's font (if any) and fix the particle seed.
    #[tracing::instrument(skip_all, fields(duration = track.duration_frames()))]
    pub fn new(track: TrackSheet, opts: RenderSessionOpts) -> OrreryResult<Self> {
        let backend_opts = match track.font_path() {
            Some(path) => CpuBackendOpts::default().with_font_file(path)?,
            None => CpuBackendOpts::default(),
        };
        let seed = track.seed().unwrap_or_else(|| rand::rng().random());
        tracing::debug!(seed, font = backend_opts.has_font(), "render session ready");

        Ok(Self {
            backend: CpuBackend::new(backend_opts.clone()),
            track,
            renderer: FrameRenderer::new(),
            backend_opts,
            seed,
            opts,
        })
    }

    /// The loaded track sheet.
    pub fn track(&self) -> &TrackSheet {
        &self.track
    }

    /// Backend options derived from the track (font bytes).
    pub fn backend_opts(&self) -> &CpuBackendOpts {
        &self.backend_opts
    }

    /// Seed used for background particles.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Build the draw plan for `frame`.
    pub fn plan_frame(&self, frame: FrameIndex) -> OrreryResult<FramePlan> {
        self.check_frame(frame)?;
        Ok(plan_for(&self.track, self.renderer, self.seed, frame))
    }

    /// Render a single frame using the built-in CPU backend.
    pub fn render_frame(&mut self, frame: FrameIndex) -> OrreryResult<FrameRGBA> {
        let plan = self.plan_frame(frame)?;
        self.backend.render_plan(&plan)
    }

    fn timeline(&self) -> FrameRange {
        FrameRange {
            start: FrameIndex(0),
            end: FrameIndex(self.track.duration_frames()),
        }
    }

    fn check_frame(&self, frame: FrameIndex) -> OrreryResult<()> {
        if !self.timeline().contains(frame) {
            return Err(OrreryError::validation(format!(
                "frame {} is outside the track duration ({} frames)",
                frame.0,
                self.track.duration_frames()
            )));
        }
        Ok(())
    }

    /// Render a frame range and stream frames into a sink.
    ///
    /// The sink receives frames in strictly increasing frame index order. When `parallel` is
    /// enabled, out-of-order worker completion is reordered on the encoder thread.
    #[tracing::instrument(skip_all, fields(start = range.start.0, end = range.end.0))]
    pub fn render_range(
        &mut self,
        range: FrameRange,
        sink: &mut dyn FrameSink,
    ) -> OrreryResult<RenderStats> {
        if range.is_empty() {
            return Err(OrreryError::validation(
                "render_range range must be non-empty",
            ));
        }
        let timeline = self.timeline();
        if !timeline.contains(range.start) || range.end.0 > timeline.end.0 {
            return Err(OrreryError::validation(
                "render_range range must be within track duration",
            ));
        }

        let audio = if self.opts.enable_audio {
            self.track.audio_input()
        } else {
            None
        };
        if let Some(a) = audio.as_ref()
            && !a.path.is_file()
        {
            return Err(OrreryError::validation(format!(
                "audio file '{}' not found",
                a.path.display()
            )));
        }

        let canvas = self.track.canvas();
        let cfg = SinkConfig {
            width: canvas.width,
            height: canvas.height,
            fps: self.track.fps(),
            audio,
        };

        let cap = self.opts.channel_capacity.max(1);
        let bytes_per_frame = u64::from(cfg.width)
            .saturating_mul(u64::from(cfg.height))
            .saturating_mul(4)
            .max(1);
        let max_chunk_by_mem = (MAX_REORDER_BUFFER_BYTES / bytes_per_frame).max(1);
        let chunk_size = (self.opts.chunk_size.max(1) as u64)
            .min(max_chunk_by_mem)
            .min(range.len_frames());

        let pool = if self.opts.parallel {
            Some(build_thread_pool(self.opts.threads)?)
        } else {
            None
        };

        std::thread::scope(|scope| -> OrreryResult<RenderStats> {
            let (tx, rx) = mpsc::sync_channel::<FrameMsg>(cap);
            let range_start = range.start.0;
            let range_end = range.end.0;
            let sink_ref: &mut dyn FrameSink = sink;

            let enc = scope.spawn(move || -> OrreryResult<()> {
                sink_ref.begin(cfg)?;
                let mut next = range_start;
                let mut pending = HashMap::<u64, FrameRGBA>::new();
                while next < range_end {
                    if let Some(frame) = pending.remove(&next) {
                        sink_ref.push_frame(FrameIndex(next), &frame)?;
                        next += 1;
                        continue;
                    }
                    let msg = rx.recv().map_err(|_| {
                        OrreryError::encode("encoder channel disconnected before the range ended")
                    })?;
                    pending.insert(msg.idx.0, msg.frame);
                }
                sink_ref.end()
            });

            let mut stats = RenderStats::default();
            let mut produce = || -> OrreryResult<()> {
                let mut chunk_start = range_start;
                while chunk_start < range_end {
                    let chunk_end = (chunk_start + chunk_size).min(range_end);
                    match pool.as_ref() {
                        Some(pool) => {
                            let ctx = ChunkCtx {
                                track: &self.track,
                                renderer: self.renderer,
                                seed: self.seed,
                                backend_opts: &self.backend_opts,
                                pool,
                                tx: &tx,
                            };
                            render_chunk_parallel(&ctx, chunk_start, chunk_end)?;
                        }
                        None => {
                            for f in chunk_start..chunk_end {
                                let idx = FrameIndex(f);
                                let plan = plan_for(&self.track, self.renderer, self.seed, idx);
                                let frame = self.backend.render_plan(&plan)?;
                                send(&tx, idx, frame)?;
                            }
                        }
                    }
                    stats.frames_total += chunk_end - chunk_start;
                    stats.frames_rendered += chunk_end - chunk_start;
                    tracing::trace!(chunk_start, chunk_end, "chunk rendered");
                    chunk_start = chunk_end;
                }
                Ok(())
            };
            let produce_res = produce();

            drop(tx);
            let enc_res = enc
                .join()
                .map_err(|_| OrreryError::encode("encoder thread panicked"))?;

            match produce_res {
                // The sink failed first and dropped the receiver; report the sink's error.
                Err(e) if is_encoder_gone(&e) => {
                    enc_res?;
                    return Err(e);
                }
                Err(e) => return Err(e),
                Ok(()) => enc_res?,
            }
            tracing::debug!(frames = stats.frames_rendered, "range rendered");
            Ok(stats)
        })
    }
}

/// Per-frame particle RNG. Frames with the same seed and index draw the same particles.
pub fn frame_rng(seed: u64, frame_counter: u64) -> StdRng {
    StdRng::seed_from_u64(seed ^ frame_counter.wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

fn plan_for(
    track: &TrackSheet,
    renderer: FrameRenderer,
    seed: u64,
    frame: FrameIndex,
) -> FramePlan {
    let input = track.frame_input(frame);
    let mut rng = frame_rng(seed, input.frame_counter);
    renderer.render_frame(&input, track.canvas(), &mut rng)
}

#[derive(Debug)]
struct FrameMsg {
    idx: FrameIndex,
    frame: FrameRGBA,
}

const ENCODER_GONE: &str = "encoder thread is not accepting frames";

fn send(tx: &mpsc::SyncSender<FrameMsg>, idx: FrameIndex, frame: FrameRGBA) -> OrreryResult<()> {
    tx.send(FrameMsg { idx, frame })
        .map_err(|_| OrreryError::encode(ENCODER_GONE))
}

fn is_encoder_gone(e: &OrreryError) -> bool {
    matches!(e, OrreryError::Encode(msg) if msg == ENCODER_GONE)
}

fn build_thread_pool(threads: Option<usize>) -> OrreryResult<rayon::ThreadPool> {
    if threads == Some(0) {
        return Err(OrreryError::validation(
            "render_range 'threads' must be >= 1 when set",
        ));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| OrreryError::render(format!("failed to build rayon thread pool: {e}")))
}

struct ChunkCtx<'a> {
    track: &'a TrackSheet,
    renderer: FrameRenderer,
    seed: u64,
    backend_opts: &'a CpuBackendOpts,
    pool: &'a rayon::ThreadPool,
    tx: &'a mpsc::SyncSender<FrameMsg>,
}

fn render_chunk_parallel(ctx: &ChunkCtx<'_>, start: u64, end: u64) -> OrreryResult<()> {
    ctx.pool.install(|| {
        (start..end).into_par_iter().try_for_each_init(
            || CpuBackend::new(ctx.backend_opts.clone()),
            |backend, f| -> OrreryResult<()> {
                let idx = FrameIndex(f);
                let plan = plan_for(ctx.track, ctx.renderer, ctx.seed, idx);
                let frame = backend.render_plan(&plan)?;
                send(ctx.tx, idx, frame)
            },
        )
    })
}
