use crate::encode::sink::AudioInputConfig;
use crate::foundation::core::{Canvas, Fps, FrameIndex};
use crate::foundation::error::{OrreryError, OrreryResult};
use crate::scene::input::{FrameInput, Stem, StemVolumes};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// JSON-facing track sheet definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrackDef {
    /// Output surface size.
    pub canvas: Canvas,
    /// Frame rate of the volume series and of the output.
    pub fps: Fps,
    /// Duration in frames.
    pub duration: u64,
    /// Seed for the per-frame background particles. Random when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Font file used for lyrics, relative to the sheet's directory.
    #[serde(default)]
    pub font: Option<PathBuf>,
    /// Raw audio muxed into video outputs.
    #[serde(default)]
    pub audio: Option<AudioDef>,
    /// Per-frame stem volumes.
    #[serde(default)]
    pub volumes: VolumeTracks,
    /// Timed lyric lines.
    #[serde(default)]
    pub lyrics: Vec<LyricCue>,
}

/// Raw interleaved `f32le` PCM audio reference.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AudioDef {
    /// PCM file path, relative to the sheet's directory.
    pub path: PathBuf,
    /// Sample rate in Hz.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    /// Interleaved channel count.
    #[serde(default = "default_channels")]
    pub channels: u16,
}

fn default_sample_rate() -> u32 {
    48_000
}

fn default_channels() -> u16 {
    2
}

/// One volume sample per frame and stem. Frames past the end of a series read 0.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VolumeTracks {
    /// Vocal stem series.
    #[serde(default)]
    pub vocal: Vec<f64>,
    /// Drum stem series.
    #[serde(default)]
    pub drum: Vec<f64>,
    /// Bass stem series.
    #[serde(default)]
    pub bass: Vec<f64>,
    /// Remaining-instruments stem series.
    #[serde(default)]
    pub other: Vec<f64>,
}

impl VolumeTracks {
    fn series(&self, stem: Stem) -> &[f64] {
        match stem {
            Stem::Vocal => &self.vocal,
            Stem::Drum => &self.drum,
            Stem::Bass => &self.bass,
            Stem::Other => &self.other,
        }
    }

    fn sample(&self, stem: Stem, frame: u64) -> f64 {
        usize::try_from(frame)
            .ok()
            .and_then(|i| self.series(stem).get(i).copied())
            .unwrap_or(0.0)
    }
}

/// A lyric line shown during `[start, end)` seconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LyricCue {
    /// Inclusive start time in seconds.
    pub start: f64,
    /// Exclusive end time in seconds.
    pub end: f64,
    /// Text to display.
    pub text: String,
}

impl LyricCue {
    fn contains(&self, t: f64) -> bool {
        self.start <= t && t < self.end
    }
}

/// A validated track sheet plus the directory its relative paths resolve against.
#[derive(Clone, Debug)]
pub struct TrackSheet {
    def: TrackDef,
    base_dir: PathBuf,
}

impl TrackSheet {
    /// Parse and validate a track sheet from a JSON reader. Relative paths resolve against the
    /// current directory.
    pub fn from_reader<R: std::io::Read>(r: R) -> OrreryResult<Self> {
        let def: TrackDef = serde_json::from_reader(r)
            .map_err(|e| OrreryError::serde(format!("parse track sheet JSON: {e}")))?;
        Self::from_def(def, ".")
    }

    /// Parse and validate a track sheet from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> OrreryResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            OrreryError::validation(format!("open track sheet '{}': {e}", path.display()))
        })?;
        let def: TrackDef = serde_json::from_reader(BufReader::new(f)).map_err(|e| {
            OrreryError::serde(format!("parse track sheet '{}': {e}", path.display()))
        })?;
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::from_def(def, base_dir)
    }

    /// Wrap an in-memory definition after validating it.
    pub fn from_def(def: TrackDef, base_dir: impl Into<PathBuf>) -> OrreryResult<Self> {
        let sheet = Self {
            def,
            base_dir: base_dir.into(),
        };
        sheet.validate()?;
        Ok(sheet)
    }

    /// Check dimensions, rate, duration, volume samples, and lyric cues.
    pub fn validate(&self) -> OrreryResult<()> {
        let d = &self.def;
        Canvas::new(d.canvas.width, d.canvas.height)?;
        Fps::new(d.fps.num, d.fps.den)?;
        if d.duration == 0 {
            return Err(OrreryError::validation("track duration must be > 0 frames"));
        }
        for stem in Stem::ALL {
            if let Some(i) = d.volumes.series(stem).iter().position(|v| !v.is_finite()) {
                return Err(OrreryError::validation(format!(
                    "volumes.{}[{i}] must be finite",
                    stem.name()
                )));
            }
        }
        for (i, cue) in d.lyrics.iter().enumerate() {
            if !cue.start.is_finite() || !cue.end.is_finite() {
                return Err(OrreryError::validation(format!(
                    "lyrics[{i}] start/end must be finite"
                )));
            }
            if cue.start > cue.end {
                return Err(OrreryError::validation(format!(
                    "lyrics[{i}] start must be <= end"
                )));
            }
        }
        if let Some(audio) = &d.audio
            && (audio.sample_rate == 0 || audio.channels == 0)
        {
            return Err(OrreryError::validation(
                "audio sample_rate and channels must be > 0",
            ));
        }
        Ok(())
    }

    /// Borrow the underlying definition.
    pub fn def(&self) -> &TrackDef {
        &self.def
    }

    /// Output surface size.
    pub fn canvas(&self) -> Canvas {
        self.def.canvas
    }

    /// Frame rate.
    pub fn fps(&self) -> Fps {
        self.def.fps
    }

    /// Duration in frames.
    pub fn duration_frames(&self) -> u64 {
        self.def.duration
    }

    /// Configured particle seed.
    pub fn seed(&self) -> Option<u64> {
        self.def.seed
    }

    /// Lyric font path resolved against the sheet's directory.
    pub fn font_path(&self) -> Option<PathBuf> {
        self.def.font.as_deref().map(|p| self.resolve(p))
    }

    /// Audio input for sinks, resolved against the sheet's directory.
    pub fn audio_input(&self) -> Option<AudioInputConfig> {
        self.def.audio.as_ref().map(|a| AudioInputConfig {
            path: self.resolve(&a.path),
            sample_rate: a.sample_rate,
            channels: a.channels,
        })
    }

    /// Lyric shown at `frame`; the first cue covering the frame's timestamp wins.
    pub fn lyric_at(&self, frame: FrameIndex) -> &str {
        let t = self.def.fps.frames_to_secs(frame.0);
        self.def
            .lyrics
            .iter()
            .find(|c| c.contains(t))
            .map(|c| c.text.as_str())
            .unwrap_or("")
    }

    /// Stem volumes at `frame`.
    pub fn volumes_at(&self, frame: FrameIndex) -> StemVolumes {
        let v = &self.def.volumes;
        StemVolumes {
            vocal: v.sample(Stem::Vocal, frame.0),
            drum: v.sample(Stem::Drum, frame.0),
            bass: v.sample(Stem::Bass, frame.0),
            other: v.sample(Stem::Other, frame.0),
        }
    }

    /// Assemble the renderer input for `frame`. The frame index doubles as the frame counter.
    pub fn frame_input(&self, frame: FrameIndex) -> FrameInput {
        FrameInput::new(self.lyric_at(frame), self.volumes_at(frame), frame.0)
    }

    fn resolve(&self, p: &Path) -> PathBuf {
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.base_dir.join(p)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/track.rs"]
mod tests;
