use crate::color::RgbColor;
use crate::decode::{consume_frames, VideoDecoder};
use crate::error::{Result, SwatchError};
use crate::render::{render_png, render_txt};
use crate::slice::SliceClock;
use crate::summarizer::{FrameSummary, SliceSummarizer};
use log::debug;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Throughput report emitted roughly once per second while decoding.
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    /// Frames processed so far.
    pub frames: u64,
    /// Frames per second over the last window.
    pub window_fps: f64,
    /// Frames per second since decoding started.
    pub average_fps: f64,
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} frames processed, {:.0} fps ({:.0} average)", self.frames, self.window_fps, self.average_fps)
    }
}

/// Turns a running frame count into [`Progress`] reports over rolling windows.
#[derive(Debug, Clone)]
pub struct ProgressMeter {
    window: Duration,
    started: Instant,
    window_started: Instant,
    window_frames: u64,
}

impl ProgressMeter {
    pub fn new(started: Instant) -> Self {
        Self::with_window(started, Duration::from_secs(1))
    }

    pub fn with_window(started: Instant, window: Duration) -> Self {
        Self { window, started, window_started: started, window_frames: 0 }
    }

    /// Record that `frames` frames have been processed in total by `now`.
    /// Returns a report once the current window has elapsed.
    pub fn record(&mut self, frames: u64, now: Instant) -> Option<Progress> {
        let window_elapsed = now.saturating_duration_since(self.window_started);
        if window_elapsed <= self.window {
            return None;
        }
        let total_elapsed = now.saturating_duration_since(self.started);
        let progress = Progress {
            frames,
            window_fps: per_second(frames - self.window_frames, window_elapsed),
            average_fps: per_second(frames, total_elapsed),
        };
        self.window_started = now;
        self.window_frames = frames;
        Some(progress)
    }
}

fn per_second(frames: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        frames as f64 / secs
    } else {
        0.0
    }
}

/// Totals for a finished run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunStats {
    pub frames: u64,
    pub elapsed: Duration,
}

impl RunStats {
    pub fn average_fps(&self) -> f64 {
        per_second(self.frames, self.elapsed)
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} frames, {:.1} fps, {:.2?}", self.frames, self.average_fps(), self.elapsed)
    }
}

/// Which files to write once a video has been summarized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputOptions {
    /// PNG strip, one column per second.
    pub png: Option<PathBuf>,
    /// Text file, one `#rrggbb` line per second.
    pub txt: Option<PathBuf>,
}

impl OutputOptions {
    pub fn with_png(mut self, path: impl Into<PathBuf>) -> Self {
        self.png = Some(path.into());
        self
    }

    pub fn with_txt(mut self, path: impl Into<PathBuf>) -> Self {
        self.txt = Some(path.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.png.is_none() && self.txt.is_none()
    }
}

/// The colors of a video, one per second, and how long it took to get them.
#[derive(Debug, Clone, PartialEq)]
pub struct Swatch {
    pub colors: Vec<RgbColor>,
    pub stats: RunStats,
}

impl Swatch {
    /// Write every output requested in `options`.
    pub fn write_outputs(&self, options: &OutputOptions) -> Result<()> {
        if let Some(path) = &options.png {
            let png = render_png(&self.colors)?;
            write_file(path, &png)?;
            debug!("wrote {} bytes of PNG to {}", png.len(), path.display());
        }
        if let Some(path) = &options.txt {
            write_file(path, render_txt(&self.colors).as_bytes())?;
            debug!("wrote {} colors to {}", self.colors.len(), path.display());
        }
        Ok(())
    }
}

fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    fs::write(path, contents).map_err(|source| SwatchError::Output { path: path.to_path_buf(), source })
}

/// Decode every frame from `decoder` and reduce each second of video to one
/// color.
///
/// `on_progress` is called about once per second with throughput figures.
pub fn swatch_video<D, P>(decoder: &mut D, mut on_progress: P) -> Result<Swatch>
where
    D: VideoDecoder,
    P: FnMut(&Progress),
{
    let info = decoder.stream_info();
    debug!(
        "stream {}: {}x{} at {} ({:.3} fps)",
        info.stream_index,
        info.width,
        info.height,
        info.frame_rate,
        info.frame_rate.fps()
    );

    let mut clock = SliceClock::new(info.frame_rate);
    let mut summarizer = SliceSummarizer::new(info.frame_pixels());

    let started = Instant::now();
    let mut meter = ProgressMeter::new(started);

    let frames = consume_frames(decoder, |index, frame| {
        let scan_started = Instant::now();
        let summary = FrameSummary::from_rgb(frame);
        let slice = clock.tick();
        summarizer.add(slice, summary);
        debug!(
            "frame {}: slice {}, {:.3} frames remaining, scan {:?}",
            index,
            slice,
            clock.remaining(),
            scan_started.elapsed()
        );

        if let Some(progress) = meter.record(index + 1, Instant::now()) {
            on_progress(&progress);
        }
        Ok(())
    })?;

    let stats = RunStats { frames, elapsed: started.elapsed() };
    debug!("decoded {} into {} slices", stats, summarizer.slice_count());
    Ok(Swatch { colors: summarizer.finalize(), stats })
}
