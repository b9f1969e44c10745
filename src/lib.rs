//! # video-swatch - Video Color Summaries
//!
//! `video-swatch` reduces a video to one representative color per second of
//! playback. The colors can be written as a list of `#rrggbb` lines or as a
//! PNG strip that works as a fingerprint or thumbnail bar for the video.
//!
//! ## Features
//!
//! - Pull-based decode loop that handles decoder backpressure and flushes
//!   buffered frames at end of input
//! - Drift-free one-second slicing for fractional frame rates such as 29.97
//! - Root-mean-square color reduction, so bright pixels are not washed out
//!   by dark ones
//! - Text and PNG output
//! - FFmpeg decoding backend behind the `ffmpeg` cargo feature
//!
//! ## Example
//!
//! ```no_run
//! # #[cfg(feature = "ffmpeg")]
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use video_swatch::{swatch_video, FfmpegDecoder, OutputOptions};
//! use std::path::Path;
//!
//! let mut decoder = FfmpegDecoder::open(Path::new("video.mp4"))?;
//! let swatch = swatch_video(&mut decoder, |progress| println!("{}", progress))?;
//! println!("{}", swatch.stats);
//!
//! let outputs = OutputOptions::default().with_png("video.png").with_txt("video.txt");
//! swatch.write_outputs(&outputs)?;
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "ffmpeg"))]
//! # fn main() {}
//! ```
//!
//! ## Custom decoders
//!
//! Anything that can demux and decode frames into RGB can drive the pipeline
//! by implementing [`VideoDecoder`].

pub mod cli;
pub mod color;
pub mod decode;
pub mod error;
#[cfg(feature = "ffmpeg")]
pub mod ffmpeg;
pub mod pipeline;
pub mod render;
pub mod slice;
pub mod summarizer;

pub use color::{ParseColorError, RgbColor};
pub use decode::{consume_frames, Packet, ReceiveStatus, RgbBuffer, SendStatus, StreamInfo, VideoDecoder};
pub use error::{Result, SwatchError};
#[cfg(feature = "ffmpeg")]
pub use ffmpeg::{FfmpegDecoder, FfmpegPacket};
pub use pipeline::{swatch_video, OutputOptions, Progress, ProgressMeter, RunStats, Swatch};
pub use render::{render_pixels, render_png, render_txt, swatch_height};
pub use slice::{FrameRate, SliceClock};
pub use summarizer::{FrameSummary, SliceSummarizer, DEFAULT_SLICE_ESTIMATE};
