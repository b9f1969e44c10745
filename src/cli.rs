//! Command-line arguments for the `video-swatch` binary.

use crate::pipeline::OutputOptions;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "video-swatch", version, about = "Summarize a video as one color per second.")]
pub struct Args {
    /// Input video file
    #[arg(value_name = "VIDEO")]
    pub video: PathBuf,

    /// Write the swatch as a PNG strip
    #[arg(long, value_name = "FILE")]
    pub output_png: Option<PathBuf>,

    /// Write the swatch as #rrggbb lines
    #[arg(long, value_name = "FILE")]
    pub output_txt: Option<PathBuf>,

    /// Log per-frame timing and slice state
    #[arg(long, default_value_t = false)]
    pub debug: bool,
}

impl Args {
    /// Output files requested on the command line.
    pub fn outputs(&self) -> OutputOptions {
        OutputOptions { png: self.output_png.clone(), txt: self.output_txt.clone() }
    }
}
