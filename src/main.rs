use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, LevelFilter};
use std::io::Write;
use std::time::Duration;
use video_swatch::cli::Args;
use video_swatch::{swatch_video, FfmpegDecoder};

fn init_logging(debug: bool) {
    let level = if debug { LevelFilter::Debug } else { LevelFilter::Info };
    env_logger::Builder::new()
        .format(|buf, record| {
            let timestamp = buf.timestamp_millis();
            let indent = " ".repeat(timestamp.to_string().len() + 3);
            let message = record.args().to_string().replace('\n', &format!("\n{}", indent));
            writeln!(buf, "[{}] {}", timestamp, message)
        })
        .filter_level(LevelFilter::Warn)
        .filter_module("video_swatch", level)
        .parse_default_env()
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    let outputs = args.outputs();
    if outputs.is_empty() {
        eprintln!("No --output-png or --output-txt given; colors will be computed but not written.");
    }

    let mut decoder = FfmpegDecoder::open(&args.video).with_context(|| format!("opening {}", args.video.display()))?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    if !args.debug {
        spinner.enable_steady_tick(Duration::from_millis(120));
    }
    spinner.set_message("Decoding frames...");

    let swatch = swatch_video(&mut decoder, |progress| {
        if args.debug {
            debug!("{}", progress);
        } else {
            spinner.set_message(progress.to_string());
        }
    })
    .with_context(|| format!("summarizing {}", args.video.display()))?;
    spinner.finish_and_clear();

    println!("{}", swatch.stats);

    swatch
        .write_outputs(&outputs)
        .with_context(|| format!("writing swatch of {}", args.video.display()))?;

    if let Some(path) = &outputs.png {
        println!("Wrote {}", path.display());
    }
    if let Some(path) = &outputs.txt {
        println!("Wrote {}", path.display());
    }

    Ok(())
}
