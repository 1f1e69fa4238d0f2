// clipforge-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Args, Parser, Subcommand};
use clipforge_core::photo::{
    DEFAULT_BRIGHTNESS_PERCENT, DEFAULT_WIDTH, MAX_BRIGHTNESS_PERCENT, MAX_WIDTH, MIN_WIDTH,
};
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Clipforge: export GIFs, trim videos and adjust photos",
    long_about = "Cuts a time range out of a video as a GIF or a stream-copied MP4, or \
                  rescales and brightens a photo, using ffmpeg via clipforge-core."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub globals: GlobalArgs,
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Also write logs to this file (or to a timestamped file inside this directory)
    #[arg(long, global = true, value_name = "LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Base directory for the engine's temporary workspace
    #[arg(long, global = true, value_name = "TEMP_DIR", env = "CLIPFORGE_TEMP_DIR")]
    pub temp_dir: Option<PathBuf>,

    /// Emit lifecycle and progress events as JSON lines on stdout
    #[arg(long, global = true)]
    pub progress_json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Exports a time range of a video as an animated GIF (output.gif)
    Gif(RangeArgs),
    /// Cuts a time range out of a video without re-encoding (output.mp4)
    Trim(RangeArgs),
    /// Rescales a photo and adjusts its brightness (edited_image.png)
    Photo(PhotoArgs),
    /// Prints duration, dimensions and container format of a media file
    Probe(ProbeArgs),
}

/// Where and how the finished artifact is delivered.
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Directory the artifact is saved into
    #[arg(short = 'o', long, value_name = "OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Write the artifact to stdout as a base64 data URL instead of saving it
    #[arg(long)]
    pub data_url: bool,
}

#[derive(Args, Debug, Clone)]
pub struct RangeArgs {
    /// Source video file
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Start of the range, in seconds
    #[arg(short = 's', long, value_name = "SECONDS", allow_negative_numbers = true)]
    pub start: f64,

    /// End of the range, in seconds
    #[arg(short = 'e', long, value_name = "SECONDS", allow_negative_numbers = true)]
    pub end: f64,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone)]
pub struct PhotoArgs {
    /// Source image file
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Brightness in percent (100 leaves the image unchanged)
    #[arg(
        short = 'b',
        long,
        value_name = "PERCENT",
        default_value_t = DEFAULT_BRIGHTNESS_PERCENT,
        value_parser = clap::value_parser!(u16).range(0..=i64::from(MAX_BRIGHTNESS_PERCENT))
    )]
    pub brightness: u16,

    /// Output width in pixels; height follows the aspect ratio
    #[arg(
        short = 'w',
        long,
        value_name = "PIXELS",
        default_value_t = DEFAULT_WIDTH,
        value_parser = clap::value_parser!(u32).range(i64::from(MIN_WIDTH)..=i64::from(MAX_WIDTH))
    )]
    pub width: u32,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone)]
pub struct ProbeArgs {
    /// Media file to inspect
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,
}
