use clap::Parser;
use std::path::PathBuf;

use crate::config::{AmplitudeMapping, TailPolicy};

#[derive(Parser, Debug)]
#[command(name = "sonogrid", about = "Renders an audio recording into a fixed-size spectral raster image")]
pub struct Cli {
    /// Input audio file (WAV, AIFF, FLAC)
    pub input: PathBuf,

    /// Output image file
    #[arg(short, long, default_value = "output.png")]
    pub output: PathBuf,

    /// Config file (TOML); defaults to sonogrid.toml or the platform config dir
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Image width in pixels
    #[arg(long, default_value_t = 525)]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value_t = 525)]
    pub height: u32,

    /// Target audio duration in seconds; longer input is clipped, shorter rejected
    #[arg(long, default_value_t = 10.0)]
    pub duration: f64,

    /// FFT window length in samples
    #[arg(long, default_value_t = 1000)]
    pub window_size: usize,

    /// Frequency (Hz) that maps to the brightest frequency channel value
    #[arg(long, default_value_t = 50_000.0)]
    pub max_frequency: f32,

    /// Policy for a trailing partial window
    #[arg(long, value_enum, default_value_t = TailPolicy::Drop)]
    pub tail: TailPolicy,

    /// Scaling law for the amplitude channel
    #[arg(long, value_enum, default_value_t = AmplitudeMapping::Log)]
    pub amplitude_mapping: AmplitudeMapping,
}
