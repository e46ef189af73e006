use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

use crate::analysis::SpectralAnalyzer;
use crate::audio::{decode, duration};
use crate::config::{ConversionConfig, TailPolicy};
use crate::error::ConvertError;
use crate::format::{ContainerKind, FormatValidator};
use crate::image::grid::{GridStatus, ImageAssembler, ImageGrid};
use crate::image::pixel::PixelMapper;

/// Source metadata fixed at ingestion; the sample stream itself is consumed
/// by the conversion and not retained.
#[derive(Debug)]
pub struct SourceAsset {
    pub path: PathBuf,
    pub kind: ContainerKind,
    pub duration_secs: f64,
    pub sample_rate: u32,
}

pub struct ConvertedImage {
    pub asset: SourceAsset,
    pub grid: ImageGrid,
    pub status: GridStatus,
}

/// Runs the whole synchronous pipeline: validate → normalize duration →
/// decode → window → FFT → map → assemble. Stops at the first failure; the
/// caller never sees a partially converted payload.
pub fn convert(
    input: &Path,
    config: &ConversionConfig,
    validator: &FormatValidator,
) -> Result<ConvertedImage, ConvertError> {
    let kind = validator.validate(input)?;
    log::info!("Detected container: {}", kind.as_str());

    let normalized = duration::normalize(
        input,
        config.target_duration_secs,
        config.duration_tolerance_secs,
    )?;
    if normalized.clipped {
        log::info!("Converting clipped copy: {}", normalized.path().display());
    }

    let audio = decode::decode_audio(normalized.path())?;
    let sample_rate = audio.sample_rate;

    let (grid, status) = rasterize(audio.samples, sample_rate, config)?;

    Ok(ConvertedImage {
        asset: SourceAsset {
            path: normalized.path().to_path_buf(),
            kind,
            duration_secs: normalized.duration_secs,
            sample_rate,
        },
        grid,
        status,
    })
}

/// Turns a decoded sample stream into a pixel grid. Consumes the samples in
/// a single pass, one window per pixel in raster order.
pub fn rasterize(
    samples: Vec<f32>,
    sample_rate: u32,
    config: &ConversionConfig,
) -> Result<(ImageGrid, GridStatus), ConvertError> {
    let capacity = config.windows_per_image();
    let expected = expected_windows(samples.len(), config.samples_per_window, config.tail_policy);
    if expected != capacity {
        log::warn!(
            "Sample count yields {} windows but the grid holds {} pixels; \
             the image will not fill exactly",
            expected,
            capacity
        );
    }

    let analyzer = SpectralAnalyzer::new(config.samples_per_window, sample_rate);
    let mapper = PixelMapper::new(config.max_frequency_hz, config.amplitude_mapping);
    let mut assembler = ImageAssembler::new(config.width, config.height);

    let pb = ProgressBar::new(capacity.min(expected.max(1)) as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} windows ({eta} remaining)")
            .unwrap()
            .progress_chars("=>-"),
    );

    for window in crate::audio::windows::windows(
        samples,
        config.samples_per_window,
        config.tail_policy,
    ) {
        let summary = analyzer.analyze(&window);
        let pixel = mapper.map(&summary)?;
        assembler.insert(pixel)?;
        pb.set_position(assembler.filled() as u64);
    }
    pb.finish_and_clear();

    let (grid, status) = assembler.finalize();
    match status {
        GridStatus::Complete => log::info!("Grid complete: {} pixels", capacity),
        GridStatus::Unfilled { filled } => log::warn!(
            "Grid unfilled: {} of {} pixels written, remainder left zeroed",
            filled,
            capacity
        ),
    }

    Ok((grid, status))
}

/// Number of windows the windower will yield for a stream of `len` samples:
/// a zero-padded tail counts as one more window, a dropped tail does not.
fn expected_windows(len: usize, samples_per_window: usize, tail_policy: TailPolicy) -> usize {
    match tail_policy {
        TailPolicy::Drop => len / samples_per_window,
        TailPolicy::ZeroPad => len.div_ceil(samples_per_window),
    }
}
