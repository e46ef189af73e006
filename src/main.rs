mod analysis;
mod audio;
mod cli;
mod config;
mod encode;
mod error;
mod format;
mod image;
mod pipeline;

use anyhow::Result;
use clap::Parser;

use cli::Cli;
use config::{
    default_height, default_max_frequency, default_samples_per_window, default_target_duration,
    default_width, AmplitudeMapping, ConversionConfig, TailPolicy,
};
use format::FormatValidator;
use image::grid::GridStatus;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    if !cli.input.exists() {
        anyhow::bail!("Input file not found: {}", cli.input.display());
    }

    let cfg = build_config(&cli);
    cfg.validate()?;

    log::info!("sonogrid - audio to spectral raster");
    log::info!("Input: {}", cli.input.display());
    log::info!("Output: {}", cli.output.display());
    log::info!(
        "Grid: {}x{} px, {} samples/window, {:.1}s target",
        cfg.width,
        cfg.height,
        cfg.samples_per_window,
        cfg.target_duration_secs
    );

    let validator = FormatValidator::new();
    let converted = pipeline::convert(&cli.input, &cfg, &validator)?;

    log::info!(
        "Source: {} ({}, {:.2}s @ {}Hz)",
        converted.asset.path.display(),
        converted.asset.kind.as_str(),
        converted.asset.duration_secs,
        converted.asset.sample_rate
    );
    if let GridStatus::Unfilled { filled } = converted.status {
        log::warn!(
            "Image is incomplete: {} of {} pixels filled",
            filled,
            cfg.windows_per_image()
        );
    }

    encode::png::write_image(&cli.output, &converted.grid)?;

    log::info!("Done! Output: {}", cli.output.display());
    Ok(())
}

fn build_config(cli: &Cli) -> ConversionConfig {
    let config_path = cli.config.clone().or_else(config::detect_config_path);
    let file_cfg = config_path.as_ref().and_then(|path| {
        let loaded = config::load_config(path);
        match loaded {
            Some(_) => log::info!("Loaded config from {}", path.display()),
            None => log::warn!("Failed to load config from {}", path.display()),
        }
        loaded
    });
    merge_config(cli, file_cfg)
}

/// Merge order follows the config file convention: file values apply only
/// where the CLI flag is still at its default.
fn merge_config(cli: &Cli, file_cfg: Option<ConversionConfig>) -> ConversionConfig {
    let mut cfg = ConversionConfig {
        target_duration_secs: cli.duration,
        width: cli.width,
        height: cli.height,
        samples_per_window: cli.window_size,
        max_frequency_hz: cli.max_frequency,
        tail_policy: cli.tail,
        amplitude_mapping: cli.amplitude_mapping,
        ..Default::default()
    };

    if let Some(file_cfg) = file_cfg {
        if cli.width == default_width() {
            cfg.width = file_cfg.width;
        }
        if cli.height == default_height() {
            cfg.height = file_cfg.height;
        }
        if cli.duration == default_target_duration() {
            cfg.target_duration_secs = file_cfg.target_duration_secs;
        }
        if cli.window_size == default_samples_per_window() {
            cfg.samples_per_window = file_cfg.samples_per_window;
        }
        if cli.max_frequency == default_max_frequency() {
            cfg.max_frequency_hz = file_cfg.max_frequency_hz;
        }
        if cli.tail == TailPolicy::default() {
            cfg.tail_policy = file_cfg.tail_policy;
        }
        if cli.amplitude_mapping == AmplitudeMapping::default() {
            cfg.amplitude_mapping = file_cfg.amplitude_mapping;
        }
        cfg.duration_tolerance_secs = file_cfg.duration_tolerance_secs;
    }

    cfg
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_cfg() -> ConversionConfig {
        ConversionConfig {
            width: 64,
            height: 32,
            target_duration_secs: 20.0,
            samples_per_window: 512,
            tail_policy: TailPolicy::ZeroPad,
            ..Default::default()
        }
    }

    #[test]
    fn file_values_apply_at_cli_defaults() {
        let cli = Cli::parse_from(["sonogrid", "in.wav"]);
        let cfg = merge_config(&cli, Some(file_cfg()));
        assert_eq!(cfg.width, 64);
        assert_eq!(cfg.height, 32);
        assert_eq!(cfg.target_duration_secs, 20.0);
        assert_eq!(cfg.samples_per_window, 512);
        assert_eq!(cfg.tail_policy, TailPolicy::ZeroPad);
    }

    #[test]
    fn explicit_cli_flags_win_over_file_values() {
        let cli = Cli::parse_from([
            "sonogrid",
            "in.wav",
            "--width",
            "100",
            "--duration",
            "5",
            "--tail",
            "drop",
        ]);
        let cfg = merge_config(&cli, Some(file_cfg()));
        assert_eq!(cfg.width, 100);
        assert_eq!(cfg.target_duration_secs, 5.0);
        // --tail drop equals the default, so the file value still applies
        assert_eq!(cfg.tail_policy, TailPolicy::ZeroPad);
        // flags left at default still take the file values
        assert_eq!(cfg.height, 32);
        assert_eq!(cfg.samples_per_window, 512);
    }

    #[test]
    fn without_a_file_the_cli_values_stand() {
        let cli = Cli::parse_from(["sonogrid", "in.wav", "--height", "48"]);
        let cfg = merge_config(&cli, None);
        assert_eq!(cfg.height, 48);
        assert_eq!(cfg.width, default_width());
        assert_eq!(cfg.samples_per_window, default_samples_per_window());
    }
}
