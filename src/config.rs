use clap::ValueEnum;
use serde::Deserialize;
use std::path::PathBuf;

/// What to do with a trailing run of samples shorter than one window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum TailPolicy {
    /// Discard the partial window.
    #[default]
    Drop,
    /// Extend the partial window with zeros to full length.
    ZeroPad,
}

/// Scaling law for the amplitude channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum AmplitudeMapping {
    /// log10(|a| + 1) scaled so that |a| = 1 lands on 255.
    #[default]
    Log,
    /// round(|a| * 255).
    Linear,
}

/// Single source of truth for every pipeline constant.
#[derive(Debug, Clone, Deserialize)]
pub struct ConversionConfig {
    /// Required source duration in seconds; longer sources are clipped,
    /// shorter ones rejected.
    #[serde(default = "default_target_duration")]
    pub target_duration_secs: f64,
    /// Slack allowed when comparing probed duration against the target.
    #[serde(default = "default_duration_tolerance")]
    pub duration_tolerance_secs: f64,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    /// FFT window length in samples.
    #[serde(default = "default_samples_per_window")]
    pub samples_per_window: usize,
    /// Frequency that maps to channel value 255.
    #[serde(default = "default_max_frequency")]
    pub max_frequency_hz: f32,
    #[serde(default)]
    pub tail_policy: TailPolicy,
    #[serde(default)]
    pub amplitude_mapping: AmplitudeMapping,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            target_duration_secs: default_target_duration(),
            duration_tolerance_secs: default_duration_tolerance(),
            width: default_width(),
            height: default_height(),
            samples_per_window: default_samples_per_window(),
            max_frequency_hz: default_max_frequency(),
            tail_policy: TailPolicy::default(),
            amplitude_mapping: AmplitudeMapping::default(),
        }
    }
}

impl ConversionConfig {
    /// One window per pixel; a complete image consumes exactly this many.
    pub fn windows_per_image(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.width == 0 || self.height == 0 {
            anyhow::bail!("image dimensions must be non-zero");
        }
        if self.samples_per_window == 0 {
            anyhow::bail!("samples_per_window must be non-zero");
        }
        if !(self.max_frequency_hz > 0.0) {
            anyhow::bail!("max_frequency_hz must be positive");
        }
        if !(self.target_duration_secs > 0.0) {
            anyhow::bail!("target_duration_secs must be positive");
        }
        if self.duration_tolerance_secs < 0.0 {
            anyhow::bail!("duration_tolerance_secs must not be negative");
        }
        Ok(())
    }
}

pub fn default_target_duration() -> f64 { 10.0 }
pub fn default_duration_tolerance() -> f64 { 0.1 }
pub fn default_width() -> u32 { 525 }
pub fn default_height() -> u32 { 525 }
pub fn default_samples_per_window() -> usize { 1000 }
pub fn default_max_frequency() -> f32 { 50_000.0 }

pub fn load_config(path: &PathBuf) -> Option<ConversionConfig> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// Auto-detect a config file: `sonogrid.toml` in the working directory, then
/// the platform config dir.
pub fn detect_config_path() -> Option<PathBuf> {
    let local = PathBuf::from("sonogrid.toml");
    if local.exists() {
        return Some(local);
    }
    if let Some(config_dir) = dirs::config_dir() {
        let platform = config_dir.join("sonogrid").join("config.toml");
        if platform.exists() {
            return Some(platform);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_latest_constant_set() {
        let cfg = ConversionConfig::default();
        assert_eq!(cfg.width, 525);
        assert_eq!(cfg.height, 525);
        assert_eq!(cfg.samples_per_window, 1000);
        assert_eq!(cfg.target_duration_secs, 10.0);
        assert_eq!(cfg.max_frequency_hz, 50_000.0);
        assert_eq!(cfg.tail_policy, TailPolicy::Drop);
        assert_eq!(cfg.amplitude_mapping, AmplitudeMapping::Log);
    }

    #[test]
    fn windows_per_image_is_pixel_count() {
        let cfg = ConversionConfig {
            width: 21,
            height: 21,
            ..Default::default()
        };
        assert_eq!(cfg.windows_per_image(), 441);
    }

    #[test]
    fn parses_partial_toml_with_defaults() {
        let cfg: ConversionConfig = toml::from_str(
            "width = 64\nheight = 32\ntail_policy = \"zero_pad\"\namplitude_mapping = \"linear\"\n",
        )
        .unwrap();
        assert_eq!(cfg.width, 64);
        assert_eq!(cfg.height, 32);
        assert_eq!(cfg.tail_policy, TailPolicy::ZeroPad);
        assert_eq!(cfg.amplitude_mapping, AmplitudeMapping::Linear);
        // untouched fields keep their defaults
        assert_eq!(cfg.samples_per_window, 1000);
    }

    #[test]
    fn validate_rejects_zero_dimensions() {
        let cfg = ConversionConfig {
            width: 0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_window() {
        let cfg = ConversionConfig {
            samples_per_window: 0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }
}
