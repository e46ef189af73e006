use crate::analysis::SpectralSummary;
use crate::config::AmplitudeMapping;
use crate::error::ConvertError;

/// Keeps log10 defined at zero amplitude and puts |a| = 1 exactly at
/// full scale once divided by log10(2).
const LOG_EPSILON: f32 = 1.0;

/// Two 8-bit channel values derived from one window's spectral summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelValue {
    pub frequency: u8,
    pub amplitude: u8,
}

/// Normalizes and clamps a [`SpectralSummary`] into channel values: linear
/// for frequency, log or linear for amplitude per configuration.
pub struct PixelMapper {
    max_frequency_hz: f32,
    amplitude_mapping: AmplitudeMapping,
}

impl PixelMapper {
    pub fn new(max_frequency_hz: f32, amplitude_mapping: AmplitudeMapping) -> Self {
        debug_assert!(max_frequency_hz > 0.0);
        Self {
            max_frequency_hz,
            amplitude_mapping,
        }
    }

    pub fn map(&self, summary: &SpectralSummary) -> Result<PixelValue, ConvertError> {
        let amplitude = summary.average_amplitude;
        // Validity gate before any transformation; NaN fails the range check
        if !(-1.0..=1.0).contains(&amplitude) {
            return Err(ConvertError::InvalidAmplitude(amplitude));
        }

        let frequency = (summary.average_frequency_hz / self.max_frequency_hz * 255.0)
            .round()
            .clamp(0.0, 255.0) as u8;

        let magnitude = amplitude.clamp(-1.0, 1.0).abs();
        let amplitude = match self.amplitude_mapping {
            AmplitudeMapping::Log => ((magnitude + LOG_EPSILON).log10() * (255.0 / 2.0f32.log10()))
                .round()
                .clamp(0.0, 255.0) as u8,
            AmplitudeMapping::Linear => (magnitude * 255.0).round().clamp(0.0, 255.0) as u8,
        };

        Ok(PixelValue {
            frequency,
            amplitude,
        })
    }
}
