use std::path::Path;

use crate::error::ConvertError;

/// Recognized audio containers. Detection is by file extension only; the
/// decoder probes the actual content later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Wav,
    Aiff,
    Flac,
}

impl ContainerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerKind::Wav => "WAV",
            ContainerKind::Aiff => "AIFF",
            ContainerKind::Flac => "FLAC",
        }
    }
}

/// Validates input paths against the recognized container kinds.
///
/// Constructed explicitly and passed by reference; there is no process-wide
/// validator state.
#[derive(Debug, Default)]
pub struct FormatValidator {}

impl FormatValidator {
    pub fn new() -> Self {
        Self {}
    }

    /// Accepts a path whose final component consists only of word, dash and
    /// dot characters and ends, case-insensitively, in a recognized
    /// extension. Anchored at the end of the path.
    pub fn validate(&self, path: &Path) -> Result<ContainerKind, ConvertError> {
        let invalid = || ConvertError::InvalidFileType(path.to_path_buf());

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(invalid)?;

        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        {
            return Err(invalid());
        }

        let (stem, ext) = name.rsplit_once('.').ok_or_else(invalid)?;
        if stem.is_empty() {
            return Err(invalid());
        }

        match ext.to_ascii_lowercase().as_str() {
            "wav" => Ok(ContainerKind::Wav),
            "aiff" => Ok(ContainerKind::Aiff),
            "flac" => Ok(ContainerKind::Flac),
            _ => Err(invalid()),
        }
    }
}
