use std::path::PathBuf;
use thiserror::Error;

/// Pipeline failure kinds. Every stage returns either a payload or one of
/// these; a failed stage never hands a partial image to the caller.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("unrecognized audio file type: {0} (expected .wav, .aiff or .flac)")]
    InvalidFileType(PathBuf),

    #[error("audio is {actual:.2}s, shorter than the {target:.2}s target")]
    TooShort { actual: f64, target: f64 },

    #[error("duration probe failed: {0}")]
    ProbeFailed(String),

    #[error("clip to target duration failed: {0}")]
    ClipFailed(String),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("average amplitude {0} is outside [-1, 1]")]
    InvalidAmplitude(f32),

    #[error("grid overfilled: audio produced more than {capacity} windows")]
    GridOverfilled { capacity: usize },
}

/// Decoder failures, one kind per collaborator contract breach.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to open audio file: {0}")]
    Open(#[from] std::io::Error),

    #[error("failed to read stream info: {0}")]
    StreamInfo(symphonia::core::errors::Error),

    #[error("no decodable audio track found")]
    TrackNotFound,

    #[error("audio track has no declared sample rate")]
    UnknownSampleRate,

    #[error("failed to open codec: {0}")]
    CodecOpen(symphonia::core::errors::Error),

    #[error("failed to read packet: {0}")]
    Packet(symphonia::core::errors::Error),

    #[error("failed to decode frame: {0}")]
    Frame(symphonia::core::errors::Error),
}
