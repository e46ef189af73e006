use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::ConvertError;

/// A source whose duration has been checked against the target, clipping it
/// to a sibling file when necessary.
#[derive(Debug)]
pub struct NormalizedAudio {
    path: PathBuf,
    pub duration_secs: f64,
    pub clipped: bool,
}

impl NormalizedAudio {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Outcome of comparing a probed duration against the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DurationCheck {
    Passthrough,
    TooShort,
    NeedsClip,
}

fn check_duration(duration: f64, target: f64, tolerance: f64) -> DurationCheck {
    if (duration - target).abs() <= tolerance {
        DurationCheck::Passthrough
    } else if duration < target {
        DurationCheck::TooShort
    } else {
        DurationCheck::NeedsClip
    }
}

/// Acceptance check for the re-probed clip output.
fn clipped_duration_ok(clipped_duration: f64, target: f64, tolerance: f64) -> bool {
    (clipped_duration - target).abs() <= tolerance
}

/// Forces the asset duration to the target: passthrough when equal within
/// tolerance, clip when longer, `TooShort` when shorter. No retries on any
/// branch.
pub fn normalize(
    path: &Path,
    target_secs: f64,
    tolerance_secs: f64,
) -> Result<NormalizedAudio, ConvertError> {
    let duration = probe_duration(path)?;

    match check_duration(duration, target_secs, tolerance_secs) {
        DurationCheck::Passthrough => {
            log::info!("Duration {:.2}s matches target, no clipping needed", duration);
            Ok(NormalizedAudio {
                path: path.to_path_buf(),
                duration_secs: duration,
                clipped: false,
            })
        }
        DurationCheck::TooShort => Err(ConvertError::TooShort {
            actual: duration,
            target: target_secs,
        }),
        DurationCheck::NeedsClip => {
            let clipped = clipped_filename(path, target_secs);
            log::info!(
                "Clipping {:.2}s source to {:.2}s: {}",
                duration,
                target_secs,
                clipped.display()
            );
            clip(path, &clipped, target_secs)?;

            // Re-probe the clipped output to enforce the duration invariant
            let clipped_duration = probe_duration(&clipped)
                .map_err(|e| ConvertError::ClipFailed(format!("clipped output unreadable: {e}")))?;
            if !clipped_duration_ok(clipped_duration, target_secs, tolerance_secs) {
                return Err(ConvertError::ClipFailed(format!(
                    "clipped output is {clipped_duration:.2}s, expected {target_secs:.2}s"
                )));
            }

            Ok(NormalizedAudio {
                path: clipped,
                duration_secs: clipped_duration,
                clipped: true,
            })
        }
    }
}

/// Asks ffprobe for the container duration in seconds.
fn probe_duration(path: &Path) -> Result<f64, ConvertError> {
    let output = Command::new("ffprobe")
        .args([
            "-v", "error",
            "-show_entries", "format=duration",
            "-of", "default=noprint_wrappers=1:nokey=1",
        ])
        .arg(path)
        .output()
        .map_err(|e| ConvertError::ProbeFailed(format!("failed to run ffprobe: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ConvertError::ProbeFailed(stderr.trim().to_string()));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    stdout
        .trim()
        .parse::<f64>()
        .map_err(|_| ConvertError::ProbeFailed(format!("unparseable duration {:?}", stdout.trim())))
}

/// `<basename>-<targetInt>sec.<ext>`, next to the source.
fn clipped_filename(path: &Path, target_secs: f64) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("clipped");
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("wav");
    path.with_file_name(format!("{stem}-{}sec.{ext}", target_secs as i64))
}

fn clip(src: &Path, dst: &Path, target_secs: f64) -> Result<(), ConvertError> {
    let output = Command::new("ffmpeg")
        .arg("-y")
        .arg("-i")
        .arg(src)
        .args(["-t", &format!("{target_secs}")])
        .args(["-c", "copy"])
        .arg(dst)
        .output()
        .map_err(|e| ConvertError::ClipFailed(format!("failed to run ffmpeg: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ConvertError::ClipFailed(stderr.trim().to_string()));
    }

    if !dst.exists() {
        return Err(ConvertError::ClipFailed(format!(
            "ffmpeg produced no output at {}",
            dst.display()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_within_tolerance_passes_through() {
        assert_eq!(check_duration(10.0, 10.0, 0.1), DurationCheck::Passthrough);
        assert_eq!(check_duration(9.95, 10.0, 0.1), DurationCheck::Passthrough);
        assert_eq!(check_duration(10.1, 10.0, 0.1), DurationCheck::Passthrough);
    }

    #[test]
    fn duration_below_target_is_too_short() {
        assert_eq!(check_duration(4.2, 10.0, 0.1), DurationCheck::TooShort);
        assert_eq!(check_duration(9.89, 10.0, 0.1), DurationCheck::TooShort);
    }

    #[test]
    fn duration_above_target_needs_clipping() {
        assert_eq!(check_duration(10.11, 10.0, 0.1), DurationCheck::NeedsClip);
        assert_eq!(check_duration(180.0, 10.0, 0.1), DurationCheck::NeedsClip);
    }

    #[test]
    fn clipped_output_must_land_on_target_within_tolerance() {
        assert!(clipped_duration_ok(10.0, 10.0, 0.1));
        assert!(clipped_duration_ok(10.05, 10.0, 0.1));
        // a clip that came back the wrong length is rejected
        assert!(!clipped_duration_ok(9.5, 10.0, 0.1));
        assert!(!clipped_duration_ok(12.0, 10.0, 0.1));
    }

    #[test]
    fn clipped_filename_appends_target_seconds() {
        let out = clipped_filename(Path::new("takes/track.wav"), 10.0);
        assert_eq!(out, PathBuf::from("takes/track-10sec.wav"));
    }

    #[test]
    fn clipped_filename_truncates_fractional_target() {
        let out = clipped_filename(Path::new("a.flac"), 12.7);
        assert_eq!(out, PathBuf::from("a-12sec.flac"));
    }

    #[test]
    fn clipped_filename_keeps_dotted_stems() {
        let out = clipped_filename(Path::new("mix.v2.aiff"), 5.0);
        assert_eq!(out, PathBuf::from("mix.v2-5sec.aiff"));
    }
}
