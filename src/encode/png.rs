use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use std::process::{Child, Command, Output, Stdio};

use crate::image::grid::ImageGrid;

/// Serializes the grid to an image file by piping raw RGB24 into ffmpeg as a
/// single rawvideo frame. The container is inferred from the output
/// extension.
pub fn write_image(output_path: &Path, grid: &ImageGrid) -> Result<()> {
    let child = Command::new("ffmpeg")
        .args([
            "-y",
            "-f", "rawvideo",
            "-pixel_format", "rgb24",
            "-video_size", &format!("{}x{}", grid.width(), grid.height()),
            "-i", "pipe:0",
            "-frames:v", "1",
        ])
        .arg(output_path)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .context("Failed to spawn ffmpeg. Is ffmpeg installed?")?;

    let output = feed_and_wait(child, grid.data())?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("FFmpeg exited with error:\n{}", stderr);
    }

    log::info!("Wrote image: {}", output_path.display());
    Ok(())
}

/// Writes `data` to the child's stdin and waits for it to exit. The child is
/// reaped on every path, including a failed write.
fn feed_and_wait(mut child: Child, data: &[u8]) -> Result<Output> {
    let write_result = match child.stdin.as_mut() {
        Some(stdin) => stdin.write_all(data),
        None => Err(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "child stdin not piped",
        )),
    };

    if let Err(e) = write_result {
        let _ = child.kill();
        let _ = child.wait();
        return Err(anyhow::Error::new(e).context("Failed to write pixels to ffmpeg"));
    }

    // Close stdin to signal EOF
    drop(child.stdin.take());

    child.wait_with_output().context("Failed to wait for ffmpeg")
}
