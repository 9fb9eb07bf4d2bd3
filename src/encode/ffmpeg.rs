use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::foundation::core::Fps;
use crate::foundation::error::{StickcastError, StickcastResult};

/// Options for [`finish_video`].
#[derive(Clone, Debug)]
pub struct FinishOpts {
    /// Directory holding the `f%06d.png` sequence.
    pub frames_dir: PathBuf,
    /// Narration audio muxed under the frames.
    pub audio: PathBuf,
    /// Output MP4 path.
    pub out_path: PathBuf,
    /// Frame rate of the PNG sequence.
    pub fps: Fps,
    /// Video bitrate passed to `-b:v`.
    pub video_bitrate: String,
}

impl FinishOpts {
    /// Options with the default 4M bitrate.
    pub fn new(
        frames_dir: impl Into<PathBuf>,
        audio: impl Into<PathBuf>,
        out_path: impl Into<PathBuf>,
        fps: Fps,
    ) -> Self {
        Self {
            frames_dir: frames_dir.into(),
            audio: audio.into(),
            out_path: out_path.into(),
            fps,
            video_bitrate: "4M".to_string(),
        }
    }
}

/// Build the ffmpeg command that muxes a PNG sequence with narration audio.
pub fn finish_command(opts: &FinishOpts) -> Command {
    let mut cmd = Command::new("ffmpeg");
    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped());
    cmd.args(["-y", "-loglevel", "error"]);
    // `-r` before `-i` sets the input rate of the image sequence.
    cmd.args(["-r", &format!("{}/{}", opts.fps.num, opts.fps.den)]);
    cmd.args(["-f", "image2", "-i"])
        .arg(opts.frames_dir.join("f%06d.png"));
    cmd.arg("-i").arg(&opts.audio);
    cmd.args([
        "-c:v",
        "libx264",
        "-pix_fmt",
        "yuv420p",
        "-b:v",
        &opts.video_bitrate,
        "-c:a",
        "aac",
        "-shortest",
    ]);
    cmd.arg(&opts.out_path);
    cmd
}

/// Mux a rendered PNG sequence and narration audio into an MP4 with the system `ffmpeg`.
#[tracing::instrument(skip_all, fields(out = %opts.out_path.display()))]
pub fn finish_video(opts: &FinishOpts) -> StickcastResult<()> {
    if !opts.frames_dir.is_dir() {
        return Err(StickcastError::validation(format!(
            "frame directory '{}' does not exist",
            opts.frames_dir.display()
        )));
    }
    if !opts.audio.is_file() {
        return Err(StickcastError::validation(format!(
            "audio file '{}' does not exist",
            opts.audio.display()
        )));
    }
    if !is_ffmpeg_on_path() {
        return Err(StickcastError::evaluation(
            "ffmpeg is required to finish the video, but was not found on PATH",
        ));
    }
    ensure_parent_dir(&opts.out_path)?;

    let output = finish_command(opts).output().map_err(|e| {
        StickcastError::evaluation(format!(
            "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
        ))
    })?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(StickcastError::evaluation(format!(
            "ffmpeg exited with status {}: {}",
            output.status,
            stderr.trim()
        )));
    }
    tracing::info!("video finished");
    Ok(())
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> StickcastResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
