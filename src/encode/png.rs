use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{StickcastError, StickcastResult};
use crate::render::FrameRGBA;

/// Path of frame `idx` inside a PNG sequence directory (`<dir>/f000123.png`).
pub fn frame_path(dir: &Path, idx: FrameIndex) -> PathBuf {
    dir.join(format!("{}.png", idx.file_stem()))
}

/// Write one frame as a straight-alpha PNG.
pub fn write_png(path: &Path, frame: &FrameRGBA) -> StickcastResult<()> {
    crate::encode::ffmpeg::ensure_parent_dir(path)?;
    image::save_buffer_with_format(
        path,
        &frame.to_straight_rgba8(),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

/// Sink that writes `f{index:06}.png` files and copies the file for duplicate frames.
#[derive(Debug)]
pub struct PngSequenceSink {
    out_dir: PathBuf,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
    written: u64,
    copied: u64,
}

impl PngSequenceSink {
    /// Create a sink writing into `out_dir` (created on `begin`).
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            cfg: None,
            last_idx: None,
            written: 0,
            copied: 0,
        }
    }

    /// Output directory.
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Frames encoded so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Frames copied from an earlier file so far.
    pub fn copied(&self) -> u64 {
        self.copied
    }

    fn check_order(&mut self, idx: FrameIndex) -> StickcastResult<()> {
        if self.cfg.is_none() {
            return Err(StickcastError::evaluation("png sink not started"));
        }
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(StickcastError::evaluation(format!(
                "png sink received out-of-order frame {} after {}",
                idx.0, last.0
            )));
        }
        self.last_idx = Some(idx);
        Ok(())
    }
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, cfg: SinkConfig) -> StickcastResult<()> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(StickcastError::validation(
                "png sink width/height must be non-zero",
            ));
        }
        std::fs::create_dir_all(&self.out_dir).with_context(|| {
            format!("failed to create frame directory '{}'", self.out_dir.display())
        })?;
        self.cfg = Some(cfg);
        self.last_idx = None;
        self.written = 0;
        self.copied = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> StickcastResult<()> {
        self.check_order(idx)?;
        if let Some(cfg) = self.cfg
            && (frame.width != cfg.width || frame.height != cfg.height)
        {
            return Err(StickcastError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        write_png(&frame_path(&self.out_dir, idx), frame)?;
        self.written += 1;
        Ok(())
    }

    fn push_duplicate(&mut self, idx: FrameIndex, of: FrameIndex) -> StickcastResult<()> {
        self.check_order(idx)?;
        let from = frame_path(&self.out_dir, of);
        let to = frame_path(&self.out_dir, idx);
        std::fs::copy(&from, &to)
            .with_context(|| format!("copy '{}' to '{}'", from.display(), to.display()))?;
        self.copied += 1;
        Ok(())
    }

    fn end(&mut self) -> StickcastResult<()> {
        if self.cfg.take().is_none() {
            return Err(StickcastError::evaluation("png sink not started"));
        }
        tracing::debug!(
            dir = %self.out_dir.display(),
            written = self.written,
            copied = self.copied,
            "png sequence finished"
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
