use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{StickcastError, StickcastResult};
use crate::render::FrameRGBA;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames-per-second.
    pub fps: Fps,
    /// Number of frames that will be pushed.
    pub frame_count: u64,
}

/// Sink contract for consuming rendered frames in timeline order.
///
/// Ordering contract: `push_frame` and `push_duplicate` are called in strictly increasing
/// `FrameIndex` order, and a duplicate only ever refers to a frame that was already pushed with
/// `push_frame`.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> StickcastResult<()>;
    /// Push a freshly rendered frame.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> StickcastResult<()>;
    /// Frame `idx` is byte-identical to the earlier frame `of`.
    fn push_duplicate(&mut self, idx: FrameIndex, of: FrameIndex) -> StickcastResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> StickcastResult<()>;
}

/// In-memory sink for tests and debugging. Duplicates are stored as clones.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    duplicates: u64,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    /// Number of frames that arrived as duplicates.
    pub fn duplicates(&self) -> u64 {
        self.duplicates
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> StickcastResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.duplicates = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> StickcastResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn push_duplicate(&mut self, idx: FrameIndex, of: FrameIndex) -> StickcastResult<()> {
        let frame = self
            .frames
            .iter()
            .rev()
            .find(|(i, _)| *i == of)
            .map(|(_, f)| f.clone())
            .ok_or_else(|| {
                StickcastError::evaluation(format!(
                    "duplicate of frame {} which was never pushed",
                    of.0
                ))
            })?;
        self.frames.push((idx, frame));
        self.duplicates += 1;
        Ok(())
    }

    fn end(&mut self) -> StickcastResult<()> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
