use crate::animation::mouth::{MouthShape, mouth_curve};
use crate::foundation::core::Fps;
use crate::foundation::error::{StickcastError, StickcastResult};
use crate::schedule::model::{Event, Schedule};
use crate::schedule::phoneme::Viseme;

/// Frame conversion settings.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimelineOpts {
    /// Output frame rate.
    pub fps: Fps,
    /// Frames subtracted from every event so the mouth moves slightly ahead of the audio.
    pub lead_frames: u64,
}

impl Default for TimelineOpts {
    fn default() -> Self {
        Self {
            fps: Fps::default(),
            lead_frames: 2,
        }
    }
}

impl TimelineOpts {
    /// `max(0, floor(t * fps) - lead_frames)`.
    pub fn timestep_to_frames(&self, time_s: f64) -> u64 {
        self.fps
            .secs_to_frames_floor(time_s)
            .saturating_sub(self.lead_frames)
    }
}

/// A track event converted to frame space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameEvent<T> {
    /// First frame showing `value`.
    pub frame: u64,
    /// Track value.
    pub value: T,
}

/// A schedule compiled to frame space, with the per-frame mouth curve.
#[derive(Clone, Debug)]
pub struct Timeline {
    pub(crate) opts: TimelineOpts,
    pub(crate) frame_count: u64,
    pub(crate) paragraphs: Vec<FrameEvent<u32>>,
    pub(crate) emotions: Vec<FrameEvent<u32>>,
    pub(crate) images: Vec<FrameEvent<u32>>,
    pub(crate) poses: Vec<FrameEvent<u32>>,
    pub(crate) phonemes: Vec<FrameEvent<Viseme>>,
    pub(crate) mouth: Vec<MouthShape>,
}

impl Timeline {
    /// Total number of frames.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Options the timeline was compiled with.
    pub fn opts(&self) -> TimelineOpts {
        self.opts
    }

    /// Phoneme boundaries after collision resolution; frames are strictly increasing.
    pub fn phoneme_frames(&self) -> &[FrameEvent<Viseme>] {
        &self.phonemes
    }

    /// Pose changes in frame space.
    pub fn pose_frames(&self) -> &[FrameEvent<u32>] {
        &self.poses
    }

    /// Mouth shape for every frame.
    pub fn mouth_curve(&self) -> &[MouthShape] {
        &self.mouth
    }
}

/// Compile a validated schedule into frame space.
///
/// The frame count is one second past the last phoneme event. Phoneme events that land on the
/// same frame are spread apart so every phoneme gets at least one frame.
#[tracing::instrument(skip_all)]
pub fn compile_timeline(schedule: &Schedule, opts: TimelineOpts) -> StickcastResult<Timeline> {
    schedule.validate()?;
    let last = schedule
        .last_phoneme_time()
        .ok_or_else(|| StickcastError::validation("schedule has no phoneme events"))?;
    let frame_count = opts.timestep_to_frames(last + 1.0);

    let to_frames = |events: &[Event<u32>]| -> Vec<FrameEvent<u32>> {
        events
            .iter()
            .map(|e| FrameEvent {
                frame: opts.timestep_to_frames(e.time_s),
                value: e.value,
            })
            .collect()
    };

    let phonemes = resolve_phoneme_frames(
        schedule
            .phonemes
            .iter()
            .map(|e| (opts.timestep_to_frames(e.time_s), e.value)),
    );
    let mouth = mouth_curve(&phonemes, frame_count);

    tracing::debug!(
        frame_count,
        phonemes = phonemes.len(),
        "timeline compiled"
    );
    Ok(Timeline {
        opts,
        frame_count,
        paragraphs: to_frames(&schedule.paragraphs),
        emotions: to_frames(&schedule.emotions),
        images: to_frames(&schedule.images),
        poses: to_frames(&schedule.poses),
        phonemes,
        mouth,
    })
}

/// Make phoneme frames strictly increasing without dropping events.
///
/// On a collision the earlier event moves back to `frame - 1` if that keeps it after the event
/// before it; otherwise the current event moves to one past the earlier one.
pub(crate) fn resolve_phoneme_frames(
    raw: impl IntoIterator<Item = (u64, Viseme)>,
) -> Vec<FrameEvent<Viseme>> {
    let mut out: Vec<FrameEvent<Viseme>> = Vec::new();
    for (mut frame, value) in raw {
        if let Some(prev) = out.last().map(|e| e.frame)
            && frame <= prev
        {
            let n = out.len();
            let can_shift_back = n >= 2 && frame >= 2 && out[n - 2].frame <= frame - 2;
            if can_shift_back {
                out[n - 1].frame = frame - 1;
            } else {
                frame = prev + 1;
            }
        }
        out.push(FrameEvent { frame, value });
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/compiler.rs"]
mod tests;
