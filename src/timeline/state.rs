use crate::animation::mouth::MouthShape;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{StickcastError, StickcastResult};
use crate::timeline::compiler::{FrameEvent, Timeline};

/// Everything the renderer needs to know about one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameState {
    /// Frame this state belongs to.
    pub frame: FrameIndex,
    /// Active paragraph id.
    pub paragraph: u32,
    /// Active emotion id.
    pub emotion: u32,
    /// Active image id.
    pub image: u32,
    /// Active pose id within the emotion.
    pub pose: u32,
    /// Mouth shape for this frame.
    pub mouth: MouthShape,
    /// Frames since the active pose started.
    pub since_pose_change: u64,
    /// Frames until the next pose starts, if there is one.
    pub until_pose_change: Option<u64>,
}

/// Index of the last event at or before `frame`.
#[derive(Clone, Copy, Debug, Default)]
struct TrackCursor {
    idx: usize,
}

impl TrackCursor {
    fn advance<T>(&mut self, events: &[FrameEvent<T>], frame: u64) {
        while self.idx + 1 < events.len() && events[self.idx + 1].frame <= frame {
            self.idx += 1;
        }
    }

    fn seek<T>(events: &[FrameEvent<T>], frame: u64) -> Self {
        let past = events.partition_point(|e| e.frame <= frame);
        Self {
            idx: past.saturating_sub(1),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct Cursors {
    paragraph: TrackCursor,
    emotion: TrackCursor,
    image: TrackCursor,
    pose: TrackCursor,
}

impl Timeline {
    /// Iterate frame states in increasing frame order.
    pub fn states(&self) -> FrameStates<'_> {
        FrameStates {
            timeline: self,
            next: 0,
            cursors: Cursors::default(),
        }
    }

    /// Look up a single frame without walking the timeline.
    ///
    /// Returns the same state that [`Timeline::states`] yields for that frame.
    pub fn state_at(&self, frame: FrameIndex) -> StickcastResult<FrameState> {
        if frame.0 >= self.frame_count {
            return Err(StickcastError::validation(format!(
                "frame {} is past the end of the timeline ({} frames)",
                frame.0, self.frame_count
            )));
        }
        let cursors = Cursors {
            paragraph: TrackCursor::seek(&self.paragraphs, frame.0),
            emotion: TrackCursor::seek(&self.emotions, frame.0),
            image: TrackCursor::seek(&self.images, frame.0),
            pose: TrackCursor::seek(&self.poses, frame.0),
        };
        Ok(self.state_with(frame.0, &cursors))
    }

    fn state_with(&self, frame: u64, c: &Cursors) -> FrameState {
        let value = |events: &[FrameEvent<u32>], cur: TrackCursor| {
            events.get(cur.idx).map(|e| e.value).unwrap_or(0)
        };
        let pose_start = self.poses.get(c.pose.idx).map(|e| e.frame).unwrap_or(0);
        let next_pose = self.poses.get(c.pose.idx + 1).map(|e| e.frame);
        FrameState {
            frame: FrameIndex(frame),
            paragraph: value(&self.paragraphs, c.paragraph),
            emotion: value(&self.emotions, c.emotion),
            image: value(&self.images, c.image),
            pose: value(&self.poses, c.pose),
            mouth: self
                .mouth
                .get(frame as usize)
                .copied()
                .unwrap_or(MouthShape::CLOSED),
            since_pose_change: frame.saturating_sub(pose_start),
            until_pose_change: next_pose.map(|n| n.saturating_sub(frame)),
        }
    }
}

/// Sequential frame-state iterator; see [`Timeline::states`].
pub struct FrameStates<'a> {
    timeline: &'a Timeline,
    next: u64,
    cursors: Cursors,
}

impl Iterator for FrameStates<'_> {
    type Item = FrameState;

    fn next(&mut self) -> Option<FrameState> {
        let tl = self.timeline;
        if self.next >= tl.frame_count {
            return None;
        }
        let frame = self.next;
        self.next += 1;

        let c = &mut self.cursors;
        c.paragraph.advance(&tl.paragraphs, frame);
        c.emotion.advance(&tl.emotions, frame);
        c.image.advance(&tl.images, frame);
        c.pose.advance(&tl.poses, frame);
        Some(tl.state_with(frame, &self.cursors))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.timeline.frame_count.saturating_sub(self.next) as usize;
        (left, Some(left))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/state.rs"]
mod tests;
