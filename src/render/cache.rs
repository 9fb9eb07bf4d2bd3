use std::collections::HashMap;

use crate::animation::mouth::MouthShape;
use crate::timeline::state::FrameState;

/// Which parts of a frame state decide whether two frames look the same.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignaturePolicy {
    /// Discrete state only; pose timing is ignored, so a duplicate reuses the representative's
    /// jiggle.
    #[default]
    DiscreteOnly,
    /// Discrete state plus pose timing.
    WithJigglePhase,
}

/// Cache key of a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameSignature {
    /// Paragraph id.
    pub paragraph: u32,
    /// Emotion id.
    pub emotion: u32,
    /// Pose id.
    pub pose: u32,
    /// Mouth shape.
    pub mouth: MouthShape,
    /// Frames since the last pose change, or 0.
    pub since: u64,
    /// Frames until the next pose change, or `Some(0)`.
    pub until: Option<u64>,
}

impl FrameSignature {
    /// Signature of `state` under `policy`.
    pub fn of(state: &FrameState, policy: SignaturePolicy) -> Self {
        let (since, until) = match policy {
            SignaturePolicy::DiscreteOnly => (0, Some(0)),
            SignaturePolicy::WithJigglePhase => (state.since_pose_change, state.until_pose_change),
        };
        Self {
            paragraph: state.paragraph,
            emotion: state.emotion,
            pose: state.pose,
            mouth: state.mouth,
            since,
            until,
        }
    }
}

/// Which frames to render and which to copy.
#[derive(Clone, Debug, Default)]
pub struct FramePlan {
    /// States of the frames that must be rendered, in frame order.
    pub unique: Vec<FrameState>,
    /// For every frame, the index into `unique` of the frame it shows.
    pub frame_to_unique: Vec<usize>,
}

impl FramePlan {
    /// Number of frames covered by the plan.
    pub fn frame_count(&self) -> usize {
        self.frame_to_unique.len()
    }

    /// Whether frame `index` is the first to show its unique frame.
    pub fn is_representative(&self, index: usize) -> bool {
        self.unique
            .get(self.frame_to_unique[index])
            .is_some_and(|s| s.frame.0 as usize == index)
    }
}

/// Group frames by signature. The first frame with a signature becomes its representative.
///
/// With `caching` off every frame is its own representative.
pub fn plan_frames(
    states: impl IntoIterator<Item = FrameState>,
    policy: SignaturePolicy,
    caching: bool,
) -> FramePlan {
    let mut plan = FramePlan::default();
    let mut first = HashMap::<FrameSignature, usize>::new();
    for state in states {
        if !caching {
            plan.frame_to_unique.push(plan.unique.len());
            plan.unique.push(state);
            continue;
        }
        let sig = FrameSignature::of(&state, policy);
        if let Some(existing) = first.get(&sig).copied() {
            plan.frame_to_unique.push(existing);
        } else {
            let slot = plan.unique.len();
            plan.unique.push(state);
            first.insert(sig, slot);
            plan.frame_to_unique.push(slot);
        }
    }
    plan
}

#[cfg(test)]
#[path = "../../tests/unit/render/cache.rs"]
mod tests;
