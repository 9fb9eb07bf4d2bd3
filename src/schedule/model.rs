use std::fmt;
use std::str::FromStr;

use crate::foundation::error::{StickcastError, StickcastResult};
use crate::schedule::phoneme::Viseme;

/// The five independent event tracks, in artifact section order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Track {
    /// Script paragraph (`\n\n` separated).
    Paragraph,
    /// Character emotion.
    Emotion,
    /// Script line / illustration.
    Image,
    /// Body pose.
    Pose,
    /// Mouth viseme.
    Phoneme,
}

impl Track {
    /// All tracks in artifact section order.
    pub const ALL: [Track; 5] = [
        Track::Paragraph,
        Track::Emotion,
        Track::Image,
        Track::Pose,
        Track::Phoneme,
    ];

    /// Track name used in artifact records.
    pub fn name(self) -> &'static str {
        match self {
            Track::Paragraph => "paragraph",
            Track::Emotion => "emotion",
            Track::Image => "image",
            Track::Pose => "pose",
            Track::Phoneme => "phoneme",
        }
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Track {
    type Err = StickcastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Track::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| StickcastError::validation(format!("unknown track name '{s}'")))
    }
}

/// A timestamped value change on one track.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Event<T> {
    /// Time in seconds, quantized to milliseconds.
    pub time_s: f64,
    /// New track value from this time on.
    pub value: T,
}

impl<T> Event<T> {
    /// Create an event.
    pub fn new(time_s: f64, value: T) -> Self {
        Self { time_s, value }
    }
}

/// Five ordered event tracks produced by the schedule builder.
///
/// Invariants (checked by [`Schedule::validate`]): every track is non-empty, starts at time 0,
/// and has non-decreasing timestamps.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Schedule {
    /// Paragraph ids.
    pub paragraphs: Vec<Event<u32>>,
    /// Emotion ids.
    pub emotions: Vec<Event<u32>>,
    /// Image ids.
    pub images: Vec<Event<u32>>,
    /// Pose ids.
    pub poses: Vec<Event<u32>>,
    /// Visemes, run-length compressed.
    pub phonemes: Vec<Event<Viseme>>,
}

impl Schedule {
    /// Borrow one of the integer-valued tracks. Returns `None` for [`Track::Phoneme`].
    pub fn id_track(&self, track: Track) -> Option<&[Event<u32>]> {
        match track {
            Track::Paragraph => Some(&self.paragraphs),
            Track::Emotion => Some(&self.emotions),
            Track::Image => Some(&self.images),
            Track::Pose => Some(&self.poses),
            Track::Phoneme => None,
        }
    }

    pub(crate) fn id_track_mut(&mut self, track: Track) -> Option<&mut Vec<Event<u32>>> {
        match track {
            Track::Paragraph => Some(&mut self.paragraphs),
            Track::Emotion => Some(&mut self.emotions),
            Track::Image => Some(&mut self.images),
            Track::Pose => Some(&mut self.poses),
            Track::Phoneme => None,
        }
    }

    /// Timestamp of the final phoneme event, which bounds the animation length.
    pub fn last_phoneme_time(&self) -> Option<f64> {
        self.phonemes.last().map(|e| e.time_s)
    }

    /// Check per-track ordering invariants.
    pub fn validate(&self) -> StickcastResult<()> {
        for track in Track::ALL {
            let times: Vec<f64> = match self.id_track(track) {
                Some(events) => events.iter().map(|e| e.time_s).collect(),
                None => self.phonemes.iter().map(|e| e.time_s).collect(),
            };
            validate_times(track, &times)?;
        }
        Ok(())
    }
}

fn validate_times(track: Track, times: &[f64]) -> StickcastResult<()> {
    let Some(&first) = times.first() else {
        return Err(StickcastError::validation(format!(
            "{track} track must not be empty"
        )));
    };
    if first != 0.0 {
        return Err(StickcastError::validation(format!(
            "{track} track must start at time 0 (got {first:.3})"
        )));
    }
    for pair in times.windows(2) {
        if !pair[1].is_finite() || pair[1] < pair[0] {
            return Err(StickcastError::validation(format!(
                "{track} track timestamps must be non-decreasing ({:.3} follows {:.3})",
                pair[1], pair[0]
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/model.rs"]
mod tests;
