use std::fmt;

use crate::alignment::model::{AlignedWord, Alignment};
use crate::foundation::error::{StickcastError, StickcastResult};
use crate::foundation::math::quantize_ms;
use crate::foundation::rng::PoseRng;
use crate::schedule::model::{Event, Schedule, Track};
use crate::schedule::phoneme::{MouthClass, Viseme, classify_phone};

/// Punctuation that forces a pose change.
pub const DEFAULT_STOPPERS: [char; 6] = [',', ';', '.', ':', '!', '?'];

/// Emotion names in id order.
pub const DEFAULT_EMOTIONS: [&str; 6] = ["explain", "happy", "sad", "angry", "confused", "rq"];

/// Knobs for [`build_schedule`].
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduleOpts {
    /// Number of body poses per emotion. Must be at least 3.
    pub pose_count: u32,
    /// Emotion tag names; the position is the emotion id.
    pub emotions: Vec<String>,
    /// Emotion id used when a tag names an unknown emotion.
    pub default_emotion: u32,
    /// Punctuation that forces a pose change.
    pub stoppers: Vec<char>,
}

impl Default for ScheduleOpts {
    fn default() -> Self {
        Self {
            pose_count: 5,
            emotions: DEFAULT_EMOTIONS.iter().map(|s| s.to_string()).collect(),
            default_emotion: 0,
            stoppers: DEFAULT_STOPPERS.to_vec(),
        }
    }
}

impl ScheduleOpts {
    /// Reject configurations the builder cannot run with.
    ///
    /// Fewer than three poses would make pose rejection sampling loop forever.
    pub fn validate(&self) -> StickcastResult<()> {
        if self.pose_count < 3 {
            return Err(StickcastError::config(format!(
                "pose_count must be >= 3 (got {})",
                self.pose_count
            )));
        }
        if self.emotions.is_empty() {
            return Err(StickcastError::config("at least one emotion is required"));
        }
        if self.default_emotion as usize >= self.emotions.len() {
            return Err(StickcastError::config(format!(
                "default_emotion {} is out of range for {} emotions",
                self.default_emotion,
                self.emotions.len()
            )));
        }
        Ok(())
    }

    fn emotion_id(&self, name: &str) -> Option<u32> {
        self.emotions
            .iter()
            .position(|e| e == name)
            .map(|i| i as u32)
    }
}

/// Recoverable problem found while building a schedule.
#[derive(Clone, Debug, PartialEq)]
pub enum ScheduleWarning {
    /// An aligned word could not be located in the script after the cursor.
    WordNotFound {
        /// Word text.
        word: String,
        /// Aligned start time.
        time_s: f64,
    },
    /// A word matched inside a tag and could not be located after it.
    WordNotFoundAfterTag {
        /// Word text.
        word: String,
        /// Aligned start time.
        time_s: f64,
    },
    /// A tag named an emotion that is not configured.
    UnknownEmotion {
        /// Tag contents.
        tag: String,
        /// Time the default emotion was applied.
        time_s: f64,
    },
    /// A `<` without a closing `>` inside the consumed text.
    UnclosedTag {
        /// Aligned start time of the word.
        time_s: f64,
    },
}

impl fmt::Display for ScheduleWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleWarning::WordNotFound { word, time_s } => write!(
                f,
                "word '{word}' at {time_s:.2}s not found in script, skipping"
            ),
            ScheduleWarning::WordNotFoundAfterTag { word, time_s } => write!(
                f,
                "word '{word}' at {time_s:.2}s not found after tag, skipping"
            ),
            ScheduleWarning::UnknownEmotion { tag, time_s } => write!(
                f,
                "unknown emotion tag '<{tag}>' at {time_s:.2}s, using default"
            ),
            ScheduleWarning::UnclosedTag { time_s } => {
                write!(f, "unclosed tag before {time_s:.2}s, ignoring")
            }
        }
    }
}

/// Result of [`build_schedule`].
#[derive(Clone, Debug)]
pub struct ScheduleOutput {
    /// The five event tracks.
    pub schedule: Schedule,
    /// Non-fatal problems, in script order.
    pub warnings: Vec<ScheduleWarning>,
}

/// Build the five event tracks from an annotated script and its forced alignment.
///
/// Words are located in `script` in order. Punctuation, tags and line breaks in the text consumed
/// by each word drive the pose, emotion, paragraph and image tracks; the word's phones drive the
/// phoneme track. Unlocatable words and unknown tags are reported as warnings.
#[tracing::instrument(skip_all, fields(words = alignment.words.len()))]
pub fn build_schedule(
    script: &str,
    alignment: &Alignment,
    opts: &ScheduleOpts,
    rng: &mut dyn PoseRng,
) -> StickcastResult<ScheduleOutput> {
    opts.validate()?;

    let mut st = BuilderState::new(opts, rng);
    st.pick_pose(0.0);
    st.push_id(Track::Emotion, 0.0, 0);
    st.push_id(Track::Paragraph, 0.0, 0);
    st.push_id(Track::Image, 0.0, 0);
    st.push_phoneme(0.0, Viseme::M);

    let mut cursor = 0usize;
    for (i, word) in alignment.words.iter().enumerate() {
        let Some(start) = word.start else {
            continue;
        };
        let Some(next) = st.locate_word(script, cursor, word, start) else {
            continue;
        };
        let digest = &script[cursor..next];

        if digest.contains('\n')
            && let Some(prev) = i.checked_sub(1).map(|p| &alignment.words[p])
        {
            st.close_mouth_after(prev);
        }

        let mut picked_pose = false;
        if digest.chars().any(|c| opts.stoppers.contains(&c)) {
            st.pick_pose(start);
            picked_pose = true;
        }

        if let Some(lt) = digest.find('<') {
            match digest[lt..].find('>') {
                Some(gt) => {
                    let tag = digest[lt + 1..lt + gt].trim();
                    let emotion = st.emotion_for_tag(tag, start);
                    st.push_id(Track::Emotion, start, emotion);
                }
                None => st.warn(ScheduleWarning::UnclosedTag { time_s: start }),
            }
        }

        if digest.contains("\n\n") {
            st.paragraph += 1;
            st.push_id(Track::Paragraph, start, st.paragraph);
        }

        if digest.contains('\n') {
            st.image += 1;
            st.push_id(Track::Image, start, st.image);
            // A new image always comes with a new pose.
            if !picked_pose {
                st.pick_pose(start);
            }
        }

        let mut time_at = start;
        for phone in &word.phones {
            let phone_start = time_at;
            time_at += phone.duration;
            match classify_phone(phone.base_symbol()) {
                MouthClass::Single(v) => st.push_phoneme(phone_start, v),
                MouthClass::Glide(a, b) => {
                    st.push_phoneme(phone_start, a);
                    st.push_phoneme(phone_start + phone.duration * 0.5, b);
                }
            }
        }

        cursor = next;
    }

    tracing::debug!(
        poses = st.schedule.poses.len(),
        phonemes = st.schedule.phonemes.len(),
        warnings = st.warnings.len(),
        "schedule built"
    );
    Ok(ScheduleOutput {
        schedule: st.schedule,
        warnings: st.warnings,
    })
}

struct BuilderState<'a> {
    opts: &'a ScheduleOpts,
    rng: &'a mut dyn PoseRng,
    schedule: Schedule,
    warnings: Vec<ScheduleWarning>,
    pose: Option<u32>,
    prev_pose: Option<u32>,
    // Cleared whenever another track changes so the next phone re-emits.
    last_viseme: Option<Viseme>,
    paragraph: u32,
    image: u32,
}

impl<'a> BuilderState<'a> {
    fn new(opts: &'a ScheduleOpts, rng: &'a mut dyn PoseRng) -> Self {
        Self {
            opts,
            rng,
            schedule: Schedule::default(),
            warnings: Vec::new(),
            pose: None,
            prev_pose: None,
            last_viseme: None,
            paragraph: 0,
            image: 0,
        }
    }

    fn warn(&mut self, w: ScheduleWarning) {
        tracing::warn!("{w}");
        self.warnings.push(w);
    }

    /// Byte offset just past the word's next occurrence at or after `cursor`, skipping matches
    /// that end inside a tag.
    fn locate_word(
        &mut self,
        script: &str,
        cursor: usize,
        word: &AlignedWord,
        start: f64,
    ) -> Option<usize> {
        let text = word.word.as_str();
        let Some(mut next) = find_end_from(script, text, cursor) else {
            self.warn(ScheduleWarning::WordNotFound {
                word: text.to_string(),
                time_s: start,
            });
            return None;
        };

        let rest = &script[cursor..];
        if let (Some(lt), Some(gt)) = (rest.find('<'), rest.find('>')) {
            let tag_start = cursor + lt;
            let tag_end = cursor + gt;
            if next > tag_start && tag_end >= next {
                match find_end_from(script, text, tag_end) {
                    Some(n) => next = n,
                    None => {
                        self.warn(ScheduleWarning::WordNotFoundAfterTag {
                            word: text.to_string(),
                            time_s: start,
                        });
                        return None;
                    }
                }
            }
        }
        Some(next)
    }

    fn emotion_for_tag(&mut self, tag: &str, time_s: f64) -> u32 {
        match self.opts.emotion_id(tag) {
            Some(id) => id,
            None => {
                self.warn(ScheduleWarning::UnknownEmotion {
                    tag: tag.to_string(),
                    time_s,
                });
                self.opts.default_emotion
            }
        }
    }

    /// Close an open mouth at the end of `prev` before a visual cut.
    fn close_mouth_after(&mut self, prev: &AlignedWord) {
        if prev.is_not_found_in_audio() {
            return;
        }
        if !self.last_viseme.is_some_and(Viseme::is_open) {
            return;
        }
        let end = prev
            .end
            .or_else(|| prev.start.map(|s| s + prev.phones_duration()));
        if let Some(end) = end {
            self.push_phoneme(end, Viseme::M);
        }
    }

    fn pick_pose(&mut self, time_s: f64) {
        let count = self.opts.pose_count;
        let pose = loop {
            let candidate = ((self.rng.next_f64_01() * f64::from(count)) as u32).min(count - 1);
            if Some(candidate) != self.pose && Some(candidate) != self.prev_pose {
                break candidate;
            }
        };
        self.prev_pose = self.pose;
        self.pose = Some(pose);
        self.push_id(Track::Pose, time_s, pose);
    }

    fn push_id(&mut self, track: Track, time_s: f64, value: u32) {
        if let Some(events) = self.schedule.id_track_mut(track) {
            let time_s = monotonic_time(events.last().map(|e| e.time_s), time_s);
            events.push(Event::new(time_s, value));
        }
        self.last_viseme = None;
    }

    fn push_phoneme(&mut self, time_s: f64, viseme: Viseme) {
        if self.last_viseme == Some(viseme) {
            return;
        }
        let events = &mut self.schedule.phonemes;
        let time_s = monotonic_time(events.last().map(|e| e.time_s), time_s);
        events.push(Event::new(time_s, viseme));
        self.last_viseme = Some(viseme);
    }
}

fn monotonic_time(last: Option<f64>, time_s: f64) -> f64 {
    let t = quantize_ms(time_s);
    match last {
        Some(last) if t < last => last,
        _ => t,
    }
}

fn find_end_from(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    haystack
        .get(from..)?
        .find(needle)
        .map(|i| from + i + needle.len())
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/builder.rs"]
mod tests;
