//! Text hand-off format between the schedule builder and the timeline compiler.
//!
//! Five sections in [`Track::ALL`] order, separated by a `SECTION` line. Each record is
//! `timestamp,track,value` with the timestamp printed to three decimals.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{StickcastError, StickcastResult};
use crate::schedule::model::{Event, Schedule, Track};
use crate::schedule::phoneme::Viseme;

/// Section delimiter line.
pub const SECTION_DELIMITER: &str = "SECTION";

/// Serialize a schedule to artifact text.
pub fn schedule_to_string(schedule: &Schedule) -> String {
    let mut out = String::new();
    for (i, track) in Track::ALL.into_iter().enumerate() {
        if i > 0 {
            out.push_str(SECTION_DELIMITER);
            out.push('\n');
        }
        match schedule.id_track(track) {
            Some(events) => {
                for e in events {
                    let _ = writeln!(out, "{:.3},{},{}", e.time_s, track, e.value);
                }
            }
            None => {
                for e in &schedule.phonemes {
                    let _ = writeln!(out, "{:.3},{},{}", e.time_s, track, e.value);
                }
            }
        }
    }
    out
}

/// Parse artifact text and check the schedule invariants.
pub fn parse_schedule(text: &str) -> StickcastResult<Schedule> {
    let mut schedule = Schedule::default();
    let mut section = 0usize;

    for (line_no, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if line == SECTION_DELIMITER {
            section += 1;
            if section >= Track::ALL.len() {
                return Err(StickcastError::validation(format!(
                    "schedule line {}: more than {} sections",
                    line_no + 1,
                    Track::ALL.len()
                )));
            }
            continue;
        }

        let expected = Track::ALL[section];
        let mut parts = line.splitn(3, ',');
        let (Some(ts), Some(name), Some(value)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(StickcastError::validation(format!(
                "schedule line {}: expected 'timestamp,track,value', got '{line}'",
                line_no + 1
            )));
        };
        let track: Track = name.trim().parse()?;
        if track != expected {
            return Err(StickcastError::validation(format!(
                "schedule line {}: '{track}' record in the {expected} section",
                line_no + 1
            )));
        }
        let time_s: f64 = ts.trim().parse().map_err(|e| {
            StickcastError::validation(format!(
                "schedule line {}: bad timestamp '{ts}': {e}",
                line_no + 1
            ))
        })?;

        match schedule.id_track_mut(track) {
            Some(events) => {
                let id: u32 = value.trim().parse().map_err(|e| {
                    StickcastError::validation(format!(
                        "schedule line {}: bad {track} value '{value}': {e}",
                        line_no + 1
                    ))
                })?;
                events.push(Event::new(time_s, id));
            }
            None => {
                let viseme: Viseme = value.trim().parse()?;
                schedule.phonemes.push(Event::new(time_s, viseme));
            }
        }
    }

    if section + 1 != Track::ALL.len() {
        return Err(StickcastError::validation(format!(
            "schedule has {} sections, expected {}",
            section + 1,
            Track::ALL.len()
        )));
    }
    schedule.validate()?;
    Ok(schedule)
}

impl Schedule {
    /// Read and validate a schedule artifact from disk.
    pub fn from_path(path: impl AsRef<Path>) -> StickcastResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read schedule '{}'", path.display()))?;
        parse_schedule(&text)
    }

    /// Write this schedule as an artifact file.
    pub fn write_path(&self, path: impl AsRef<Path>) -> StickcastResult<()> {
        let path = path.as_ref();
        crate::encode::ffmpeg::ensure_parent_dir(path)?;
        std::fs::write(path, schedule_to_string(self))
            .with_context(|| format!("write schedule '{}'", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/artifact.rs"]
mod tests;
