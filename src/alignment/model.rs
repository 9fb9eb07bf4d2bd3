use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::foundation::error::{StickcastError, StickcastResult};

/// Status string the aligner attaches to words it could not place in the audio.
pub const NOT_FOUND_IN_AUDIO: &str = "not-found-in-audio";

/// Forced-alignment output: the transcript's words with their phone timings.
///
/// Unknown fields in the aligner JSON are ignored.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Alignment {
    /// Plain transcript the aligner was given, if echoed back.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    /// Words in transcript order.
    #[serde(default)]
    pub words: Vec<AlignedWord>,
}

/// One transcript word as returned by the aligner.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AlignedWord {
    /// Word text as it appears in the transcript.
    pub word: String,
    /// Start time in seconds. Absent when the word could not be aligned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<f64>,
    /// End time in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<f64>,
    /// Aligner status, e.g. `success` or `not-found-in-audio`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case: Option<String>,
    /// Phones in spoken order.
    #[serde(default)]
    pub phones: Vec<AlignedPhone>,
}

/// A single phone inside an aligned word.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AlignedPhone {
    /// Phone symbol, optionally suffixed with `_<position tag>`.
    pub phone: String,
    /// Duration in seconds.
    pub duration: f64,
}

impl AlignedWord {
    /// Return `true` when the aligner flagged this word as missing from the audio.
    pub fn is_not_found_in_audio(&self) -> bool {
        self.case.as_deref() == Some(NOT_FOUND_IN_AUDIO)
    }

    /// Total duration covered by the word's phones.
    pub fn phones_duration(&self) -> f64 {
        self.phones.iter().map(|p| p.duration).sum()
    }
}

impl AlignedPhone {
    /// Phone symbol with the position tag removed (`ah_B` -> `ah`).
    pub fn base_symbol(&self) -> &str {
        match self.phone.split_once('_') {
            Some((base, _)) => base,
            None => &self.phone,
        }
    }
}

impl Alignment {
    /// Parse aligner JSON from a reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> StickcastResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| StickcastError::serde(format!("parse alignment JSON: {e}")))
    }

    /// Parse aligner JSON from a string.
    pub fn from_json_str(s: &str) -> StickcastResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| StickcastError::serde(format!("parse alignment JSON: {e}")))
    }

    /// Parse aligner JSON from a file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> StickcastResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            StickcastError::validation(format!("open alignment JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/alignment/model.rs"]
mod tests;
