use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::animation::jiggle::JiggleParams;
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{StickcastError, StickcastResult};
use crate::schedule::builder::{DEFAULT_EMOTIONS, DEFAULT_STOPPERS, ScheduleOpts};
use crate::timeline::compiler::TimelineOpts;

/// One emotion of the character.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EmotionConfig {
    /// Tag name used in scripts (`<happy>`).
    pub name: String,
    /// Negative emotions use the second mouth set.
    #[serde(default)]
    pub negative: bool,
}

fn default_emotions() -> Vec<EmotionConfig> {
    // explain, happy, sad, angry, confused, rq
    const NEGATIVE: [bool; 6] = [false, false, true, true, true, false];
    DEFAULT_EMOTIONS
        .iter()
        .zip(NEGATIVE)
        .map(|(name, negative)| EmotionConfig {
            name: name.to_string(),
            negative,
        })
        .collect()
}

/// Character rig: asset layout, emotion table, canvas and timing constants.
///
/// Every field has a default matching the stock stick-figure character, so `{}` is a valid rig.
/// Relative paths are resolved against the directory of the rig file.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RigConfig {
    /// Output frame rate.
    pub fps: Fps,
    /// Frames the animation runs ahead of the audio.
    pub lead_frames: u64,
    /// Output canvas.
    pub canvas: Canvas,
    /// Body poses per emotion.
    pub pose_count: u32,
    /// Emotions in id order.
    pub emotions: Vec<EmotionConfig>,
    /// Emotion id used for unknown tags.
    pub default_emotion: u32,
    /// Punctuation that forces a pose change.
    pub stoppers: Vec<char>,
    /// Mouth bitmaps per polarity.
    pub mouth_shape_count: u32,
    /// Directory holding `pose0001.png`...
    pub poses_dir: PathBuf,
    /// Directory holding `mouth0001.png`...
    pub mouths_dir: PathBuf,
    /// Optional background bitmap; `background_rgba` fills the canvas otherwise.
    pub background: Option<PathBuf>,
    /// Straight-alpha background color.
    pub background_rgba: [u8; 4],
    /// Mouth geometry CSV.
    pub geometry: PathBuf,
    /// Multiplier applied to geometry anchors.
    pub geometry_scale: f64,
    /// Body jiggle constants.
    pub jiggle: JiggleParams,
    #[serde(skip)]
    pub(crate) root: PathBuf,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            fps: Fps::default(),
            lead_frames: 2,
            canvas: Canvas::default(),
            pose_count: 5,
            emotions: default_emotions(),
            default_emotion: 0,
            stoppers: DEFAULT_STOPPERS.to_vec(),
            mouth_shape_count: 11,
            poses_dir: PathBuf::from("poses"),
            mouths_dir: PathBuf::from("mouths"),
            background: None,
            background_rgba: [255, 255, 255, 255],
            geometry: PathBuf::from("mouthCoordinates.csv"),
            geometry_scale: 3.0,
            jiggle: JiggleParams::default(),
            root: PathBuf::new(),
        }
    }
}

impl RigConfig {
    /// Parse a rig from JSON. Relative paths resolve against the current directory.
    pub fn from_reader<R: std::io::Read>(r: R) -> StickcastResult<Self> {
        let rig: Self = serde_json::from_reader(r)
            .map_err(|e| StickcastError::serde(format!("parse rig JSON: {e}")))?;
        rig.validate()?;
        Ok(rig)
    }

    /// Load a rig file. Relative paths resolve against its directory.
    pub fn from_path(path: impl AsRef<Path>) -> StickcastResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            StickcastError::config(format!("open rig '{}': {e}", path.display()))
        })?;
        let mut rig = Self::from_reader(BufReader::new(f))?;
        rig.root = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(rig)
    }

    /// Use `root` as the base directory for relative asset paths.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Check that the rig describes a renderable character.
    pub fn validate(&self) -> StickcastResult<()> {
        Fps::new(self.fps.num, self.fps.den).map_err(|e| StickcastError::config(e.to_string()))?;
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(StickcastError::config("canvas width/height must be non-zero"));
        }
        if self.mouth_shape_count < crate::animation::mouth::MouthShape::COUNT {
            return Err(StickcastError::config(format!(
                "mouth_shape_count must be >= {} (got {})",
                crate::animation::mouth::MouthShape::COUNT,
                self.mouth_shape_count
            )));
        }
        if !self.geometry_scale.is_finite() || self.geometry_scale <= 0.0 {
            return Err(StickcastError::config("geometry_scale must be positive"));
        }
        if !self.jiggle.multiplier.is_finite() || self.jiggle.multiplier == 0.0 {
            return Err(StickcastError::config("jiggle multiplier must be non-zero"));
        }
        self.schedule_opts().validate()
    }

    /// Resolve `p` against the rig directory.
    pub fn resolve(&self, p: &Path) -> PathBuf {
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.root.join(p)
        }
    }

    /// Number of body bitmaps (`emotions * pose_count`).
    pub fn body_count(&self) -> u32 {
        self.emotions.len() as u32 * self.pose_count
    }

    /// Whether `emotion` uses the negative mouth set. Unknown ids are positive.
    pub fn is_negative(&self, emotion: u32) -> bool {
        self.emotions
            .get(emotion as usize)
            .is_some_and(|e| e.negative)
    }

    /// Number of mouth bitmaps: one set, plus a second when any emotion is negative.
    pub fn mouth_bitmap_count(&self) -> u32 {
        if self.emotions.iter().any(|e| e.negative) {
            self.mouth_shape_count * 2
        } else {
            self.mouth_shape_count
        }
    }

    /// Options for the schedule builder.
    pub fn schedule_opts(&self) -> ScheduleOpts {
        ScheduleOpts {
            pose_count: self.pose_count,
            emotions: self.emotions.iter().map(|e| e.name.clone()).collect(),
            default_emotion: self.default_emotion,
            stoppers: self.stoppers.clone(),
        }
    }

    /// Options for the timeline compiler.
    pub fn timeline_opts(&self) -> TimelineOpts {
        TimelineOpts {
            fps: self.fps,
            lead_frames: self.lead_frames,
        }
    }

    /// Path of body bitmap `index` (0-based).
    pub fn pose_path(&self, index: u32) -> PathBuf {
        self.resolve(&self.poses_dir)
            .join(format!("pose{:04}.png", index + 1))
    }

    /// Path of mouth bitmap `index` (0-based, negative set already offset).
    pub fn mouth_path(&self, index: u32) -> PathBuf {
        self.resolve(&self.mouths_dir)
            .join(format!("mouth{:04}.png", index + 1))
    }

    /// Resolved geometry CSV path.
    pub fn geometry_path(&self) -> PathBuf {
        self.resolve(&self.geometry)
    }

    /// Resolved background bitmap path, if any.
    pub fn background_path(&self) -> Option<PathBuf> {
        self.background.as_deref().map(|p| self.resolve(p))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/rig.rs"]
mod tests;
