//! stickcast turns a narrated, annotated script into a lip-synced stick-figure animation.
//!
//! The pipeline runs in stages, each usable on its own:
//!
//! - [`aligner_transcript`] strips annotations so an external forced aligner can time the words
//! - [`build_schedule`] merges the script and the aligner's [`Alignment`] into a [`Schedule`] of
//!   five independent event tracks
//! - [`compile_timeline`] moves the schedule into frame space and expands phonemes into a
//!   per-frame mouth curve
//! - [`render_timeline`] composites every frame from a [`CharacterAssets`] store, eliding
//!   duplicate frames, and streams them into a [`FrameSink`]
//! - [`finish_video`] muxes the PNG sequence with the narration through the system `ffmpeg`
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod alignment;
mod animation;
mod assets;
mod config;
mod encode;
mod foundation;
mod render;
mod schedule;
mod timeline;

pub use crate::foundation::core::{Affine, Canvas, Fps, FrameIndex, Point, Rgba8Premul, Vec2};
pub use crate::foundation::error::{StickcastError, StickcastResult};
pub use crate::foundation::rng::{PoseRng, Rng64};

pub use crate::alignment::model::{AlignedPhone, AlignedWord, Alignment, NOT_FOUND_IN_AUDIO};
pub use crate::alignment::transcript::aligner_transcript;

pub use crate::schedule::artifact::{SECTION_DELIMITER, parse_schedule, schedule_to_string};
pub use crate::schedule::builder::{
    DEFAULT_EMOTIONS, DEFAULT_STOPPERS, ScheduleOpts, ScheduleOutput, ScheduleWarning,
    build_schedule,
};
pub use crate::schedule::model::{Event, Schedule, Track};
pub use crate::schedule::phoneme::{MouthClass, Viseme, classify_phone};

pub use crate::timeline::compiler::{FrameEvent, Timeline, TimelineOpts, compile_timeline};
pub use crate::timeline::state::{FrameState, FrameStates};

pub use crate::animation::jiggle::JiggleParams;
pub use crate::animation::mouth::{MouthShape, interval_shapes, mouth_curve};

pub use crate::config::rig::{EmotionConfig, RigConfig};

pub use crate::assets::decode::{PreparedBitmap, decode_bitmap, load_bitmap};
pub use crate::assets::geometry::{MouthGeometry, MouthPlacement};
pub use crate::assets::store::CharacterAssets;

pub use crate::render::FrameRGBA;
pub use crate::render::cache::{FramePlan, FrameSignature, SignaturePolicy, plan_frames};
pub use crate::render::frame::FrameRenderer;
pub use crate::render::pipeline::{RenderOpts, RenderStats, build_thread_pool, render_timeline};

pub use crate::encode::ffmpeg::{
    FinishOpts, ensure_parent_dir, finish_command, finish_video, is_ffmpeg_on_path,
};
pub use crate::encode::png::{PngSequenceSink, frame_path, write_png};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
