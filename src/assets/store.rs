use crate::animation::mouth::MouthShape;
use crate::assets::decode::{PreparedBitmap, load_bitmap};
use crate::assets::geometry::MouthGeometry;
use crate::config::rig::RigConfig;
use crate::foundation::core::{Canvas, Rgba8Premul};
use crate::foundation::error::{StickcastError, StickcastResult};
use crate::render::transform::resize_lanczos;

/// Every bitmap and table a frame can reference, decoded up front and shared read-only.
#[derive(Clone, Debug)]
pub struct CharacterAssets {
    canvas: Canvas,
    pose_count: u32,
    negative: Vec<bool>,
    mouth_shape_count: u32,
    background: PreparedBitmap,
    bodies: Vec<PreparedBitmap>,
    mouths: Vec<PreparedBitmap>,
    geometry: MouthGeometry,
}

impl CharacterAssets {
    /// Load all bitmaps and the geometry table described by `rig`.
    ///
    /// The negative mouth set is only read when some emotion uses it.
    #[tracing::instrument(skip_all)]
    pub fn load(rig: &RigConfig) -> StickcastResult<Self> {
        let geometry = MouthGeometry::from_path(
            &rig.geometry_path(),
            rig.body_count() as usize,
            rig.geometry_scale,
        )?;

        let background = match rig.background_path() {
            Some(path) => load_bitmap(&path)?,
            None => {
                let [r, g, b, a] = rig.background_rgba;
                PreparedBitmap::solid(
                    rig.canvas.width,
                    rig.canvas.height,
                    Rgba8Premul::from_straight_rgba(r, g, b, a),
                )
            }
        };

        let bodies = (0..rig.body_count())
            .map(|i| load_bitmap(&rig.pose_path(i)))
            .collect::<StickcastResult<Vec<_>>>()?;

        let mouths = (0..rig.mouth_bitmap_count())
            .map(|i| load_bitmap(&rig.mouth_path(i)))
            .collect::<StickcastResult<Vec<_>>>()?;

        tracing::debug!(
            bodies = bodies.len(),
            mouths = mouths.len(),
            "character assets loaded"
        );
        Self::from_parts(rig, background, bodies, mouths, geometry)
    }

    /// Assemble assets from already decoded parts.
    ///
    /// A background whose size differs from the canvas is resized to it.
    pub fn from_parts(
        rig: &RigConfig,
        background: PreparedBitmap,
        bodies: Vec<PreparedBitmap>,
        mouths: Vec<PreparedBitmap>,
        geometry: MouthGeometry,
    ) -> StickcastResult<Self> {
        if bodies.len() != rig.body_count() as usize {
            return Err(StickcastError::config(format!(
                "expected {} body bitmaps, got {}",
                rig.body_count(),
                bodies.len()
            )));
        }
        let required_mouths = rig.mouth_bitmap_count() as usize;
        if mouths.len() < required_mouths {
            return Err(StickcastError::config(format!(
                "expected at least {required_mouths} mouth bitmaps, got {}",
                mouths.len()
            )));
        }
        if geometry.len() < bodies.len() {
            return Err(StickcastError::config(format!(
                "geometry has {} rows for {} body bitmaps",
                geometry.len(),
                bodies.len()
            )));
        }

        let canvas = rig.canvas;
        let background =
            if background.width() != canvas.width || background.height() != canvas.height {
                PreparedBitmap::from_premultiplied(resize_lanczos(
                    background.pixels(),
                    canvas.width,
                    canvas.height,
                ))
            } else {
                background
            };

        Ok(Self {
            canvas,
            pose_count: rig.pose_count,
            negative: (0..rig.emotions.len() as u32)
                .map(|e| rig.is_negative(e))
                .collect(),
            mouth_shape_count: rig.mouth_shape_count,
            background,
            bodies,
            mouths,
            geometry,
        })
    }

    /// Output canvas.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Canvas-sized background.
    pub fn background(&self) -> &PreparedBitmap {
        &self.background
    }

    /// Body bitmap index for an emotion and pose.
    ///
    /// Ids outside the rig are a validation error rather than a neighbouring emotion's body.
    pub fn body_index(&self, emotion: u32, pose: u32) -> StickcastResult<u32> {
        if pose >= self.pose_count {
            return Err(StickcastError::validation(format!(
                "pose {pose} out of range ({} poses per emotion)",
                self.pose_count
            )));
        }
        self.check_emotion(emotion)?;
        emotion
            .checked_mul(self.pose_count)
            .and_then(|base| base.checked_add(pose))
            .ok_or_else(|| {
                StickcastError::validation(format!("body index for emotion {emotion} overflows"))
            })
    }

    /// Mouth bitmap index for `shape`, offset into the negative set when the emotion is negative.
    pub fn mouth_index(&self, shape: MouthShape, emotion: u32) -> StickcastResult<u32> {
        self.check_emotion(emotion)?;
        if u32::from(shape.0) >= self.mouth_shape_count {
            return Err(StickcastError::validation(format!(
                "mouth shape {} out of range ({} shapes)",
                shape.0, self.mouth_shape_count
            )));
        }
        let offset = if self.negative[emotion as usize] {
            self.mouth_shape_count
        } else {
            0
        };
        Ok(u32::from(shape.0) + offset)
    }

    fn check_emotion(&self, emotion: u32) -> StickcastResult<()> {
        if emotion as usize >= self.negative.len() {
            return Err(StickcastError::validation(format!(
                "emotion {emotion} out of range ({} emotions)",
                self.negative.len()
            )));
        }
        Ok(())
    }

    /// Body bitmap by index.
    pub fn body(&self, index: u32) -> StickcastResult<&PreparedBitmap> {
        self.bodies.get(index as usize).ok_or_else(|| {
            StickcastError::evaluation(format!(
                "body bitmap {index} out of range ({} loaded)",
                self.bodies.len()
            ))
        })
    }

    /// Mouth bitmap for `shape`, from the negative set when the emotion is negative.
    pub fn mouth(&self, shape: MouthShape, emotion: u32) -> StickcastResult<&PreparedBitmap> {
        let index = self.mouth_index(shape, emotion)?;
        self.mouths.get(index as usize).ok_or_else(|| {
            StickcastError::evaluation(format!(
                "mouth bitmap {index} out of range ({} loaded)",
                self.mouths.len()
            ))
        })
    }

    /// Mouth placement table.
    pub fn geometry(&self) -> &MouthGeometry {
        &self.geometry
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
