use crate::animation::jiggle::JiggleParams;
use crate::assets::store::CharacterAssets;
use crate::foundation::error::StickcastResult;
use crate::render::FrameRGBA;
use crate::render::composite::paste_over;
use crate::render::transform::{place_mouth, resize_lanczos};
use crate::timeline::state::FrameState;

/// Turns frame states into pixels. Holds only shared read-only data, so one renderer can be used
/// from many threads.
#[derive(Clone, Copy, Debug)]
pub struct FrameRenderer<'a> {
    assets: &'a CharacterAssets,
    jiggle: Option<JiggleParams>,
}

impl<'a> FrameRenderer<'a> {
    /// Renderer over `assets`; `jiggle` enables squash-and-stretch around pose changes.
    pub fn new(assets: &'a CharacterAssets, jiggle: Option<JiggleParams>) -> Self {
        Self { assets, jiggle }
    }

    /// Body scale factor for `state` (1 with jiggle off).
    pub fn jiggle_factor(&self, state: &FrameState) -> f64 {
        self.jiggle
            .map(|j| j.factor(state.since_pose_change, state.until_pose_change))
            .unwrap_or(1.0)
    }

    /// Composite one frame: mouth onto body, body onto background.
    pub fn render(&self, state: &FrameState) -> StickcastResult<FrameRGBA> {
        let assets = self.assets;
        let body_index = assets.body_index(state.emotion, state.pose)?;
        let body = assets.body(body_index)?;
        let mouth = assets.mouth(state.mouth, state.emotion)?;
        let placement = assets.geometry().row(body_index)?;

        let mut figure = body.pixels().clone();
        let mouth_img = place_mouth(mouth.pixels(), placement);
        let mx = (placement.anchor.x - f64::from(mouth_img.width()) / 2.0).trunc() as i64;
        let my = (placement.anchor.y - f64::from(mouth_img.height()) / 2.0).trunc() as i64;
        paste_over(&mut figure, &mouth_img, mx, my);

        let factor = self.jiggle_factor(state);
        let nw = f64::from(figure.width()) / factor;
        let nh = f64::from(figure.height()) * factor;
        let figure = resize_lanczos(&figure, nw.round() as u32, nh.round() as u32);

        let canvas = assets.canvas();
        let x = (f64::from(canvas.width) * 0.5 - nw / 2.0).round() as i64;
        let y = (f64::from(canvas.height) - nh).round() as i64;
        let mut frame = assets.background().pixels().clone();
        paste_over(&mut frame, &figure, x, y);

        Ok(FrameRGBA::from_premultiplied(frame))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
