/// Squash-and-stretch envelope applied to the body around pose changes.
///
/// The envelope `j(x) = exp(-fader * (x / multiplier)^2) * sin(x / multiplier)` rings for
/// `max_frames` frames after a pose change and settles to `1`. The body scale factor is
/// `base^(j(since) - j(until))`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct JiggleParams {
    /// Decay rate of the gaussian term.
    pub fader: f64,
    /// Frames per radian of the sine term.
    pub multiplier: f64,
    /// Exponent base of the scale factor.
    pub base: f64,
    /// Frames after which the envelope is considered settled.
    pub max_frames: f64,
}

impl Default for JiggleParams {
    fn default() -> Self {
        Self {
            fader: 0.06,
            multiplier: 0.6,
            base: 1.07,
            max_frames: 7.0,
        }
    }
}

impl JiggleParams {
    /// Envelope value `x` frames away from a pose change.
    pub fn envelope(&self, x: f64) -> f64 {
        if x >= self.max_frames {
            return 1.0;
        }
        let t = x / self.multiplier;
        (-self.fader * t * t).exp() * t.sin()
    }

    /// Body scale factor for a frame `since` frames after the last pose change and `until`
    /// frames before the next one.
    ///
    /// A missing next pose contributes nothing.
    pub fn factor(&self, since: u64, until: Option<u64>) -> f64 {
        let rise = self.envelope(since as f64);
        let fall = until.map(|u| self.envelope(u as f64)).unwrap_or(0.0);
        self.base.powf(rise - fall)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/jiggle.rs"]
mod tests;
