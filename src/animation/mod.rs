/// Body squash-and-stretch envelope.
pub(crate) mod jiggle;
/// Viseme intervals to per-frame mouth shapes.
pub(crate) mod mouth;
