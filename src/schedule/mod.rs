/// Artifact text codec.
pub(crate) mod artifact;
/// Script + alignment to event tracks.
pub(crate) mod builder;
/// Event and track model.
pub(crate) mod model;
/// Phone to viseme classification.
pub(crate) mod phoneme;
