/// Aligner JSON model.
pub(crate) mod model;
/// Aligner-facing transcript preparation.
pub(crate) mod transcript;
