/// Rig file model.
pub(crate) mod rig;
