/// Schedule to frame-space compilation.
pub(crate) mod compiler;
/// Per-frame state lookup.
pub(crate) mod state;
