/// ffmpeg finishing step.
pub(crate) mod ffmpeg;
/// PNG sequence output.
pub(crate) mod png;
/// Sink contract.
pub(crate) mod sink;
