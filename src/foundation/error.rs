/// Convenience result type used across stickcast.
pub type StickcastResult<T> = Result<T, StickcastError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Recoverable schedule problems (alignment drift, unknown tags) are not errors; they are reported
/// as [`crate::ScheduleWarning`] values instead.
#[derive(thiserror::Error, Debug)]
pub enum StickcastError {
    /// Invalid user-provided data (schedule artifacts, options, frame indices).
    #[error("validation error: {0}")]
    Validation(String),

    /// Malformed configuration or static tables. Always fatal before rendering starts.
    #[error("config error: {0}")]
    Config(String),

    /// Errors while compiling the timeline or rendering a frame.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StickcastError {
    /// Build a [`StickcastError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StickcastError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`StickcastError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`StickcastError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
