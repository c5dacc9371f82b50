/// Convenience result type used across placescape.
pub type PlacescapeResult<T> = Result<T, PlacescapeError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Scroll evaluation itself never fails; errors come from authored data that does not validate
/// and from IO, decoding, rendering or encoding.
#[derive(thiserror::Error, Debug)]
pub enum PlacescapeError {
    /// Invalid registry, layout or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while validating keyframe tracks.
    #[error("animation error: {0}")]
    Animation(String),

    /// Errors while rendering or encoding a frame.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PlacescapeError {
    /// Build a [`PlacescapeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PlacescapeError::Animation`] value.
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build a [`PlacescapeError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`PlacescapeError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for PlacescapeError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
