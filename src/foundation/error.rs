/// Crate-wide result alias.
pub type PixoraResult<T> = Result<T, PixoraError>;

/// Errors raised while building motion descriptions.
///
/// Runtime playback never fails: missing elements and unparsable metric literals degrade to
/// "no animation" instead of surfacing an error.
#[derive(thiserror::Error, Debug)]
pub enum PixoraError {
    /// Structural validation failure (bad durations, empty selectors, ...).
    #[error("validation error: {0}")]
    Validation(String),

    /// A textual form (ease name, threshold, position, selector) could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// Animation construction failure.
    #[error("animation error: {0}")]
    Animation(String),

    /// JSON (de)serialization failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped foreign error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PixoraError {
    /// Build [`PixoraError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build [`PixoraError::Parse`].
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Build [`PixoraError::Animation`].
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build [`PixoraError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for PixoraError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
