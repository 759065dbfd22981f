/// Convenience result type used across pathweave.
pub type PathweaveResult<T> = Result<T, PathweaveError>;

/// Error taxonomy for authoring-time mutators and document I/O.
///
/// The sampling, retargeting and curve-generation entry points never return
/// these; they degrade to documented defaults instead.
#[derive(thiserror::Error, Debug)]
pub enum PathweaveError {
    /// Invalid user-provided or document data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A driver binding that cannot be honored.
    #[error("driver error: {0}")]
    Driver(String),

    /// Errors when serializing or deserializing documents and payloads.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PathweaveError {
    /// Build a [`PathweaveError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PathweaveError::Driver`] value.
    pub fn driver(msg: impl Into<String>) -> Self {
        Self::Driver(msg.into())
    }

    /// Build a [`PathweaveError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for PathweaveError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
