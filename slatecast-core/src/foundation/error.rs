/// Convenience result type used across Slatecast.
pub type SlatecastResult<T> = Result<T, SlatecastError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum SlatecastError {
    /// Malformed user input or template document: unversioned/unknown
    /// documents, regions with too few vertices, invalid state-machine calls.
    #[error("validation error: {0}")]
    Validation(String),

    /// A requested entity (template, region, owner) does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The external schedule data source failed; previous display state is
    /// kept rather than cleared.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Errors while producing the raster export surface.
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SlatecastError {
    /// Build a [`SlatecastError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SlatecastError::NotFound`] value.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Build a [`SlatecastError::Fetch`] value.
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    /// Build a [`SlatecastError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`SlatecastError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
