//! Error taxonomy shared by the timeline engine.
//!
//! Input problems (bad CSV cells, undatable chronology text) are recovered where
//! they happen and rarely surface as values of this type. Environment problems
//! are fatal to a single visualization instance, and render problems never leave
//! the frame that produced them.

use crate::render::surface::RenderError;

/// Result type for atlas operations
pub type AtlasResult<T> = Result<T, AtlasError>;

/// Error type for atlas operations
#[derive(Debug, thiserror::Error)]
pub enum AtlasError {
    #[error("Input error: {0}")]
    InputError(String),

    #[error("Environment error: {0}")]
    EnvironmentError(String),

    #[error("Render error: {0}")]
    RenderError(#[from] RenderError),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl AtlasError {
    /// Whether the error only affects one visualization instance.
    pub fn is_view_local(&self) -> bool {
        matches!(self, AtlasError::EnvironmentError(_) | AtlasError::RenderError(_))
    }
}

impl From<String> for AtlasError {
    fn from(s: String) -> Self {
        AtlasError::InputError(s)
    }
}

impl From<&str> for AtlasError {
    fn from(s: &str) -> Self {
        AtlasError::InputError(s.to_string())
    }
}
