use thiserror::Error;

/// Errors surfaced by the tracker core.
///
/// None of these are fatal: the host decides whether to re-prompt, fall
/// back to a default, or drop the operation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Input was rejected before any field was written.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A date could not be built for the requested calendar.
    #[error("cannot construct date: {0}")]
    DateConstruction(String),

    /// The targeted record is not in the collection.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: uuid::Uuid },
}

impl CoreError {
    pub(crate) fn date(reason: impl Into<String>) -> Self {
        Self::DateConstruction(reason.into())
    }

    pub(crate) fn validation(reason: impl Into<String>) -> Self {
        Self::Validation(reason.into())
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
