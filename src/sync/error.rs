use thiserror::Error;

use crate::layers::LayerError;

/// Unmet precondition of a user action. Shown to the user; nothing changed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please select at least 2 objects to create a group")]
    NotEnoughSelected { selected: usize },

    #[error("Please select a group to ungroup")]
    NoGroupSelected,

    #[error("Layer name cannot be empty")]
    EmptyName,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    #[error(transparent)]
    Validation(ValidationError),

    /// The caller addressed state that does not exist
    #[error("layer store rejected the operation: {0}")]
    Layer(LayerError),
}

impl SyncError {
    pub fn is_validation(&self) -> bool {
        matches!(self, SyncError::Validation(_))
    }
}

impl From<ValidationError> for SyncError {
    fn from(err: ValidationError) -> Self {
        SyncError::Validation(err)
    }
}

impl From<LayerError> for SyncError {
    fn from(err: LayerError) -> Self {
        match err {
            LayerError::EmptyName => SyncError::Validation(ValidationError::EmptyName),
            other => SyncError::Layer(other),
        }
    }
}
