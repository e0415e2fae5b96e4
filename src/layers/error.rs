//! Layer store errors (thiserror-based).

use thiserror::Error;

use crate::types::LayerId;

/// Failed layer store transition. `UnknownLayer` and `NoActiveLayer` point at
/// a caller bug; `EmptyName` is the user typing a blank name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayerError {
    #[error("no layer with id {0}")]
    UnknownLayer(LayerId),

    #[error("no active layer to add the object to")]
    NoActiveLayer,

    #[error("layer name cannot be empty")]
    EmptyName,
}
