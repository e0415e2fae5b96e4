mod error;
mod geometry;
mod scene_sync;

pub use error::{SyncError, ValidationError};
pub use geometry::ActiveGeometry;
pub use scene_sync::*;
