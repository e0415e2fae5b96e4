mod error;
mod store;

pub use error::LayerError;
pub use store::*;
