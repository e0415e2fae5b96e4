mod descriptor;
mod engine;
mod export;
mod graph;
mod path;
mod shape;
mod types;

pub use descriptor::*;
pub use engine::*;
pub use export::export_svg;
pub use graph::*;
pub use path::{parse_path_data, path_bounds, to_path_data, PathCommand};
pub use shape::*;
pub use types::*;
