mod scene_view;

pub use scene_view::SceneView;
