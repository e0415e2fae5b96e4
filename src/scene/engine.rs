//! Capability interface of the drawing engine.
//!
//! The editor never binds to a concrete engine: everything it needs from the
//! scene goes through [`Scene`]. [`super::SceneGraph`] is the in-memory
//! implementation used by the app and by tests.

use super::shape::{SceneKey, SceneObject};
use crate::types::ObjectId;

/// Mutations and interactions reported by the engine, in the order they happened
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneEvent {
    SelectionCreated,
    SelectionUpdated,
    SelectionCleared,
    ObjectAdded(SceneKey),
    ObjectModified(SceneKey),
    ObjectMoving(SceneKey),
    AfterRender,
}

pub trait Scene {
    /// Insert an object on top of the stack. The engine assigns and returns a fresh key.
    fn add(&mut self, object: SceneObject) -> SceneKey;

    /// Take an object out of the scene; `None` if the key is not present.
    fn remove(&mut self, key: SceneKey) -> Option<SceneObject>;

    /// Top-level objects in stacking order (bottom first)
    fn objects(&self) -> &[SceneObject];

    fn object_mut(&mut self, key: SceneKey) -> Option<&mut SceneObject>;

    /// Keys of every selected object
    fn active_objects(&self) -> Vec<SceneKey>;

    /// Replace the selection. Keys not in the scene are ignored.
    fn set_active_objects(&mut self, keys: &[SceneKey]);

    fn discard_active_object(&mut self);

    fn render_all(&mut self);

    /// Drain the pending event feed
    fn take_events(&mut self) -> Vec<SceneEvent>;

    fn object(&self, key: SceneKey) -> Option<&SceneObject> {
        self.objects().iter().find(|o| o.key == key)
    }

    /// The single selected object; `None` for no selection or a multi-selection
    fn active_object(&self) -> Option<SceneKey> {
        match self.active_objects().as_slice() {
            [key] => Some(*key),
            _ => None,
        }
    }

    /// Locate the top-level object carrying `tag`
    fn find_tagged(&self, tag: ObjectId) -> Option<SceneKey> {
        self.objects()
            .iter()
            .find(|o| o.tag == Some(tag))
            .map(|o| o.key)
    }
}
