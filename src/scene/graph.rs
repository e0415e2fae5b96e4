use super::engine::{Scene, SceneEvent};
use super::shape::{SceneKey, SceneObject};
use super::types::Vec2;

/// In-memory drawing engine.
/// Owns the objects, the selection and the event feed; rendering itself is
/// left to whoever reads `objects()` after `render_all`.
pub struct SceneGraph {
    /// Top-level objects, bottom of the stack first
    objects: Vec<SceneObject>,
    /// Currently selected keys
    selection: Vec<SceneKey>,
    /// Events not yet drained by the editor
    events: Vec<SceneEvent>,
    next_key: u64,
    /// Whether the scene changed since the last render
    scene_dirty: bool,
    render_count: u64,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Create a new empty scene graph
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            selection: Vec::new(),
            events: Vec::new(),
            next_key: 1,
            scene_dirty: true,
            render_count: 0,
        }
    }

    /// Get number of top-level objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if scene is empty
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Check if the scene needs re-rendering
    pub fn is_dirty(&self) -> bool {
        self.scene_dirty
    }

    /// Number of completed `render_all` passes
    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    /// Check if an object is selected
    pub fn is_selected(&self, key: SceneKey) -> bool {
        self.selection.contains(&key)
    }

    // === Interaction ===

    /// Click selection. `additive` extends the selection (shift-click) and
    /// toggles an already selected object off.
    pub fn select(&mut self, key: SceneKey, additive: bool) {
        if self.object(key).is_none() {
            return;
        }
        let mut next = if additive {
            self.selection.clone()
        } else {
            Vec::new()
        };
        if additive && next.contains(&key) {
            next.retain(|&k| k != key);
        } else {
            next.push(key);
        }
        self.set_active_objects(&next);
    }

    /// Drag an object, reporting it as moving and then modified
    pub fn move_object(&mut self, key: SceneKey, delta: Vec2) {
        if let Some(object) = self.objects.iter_mut().find(|o| o.key == key) {
            object.translate(delta);
            self.scene_dirty = true;
            self.events.push(SceneEvent::ObjectMoving(key));
            self.events.push(SceneEvent::ObjectModified(key));
        }
    }

    // === Hit Testing ===

    /// Find object at point (returns topmost)
    pub fn hit_test(&self, point: Vec2) -> Option<SceneKey> {
        self.objects
            .iter()
            .rev()
            .find(|o| o.contains_point(point))
            .map(|o| o.key)
    }

    fn selection_event(had_selection: bool, has_selection: bool) -> Option<SceneEvent> {
        match (had_selection, has_selection) {
            (false, true) => Some(SceneEvent::SelectionCreated),
            (true, true) => Some(SceneEvent::SelectionUpdated),
            (true, false) => Some(SceneEvent::SelectionCleared),
            (false, false) => None,
        }
    }
}

impl Scene for SceneGraph {
    fn add(&mut self, mut object: SceneObject) -> SceneKey {
        let key = SceneKey(self.next_key);
        self.next_key += 1;
        object.key = key;
        self.objects.push(object);
        self.scene_dirty = true;
        self.events.push(SceneEvent::ObjectAdded(key));
        key
    }

    fn remove(&mut self, key: SceneKey) -> Option<SceneObject> {
        let pos = self.objects.iter().position(|o| o.key == key)?;
        let object = self.objects.remove(pos);
        self.scene_dirty = true;

        if self.is_selected(key) {
            self.selection.retain(|&k| k != key);
            if self.selection.is_empty() {
                self.events.push(SceneEvent::SelectionCleared);
            }
        }
        Some(object)
    }

    fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    fn object_mut(&mut self, key: SceneKey) -> Option<&mut SceneObject> {
        let object = self.objects.iter_mut().find(|o| o.key == key);
        if object.is_some() {
            self.scene_dirty = true;
        }
        object
    }

    fn active_objects(&self) -> Vec<SceneKey> {
        self.selection.clone()
    }

    fn set_active_objects(&mut self, keys: &[SceneKey]) {
        let mut next: Vec<SceneKey> = Vec::with_capacity(keys.len());
        for &key in keys {
            if self.object(key).is_some() && !next.contains(&key) {
                next.push(key);
            }
        }
        if next == self.selection {
            return;
        }

        let had_selection = !self.selection.is_empty();
        self.selection = next;
        if let Some(event) = Self::selection_event(had_selection, !self.selection.is_empty()) {
            self.events.push(event);
        }
    }

    fn discard_active_object(&mut self) {
        if !self.selection.is_empty() {
            self.selection.clear();
            self.events.push(SceneEvent::SelectionCleared);
        }
    }

    fn render_all(&mut self) {
        self.scene_dirty = false;
        self.render_count += 1;
        self.events.push(SceneEvent::AfterRender);
    }

    fn take_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Color, ShapeGeometry, ShapeStyle};
    use crate::types::ObjectId;

    fn create_test_object(x: f32) -> SceneObject {
        SceneObject::new(
            ShapeGeometry::rect(100.0, 100.0),
            Vec2::new(x, 0.0),
            ShapeStyle::fill_only(Color::rgb(1.0, 0.0, 0.0)),
        )
    }

    #[test]
    fn test_add_assigns_fresh_keys() {
        let mut scene = SceneGraph::new();
        let a = scene.add(create_test_object(0.0));
        let b = scene.add(create_test_object(0.0));

        assert_ne!(a, b);
        assert_ne!(a, SceneKey::DETACHED);
        assert_eq!(scene.len(), 2);
        assert_eq!(
            scene.take_events(),
            vec![SceneEvent::ObjectAdded(a), SceneEvent::ObjectAdded(b)]
        );
    }

    #[test]
    fn test_remove_object() {
        let mut scene = SceneGraph::new();
        let key = scene.add(create_test_object(0.0));

        let removed = scene.remove(key);
        assert!(removed.is_some());
        assert_eq!(scene.len(), 0);
        assert!(scene.remove(key).is_none());
    }

    #[test]
    fn test_selection_events() {
        let mut scene = SceneGraph::new();
        let a = scene.add(create_test_object(0.0));
        let b = scene.add(create_test_object(200.0));
        scene.take_events();

        scene.select(a, false);
        scene.select(b, true);
        assert_eq!(scene.active_objects(), vec![a, b]);
        assert_eq!(scene.active_object(), None);

        scene.select(a, true);
        assert_eq!(scene.active_object(), Some(b));

        scene.discard_active_object();
        assert_eq!(
            scene.take_events(),
            vec![
                SceneEvent::SelectionCreated,
                SceneEvent::SelectionUpdated,
                SceneEvent::SelectionUpdated,
                SceneEvent::SelectionCleared,
            ]
        );
    }

    #[test]
    fn test_removing_selected_object_clears_selection() {
        let mut scene = SceneGraph::new();
        let key = scene.add(create_test_object(0.0));
        scene.select(key, false);
        scene.take_events();

        scene.remove(key);
        assert!(scene.active_objects().is_empty());
        assert_eq!(scene.take_events(), vec![SceneEvent::SelectionCleared]);
    }

    #[test]
    fn test_dirty_tracking() {
        let mut scene = SceneGraph::new();
        assert!(scene.is_dirty());

        scene.render_all();
        assert!(!scene.is_dirty());
        assert_eq!(scene.render_count(), 1);

        scene.add(create_test_object(0.0));
        assert!(scene.is_dirty());
    }

    #[test]
    fn test_hit_test_prefers_topmost() {
        let mut scene = SceneGraph::new();
        let _bottom = scene.add(create_test_object(0.0));
        let top = scene.add(create_test_object(50.0));

        assert_eq!(scene.hit_test(Vec2::new(75.0, 10.0)), Some(top));
        assert_eq!(scene.hit_test(Vec2::new(500.0, 500.0)), None);
    }

    #[test]
    fn test_find_tagged() {
        let mut scene = SceneGraph::new();
        let key = scene.add(create_test_object(0.0).with_tag(ObjectId(9)));
        scene.add(create_test_object(0.0));

        assert_eq!(scene.find_tagged(ObjectId(9)), Some(key));
        assert_eq!(scene.find_tagged(ObjectId(10)), None);
    }
}
