use super::error::{SyncError, ValidationError};
use super::geometry::ActiveGeometry;
use crate::config::EditorConfig;
use crate::layers::{LayerKind, LayerStore};
use crate::scene::{
    GeometryField, Scene, SceneEvent, SceneKey, SceneObject, ShapeDescriptor, ShapeGeometry, Vec2,
};
use crate::types::{LayerId, ObjectId, ObjectIdAllocator};

/// What the editor shell should react to after draining scene events
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneNotice {
    /// A render pass finished; the drawing can be re-exported
    Rendered,
    /// The user finished changing an object
    Modified(ObjectId),
}

/// Keeps the layer store and the scene in step.
///
/// Every user action performs its store transition and its scene cascade in
/// one call. Scene lookups go through object tags; an id the store knows but
/// the scene lost is treated as already removed.
pub struct SceneSync<S: Scene> {
    scene: S,
    store: LayerStore,
    ids: ObjectIdAllocator,
    active_geometry: Option<ActiveGeometry>,
    group_layer_name: String,
    clone_offset: f32,
}

impl<S: Scene> SceneSync<S> {
    pub fn new(scene: S) -> Self {
        Self::with_config(scene, &EditorConfig::default())
    }

    pub fn with_config(scene: S, config: &EditorConfig) -> Self {
        Self {
            scene,
            store: LayerStore::new(),
            ids: ObjectIdAllocator::new(),
            active_geometry: None,
            group_layer_name: config.group_layer_name.clone(),
            clone_offset: config.clone_offset,
        }
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    /// Direct engine access for interaction (selection clicks, drags, drawing).
    /// Changes made here reach the store through `process_events`.
    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn store(&self) -> &LayerStore {
        &self.store
    }

    pub fn active_geometry(&self) -> Option<ActiveGeometry> {
        self.active_geometry
    }

    /// Ids the store references that the scene no longer holds
    pub fn drifted_objects(&self) -> Vec<ObjectId> {
        self.store
            .layers()
            .iter()
            .flat_map(|layer| layer.objects.iter().copied())
            .filter(|&id| self.scene.find_tagged(id).is_none())
            .collect()
    }

    fn register(&mut self, object_id: ObjectId, target: LayerId) {
        if let Err(err) = self.store.add_object(object_id, Some(target)) {
            log::error!("could not register {} in {}: {}", object_id, target, err);
        }
    }

    /// Drop a group-kind layer once its composite is gone
    fn discard_empty_group_layer(&mut self, layer_id: LayerId) {
        let is_empty_group = self
            .store
            .layer(layer_id)
            .is_some_and(|layer| layer.is_group() && layer.objects.is_empty());
        if is_empty_group && self.store.delete_layer(layer_id).is_ok() {
            log::debug!("discarded empty group layer {}", layer_id);
        }
    }

    fn mirror_selection(&mut self) {
        self.active_geometry = self
            .scene
            .active_object()
            .and_then(|key| self.scene.object(key))
            .and_then(ActiveGeometry::from_object);
    }

    // === Population ===

    /// Instantiate descriptors in order into the active layer (a default layer
    /// is created if there is none). Returns how many shapes were added.
    pub fn ingest(&mut self, descriptors: &[ShapeDescriptor]) -> usize {
        let target = self.store.ensure_active_layer();
        let mut added = 0;

        for (index, descriptor) in descriptors.iter().enumerate() {
            let Some(object) = descriptor.to_scene_object() else {
                log::warn!("skipping unsupported shape descriptor #{}", index);
                continue;
            };
            let object_id = self.ids.allocate();
            self.scene.add(object.with_tag(object_id));
            self.register(object_id, target);
            added += 1;
        }

        self.scene.render_all();
        log::info!("ingested {} of {} shapes into {}", added, descriptors.len(), target);
        added
    }

    /// Drain the scene's event feed and react to each event in order
    pub fn process_events(&mut self) -> Vec<SceneNotice> {
        let mut notices = Vec::new();

        for event in self.scene.take_events() {
            match event {
                SceneEvent::ObjectAdded(key) => self.on_object_added(key),
                SceneEvent::SelectionCreated | SceneEvent::SelectionUpdated => {
                    self.mirror_selection()
                }
                SceneEvent::SelectionCleared => self.active_geometry = None,
                SceneEvent::ObjectMoving(key) => {
                    if self.scene.active_object() == Some(key) {
                        self.mirror_selection();
                    }
                }
                SceneEvent::ObjectModified(key) => {
                    if self.scene.active_object() == Some(key) {
                        self.mirror_selection();
                    }
                    if let Some(tag) = self.scene.object(key).and_then(|o| o.tag) {
                        notices.push(SceneNotice::Modified(tag));
                    }
                }
                SceneEvent::AfterRender => notices.push(SceneNotice::Rendered),
            }
        }

        notices
    }

    /// Interactive draws arrive untagged; tagged objects are being re-added
    /// by a group/ungroup and are already filed.
    fn on_object_added(&mut self, key: SceneKey) {
        let Some(object) = self.scene.object_mut(key) else {
            log::debug!("added object {:?} left the scene before it was filed", key);
            return;
        };
        if object.tag.is_some() {
            return;
        }

        let object_id = self.ids.allocate();
        object.tag = Some(object_id);

        let target = self.store.ensure_active_layer();
        self.register(object_id, target);
        log::debug!("filed drawn object {} into {}", object_id, target);
    }

    // === Panel contract ===

    pub fn select_layer(&mut self, layer_id: LayerId) -> Result<(), SyncError> {
        self.store.set_active_layer(layer_id).map_err(|err| {
            log::error!("cannot activate {}: {}", layer_id, err);
            SyncError::from(err)
        })
    }

    pub fn rename_layer(&mut self, layer_id: LayerId, name: &str) -> Result<(), SyncError> {
        self.store.rename_layer(layer_id, name).map_err(SyncError::from)
    }

    /// Flip a layer's visibility and push the new state onto its objects.
    /// Returns the new visibility.
    pub fn toggle_layer_visibility(&mut self, layer_id: LayerId) -> Result<bool, SyncError> {
        let visible = self.store.toggle_visibility(layer_id)?;
        let members = self
            .store
            .layer(layer_id)
            .map(|layer| layer.objects.clone())
            .unwrap_or_default();

        for object_id in members {
            match self
                .scene
                .find_tagged(object_id)
                .and_then(|key| self.scene.object_mut(key))
            {
                Some(object) => object.visible = visible,
                None => log::debug!("{} is no longer in the scene", object_id),
            }
        }

        self.scene.render_all();
        Ok(visible)
    }

    /// Delete a layer and every object filed in it
    pub fn delete_layer(&mut self, layer_id: LayerId) -> Result<Vec<ObjectId>, SyncError> {
        let Some(layer) = self.store.layer(layer_id) else {
            log::error!("cannot delete unknown layer {}", layer_id);
            return Err(SyncError::from(crate::layers::LayerError::UnknownLayer(layer_id)));
        };

        for &object_id in &layer.objects {
            if let Some(key) = self.scene.find_tagged(object_id) {
                self.scene.remove(key);
            }
        }

        let removed = self.store.delete_layer(layer_id)?;
        self.scene.render_all();
        log::info!("deleted {} with {} objects", layer_id, removed.len());
        Ok(removed)
    }

    /// Combine the selected objects into one group filed in a new group layer
    pub fn create_group(&mut self) -> Result<ObjectId, SyncError> {
        let selected = self.scene.active_objects();
        let members: Vec<SceneObject> = selected
            .iter()
            .filter_map(|&key| self.scene.object(key).cloned())
            .collect();
        if members.len() < 2 {
            log::warn!("group needs at least 2 selected objects, got {}", members.len());
            return Err(ValidationError::NotEnoughSelected {
                selected: members.len(),
            }
            .into());
        }

        let member_tags: Vec<ObjectId> = members.iter().filter_map(|m| m.tag).collect();
        let Some(group) = SceneObject::group(members) else {
            return Err(ValidationError::NotEnoughSelected { selected: 0 }.into());
        };

        let group_layer = self
            .store
            .create_layer(Some(&self.group_layer_name), LayerKind::Group);
        let group_id = self.ids.allocate();

        // A grouped group takes its emptied layer with it
        for tag in member_tags {
            if let Some(layer_id) = self.store.remove_object(tag) {
                self.discard_empty_group_layer(layer_id);
            }
        }
        for key in selected {
            self.scene.remove(key);
        }

        let key = self.scene.add(group.with_tag(group_id));
        self.scene.set_active_objects(&[key]);
        self.register(group_id, group_layer);
        self.scene.render_all();

        log::info!(target: "analytics", "create group");
        Ok(group_id)
    }

    /// Break the selected group back into individual objects filed in the
    /// active layer. The group's layer goes away with it.
    pub fn ungroup(&mut self) -> Result<Vec<ObjectId>, SyncError> {
        let Some(key) = self
            .scene
            .active_object()
            .filter(|&key| self.scene.object(key).is_some_and(SceneObject::is_group))
        else {
            log::warn!("ungroup needs exactly one selected group");
            return Err(ValidationError::NoGroupSelected.into());
        };
        let Some(group) = self.scene.remove(key) else {
            return Err(ValidationError::NoGroupSelected.into());
        };

        if let Some(group_id) = group.tag {
            if let Some(layer_id) = self.store.remove_object(group_id) {
                self.discard_empty_group_layer(layer_id);
            }
        }

        let target = self.store.ensure_active_layer();
        let mut restored = Vec::new();
        for mut member in group.into_members() {
            let object_id = match member.tag {
                Some(tag) => tag,
                None => self.ids.allocate(),
            };
            member.tag = Some(object_id);
            self.scene.add(member);
            self.register(object_id, target);
            restored.push(object_id);
        }

        self.scene.render_all();
        log::info!(target: "analytics", "ungroup objects");
        Ok(restored)
    }

    // === Object actions ===

    /// Delete the selected objects from the scene and the store
    pub fn remove_selection(&mut self) -> Vec<ObjectId> {
        let mut removed = Vec::new();

        for key in self.scene.active_objects() {
            let Some(object) = self.scene.remove(key) else {
                continue;
            };
            if let Some(tag) = object.tag {
                if let Some(layer_id) = self.store.remove_object(tag) {
                    self.discard_empty_group_layer(layer_id);
                }
                removed.push(tag);
            }
        }

        if !removed.is_empty() {
            self.scene.discard_active_object();
            self.active_geometry = None;
            self.scene.render_all();
            log::info!(target: "analytics", "remove item");
        }
        removed
    }

    /// Duplicate the selection, offset so the copies are visible, and select
    /// the copies. Copies are filed in the active layer.
    pub fn clone_selection(&mut self) -> Vec<ObjectId> {
        let originals: Vec<SceneObject> = self
            .scene
            .active_objects()
            .into_iter()
            .filter_map(|key| self.scene.object(key).cloned())
            .collect();
        if originals.is_empty() {
            return Vec::new();
        }

        let target = self.store.ensure_active_layer();
        let offset = Vec2::splat(self.clone_offset);
        let mut keys = Vec::new();
        let mut cloned = Vec::new();

        for mut copy in originals {
            strip_member_tags(&mut copy);
            copy.translate(offset);
            let object_id = self.ids.allocate();
            keys.push(self.scene.add(copy.with_tag(object_id)));
            self.register(object_id, target);
            cloned.push(object_id);
        }

        self.scene.set_active_objects(&keys);
        self.scene.render_all();
        log::info!(target: "analytics", "clone item");
        cloned
    }

    /// Clear the scene selection (click outside the canvas)
    pub fn discard_selection(&mut self) {
        if self.scene.active_objects().is_empty() {
            return;
        }
        self.scene.discard_active_object();
        self.active_geometry = None;
        self.scene.render_all();
    }

    /// Write a value from the geometry editor into the selected object.
    /// Returns false when nothing single is selected or the field does not
    /// apply to it.
    pub fn edit_active_geometry(&mut self, field: GeometryField, value: f32) -> bool {
        let Some(object) = self
            .scene
            .active_object()
            .and_then(|key| self.scene.object_mut(key))
        else {
            return false;
        };

        let changed = object.apply_edit(field, value);
        self.mirror_selection();
        if changed {
            self.scene.render_all();
        }
        changed
    }
}

/// Copied groups must not carry their members' identities along; the members
/// get fresh ones if the copy is ever ungrouped.
fn strip_member_tags(object: &mut SceneObject) {
    if let ShapeGeometry::Group { members } = &mut object.geometry {
        for member in members {
            member.tag = None;
            strip_member_tags(member);
        }
    }
}
