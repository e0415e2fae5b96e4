use serde::Serialize;
use std::collections::HashMap;

use super::error::LayerError;
use crate::types::{LayerId, ObjectId};

/// What a layer holds: loose shapes, or the single composite of a group
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Layer,
    Group,
}

/// A named, visibility-toggleable list of object identities
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    pub visible: bool,
    pub kind: LayerKind,
    /// Members in insertion order
    pub objects: Vec<ObjectId>,
}

impl Layer {
    fn new(id: LayerId, name: String, kind: LayerKind) -> Self {
        Self {
            id,
            name,
            visible: true,
            kind,
            objects: Vec::new(),
        }
    }

    pub fn is_group(&self) -> bool {
        self.kind == LayerKind::Group
    }

    pub fn contains(&self, object_id: ObjectId) -> bool {
        self.objects.contains(&object_id)
    }
}

/// Ordered layers plus the object -> layer index.
///
/// Invariants held by every method:
/// - an object id sits in at most one layer
/// - `active_layer` is `None` or names an existing layer
/// - `next_layer_id` is above every id ever issued, deleted ones included
#[derive(Clone, Debug, PartialEq)]
pub struct LayerStore {
    layers: Vec<Layer>,
    active_layer: Option<LayerId>,
    next_layer_id: u32,
    index: HashMap<ObjectId, LayerId>,
}

impl Default for LayerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerStore {
    /// Create an empty store with no active layer
    pub fn new() -> Self {
        Self {
            layers: Vec::new(),
            active_layer: None,
            next_layer_id: 1,
            index: HashMap::new(),
        }
    }

    /// Create a store holding one empty, active `Layer 1`
    pub fn with_default_layer() -> Self {
        let mut store = Self::new();
        store.ensure_active_layer();
        store
    }

    // === Queries ===

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, layer_id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == layer_id)
    }

    pub fn active_layer(&self) -> Option<LayerId> {
        self.active_layer
    }

    /// The id the next `create_layer` call will hand out
    pub fn next_layer_id(&self) -> LayerId {
        LayerId(self.next_layer_id)
    }

    /// Layer currently holding `object_id`
    pub fn layer_of(&self, object_id: ObjectId) -> Option<LayerId> {
        self.index.get(&object_id).copied()
    }

    pub fn contains_object(&self, object_id: ObjectId) -> bool {
        self.index.contains_key(&object_id)
    }

    /// Total number of registered objects across all layers
    pub fn object_count(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    fn layer_mut(&mut self, layer_id: LayerId) -> Result<&mut Layer, LayerError> {
        self.layers
            .iter_mut()
            .find(|l| l.id == layer_id)
            .ok_or(LayerError::UnknownLayer(layer_id))
    }

    // === Lifecycle ===

    /// Append a new empty layer. Does not change the active layer.
    pub fn create_layer(&mut self, name: Option<&str>, kind: LayerKind) -> LayerId {
        let id = LayerId(self.next_layer_id);
        self.next_layer_id += 1;

        let name = match name.map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("Layer {}", id.number()),
        };
        self.layers.push(Layer::new(id, name, kind));
        id
    }

    /// Return the active layer, creating and activating a default one if
    /// there is none.
    pub fn ensure_active_layer(&mut self) -> LayerId {
        if let Some(active) = self.active_layer {
            return active;
        }
        let id = self.create_layer(None, LayerKind::Layer);
        self.active_layer = Some(id);
        id
    }

    /// Remove a layer. Returns the object ids it held so the caller can take
    /// them out of the scene.
    pub fn delete_layer(&mut self, layer_id: LayerId) -> Result<Vec<ObjectId>, LayerError> {
        let pos = self
            .layers
            .iter()
            .position(|l| l.id == layer_id)
            .ok_or(LayerError::UnknownLayer(layer_id))?;
        let layer = self.layers.remove(pos);

        for object_id in &layer.objects {
            self.index.remove(object_id);
        }
        if self.active_layer == Some(layer_id) {
            self.active_layer = self.layers.first().map(|l| l.id);
        }
        Ok(layer.objects)
    }

    pub fn set_active_layer(&mut self, layer_id: LayerId) -> Result<(), LayerError> {
        if self.layer(layer_id).is_none() {
            return Err(LayerError::UnknownLayer(layer_id));
        }
        self.active_layer = Some(layer_id);
        Ok(())
    }

    /// Flip visibility; returns the new state
    pub fn toggle_visibility(&mut self, layer_id: LayerId) -> Result<bool, LayerError> {
        let layer = self.layer_mut(layer_id)?;
        layer.visible = !layer.visible;
        Ok(layer.visible)
    }

    /// Rename a layer. The name is trimmed; a blank name changes nothing.
    /// An unknown id is reported before the name is looked at.
    pub fn rename_layer(&mut self, layer_id: LayerId, name: &str) -> Result<(), LayerError> {
        let layer = self.layer_mut(layer_id)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(LayerError::EmptyName);
        }
        layer.name = name.to_string();
        Ok(())
    }

    // === Membership ===

    /// Append `object_id` to `target`, or to the active layer when no target is
    /// given. An object already filed elsewhere is moved, never duplicated.
    pub fn add_object(
        &mut self,
        object_id: ObjectId,
        target: Option<LayerId>,
    ) -> Result<(), LayerError> {
        let target = target
            .or(self.active_layer)
            .ok_or(LayerError::NoActiveLayer)?;
        if self.layer(target).is_none() {
            return Err(LayerError::UnknownLayer(target));
        }

        match self.layer_of(object_id) {
            Some(current) if current == target => return Ok(()),
            Some(_) => {
                self.remove_object(object_id);
            }
            None => {}
        }

        self.layer_mut(target)?.objects.push(object_id);
        self.index.insert(object_id, target);
        Ok(())
    }

    /// Drop `object_id` from whichever layer holds it. Returns that layer.
    pub fn remove_object(&mut self, object_id: ObjectId) -> Option<LayerId> {
        let layer_id = self.index.remove(&object_id)?;
        if let Ok(layer) = self.layer_mut(layer_id) {
            layer.objects.retain(|&id| id != object_id);
        }
        Some(layer_id)
    }
}
