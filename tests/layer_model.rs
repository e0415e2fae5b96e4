use std::collections::HashSet;

use layered_canvas::layers::{LayerKind, LayerStore};
use layered_canvas::scene::{
    parse_descriptors, Color, Scene, SceneGraph, SceneKey, SceneObject, ShapeGeometry, ShapeStyle,
    Vec2,
};
use layered_canvas::sync::{SceneSync, SyncError, ValidationError};
use layered_canvas::types::{LayerId, ObjectId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

type Editor = SceneSync<SceneGraph>;

fn square_at(x: f32, y: f32) -> SceneObject {
    SceneObject::new(
        ShapeGeometry::rect(30.0, 30.0),
        Vec2::new(x, y),
        ShapeStyle::fill_only(Color::black()),
    )
}

fn draw(editor: &mut Editor, x: f32, y: f32) -> SceneKey {
    let key = editor.scene_mut().add(square_at(x, y));
    editor.process_events();
    key
}

fn tag_of(editor: &Editor, key: SceneKey) -> ObjectId {
    editor
        .scene()
        .object(key)
        .and_then(|o| o.tag)
        .expect("drawn object is tagged")
}

fn ingest_three(editor: &mut Editor) {
    let descriptors = parse_descriptors(
        r##"[
            { "type": "rect", "left": 0, "top": 0, "width": 10, "height": 10 },
            { "type": "circle", "left": 40, "top": 0, "radius": 5, "fill": "#ff0000" },
            { "type": "path", "left": 80, "top": 0, "d": "M 0 0 L 10 0 L 10 10 Z" }
        ]"##,
    )
    .unwrap();
    assert_eq!(editor.ingest(&descriptors), 3);
}

/// Each id in at most one layer, the active layer exists, store and scene agree,
/// and no tag appears twice anywhere in the scene tree.
fn assert_consistent(editor: &Editor) {
    let store = editor.store();

    let mut filed = HashSet::new();
    for layer in store.layers() {
        for &id in &layer.objects {
            assert!(filed.insert(id), "{} filed twice", id);
            assert_eq!(store.layer_of(id), Some(layer.id));
        }
    }

    for layer in store.layers() {
        if layer.kind == LayerKind::Group {
            assert!(!layer.objects.is_empty(), "empty group layer {} left behind", layer.id);
        }
    }

    if let Some(active) = store.active_layer() {
        assert!(store.layer(active).is_some(), "dangling active layer {}", active);
    }

    assert!(editor.drifted_objects().is_empty());
    for object in editor.scene().objects() {
        if let Some(tag) = object.tag {
            assert!(store.contains_object(tag), "{} is unfiled", tag);
        }
    }

    fn collect_tags(object: &SceneObject, seen: &mut HashSet<ObjectId>) {
        if let Some(tag) = object.tag {
            assert!(seen.insert(tag), "{} appears twice in the scene", tag);
        }
        for member in object.members() {
            collect_tags(member, seen);
        }
    }
    let mut seen = HashSet::new();
    for object in editor.scene().objects() {
        collect_tags(object, &mut seen);
    }
}

#[test]
fn test_delete_active_layer_falls_back_to_first() {
    let mut store = LayerStore::new();
    let first = store.create_layer(None, LayerKind::Layer);
    let second = store.create_layer(None, LayerKind::Layer);
    store.set_active_layer(second).unwrap();

    store.delete_layer(second).unwrap();
    assert_eq!(store.active_layer(), Some(first));

    store.delete_layer(first).unwrap();
    assert_eq!(store.active_layer(), None);
    assert!(store.is_empty());
}

#[test]
fn test_layer_ids_strictly_increase_across_deletes() {
    let mut store = LayerStore::new();
    let a = store.create_layer(None, LayerKind::Layer);
    store.delete_layer(a).unwrap();
    let b = store.create_layer(None, LayerKind::Layer);
    let c = store.create_layer(Some("Named"), LayerKind::Group);

    assert!(b.number() > a.number());
    assert!(c.number() > b.number());
    assert_eq!(store.layer(b).unwrap().name, "Layer 2");
}

#[test]
fn test_ingest_preserves_order() {
    let mut editor = SceneSync::new(SceneGraph::new());
    ingest_three(&mut editor);

    let active = editor.store().active_layer().unwrap();
    let scene_tags: Vec<ObjectId> = editor
        .scene()
        .objects()
        .iter()
        .filter_map(|o| o.tag)
        .collect();
    assert_eq!(editor.store().layer(active).unwrap().objects, scene_tags);
    assert_eq!(scene_tags.len(), 3);
    assert_consistent(&editor);
}

#[test]
fn test_ingest_skips_unsupported() {
    let mut editor = SceneSync::new(SceneGraph::new());
    let descriptors = parse_descriptors(
        r#"[
            { "type": "rect", "width": 10, "height": 10 },
            { "type": "image", "src": "cat.png" },
            { "type": "path", "d": "" },
            { "type": "circle", "radius": 4 }
        ]"#,
    )
    .unwrap();

    assert_eq!(editor.ingest(&descriptors), 2);
    assert_eq!(editor.store().object_count(), 2);
    assert_eq!(editor.scene().len(), 2);
}

#[test]
fn test_group_then_ungroup() {
    let mut editor = SceneSync::new(SceneGraph::new());
    let first = draw(&mut editor, 0.0, 0.0);
    let second = draw(&mut editor, 50.0, 0.0);
    let original = [tag_of(&editor, first), tag_of(&editor, second)];
    let active = editor.store().active_layer().unwrap();
    let layers_before = editor.store().layers().len();

    editor.scene_mut().set_active_objects(&[first, second]);
    let group_id = editor.create_group().unwrap();

    let group_layers: Vec<_> = editor
        .store()
        .layers()
        .iter()
        .filter(|l| l.kind == LayerKind::Group)
        .collect();
    assert_eq!(group_layers.len(), 1);
    assert_eq!(group_layers[0].objects, vec![group_id]);
    let group_layer = group_layers[0].id;
    for id in original {
        assert!(!editor.store().contains_object(id));
    }
    assert_eq!(editor.scene().len(), 1);
    assert_consistent(&editor);

    let restored = editor.ungroup().unwrap();
    assert_eq!(restored.len(), 2);
    assert!(editor.store().layer(group_layer).is_none());
    assert_eq!(editor.store().layers().len(), layers_before);
    for id in &restored {
        assert_eq!(editor.store().layer_of(*id), Some(active));
    }
    assert_eq!(editor.scene().len(), 2);
    assert_consistent(&editor);
}

#[test]
fn test_regrouping_a_group_discards_its_layer() {
    let mut editor = SceneSync::new(SceneGraph::new());
    let a = draw(&mut editor, 0.0, 0.0);
    let b = draw(&mut editor, 50.0, 0.0);
    editor.scene_mut().set_active_objects(&[a, b]);
    let inner = editor.create_group().unwrap();
    let inner_layer = editor.store().layer_of(inner).unwrap();

    let c = draw(&mut editor, 100.0, 0.0);
    let inner_key = editor.scene().find_tagged(inner).unwrap();
    editor.scene_mut().set_active_objects(&[inner_key, c]);
    let outer = editor.create_group().unwrap();

    assert!(editor.store().layer(inner_layer).is_none());
    let group_layers: Vec<_> = editor
        .store()
        .layers()
        .iter()
        .filter(|l| l.kind == LayerKind::Group)
        .collect();
    assert_eq!(group_layers.len(), 1);
    assert_eq!(group_layers[0].objects, vec![outer]);
    assert_consistent(&editor);
}

#[test]
fn test_ungroup_with_group_layer_active() {
    let mut editor = SceneSync::new(SceneGraph::new());
    let a = draw(&mut editor, 0.0, 0.0);
    let b = draw(&mut editor, 50.0, 0.0);
    let base = editor.store().active_layer().unwrap();
    editor.scene_mut().set_active_objects(&[a, b]);
    let group_id = editor.create_group().unwrap();
    let group_layer = editor.store().layer_of(group_id).unwrap();

    editor.select_layer(group_layer).unwrap();
    let restored = editor.ungroup().unwrap();

    assert!(editor.store().layer(group_layer).is_none());
    assert_eq!(editor.store().active_layer(), Some(base));
    assert_eq!(editor.store().layers()[0].id, base);
    assert_eq!(editor.store().layers()[0].objects, restored);
    assert_eq!(restored.len(), 2);
    assert_consistent(&editor);
}

#[test]
fn test_group_needs_two_selected() {
    let mut editor = SceneSync::new(SceneGraph::new());
    let only = draw(&mut editor, 0.0, 0.0);
    let store_before = editor.store().clone();
    let scene_before = editor.scene().objects().to_vec();

    assert_eq!(
        editor.create_group(),
        Err(SyncError::Validation(ValidationError::NotEnoughSelected {
            selected: 0
        }))
    );

    editor.scene_mut().set_active_objects(&[only]);
    let err = editor.create_group().unwrap_err();
    assert!(err.is_validation());
    assert_eq!(
        err.to_string(),
        "Please select at least 2 objects to create a group"
    );

    assert_eq!(editor.store(), &store_before);
    assert_eq!(editor.scene().objects(), scene_before.as_slice());
}

#[test]
fn test_ungroup_requires_group() {
    let mut editor = SceneSync::new(SceneGraph::new());
    let key = draw(&mut editor, 0.0, 0.0);
    editor.scene_mut().set_active_objects(&[key]);

    assert_eq!(
        editor.ungroup(),
        Err(SyncError::Validation(ValidationError::NoGroupSelected))
    );
    assert_eq!(editor.scene().len(), 1);
}

#[test]
fn test_visibility_toggle_only_touches_its_layer() {
    let mut editor = SceneSync::new(SceneGraph::new());
    ingest_three(&mut editor);
    let base = editor.store().active_layer().unwrap();

    let a = draw(&mut editor, 0.0, 100.0);
    let b = draw(&mut editor, 50.0, 100.0);
    editor.scene_mut().set_active_objects(&[a, b]);
    let group_id = editor.create_group().unwrap();
    assert_eq!(editor.store().layer(base).unwrap().objects.len(), 3);

    assert_eq!(editor.toggle_layer_visibility(base), Ok(false));
    for object in editor.scene().objects() {
        let expected = object.tag == Some(group_id);
        assert_eq!(object.visible, expected);
    }

    assert_eq!(editor.toggle_layer_visibility(base), Ok(true));
    assert!(editor.scene().objects().iter().all(|o| o.visible));
}

#[test]
fn test_delete_layer_removes_its_objects() {
    let mut editor = SceneSync::new(SceneGraph::new());
    ingest_three(&mut editor);
    let base = editor.store().active_layer().unwrap();
    let a = draw(&mut editor, 0.0, 100.0);
    let b = draw(&mut editor, 50.0, 100.0);
    editor.scene_mut().set_active_objects(&[a, b]);
    editor.create_group().unwrap();

    let removed = editor.delete_layer(base).unwrap();
    assert_eq!(removed.len(), 3);
    assert_eq!(editor.scene().len(), 1);
    // Only the group layer is left
    let remaining = editor.store().layers()[0].id;
    assert_eq!(editor.store().active_layer(), Some(remaining));
    assert_consistent(&editor);
}

#[test]
fn test_tolerates_scene_drift() {
    let mut editor = SceneSync::new(SceneGraph::new());
    let key = draw(&mut editor, 0.0, 0.0);
    let tag = tag_of(&editor, key);
    let layer = editor.store().active_layer().unwrap();

    // Removed behind the editor's back
    editor.scene_mut().remove(key);
    assert_eq!(editor.drifted_objects(), vec![tag]);

    assert!(editor.toggle_layer_visibility(layer).is_ok());
    assert_eq!(editor.delete_layer(layer), Ok(vec![tag]));
    assert!(editor.drifted_objects().is_empty());
}

#[test]
fn test_remove_selection_drops_ids() {
    let mut editor = SceneSync::new(SceneGraph::new());
    let a = draw(&mut editor, 0.0, 0.0);
    let b = draw(&mut editor, 50.0, 0.0);
    editor.scene_mut().set_active_objects(&[a, b]);
    editor.create_group().unwrap();

    // Removing the lone group also clears out its layer
    let removed = editor.remove_selection();
    assert_eq!(removed.len(), 1);
    assert!(editor.scene().is_empty());
    assert_eq!(editor.store().object_count(), 0);
    assert!(editor
        .store()
        .layers()
        .iter()
        .all(|l| l.kind == LayerKind::Layer));
    assert_consistent(&editor);
}

#[test]
fn test_random_cycling_keeps_invariants() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut editor = SceneSync::new(SceneGraph::new());
    let mut issued: HashSet<ObjectId> = HashSet::new();

    for step in 0..500 {
        match rng.gen_range(0..8) {
            0 | 1 => {
                let x = rng.gen_range(0.0..700.0);
                let y = rng.gen_range(0.0..500.0);
                let key = draw(&mut editor, x, y);
                let tag = tag_of(&editor, key);
                assert!(issued.insert(tag), "step {}: {} issued twice", step, tag);
            }
            2 => {
                let keys: Vec<SceneKey> =
                    editor.scene().objects().iter().map(|o| o.key).collect();
                let picked: Vec<SceneKey> =
                    keys.into_iter().filter(|_| rng.gen_bool(0.5)).collect();
                editor.scene_mut().set_active_objects(&picked);
                editor.process_events();
                let _ = editor.create_group();
            }
            3 => {
                let groups: Vec<SceneKey> = editor
                    .scene()
                    .objects()
                    .iter()
                    .filter(|o| o.is_group())
                    .map(|o| o.key)
                    .collect();
                if let Some(&key) = groups.get(rng.gen_range(0..groups.len().max(1))) {
                    editor.scene_mut().set_active_objects(&[key]);
                    editor.process_events();
                }
                let _ = editor.ungroup();
            }
            4 => {
                let layers: Vec<LayerId> = editor.store().layers().iter().map(|l| l.id).collect();
                if !layers.is_empty() && rng.gen_bool(0.3) {
                    let target = layers[rng.gen_range(0..layers.len())];
                    editor.delete_layer(target).unwrap();
                }
            }
            5 => {
                let layers: Vec<LayerId> = editor.store().layers().iter().map(|l| l.id).collect();
                if let Some(&target) = layers.get(rng.gen_range(0..layers.len().max(1))) {
                    editor.toggle_layer_visibility(target).unwrap();
                    editor.select_layer(target).unwrap();
                }
            }
            6 => {
                let keys: Vec<SceneKey> =
                    editor.scene().objects().iter().map(|o| o.key).collect();
                if let Some(&key) = keys.get(rng.gen_range(0..keys.len().max(1))) {
                    editor.scene_mut().set_active_objects(&[key]);
                    for id in editor.clone_selection() {
                        assert!(issued.insert(id), "step {}: clone reused {}", step, id);
                    }
                }
            }
            _ => {
                editor.remove_selection();
            }
        }
        editor.process_events();
        assert_consistent(&editor);
    }
}
