use std::cell::RefCell;
use std::rc::Rc;

use web_sys::HtmlSelectElement;
use yew::prelude::*;

use crate::components::SceneView;
use crate::config::EditorConfig;
use crate::keyboard::{KeyBindings, KeyboardSubscription};
use crate::layers_panel::LayersPanel;
use crate::properties_panel::PropertiesPanel;
use crate::scene::{
    export_svg, parse_descriptors, BBox, Color, GeometryField, Scene, SceneGraph, SceneKey,
    SceneObject, ShapeGeometry, ShapeStyle, Vec2,
};
use crate::sync::{SceneNotice, SceneSync, SyncError};
use crate::types::LayerId;

type Editor = SceneSync<SceneGraph>;

/// Shapes placed on the canvas at startup
const STARTER_SHAPES: &str = r##"[
    { "type": "rect", "left": 60, "top": 60, "width": 160, "height": 100, "rx": 8, "fill": "#ef4444" },
    { "type": "circle", "left": 280, "top": 80, "radius": 50, "fill": "#3b82f6" },
    { "type": "path", "left": 420, "top": 60, "d": "M 0 100 L 60 0 L 120 100 Z", "fill": "#22c55e", "stroke": "#14532d", "strokeWidth": 2 }
]"##;

const CONFIG_ELEMENT_ID: &str = "editor-config";

/// Shapes smaller than this on either axis are treated as a stray click
const MIN_DRAW_SIZE: f32 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tool {
    Select,
    Rect,
    Circle,
}

impl Tool {
    fn label(&self) -> &'static str {
        match self {
            Tool::Select => "Select",
            Tool::Rect => "Rectangle",
            Tool::Circle => "Circle",
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Drag {
    Move { last: Vec2 },
    Draw { start: Vec2, current: Vec2 },
}

/// Drain scene events and re-export the drawing after each render pass
fn settle(editor: &mut Editor, markup: &RefCell<String>, size: (u32, u32)) {
    for notice in editor.process_events() {
        match notice {
            SceneNotice::Rendered => {
                *markup.borrow_mut() = export_svg(editor.scene().objects(), size.0, size.1);
            }
            SceneNotice::Modified(object_id) => log::debug!("{} modified", object_id),
        }
    }
}

fn report(err: SyncError) {
    if err.is_validation() {
        gloo::dialogs::alert(&err.to_string());
    } else {
        log::error!("{}", err);
    }
}

fn tool_button_style(current: Tool, candidate: Tool) -> &'static str {
    if current == candidate {
        "bg-blue-100 border-blue-300"
    } else {
        "bg-white border-gray-300"
    }
}

/// Config embedded in the host page as `<script id="editor-config" type="application/json">`
fn page_config() -> EditorConfig {
    let source = gloo_utils::document()
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|element| element.text_content());
    EditorConfig::load(source.as_deref())
}

fn drawn_shape(tool: Tool, start: Vec2, end: Vec2) -> Option<SceneObject> {
    let min = start.min(end);
    let size = (end - start).abs();
    if size.x < MIN_DRAW_SIZE || size.y < MIN_DRAW_SIZE {
        return None;
    }
    let geometry = match tool {
        Tool::Rect => ShapeGeometry::rect(size.x, size.y),
        Tool::Circle => ShapeGeometry::circle(size.x.min(size.y) / 2.0),
        Tool::Select => return None,
    };
    let fill = Color::from_hex("#a3a3a3").unwrap_or_default();
    Some(SceneObject::new(geometry, min, ShapeStyle::fill_only(fill)))
}

#[function_component(App)]
pub fn app() -> Html {
    let config = use_memo((), |_| page_config());
    let canvas_size = use_state(|| (config.width, config.height));
    let tool = use_state(|| Tool::Select);
    let force_update = use_force_update();

    let markup = use_mut_ref(String::new);
    let drag = use_mut_ref(|| None::<Drag>);
    let editor: Rc<RefCell<Editor>> = {
        let config = config.clone();
        use_mut_ref(move || {
            let mut editor = SceneSync::with_config(SceneGraph::new(), &config);
            match parse_descriptors(STARTER_SHAPES) {
                Ok(descriptors) => {
                    editor.ingest(&descriptors);
                }
                Err(err) => log::error!("starter shapes: {}", err),
            }
            editor
        })
    };

    // Runs one transition against the editor, then re-renders
    let act = {
        let editor = editor.clone();
        let markup = markup.clone();
        let force_update = force_update.clone();
        let size = *canvas_size;
        Rc::new(move |f: &dyn Fn(&mut Editor)| {
            {
                let mut editor = editor.borrow_mut();
                f(&mut editor);
                settle(&mut editor, &markup, size);
            }
            force_update.force_update();
        })
    };

    // Delete/Backspace removes the selection
    {
        let act = act.clone();
        let editor = editor.clone();
        use_effect_with(*canvas_size, move |_| {
            let bindings = KeyBindings::new(move || {
                if editor.borrow().scene().active_objects().is_empty() {
                    return false;
                }
                act(&|editor: &mut Editor| {
                    editor.remove_selection();
                });
                true
            });
            let subscription = KeyboardSubscription::attach(&gloo_utils::document(), bindings);
            move || subscription.dispose()
        });
    }

    // === Canvas interaction ===

    let on_pointer_down = {
        let act = act.clone();
        let drag = drag.clone();
        let tool = *tool;
        Callback::from(move |(point, shift): (Vec2, bool)| {
            if tool != Tool::Select {
                *drag.borrow_mut() = Some(Drag::Draw {
                    start: point,
                    current: point,
                });
                return;
            }
            let drag = drag.clone();
            act(&move |editor: &mut Editor| {
                let scene = editor.scene_mut();
                match scene.hit_test(point) {
                    Some(key) => {
                        // Pressing on part of a multi-selection drags all of it
                        if shift || !scene.is_selected(key) {
                            scene.select(key, shift);
                        }
                        *drag.borrow_mut() = Some(Drag::Move { last: point });
                    }
                    None if !shift => editor.discard_selection(),
                    None => {}
                }
            });
        })
    };

    let on_pointer_move = {
        let act = act.clone();
        let drag = drag.clone();
        let force_update = force_update.clone();
        Callback::from(move |point: Vec2| {
            let current = *drag.borrow();
            match current {
                Some(Drag::Move { last }) => {
                    *drag.borrow_mut() = Some(Drag::Move { last: point });
                    act(&|editor: &mut Editor| {
                        let scene = editor.scene_mut();
                        for key in scene.active_objects() {
                            scene.move_object(key, point - last);
                        }
                    });
                }
                Some(Drag::Draw { start, .. }) => {
                    *drag.borrow_mut() = Some(Drag::Draw {
                        start,
                        current: point,
                    });
                    force_update.force_update();
                }
                None => {}
            }
        })
    };

    let on_pointer_up = {
        let act = act.clone();
        let drag = drag.clone();
        let tool = *tool;
        Callback::from(move |point: Vec2| {
            let finished = drag.borrow_mut().take();
            match finished {
                Some(Drag::Draw { start, .. }) => act(&|editor: &mut Editor| {
                    if let Some(shape) = drawn_shape(tool, start, point) {
                        let scene = editor.scene_mut();
                        let key = scene.add(shape);
                        scene.select(key, false);
                        scene.render_all();
                    }
                }),
                Some(Drag::Move { .. }) => act(&|editor: &mut Editor| editor.scene_mut().render_all()),
                None => {}
            }
        })
    };

    // Clicking outside the drawing surface clears the selection
    let on_outside = {
        let act = act.clone();
        Callback::from(move |_: MouseEvent| act(&|editor: &mut Editor| editor.discard_selection()))
    };

    // === Toolbar ===

    let tool_button = |candidate: Tool| {
        let current = *tool;
        let onclick = {
            let tool = tool.clone();
            Callback::from(move |_: MouseEvent| tool.set(candidate))
        };
        html! {
            <button
                class={classes!(
                    "px-3", "py-1", "text-sm", "rounded", "border",
                    tool_button_style(current, candidate),
                )}
                {onclick}
            >
                { candidate.label() }
            </button>
        }
    };

    let on_preset = {
        let canvas_size = canvas_size.clone();
        let config = config.clone();
        Callback::from(move |e: Event| {
            let Some(select) = e.target_dyn_into::<HtmlSelectElement>() else {
                return;
            };
            match config.preset(&select.value()) {
                Some(preset) => canvas_size.set((preset.width, preset.height)),
                None => canvas_size.set((config.width, config.height)),
            }
        })
    };

    let on_clone = {
        let act = act.clone();
        Callback::from(move |_: MouseEvent| {
            act(&|editor: &mut Editor| {
                editor.clone_selection();
            })
        })
    };
    let on_trash = {
        let act = act.clone();
        Callback::from(move |_: MouseEvent| {
            act(&|editor: &mut Editor| {
                editor.remove_selection();
            })
        })
    };

    // === Panel contract ===

    let on_layer_select = {
        let act = act.clone();
        Callback::from(move |layer_id: LayerId| {
            act(&|editor: &mut Editor| {
                if let Err(err) = editor.select_layer(layer_id) {
                    report(err);
                }
            })
        })
    };
    let on_layer_toggle = {
        let act = act.clone();
        Callback::from(move |layer_id: LayerId| {
            act(&|editor: &mut Editor| {
                if let Err(err) = editor.toggle_layer_visibility(layer_id) {
                    report(err);
                }
            })
        })
    };
    let on_layer_delete = {
        let act = act.clone();
        Callback::from(move |layer_id: LayerId| {
            act(&|editor: &mut Editor| {
                if let Err(err) = editor.delete_layer(layer_id) {
                    report(err);
                }
            })
        })
    };
    let on_layer_rename = {
        let act = act.clone();
        Callback::from(move |(layer_id, name): (LayerId, String)| {
            act(&|editor: &mut Editor| {
                if let Err(err) = editor.rename_layer(layer_id, &name) {
                    report(err);
                }
            })
        })
    };
    let on_create_group = {
        let act = act.clone();
        Callback::from(move |_: ()| {
            act(&|editor: &mut Editor| {
                if let Err(err) = editor.create_group() {
                    report(err);
                }
            })
        })
    };
    let on_ungroup_objects = {
        let act = act.clone();
        Callback::from(move |_: ()| {
            act(&|editor: &mut Editor| {
                if let Err(err) = editor.ungroup() {
                    report(err);
                }
            })
        })
    };
    let on_edit = {
        let act = act.clone();
        Callback::from(move |(field, value): (GeometryField, f32)| {
            act(&|editor: &mut Editor| {
                editor.edit_active_geometry(field, value);
            })
        })
    };

    // === Snapshot for rendering ===

    let (objects, selection, layers, active_layer, geometry) = {
        let editor = editor.borrow();
        let scene = editor.scene();
        let selection: Vec<BBox> = scene
            .active_objects()
            .into_iter()
            .filter_map(|key: SceneKey| scene.object(key).map(SceneObject::bounds))
            .collect();
        (
            scene.objects().to_vec(),
            selection,
            editor.store().layers().to_vec(),
            editor.store().active_layer(),
            editor.active_geometry(),
        )
    };
    let draft = match *drag.borrow() {
        Some(Drag::Draw { start, current }) => Some(BBox::new(start.min(current), start.max(current))),
        _ => None,
    };
    let exported = markup.borrow().clone();
    let (width, height) = *canvas_size;

    html! {
        <div class="flex h-screen bg-gray-100">
            <div class="flex-1 flex flex-col">
                <div class="flex items-center gap-2 p-2 bg-white border-b border-gray-300">
                    { tool_button(Tool::Select) }
                    { tool_button(Tool::Rect) }
                    { tool_button(Tool::Circle) }
                    <select class="px-2 py-1 text-sm border border-gray-300 rounded" onchange={on_preset}>
                        <option value="">{ format!("Default ({}×{})", config.width, config.height) }</option>
                        { for config.presets.iter().map(|p| html! {
                            <option value={p.name.clone()}>{ format!("{} ({}×{})", p.name, p.width, p.height) }</option>
                        }) }
                    </select>
                    <button class="px-3 py-1 text-sm border rounded" title="Clone selection" onclick={on_clone}>{"Clone"}</button>
                    <button class="px-3 py-1 text-sm border rounded" title="Delete selection" onclick={on_trash}>{"🗑"}</button>
                </div>
                <div class="flex-1 flex items-center justify-center overflow-auto" onmousedown={on_outside}>
                    <SceneView
                        {objects}
                        {selection}
                        {draft}
                        {width}
                        {height}
                        {on_pointer_down}
                        {on_pointer_move}
                        {on_pointer_up}
                    />
                </div>
                <details class="p-2 bg-white border-t border-gray-300">
                    <summary class="text-sm text-gray-600 cursor-pointer">{"SVG export"}</summary>
                    <pre class="text-xs overflow-auto max-h-40">{ exported }</pre>
                </details>
            </div>
            <div class="flex flex-col w-64">
                <PropertiesPanel {geometry} {on_edit} />
                <LayersPanel
                    {layers}
                    {active_layer}
                    {on_layer_select}
                    {on_layer_toggle}
                    {on_layer_delete}
                    {on_layer_rename}
                    {on_create_group}
                    {on_ungroup_objects}
                />
            </div>
        </div>
    }
}
