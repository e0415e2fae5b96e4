use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::layers::Layer;
use crate::types::LayerId;

#[derive(Properties, PartialEq)]
pub struct LayersPanelProps {
    pub layers: Vec<Layer>,
    pub active_layer: Option<LayerId>,
    pub on_layer_select: Callback<LayerId>,
    pub on_layer_toggle: Callback<LayerId>,
    pub on_layer_delete: Callback<LayerId>,
    pub on_layer_rename: Callback<(LayerId, String)>,
    pub on_create_group: Callback<()>,
    pub on_ungroup_objects: Callback<()>,
}

#[function_component(LayersPanel)]
pub fn layers_panel(props: &LayersPanelProps) -> Html {
    let editing = use_state(|| None::<LayerId>);
    let draft = use_state(String::new);

    // Blank drafts keep the field open
    let commit_rename = {
        let editing = editing.clone();
        let draft = draft.clone();
        let on_rename = props.on_layer_rename.clone();
        Callback::from(move |layer_id: LayerId| {
            let name = draft.trim().to_string();
            if !name.is_empty() {
                on_rename.emit((layer_id, name));
                editing.set(None);
                draft.set(String::new());
            }
        })
    };

    let on_group = {
        let cb = props.on_create_group.clone();
        Callback::from(move |_: MouseEvent| cb.emit(()))
    };
    let on_ungroup = {
        let cb = props.on_ungroup_objects.clone();
        Callback::from(move |_: MouseEvent| cb.emit(()))
    };

    html! {
        <div class="w-64 flex-none bg-white border-l border-gray-300 p-4 overflow-y-auto">
            <div class="flex items-center justify-between pb-3 mb-4 border-b border-gray-200">
                <h2 class="text-lg font-semibold">{"Layers"}</h2>
                <div class="flex gap-1">
                    <button class="px-2 py-1 text-xs border rounded hover:bg-gray-100"
                        title="Group selected objects" onclick={on_group}>{"Group"}</button>
                    <button class="px-2 py-1 text-xs border rounded hover:bg-gray-100"
                        title="Ungroup selected objects" onclick={on_ungroup}>{"Ungroup"}</button>
                </div>
            </div>
            <div class="space-y-2">
                {
                    props.layers.iter().map(|layer| {
                        let id = layer.id;
                        let is_active = props.active_layer == Some(id);
                        let is_editing = *editing == Some(id);

                        let on_toggle = {
                            let cb = props.on_layer_toggle.clone();
                            Callback::from(move |_: MouseEvent| cb.emit(id))
                        };
                        let on_select = {
                            let cb = props.on_layer_select.clone();
                            Callback::from(move |_: MouseEvent| cb.emit(id))
                        };
                        let on_delete = {
                            let cb = props.on_layer_delete.clone();
                            Callback::from(move |_: MouseEvent| cb.emit(id))
                        };
                        let start_rename = {
                            let editing = editing.clone();
                            let draft = draft.clone();
                            let name = layer.name.clone();
                            Callback::from(move |_: MouseEvent| {
                                editing.set(Some(id));
                                draft.set(name.clone());
                            })
                        };

                        html! {
                            <div
                                key={id.to_string()}
                                class={classes!(
                                    "flex", "items-center", "gap-2", "p-2", "rounded", "border",
                                    if is_active { "bg-blue-100 border-blue-300" } else { "bg-white border-gray-200" },
                                    (!layer.visible).then_some("opacity-50"),
                                )}
                            >
                                <button
                                    class="w-6 text-sm"
                                    title={if layer.visible { "Hide layer" } else { "Show layer" }}
                                    onclick={on_toggle}
                                >
                                    { if layer.visible { "👁" } else { "–" } }
                                </button>

                                if is_editing {
                                    <input
                                        type="text"
                                        class="flex-1 px-1 text-sm border border-gray-300 rounded"
                                        autofocus=true
                                        value={(*draft).clone()}
                                        oninput={
                                            let draft = draft.clone();
                                            Callback::from(move |e: InputEvent| {
                                                if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                                                    draft.set(input.value());
                                                }
                                            })
                                        }
                                        onblur={
                                            let commit = commit_rename.clone();
                                            Callback::from(move |_: FocusEvent| commit.emit(id))
                                        }
                                        onkeydown={
                                            let commit = commit_rename.clone();
                                            Callback::from(move |e: KeyboardEvent| {
                                                if e.key() == "Enter" {
                                                    commit.emit(id);
                                                }
                                            })
                                        }
                                    />
                                } else {
                                    <span
                                        class="flex-1 text-sm cursor-pointer truncate"
                                        onclick={on_select}
                                        ondblclick={start_rename}
                                    >
                                        { &layer.name }
                                    </span>
                                }

                                <span class="text-xs text-gray-500">
                                    { format!("{} objects", layer.objects.len()) }
                                </span>
                                <span class="text-xs">
                                    { if layer.is_group() { "📁" } else { "📄" } }
                                </span>
                                <button class="text-sm text-gray-500 hover:text-red-600"
                                    title="Delete layer" onclick={on_delete}>{"×"}</button>
                            </div>
                        }
                    }).collect::<Html>()
                }

                if props.layers.is_empty() {
                    <p class="text-sm text-gray-500">
                        {"No layers yet. Create some objects to see them here."}
                    </p>
                }
            </div>
        </div>
    }
}
