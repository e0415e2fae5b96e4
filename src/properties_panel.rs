use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::scene::GeometryField;
use crate::sync::ActiveGeometry;

#[derive(Properties, PartialEq)]
pub struct PropertiesPanelProps {
    pub geometry: Option<ActiveGeometry>,
    pub on_edit: Callback<(GeometryField, f32)>,
}

/// Numeric editor for the selected object's geometry
#[function_component(PropertiesPanel)]
pub fn properties_panel(props: &PropertiesPanelProps) -> Html {
    let Some(geometry) = props.geometry else {
        return html! {
            <div class="p-4">
                <h2 class="text-lg font-semibold pb-3 mb-4 border-b border-gray-200">{"Properties"}</h2>
                <p class="text-sm text-gray-500">{"Select a single shape to edit its geometry"}</p>
            </div>
        };
    };

    let title = match geometry {
        ActiveGeometry::Circle { .. } => "Circle",
        ActiveGeometry::Box { .. } => "Box",
        ActiveGeometry::Group { .. } => "Group",
    };

    html! {
        <div class="p-4">
            <h2 class="text-lg font-semibold pb-3 mb-4 border-b border-gray-200">{"Properties"}</h2>
            <p class="text-xs text-gray-500 mb-2">{ title }</p>
            <div class="grid grid-cols-2 gap-2">
                {
                    geometry.fields().into_iter().map(|(field, value)| {
                        let on_edit = props.on_edit.clone();
                        let oninput = Callback::from(move |e: InputEvent| {
                            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                                // Half-typed numbers are ignored until they parse
                                if let Ok(value) = input.value().parse::<f32>() {
                                    on_edit.emit((field, value));
                                }
                            }
                        });

                        html! {
                            <div key={field.label()}>
                                <label class="block text-xs text-gray-500 mb-1">{ field.label() }</label>
                                <input
                                    type="number"
                                    value={format!("{:.0}", value)}
                                    {oninput}
                                    class="w-full px-2 py-1 border border-gray-300 rounded text-sm bg-white text-gray-900"
                                />
                            </div>
                        }
                    }).collect::<Html>()
                }
            </div>
        </div>
    }
}
