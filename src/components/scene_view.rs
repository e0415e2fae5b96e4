use web_sys::SvgsvgElement;
use yew::prelude::*;

use crate::scene::{to_path_data, BBox, SceneObject, ShapeGeometry, ShapeStyle, Vec2};

const SELECTION_COLOR: &str = "#0d99ff";

#[derive(Properties, Clone, PartialEq)]
pub struct SceneViewProps {
    /// Top-level scene objects, bottom first
    pub objects: Vec<SceneObject>,

    /// Bounds of every selected object
    #[prop_or_default]
    pub selection: Vec<BBox>,

    /// Rubber band of a shape being drawn
    #[prop_or_default]
    pub draft: Option<BBox>,

    pub width: u32,
    pub height: u32,

    /// Pointer pressed at a canvas point; the flag is shift
    pub on_pointer_down: Callback<(Vec2, bool)>,
    pub on_pointer_move: Callback<Vec2>,
    pub on_pointer_up: Callback<Vec2>,
}

fn fill_of(style: &ShapeStyle) -> String {
    style
        .fill
        .map(|c| c.to_hex())
        .unwrap_or_else(|| "none".to_string())
}

fn render_object(object: &SceneObject) -> Html {
    if !object.visible {
        return html! {};
    }
    let fill = fill_of(&object.style);
    let (stroke, stroke_width) = match object.style.stroke {
        Some(stroke) => (stroke.color.to_hex(), stroke.width),
        None => ("none".to_string(), 0.0),
    };
    let pos = object.position;

    match &object.geometry {
        ShapeGeometry::Rect {
            width,
            height,
            corner_radius,
        } => html! {
            <rect
                x={pos.x.to_string()}
                y={pos.y.to_string()}
                width={width.to_string()}
                height={height.to_string()}
                rx={corner_radius.to_string()}
                ry={corner_radius.to_string()}
                {fill}
                {stroke}
                stroke-width={stroke_width.to_string()}
            />
        },
        ShapeGeometry::Circle { radius } => html! {
            <circle
                cx={(pos.x + radius).to_string()}
                cy={(pos.y + radius).to_string()}
                r={radius.to_string()}
                {fill}
                {stroke}
                stroke-width={stroke_width.to_string()}
            />
        },
        ShapeGeometry::Path { commands } => html! {
            <path
                d={to_path_data(commands)}
                transform={format!("translate({} {})", pos.x, pos.y)}
                {fill}
                {stroke}
                stroke-width={stroke_width.to_string()}
            />
        },
        ShapeGeometry::Group { members } => html! {
            <g>{ for members.iter().map(render_object) }</g>
        },
    }
}

fn outline(bbox: &BBox, dashed: bool) -> Html {
    html! {
        <rect
            x={bbox.min.x.to_string()}
            y={bbox.min.y.to_string()}
            width={bbox.width().to_string()}
            height={bbox.height().to_string()}
            fill="none"
            stroke={SELECTION_COLOR}
            stroke-width="1"
            stroke-dasharray={if dashed { "4,4" } else { "none" }}
        />
    }
}

/// Pointer position relative to the drawing surface
fn canvas_point(event: &MouseEvent, svg_ref: &NodeRef) -> Option<Vec2> {
    let svg = svg_ref.cast::<SvgsvgElement>()?;
    let rect = svg.get_bounding_client_rect();
    let x = event.client_x() as f64 - rect.left();
    let y = event.client_y() as f64 - rect.top();
    Some(Vec2::new(x as f32, y as f32))
}

/// SVG rendering of the scene plus selection chrome
#[function_component(SceneView)]
pub fn scene_view(props: &SceneViewProps) -> Html {
    let svg_ref = use_node_ref();

    let onmousedown = {
        let svg_ref = svg_ref.clone();
        let callback = props.on_pointer_down.clone();
        Callback::from(move |e: MouseEvent| {
            // Presses on the canvas must not reach the outer deselect handler
            e.stop_propagation();
            if let Some(point) = canvas_point(&e, &svg_ref) {
                callback.emit((point, e.shift_key()));
            }
        })
    };
    let onmousemove = {
        let svg_ref = svg_ref.clone();
        let callback = props.on_pointer_move.clone();
        Callback::from(move |e: MouseEvent| {
            if let Some(point) = canvas_point(&e, &svg_ref) {
                callback.emit(point);
            }
        })
    };
    let onmouseup = {
        let svg_ref = svg_ref.clone();
        let callback = props.on_pointer_up.clone();
        Callback::from(move |e: MouseEvent| {
            if let Some(point) = canvas_point(&e, &svg_ref) {
                callback.emit(point);
            }
        })
    };

    html! {
        <svg
            ref={svg_ref}
            class="bg-white shadow border border-gray-300"
            width={props.width.to_string()}
            height={props.height.to_string()}
            viewBox={format!("0 0 {} {}", props.width, props.height)}
            {onmousedown}
            {onmousemove}
            {onmouseup}
        >
            { for props.objects.iter().map(render_object) }
            { for props.selection.iter().map(|bbox| outline(bbox, false)) }
            { for props.draft.iter().map(|bbox| outline(bbox, true)) }
        </svg>
    }
}
