//! SVG markup of the visible scene, regenerated after every render pass.

use super::path::to_path_data;
use super::shape::{SceneObject, ShapeGeometry};
use super::types::ShapeStyle;

fn paint_attributes(style: &ShapeStyle) -> String {
    let fill = style
        .fill
        .map(|c| c.to_hex())
        .unwrap_or_else(|| "none".to_string());
    match style.stroke {
        Some(stroke) => format!(
            r#" fill="{}" stroke="{}" stroke-width="{}""#,
            fill,
            stroke.color.to_hex(),
            stroke.width
        ),
        None => format!(r#" fill="{}""#, fill),
    }
}

fn write_object(out: &mut String, object: &SceneObject) {
    if !object.visible {
        return;
    }
    let paint = paint_attributes(&object.style);
    let pos = object.position;

    match &object.geometry {
        ShapeGeometry::Rect {
            width,
            height,
            corner_radius,
        } => {
            out.push_str(&format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}" ry="{}"{} />"#,
                pos.x, pos.y, width, height, corner_radius, corner_radius, paint
            ));
        }
        ShapeGeometry::Circle { radius } => {
            out.push_str(&format!(
                r#"<circle cx="{}" cy="{}" r="{}"{} />"#,
                pos.x + radius,
                pos.y + radius,
                radius,
                paint
            ));
        }
        ShapeGeometry::Path { commands } => {
            out.push_str(&format!(
                r#"<path d="{}" transform="translate({} {})"{} />"#,
                to_path_data(commands),
                pos.x,
                pos.y,
                paint
            ));
        }
        ShapeGeometry::Group { members } => {
            out.push_str("<g>");
            for member in members {
                write_object(out, member);
            }
            out.push_str("</g>");
        }
    }
}

/// Serialize the visible top-level objects, bottom of the stack first
pub fn export_svg(objects: &[SceneObject], width: u32, height: u32) -> String {
    let mut out = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = width,
        h = height
    );
    for object in objects {
        write_object(&mut out, object);
    }
    out.push_str("</svg>");
    out
}
