//! Shape descriptor import format used to populate the scene on startup.
//!
//! ```json
//! [
//!   { "type": "rect", "left": 10, "top": 10, "width": 120, "height": 12, "rx": 3, "fill": "#eee" },
//!   { "type": "circle", "left": 10, "top": 40, "radius": 20 },
//!   { "type": "path", "d": "M0 0 L10 10 Z", "stroke": "#333", "strokeWidth": 2 }
//! ]
//! ```

use serde::Deserialize;
use thiserror::Error;

use super::path::parse_path_data;
use super::shape::{SceneObject, ShapeGeometry};
use super::types::{Color, ShapeStyle, StrokeStyle, Vec2};

#[derive(Error, Debug)]
pub enum DescriptorError {
    #[error("shape descriptors are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("shape descriptors must be a JSON array")]
    NotAnArray,
}

/// Fill and stroke as written in the import format
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paint {
    #[serde(default)]
    pub fill: Option<String>,
    #[serde(default)]
    pub stroke: Option<String>,
    #[serde(default)]
    pub stroke_width: Option<f32>,
}

impl Paint {
    fn style(&self, default_fill: Option<Color>) -> ShapeStyle {
        let fill = match &self.fill {
            Some(value) => Color::parse(value),
            None => default_fill,
        };
        let stroke = self.stroke.as_deref().and_then(Color::parse).map(|color| {
            StrokeStyle::new(color, self.stroke_width.unwrap_or(1.0))
        });
        ShapeStyle::new(fill, stroke)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RectDescriptor {
    #[serde(default)]
    pub left: f32,
    #[serde(default)]
    pub top: f32,
    pub width: f32,
    pub height: f32,
    /// Corner radius
    #[serde(default)]
    pub rx: f32,
    #[serde(flatten)]
    pub paint: Paint,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CircleDescriptor {
    #[serde(default)]
    pub left: f32,
    #[serde(default)]
    pub top: f32,
    pub radius: f32,
    #[serde(flatten)]
    pub paint: Paint,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PathDescriptor {
    #[serde(default)]
    pub left: f32,
    #[serde(default)]
    pub top: f32,
    /// SVG path data
    pub d: String,
    #[serde(flatten)]
    pub paint: Paint,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ShapeDescriptor {
    Rect(RectDescriptor),
    Circle(CircleDescriptor),
    Path(PathDescriptor),
    /// Any other `type`; skipped on ingest
    #[serde(other)]
    Unsupported,
}

impl ShapeDescriptor {
    /// Instantiate the described shape as a detached, untagged scene object.
    /// `None` for unsupported kinds and for paths without usable data.
    pub fn to_scene_object(&self) -> Option<SceneObject> {
        match self {
            ShapeDescriptor::Rect(rect) => Some(SceneObject::new(
                ShapeGeometry::Rect {
                    width: rect.width,
                    height: rect.height,
                    corner_radius: rect.rx,
                },
                Vec2::new(rect.left, rect.top),
                rect.paint.style(Some(Color::black())),
            )),
            ShapeDescriptor::Circle(circle) => Some(SceneObject::new(
                ShapeGeometry::circle(circle.radius),
                Vec2::new(circle.left, circle.top),
                circle.paint.style(Some(Color::black())),
            )),
            ShapeDescriptor::Path(path) => {
                let commands = parse_path_data(&path.d);
                if commands.is_empty() {
                    return None;
                }
                let mut style = path.paint.style(None);
                if style.fill.is_none() && style.stroke.is_none() {
                    style = ShapeStyle::stroke_only(StrokeStyle::default());
                }
                Some(SceneObject::new(
                    ShapeGeometry::Path { commands },
                    Vec2::new(path.left, path.top),
                    style,
                ))
            }
            ShapeDescriptor::Unsupported => None,
        }
    }
}

/// Parse an ordered descriptor list. Entries that do not match their declared
/// kind are dropped with a warning; the rest keep their order.
pub fn parse_descriptors(json: &str) -> Result<Vec<ShapeDescriptor>, DescriptorError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let serde_json::Value::Array(entries) = value else {
        return Err(DescriptorError::NotAnArray);
    };

    let descriptors = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value(entry) {
            Ok(descriptor) => Some(descriptor),
            Err(err) => {
                log::warn!("skipping malformed shape descriptor #{}: {}", index, err);
                None
            }
        })
        .collect();

    Ok(descriptors)
}
