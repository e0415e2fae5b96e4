use crate::scene::{GeometryField, SceneObject, ShapeGeometry};

/// Editable attributes of the selected object, mirrored for the geometry editor.
/// Display state only; the scene stays authoritative.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ActiveGeometry {
    Circle {
        radius: f32,
        left: f32,
        top: f32,
    },
    Box {
        width: f32,
        height: f32,
        left: f32,
        top: f32,
        corner_radius: f32,
    },
    /// Groups only move; their size follows the members
    Group {
        left: f32,
        top: f32,
    },
}

impl ActiveGeometry {
    /// Mirror a scene object. Paths expose nothing editable.
    pub fn from_object(object: &SceneObject) -> Option<Self> {
        let bounds = object.bounds();
        match &object.geometry {
            ShapeGeometry::Circle { radius } => Some(ActiveGeometry::Circle {
                radius: *radius,
                left: bounds.min.x,
                top: bounds.min.y,
            }),
            ShapeGeometry::Rect {
                width,
                height,
                corner_radius,
            } => Some(ActiveGeometry::Box {
                width: *width,
                height: *height,
                left: bounds.min.x,
                top: bounds.min.y,
                corner_radius: *corner_radius,
            }),
            ShapeGeometry::Group { .. } => Some(ActiveGeometry::Group {
                left: bounds.min.x,
                top: bounds.min.y,
            }),
            ShapeGeometry::Path { .. } => None,
        }
    }

    /// Fields in editor order
    pub fn fields(&self) -> Vec<(GeometryField, f32)> {
        match *self {
            ActiveGeometry::Circle { radius, left, top } => vec![
                (GeometryField::Radius, radius),
                (GeometryField::Left, left),
                (GeometryField::Top, top),
            ],
            ActiveGeometry::Box {
                width,
                height,
                left,
                top,
                corner_radius,
            } => vec![
                (GeometryField::Width, width),
                (GeometryField::Height, height),
                (GeometryField::Left, left),
                (GeometryField::Top, top),
                (GeometryField::CornerRadius, corner_radius),
            ],
            ActiveGeometry::Group { left, top } => vec![
                (GeometryField::Left, left),
                (GeometryField::Top, top),
            ],
        }
    }
}
