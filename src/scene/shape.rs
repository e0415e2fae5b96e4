use super::path::{path_bounds, PathCommand};
use super::types::{BBox, ShapeStyle, Vec2};
use crate::types::ObjectId;
use std::fmt;

/// Engine-side handle of an object currently in the scene.
/// Every `Scene::add` mints a new key; `SceneKey::DETACHED` marks an object
/// that is not in any scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SceneKey(pub u64);

impl SceneKey {
    pub const DETACHED: SceneKey = SceneKey(0);
}

/// Shape type as the drawing engine names it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeKind {
    Rect,
    Circle,
    Path,
    Group,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShapeKind::Rect => "rect",
            ShapeKind::Circle => "circle",
            ShapeKind::Path => "path",
            ShapeKind::Group => "group",
        };
        f.write_str(name)
    }
}

/// Geometry definition for different shape types
#[derive(Clone, Debug, PartialEq)]
pub enum ShapeGeometry {
    /// Rectangle with optional corner radius (rx = ry)
    Rect {
        width: f32,
        height: f32,
        corner_radius: f32,
    },

    /// Circle; `left`/`top` address the corner of its bounding box
    Circle { radius: f32 },

    /// Free-form path in absolute coordinates, offset by the object position
    Path { commands: Vec<PathCommand> },

    /// Composite object. Members live here, not in the scene's object list.
    Group { members: Vec<SceneObject> },
}

impl ShapeGeometry {
    pub fn rect(width: f32, height: f32) -> Self {
        Self::Rect {
            width,
            height,
            corner_radius: 0.0,
        }
    }

    pub fn circle(radius: f32) -> Self {
        Self::Circle { radius }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            ShapeGeometry::Rect { .. } => ShapeKind::Rect,
            ShapeGeometry::Circle { .. } => ShapeKind::Circle,
            ShapeGeometry::Path { .. } => ShapeKind::Path,
            ShapeGeometry::Group { .. } => ShapeKind::Group,
        }
    }
}

/// Editable geometric attribute of a scene object
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeometryField {
    Left,
    Top,
    Width,
    Height,
    Radius,
    CornerRadius,
}

impl GeometryField {
    pub fn label(&self) -> &'static str {
        match self {
            GeometryField::Left => "left",
            GeometryField::Top => "top",
            GeometryField::Width => "width",
            GeometryField::Height => "height",
            GeometryField::Radius => "radius",
            GeometryField::CornerRadius => "corner radius",
        }
    }
}

/// A renderable object owned by the scene
#[derive(Clone, Debug, PartialEq)]
pub struct SceneObject {
    /// Engine handle, reassigned whenever the object is (re-)added
    pub key: SceneKey,

    /// Layer identity, absent until the editor tags the object
    pub tag: Option<ObjectId>,

    pub geometry: ShapeGeometry,

    /// Top-left corner (`left`, `top`)
    pub position: Vec2,

    pub style: ShapeStyle,

    pub visible: bool,
}

impl SceneObject {
    /// Create a detached, untagged, visible object
    pub fn new(geometry: ShapeGeometry, position: Vec2, style: ShapeStyle) -> Self {
        Self {
            key: SceneKey::DETACHED,
            tag: None,
            geometry,
            position,
            style,
            visible: true,
        }
    }

    /// Build a group around `members`. Fails when given nothing to group.
    pub fn group(members: Vec<SceneObject>) -> Option<Self> {
        if members.is_empty() {
            return None;
        }
        Some(Self {
            key: SceneKey::DETACHED,
            tag: None,
            geometry: ShapeGeometry::Group { members },
            position: Vec2::ZERO,
            style: ShapeStyle::default(),
            visible: true,
        })
    }

    pub fn with_tag(mut self, tag: ObjectId) -> Self {
        self.tag = Some(tag);
        self
    }

    pub fn kind(&self) -> ShapeKind {
        self.geometry.kind()
    }

    pub fn is_group(&self) -> bool {
        self.kind() == ShapeKind::Group
    }

    /// Group members, or an empty slice for plain shapes
    pub fn members(&self) -> &[SceneObject] {
        match &self.geometry {
            ShapeGeometry::Group { members } => members,
            _ => &[],
        }
    }

    /// Take the members out of a group. Plain shapes yield nothing.
    pub fn into_members(self) -> Vec<SceneObject> {
        match self.geometry {
            ShapeGeometry::Group { members } => members,
            _ => Vec::new(),
        }
    }

    /// World-space bounding box
    pub fn bounds(&self) -> BBox {
        let origin = BBox::new(self.position, self.position);
        match &self.geometry {
            ShapeGeometry::Rect { width, height, .. } => {
                BBox::new(self.position, self.position + Vec2::new(*width, *height))
            }
            ShapeGeometry::Circle { radius } => {
                BBox::new(self.position, self.position + Vec2::splat(radius * 2.0))
            }
            ShapeGeometry::Path { commands } => path_bounds(commands)
                .map(|b| b.translate(self.position))
                .unwrap_or(origin),
            ShapeGeometry::Group { members } => members
                .iter()
                .map(SceneObject::bounds)
                .reduce(|a, b| a.union(&b))
                .unwrap_or(origin),
        }
    }

    pub fn left(&self) -> f32 {
        self.bounds().min.x
    }

    pub fn top(&self) -> f32 {
        self.bounds().min.y
    }

    /// Move the object (and every member of a group) by `delta`
    pub fn translate(&mut self, delta: Vec2) {
        match &mut self.geometry {
            ShapeGeometry::Group { members } => {
                for member in members {
                    member.translate(delta);
                }
            }
            _ => self.position += delta,
        }
    }

    /// Write one editable attribute. Returns false when the attribute does not
    /// apply to this kind of shape; the object is left untouched in that case.
    pub fn apply_edit(&mut self, field: GeometryField, value: f32) -> bool {
        match field {
            GeometryField::Left => {
                let delta = Vec2::new(value - self.left(), 0.0);
                self.translate(delta);
                true
            }
            GeometryField::Top => {
                let delta = Vec2::new(0.0, value - self.top());
                self.translate(delta);
                true
            }
            GeometryField::Width | GeometryField::Height | GeometryField::CornerRadius => {
                let ShapeGeometry::Rect {
                    width,
                    height,
                    corner_radius,
                } = &mut self.geometry
                else {
                    return false;
                };
                let target = match field {
                    GeometryField::Width => width,
                    GeometryField::Height => height,
                    _ => corner_radius,
                };
                *target = value.max(0.0);
                true
            }
            GeometryField::Radius => {
                let ShapeGeometry::Circle { radius } = &mut self.geometry else {
                    return false;
                };
                *radius = value.max(0.0);
                true
            }
        }
    }

    /// Bounding-box hit test in world coordinates
    pub fn contains_point(&self, point: Vec2) -> bool {
        self.visible && self.bounds().contains(point)
    }
}
