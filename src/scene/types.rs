pub use glam::Vec2;

/// RGBA color with f32 components (0.0 - 1.0)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn white() -> Self {
        Self::rgb(1.0, 1.0, 1.0)
    }

    pub const fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }

    /// Parse a hex color string (e.g., "#ef4444", "ef4444" or "#eee")
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        let expanded;
        let hex = if hex.len() == 3 {
            expanded = hex.chars().flat_map(|c| [c, c]).collect::<String>();
            expanded.as_str()
        } else {
            hex
        };
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }

        let r = u8::from_str_radix(&hex[0..2], 16).ok()? as f32 / 255.0;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()? as f32 / 255.0;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()? as f32 / 255.0;

        Some(Self::rgb(r, g, b))
    }

    /// Accepts hex notation plus the two keywords the drawing tools emit.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "black" => Some(Self::black()),
            "white" => Some(Self::white()),
            other => Self::from_hex(other),
        }
    }

    /// Convert to hex string (e.g., "#ef4444")
    pub fn to_hex(&self) -> String {
        let r = (self.r * 255.0).round() as u8;
        let g = (self.g * 255.0).round() as u8;
        let b = (self.b * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

/// Stroke styling for shape outlines
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f32,
}

impl StrokeStyle {
    pub fn new(color: Color, width: f32) -> Self {
        Self { color, width }
    }
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: Color::black(),
            width: 1.0,
        }
    }
}

/// Complete styling for a shape (fill and/or stroke)
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ShapeStyle {
    pub fill: Option<Color>,
    pub stroke: Option<StrokeStyle>,
}

impl ShapeStyle {
    pub fn new(fill: Option<Color>, stroke: Option<StrokeStyle>) -> Self {
        Self { fill, stroke }
    }

    pub fn fill_only(color: Color) -> Self {
        Self {
            fill: Some(color),
            stroke: None,
        }
    }

    pub fn stroke_only(stroke: StrokeStyle) -> Self {
        Self {
            fill: None,
            stroke: Some(stroke),
        }
    }
}

/// Axis-aligned bounding box using Vec2
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBox {
    pub min: Vec2,
    pub max: Vec2,
}

impl BBox {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_points(points: &[Vec2]) -> Option<Self> {
        let (first, rest) = points.split_first()?;

        let mut min = *first;
        let mut max = *first;

        for &p in rest {
            min = min.min(p);
            max = max.max(p);
        }

        Some(Self { min, max })
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Expand to include another bounding box
    pub fn union(&self, other: &BBox) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn translate(&self, delta: Vec2) -> Self {
        Self {
            min: self.min + delta,
            max: self.max + delta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex_parsing() {
        let color = Color::from_hex("#ef4444").unwrap();
        assert!((color.r - 0.937).abs() < 0.01);
        assert!((color.g - 0.267).abs() < 0.01);
        assert!((color.b - 0.267).abs() < 0.01);
    }

    #[test]
    fn test_color_short_hex() {
        let color = Color::from_hex("#eee").unwrap();
        assert_eq!(color.to_hex(), "#eeeeee");
    }

    #[test]
    fn test_color_keywords_and_garbage() {
        assert_eq!(Color::parse("black"), Some(Color::black()));
        assert_eq!(Color::parse("not-a-color"), None);
        assert_eq!(Color::parse("#12345"), None);
    }

    #[test]
    fn test_bbox_from_points() {
        let points = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 5.0),
            Vec2::new(5.0, 15.0),
        ];
        let bbox = BBox::from_points(&points).unwrap();
        assert_eq!(bbox.min, Vec2::new(0.0, 0.0));
        assert_eq!(bbox.max, Vec2::new(10.0, 15.0));
        assert!(BBox::from_points(&[]).is_none());
    }
}
