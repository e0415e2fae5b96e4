//! SVG path data (`d` attribute) parsing and serialization.
//!
//! Supported commands, absolute and relative: M, L, H, V, C, Q, Z.
//! Parsing stops at the first unsupported command letter; whatever was read
//! before it is kept.

use super::types::{BBox, Vec2};

/// Path command for free-form vector paths
#[derive(Clone, Debug, PartialEq)]
pub enum PathCommand {
    MoveTo(Vec2),
    LineTo(Vec2),
    QuadraticTo { control: Vec2, to: Vec2 },
    CubicTo { ctrl1: Vec2, ctrl2: Vec2, to: Vec2 },
    Close,
}

impl PathCommand {
    fn end_point(&self) -> Option<Vec2> {
        match self {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => Some(*p),
            PathCommand::QuadraticTo { to, .. } | PathCommand::CubicTo { to, .. } => Some(*to),
            PathCommand::Close => None,
        }
    }
}

/// Bounds of the on-curve points of a path
pub fn path_bounds(commands: &[PathCommand]) -> Option<BBox> {
    let points: Vec<Vec2> = commands.iter().filter_map(PathCommand::end_point).collect();
    BBox::from_points(&points)
}

/// Parse an SVG path string into a vector of PathCommands
pub fn parse_path_data(d: &str) -> Vec<PathCommand> {
    let mut commands = Vec::new();
    let mut tokens = PathTokens::new(d);

    let mut current = Vec2::ZERO;
    let mut start = Vec2::ZERO;

    while let Some(cmd) = tokens.next_command() {
        let relative = cmd.is_ascii_lowercase();
        let origin = |current: Vec2| if relative { current } else { Vec2::ZERO };

        match cmd.to_ascii_uppercase() {
            'M' => {
                let mut first = true;
                while let Some(p) = tokens.next_point() {
                    let point = origin(current) + p;
                    if first {
                        commands.push(PathCommand::MoveTo(point));
                        start = point;
                        first = false;
                    } else {
                        commands.push(PathCommand::LineTo(point));
                    }
                    current = point;
                }
            }
            'L' => {
                while let Some(p) = tokens.next_point() {
                    current = origin(current) + p;
                    commands.push(PathCommand::LineTo(current));
                }
            }
            'H' => {
                while let Some(x) = tokens.next_number() {
                    current.x = if relative { current.x + x } else { x };
                    commands.push(PathCommand::LineTo(current));
                }
            }
            'V' => {
                while let Some(y) = tokens.next_number() {
                    current.y = if relative { current.y + y } else { y };
                    commands.push(PathCommand::LineTo(current));
                }
            }
            'C' => {
                while let Some(c1) = tokens.next_point() {
                    let (Some(c2), Some(to)) = (tokens.next_point(), tokens.next_point()) else {
                        return commands;
                    };
                    let base = origin(current);
                    current = base + to;
                    commands.push(PathCommand::CubicTo {
                        ctrl1: base + c1,
                        ctrl2: base + c2,
                        to: current,
                    });
                }
            }
            'Q' => {
                while let Some(c) = tokens.next_point() {
                    let Some(to) = tokens.next_point() else {
                        return commands;
                    };
                    let base = origin(current);
                    current = base + to;
                    commands.push(PathCommand::QuadraticTo {
                        control: base + c,
                        to: current,
                    });
                }
            }
            'Z' => {
                commands.push(PathCommand::Close);
                current = start;
            }
            _ => break,
        }
    }

    commands
}

/// Serialize commands back to absolute path data
pub fn to_path_data(commands: &[PathCommand]) -> String {
    commands
        .iter()
        .map(|cmd| match cmd {
            PathCommand::MoveTo(p) => format!("M {} {}", p.x, p.y),
            PathCommand::LineTo(p) => format!("L {} {}", p.x, p.y),
            PathCommand::QuadraticTo { control, to } => {
                format!("Q {} {} {} {}", control.x, control.y, to.x, to.y)
            }
            PathCommand::CubicTo { ctrl1, ctrl2, to } => format!(
                "C {} {} {} {} {} {}",
                ctrl1.x, ctrl1.y, ctrl2.x, ctrl2.y, to.x, to.y
            ),
            PathCommand::Close => "Z".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

struct PathTokens<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> PathTokens<'a> {
    fn new(d: &'a str) -> Self {
        Self {
            input: d.as_bytes(),
            pos: 0,
        }
    }

    fn skip_separators(&mut self) {
        while let Some(&b) = self.input.get(self.pos) {
            if b.is_ascii_whitespace() || b == b',' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn next_command(&mut self) -> Option<char> {
        self.skip_separators();
        let b = *self.input.get(self.pos)?;
        if b.is_ascii_alphabetic() {
            self.pos += 1;
            Some(b as char)
        } else {
            None
        }
    }

    fn next_number(&mut self) -> Option<f32> {
        self.skip_separators();
        let start = self.pos;
        let mut end = start;
        let mut seen_dot = false;
        let mut seen_exp = false;

        if matches!(self.input.get(end), Some(b'+' | b'-')) {
            end += 1;
        }
        while let Some(&b) = self.input.get(end) {
            match b {
                b'0'..=b'9' => end += 1,
                b'.' if !seen_dot && !seen_exp => {
                    seen_dot = true;
                    end += 1;
                }
                b'e' | b'E' if !seen_exp && end > start => {
                    seen_exp = true;
                    end += 1;
                    if matches!(self.input.get(end), Some(b'+' | b'-')) {
                        end += 1;
                    }
                }
                _ => break,
            }
        }

        let text = std::str::from_utf8(&self.input[start..end]).ok()?;
        let value = text.parse::<f32>().ok()?;
        self.pos = end;
        Some(value)
    }

    fn next_point(&mut self) -> Option<Vec2> {
        let saved = self.pos;
        let x = self.next_number();
        let y = self.next_number();
        match (x, y) {
            (Some(x), Some(y)) => Some(Vec2::new(x, y)),
            _ => {
                self.pos = saved;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_path() {
        let cmds = parse_path_data("M10 20 L30 40 Z");
        assert_eq!(cmds.len(), 3);
        assert!(matches!(cmds[0], PathCommand::MoveTo(p) if p.x == 10.0 && p.y == 20.0));
        assert!(matches!(cmds[1], PathCommand::LineTo(p) if p.x == 30.0 && p.y == 40.0));
        assert!(matches!(cmds[2], PathCommand::Close));
    }

    #[test]
    fn test_parse_relative_and_compact() {
        let cmds = parse_path_data("m10,20l20-5h5v-10");
        assert_eq!(
            cmds,
            vec![
                PathCommand::MoveTo(Vec2::new(10.0, 20.0)),
                PathCommand::LineTo(Vec2::new(30.0, 15.0)),
                PathCommand::LineTo(Vec2::new(35.0, 15.0)),
                PathCommand::LineTo(Vec2::new(35.0, 5.0)),
            ]
        );
    }

    #[test]
    fn test_parse_curves() {
        let cmds = parse_path_data("M0 0 C10 20 30 40 50 60 q5 5 10 0");
        assert_eq!(cmds.len(), 3);
        assert!(matches!(&cmds[1], PathCommand::CubicTo { ctrl1, ctrl2, to }
            if ctrl1.x == 10.0 && ctrl2.x == 30.0 && to.x == 50.0));
        assert!(matches!(&cmds[2], PathCommand::QuadraticTo { control, to }
            if control.x == 55.0 && to.x == 60.0 && to.y == 60.0));
    }

    #[test]
    fn test_unsupported_command_stops_parsing() {
        let cmds = parse_path_data("M0 0 L5 5 A5 10 45 1 0 20 30 L1 1");
        assert_eq!(cmds.len(), 2);
        assert!(parse_path_data("not a path").is_empty());
    }

    #[test]
    fn test_bounds_and_serialize() {
        let cmds = parse_path_data("M10 10 H50 V30 Z");
        let bounds = path_bounds(&cmds).unwrap();
        assert_eq!(bounds.min, Vec2::new(10.0, 10.0));
        assert_eq!(bounds.max, Vec2::new(50.0, 30.0));
        assert_eq!(to_path_data(&cmds), "M 10 10 L 50 10 L 50 30 Z");
    }
}
