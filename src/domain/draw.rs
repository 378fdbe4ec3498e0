// Drawing primitives produced by the layout engine
use super::geometry::{Line, Point};

/// Corner or edge of the canvas that a label's offset is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gravity {
    NorthWest,
    North,
    NorthEast,
}

impl Gravity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gravity::NorthWest => "northwest",
            Gravity::North => "north",
            Gravity::NorthEast => "northeast",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Line {
        line: Line,
        stroke_width: f64,
    },
    Text {
        position: Point,
        /// Clockwise rotation in degrees; zero for axis-aligned text.
        angle: f64,
        gravity: Gravity,
        content: String,
    },
}

impl DrawCommand {
    pub fn line(line: Line, stroke_width: f64) -> Self {
        Self::Line { line, stroke_width }
    }

    pub fn text(position: Point, gravity: Gravity, content: String) -> Self {
        Self::Text {
            position,
            angle: 0.0,
            gravity,
            content,
        }
    }

    pub fn rotated_text(position: Point, angle: f64, gravity: Gravity, content: String) -> Self {
        Self::Text {
            position,
            angle,
            gravity,
            content,
        }
    }
}
