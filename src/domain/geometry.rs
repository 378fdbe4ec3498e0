// Geometry primitives in reference space
//
// Everything here is `Copy` and returns fresh values, so the shared axis
// constants can be fed through any number of offsets without changing.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point::new(0.0, 0.0);

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Directed segment. Interpolation runs from `start` to `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub start: Point,
    pub end: Point,
}

impl Line {
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }
}

/// Independent deltas for the two ends of a line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Offset {
    pub start: Point,
    pub end: Point,
}

impl Offset {
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// A notch direction: the start stays put, the end moves by `delta`.
    pub const fn toward(delta: Point) -> Self {
        Self {
            start: Point::ORIGIN,
            end: delta,
        }
    }
}

/// Linear interpolation along `line`. `t` is not clamped.
pub fn point_on_line(line: Line, t: f64) -> Point {
    Point {
        x: line.start.x + (line.end.x - line.start.x) * t,
        y: line.start.y + (line.end.y - line.start.y) * t,
    }
}

/// Short segment anchored at `point`, shaped by `offset`.
pub fn line_from_point(point: Point, offset: Offset) -> Line {
    copy_line_with_offset(Line::new(point, point), offset)
}

pub fn copy_line_with_offset(line: Line, offsets: Offset) -> Line {
    Line {
        start: copy_point_with_offset(line.start, offsets.start),
        end: copy_point_with_offset(line.end, offsets.end),
    }
}

pub fn copy_point_with_offset(point: Point, delta: Point) -> Point {
    Point {
        x: point.x + delta.x,
        y: point.y + delta.y,
    }
}

/// Mirror x for labels anchored on the right-hand edge (east gravities).
pub fn toggle_gravity_horizontal(point: Point, reference_width: f64) -> Point {
    Point {
        x: reference_width - point.x,
        y: point.y,
    }
}

/// Re-express x relative to the horizontal center (north gravity).
pub fn center_gravity_horizontal(point: Point, reference_width: f64) -> Point {
    Point {
        x: point.x - reference_width / 2.0,
        y: point.y,
    }
}
