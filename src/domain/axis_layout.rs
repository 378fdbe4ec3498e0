// Axis layout engine for the ski-slope overlay
//
// All positions are in overlay reference space (1408 wide). The vertical
// z-axis drops from the top notch to the left end of diagonal 1, which runs
// down to the vanishing point where diagonal 2 starts and climbs to the right.
use super::dpi::OVERLAY_REFERENCE_WIDTH;
use super::draw::{DrawCommand, Gravity};
use super::error::{AnnotateError, AnnotateResult};
use super::geometry::{
    Line, Offset, Point, center_gravity_horizontal, copy_line_with_offset, copy_point_with_offset,
    line_from_point, point_on_line, toggle_gravity_horizontal,
};
use super::params::AnnotationParams;
use super::scale_value::label_text;

pub const NOTCH_LENGTH_X: f64 = 16.0;
pub const NOTCH_LENGTH_Y: f64 = 8.0;
pub const BASE_STROKE_WIDTH: f64 = 4.0;

/// Beyond this the notches run into each other.
pub const MAX_XY_INTERVAL_COUNT: i64 = 100;

const NOTCH_LEFT: Point = Point::new(-NOTCH_LENGTH_X, 0.0);
const NOTCH_BOTTOM_LEFT: Point = Point::new(-NOTCH_LENGTH_X, NOTCH_LENGTH_Y);
const NOTCH_BOTTOM_RIGHT: Point = Point::new(NOTCH_LENGTH_X, NOTCH_LENGTH_Y);

/// Extends both diagonals past their ends so they overlap into a wedge.
const DIAGONAL_1_WIDENING: Offset = Offset::new(
    Point::new(-NOTCH_LENGTH_X, -NOTCH_LENGTH_Y),
    Point::new(NOTCH_LENGTH_X, NOTCH_LENGTH_Y),
);
const DIAGONAL_2_WIDENING: Offset = Offset::new(
    Point::new(-NOTCH_LENGTH_X, NOTCH_LENGTH_Y),
    Point::new(NOTCH_LENGTH_X, -NOTCH_LENGTH_Y),
);

const VERTICAL_NOTCH_POSITIONS: [f64; 2] = [0.0, 0.5];

const VERTICAL_LABEL_OFFSET: Point = Point::new(20.0, -12.0);
const DIAGONAL_1_LABEL_OFFSET: Point = Point::new(20.0, 10.0);
const DIAGONAL_2_LABEL_OFFSET: Point = Point::new(18.0, 9.0);
const DIAGONAL_1_CENTER_LABEL_OFFSET: Point = Point::new(-8.0, 16.0);
const DIAGONAL_2_CENTER_LABEL_OFFSET: Point = Point::new(8.0, 16.0);

/// The three fixed axes of the overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisSpec {
    pub vertical: Line,
    pub diagonal_1: Line,
    pub diagonal_2: Line,
}

impl AxisSpec {
    pub const REFERENCE: AxisSpec = AxisSpec {
        vertical: Line::new(Point::new(224.0, 434.0), Point::new(224.0, 612.0)),
        diagonal_1: Line::new(Point::new(224.0, 612.0), Point::new(704.0, 852.0)),
        diagonal_2: Line::new(Point::new(704.0, 852.0), Point::new(1188.0, 612.0)),
    };
}

/// Slope of the diagonals in reference space, in degrees.
pub fn diagonal_label_angle() -> f64 {
    0.5_f64.atan().to_degrees()
}

/// Everything needed to draw the overlay, still in reference space.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisLayout {
    pub stroke_width: f64,
    pub font_size: f64,
    pub commands: Vec<DrawCommand>,
}

impl AxisLayout {
    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Line { line, .. } => Some(line),
            DrawCommand::Text { .. } => None,
        })
    }

    pub fn labels(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|command| matches!(command, DrawCommand::Text { .. }))
    }
}

pub fn layout_axis_overlay(axes: &AxisSpec, params: &AnnotationParams) -> AnnotateResult<AxisLayout> {
    let count = params.xy_interval_count;
    if count <= 0 {
        return Err(AnnotateError::invalid_parameter(
            "xyintervalcount",
            format!("must be at least 1, got {}", count),
        ));
    }
    if count > MAX_XY_INTERVAL_COUNT {
        return Err(AnnotateError::invalid_parameter(
            "xyintervalcount",
            format!("must be at most {}, got {}", MAX_XY_INTERVAL_COUNT, count),
        ));
    }

    let mut commands = Vec::new();
    let stroke = BASE_STROKE_WIDTH;

    commands.push(DrawCommand::line(axes.vertical, stroke));
    commands.push(DrawCommand::line(copy_line_with_offset(axes.diagonal_1, DIAGONAL_1_WIDENING), stroke));
    commands.push(DrawCommand::line(copy_line_with_offset(axes.diagonal_2, DIAGONAL_2_WIDENING), stroke));

    for t in VERTICAL_NOTCH_POSITIONS {
        let notch = line_from_point(point_on_line(axes.vertical, t), Offset::toward(NOTCH_LEFT));
        commands.push(DrawCommand::line(notch, stroke));
    }

    let fraction = |i: i64| i as f64 / count as f64;

    // Diagonal 1 marks the start of each band, diagonal 2 the end, so the
    // vanishing point only gets one notch.
    for i in 0..count {
        let notch = line_from_point(point_on_line(axes.diagonal_1, fraction(i)), Offset::toward(NOTCH_BOTTOM_LEFT));
        commands.push(DrawCommand::line(notch, stroke));
    }
    for i in 1..=count {
        let notch = line_from_point(point_on_line(axes.diagonal_2, fraction(i)), Offset::toward(NOTCH_BOTTOM_RIGHT));
        commands.push(DrawCommand::line(notch, stroke));
    }

    let xy_label = |i: i64| label_text(&params.xy_interval.format_multiple(i as f64), &params.xy_unit);

    if count == 1 {
        let angle = diagonal_label_angle();

        let position = copy_point_with_offset(
            center_gravity_horizontal(point_on_line(axes.diagonal_1, 0.5), OVERLAY_REFERENCE_WIDTH),
            DIAGONAL_1_CENTER_LABEL_OFFSET,
        );
        commands.push(DrawCommand::rotated_text(position, angle, Gravity::North, xy_label(1)));

        let position = copy_point_with_offset(
            center_gravity_horizontal(point_on_line(axes.diagonal_2, 0.5), OVERLAY_REFERENCE_WIDTH),
            DIAGONAL_2_CENTER_LABEL_OFFSET,
        );
        commands.push(DrawCommand::rotated_text(position, -angle, Gravity::North, xy_label(1)));
    } else {
        // Diagonal 1 counts outward from the vanishing point at its end.
        for i in 1..=count {
            let position = copy_point_with_offset(
                toggle_gravity_horizontal(point_on_line(axes.diagonal_1, fraction(count - i)), OVERLAY_REFERENCE_WIDTH),
                DIAGONAL_1_LABEL_OFFSET,
            );
            commands.push(DrawCommand::text(position, Gravity::NorthEast, xy_label(i)));
        }
        for i in 1..=count {
            let position = copy_point_with_offset(point_on_line(axes.diagonal_2, fraction(i)), DIAGONAL_2_LABEL_OFFSET);
            commands.push(DrawCommand::text(position, Gravity::NorthWest, xy_label(i)));
        }
    }

    let vertical_labels = [
        (0.0, params.z_interval.format_multiple(1.0)),
        (0.5, "0".to_string()),
        (1.0, params.z_interval.format_multiple(-1.0)),
    ];
    for (t, number) in vertical_labels {
        let position = copy_point_with_offset(
            toggle_gravity_horizontal(point_on_line(axes.vertical, t), OVERLAY_REFERENCE_WIDTH),
            VERTICAL_LABEL_OFFSET,
        );
        commands.push(DrawCommand::text(position, Gravity::NorthEast, label_text(&number, &params.z_unit)));
    }

    Ok(AxisLayout {
        stroke_width: stroke,
        font_size: params.font_size,
        commands,
    })
}
