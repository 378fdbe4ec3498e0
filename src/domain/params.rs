// Per-request parameter bags built from submitted form fields
use super::scale_value::{ScaleValue, parse_leading_float};
use std::collections::HashMap;

pub const DEFAULT_FONT_SIZE: f64 = 32.0;
pub const DEFAULT_XY_INTERVAL_COUNT: i64 = 1;
pub const DEFAULT_RESIZE_PERCENTAGE: f64 = 100.0;

/// Raw text fields of a submitted form, keyed by field name.
pub type FormFields = HashMap<String, String>;

fn field<'a>(fields: &'a FormFields, name: &str) -> Option<&'a str> {
    fields.get(name).map(String::as_str)
}

fn text_field(fields: &FormFields, name: &str) -> String {
    field(fields, name).unwrap_or_default().trim().to_string()
}

fn positive_field(fields: &FormFields, name: &str, default: f64) -> f64 {
    field(fields, name)
        .and_then(parse_leading_float)
        .filter(|v| v.is_finite() && *v > 0.0)
        .unwrap_or(default)
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationParams {
    pub z_interval: ScaleValue,
    pub z_unit: String,
    pub xy_interval: ScaleValue,
    pub xy_unit: String,
    pub font_size: f64,
    /// Tick subdivisions along each diagonal. Validated by the layout engine.
    pub xy_interval_count: i64,
}

impl Default for AnnotationParams {
    fn default() -> Self {
        Self {
            z_interval: ScaleValue::ZERO,
            z_unit: String::new(),
            xy_interval: ScaleValue::ZERO,
            xy_unit: String::new(),
            font_size: DEFAULT_FONT_SIZE,
            xy_interval_count: DEFAULT_XY_INTERVAL_COUNT,
        }
    }
}

impl AnnotationParams {
    pub fn from_fields(fields: &FormFields) -> Self {
        // Fractional counts are truncated; "0.5" ends up as 0 and is rejected later.
        let xy_interval_count = field(fields, "xyintervalcount")
            .and_then(parse_leading_float)
            .filter(|v| v.is_finite() && *v != 0.0)
            .map(|v| v.trunc() as i64)
            .unwrap_or(DEFAULT_XY_INTERVAL_COUNT);

        Self {
            z_interval: ScaleValue::parse_or_zero(field(fields, "zinterval")),
            z_unit: text_field(fields, "zunit"),
            xy_interval: ScaleValue::parse_or_zero(field(fields, "xyinterval")),
            xy_unit: text_field(fields, "xyunit"),
            font_size: positive_field(fields, "fontsize", DEFAULT_FONT_SIZE),
            xy_interval_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendParams {
    pub legend_scale: ScaleValue,
    pub legend_unit: String,
    pub legend_color: String,
    pub font_size: f64,
}

impl Default for LegendParams {
    fn default() -> Self {
        Self {
            legend_scale: ScaleValue::ZERO,
            legend_unit: String::new(),
            legend_color: String::new(),
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

impl LegendParams {
    pub fn from_fields(fields: &FormFields) -> Self {
        Self {
            legend_scale: ScaleValue::parse_or_zero(field(fields, "legendscale")),
            legend_unit: text_field(fields, "legendunit"),
            legend_color: text_field(fields, "legendcolor"),
            font_size: positive_field(fields, "fontsize", DEFAULT_FONT_SIZE),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeParams {
    pub percentage: f64,
}

impl Default for ResizeParams {
    fn default() -> Self {
        Self {
            percentage: DEFAULT_RESIZE_PERCENTAGE,
        }
    }
}

impl ResizeParams {
    pub fn from_fields(fields: &FormFields) -> Self {
        Self {
            percentage: positive_field(fields, "resizepercentage", DEFAULT_RESIZE_PERCENTAGE),
        }
    }
}
