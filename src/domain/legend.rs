// Legend compositor: a labelled colour scale appended beside the image
use super::dpi::{DpiMultiplier, ImageDimensions, LEGEND_REFERENCE_WIDTH};
use super::error::{AnnotateError, AnnotateResult};
use super::params::LegendParams;
use super::scale_value::label_text;
use std::path::PathBuf;

// Legend reference space (576 wide)
pub const HORIZONTAL_TEXT_PADDING: f64 = 16.0;
pub const VERTICAL_TEXT_PADDING_INNER: f64 = 16.0;
pub const VERTICAL_TEXT_PADDING_OUTER: f64 = 0.0;
/// Vertical room reserved per label, as a multiple of the font size.
pub const LABEL_HEIGHT_FACTOR: f64 = 1.5;
/// The swatch is stretched horizontally after fitting its height.
pub const SWATCH_WIDTH_PERCENT: u32 = 200;

/// Lookup of gradient swatch images by colour name.
pub trait SwatchCatalog: Send + Sync {
    fn lookup(&self, color: &str) -> Option<PathBuf>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelEdge {
    /// Sits above the swatch, flush with its top.
    Top,
    /// Sits below the swatch, flush with its bottom.
    Bottom,
}

/// A trimmed text label padded so it lines up against one swatch edge.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendLabel {
    pub text: String,
    pub edge: LabelEdge,
    pub horizontal_padding: i64,
    pub vertical_border: i64,
    pub inner_crop: i64,
    pub outer_crop: i64,
}

/// Pixel-space composition: label over swatch over label, appended to the
/// right of the source image.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendRecipe {
    pub font_size: i64,
    pub swatch: PathBuf,
    pub swatch_height: i64,
    pub swatch_width_percent: u32,
    pub top_label: LegendLabel,
    pub bottom_label: LegendLabel,
}

pub fn compose_legend(
    dimensions: ImageDimensions,
    params: &LegendParams,
    catalog: &dyn SwatchCatalog,
) -> AnnotateResult<LegendRecipe> {
    let swatch = catalog
        .lookup(&params.legend_color)
        .ok_or_else(|| AnnotateError::UnknownLegendColor {
            color: params.legend_color.clone(),
        })?;

    let dpi = DpiMultiplier::new(dimensions, LEGEND_REFERENCE_WIDTH)?;
    tracing::debug!("legend dpi multiplier {}", dpi.value());

    if !dimensions.height.is_finite() || dimensions.height <= 0.0 {
        return Err(AnnotateError::image_introspection(
            "image",
            format!("height {} is not a positive finite number", dimensions.height),
        ));
    }

    let reserved = params.font_size * LABEL_HEIGHT_FACTOR
        + VERTICAL_TEXT_PADDING_INNER * 2.0
        + VERTICAL_TEXT_PADDING_OUTER * 2.0;
    let swatch_height = (dimensions.height - reserved * dpi.value()).round() as i64;
    if swatch_height < 1 {
        return Err(AnnotateError::invalid_parameter(
            "fontsize",
            format!(
                "image height {} leaves no room for the legend swatch",
                dimensions.height
            ),
        ));
    }

    let label = |factor: f64, edge: LabelEdge| LegendLabel {
        text: label_text(&params.legend_scale.format_multiple(factor), &params.legend_unit),
        edge,
        horizontal_padding: dpi.scale(HORIZONTAL_TEXT_PADDING),
        vertical_border: dpi.scale(VERTICAL_TEXT_PADDING_OUTER + VERTICAL_TEXT_PADDING_INNER),
        inner_crop: dpi.scale(VERTICAL_TEXT_PADDING_INNER),
        outer_crop: dpi.scale(VERTICAL_TEXT_PADDING_OUTER),
    };

    Ok(LegendRecipe {
        font_size: dpi.scale(params.font_size),
        swatch,
        swatch_height,
        swatch_width_percent: SWATCH_WIDTH_PERCENT,
        top_label: label(1.0, LabelEdge::Top),
        bottom_label: label(-1.0, LabelEdge::Bottom),
    })
}
