// DPI normalisation between reference space and image pixels
use super::error::{AnnotateError, AnnotateResult};
use super::geometry::Point;

/// Reference width the axis overlay constants are laid out for.
pub const OVERLAY_REFERENCE_WIDTH: f64 = 1408.0;

/// Reference width the legend constants are laid out for.
pub const LEGEND_REFERENCE_WIDTH: f64 = 576.0;

/// Pixel size of an input image as reported by introspection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageDimensions {
    pub width: f64,
    pub height: f64,
}

impl ImageDimensions {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DpiMultiplier {
    value: f64,
}

impl DpiMultiplier {
    /// `width / reference_width`, refusing widths that would poison every
    /// coordinate with NaN or infinity.
    pub fn new(dimensions: ImageDimensions, reference_width: f64) -> AnnotateResult<Self> {
        let width = dimensions.width;
        if !width.is_finite() || width <= 0.0 {
            return Err(AnnotateError::image_introspection(
                "image",
                format!("width {} is not a positive finite number", width),
            ));
        }

        Ok(Self {
            value: width / reference_width,
        })
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Scale a reference-space length and round to whole pixels.
    pub fn scale(&self, logical: f64) -> i64 {
        (logical * self.value).round() as i64
    }

    pub fn scale_point(&self, point: Point) -> (i64, i64) {
        (self.scale(point.x), self.scale(point.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_width_is_identity() {
        let dpi = DpiMultiplier::new(ImageDimensions::new(1408.0, 1000.0), OVERLAY_REFERENCE_WIDTH).unwrap();
        assert_eq!(dpi.value(), 1.0);
        assert_eq!(dpi.scale_point(Point::new(224.0, 434.0)), (224, 434));
    }

    #[test]
    fn test_scale_rounds_half_away_from_zero() {
        let dpi = DpiMultiplier::new(ImageDimensions::new(704.0, 500.0), OVERLAY_REFERENCE_WIDTH).unwrap();
        assert_eq!(dpi.value(), 0.5);
        assert_eq!(dpi.scale(5.0), 3);
        assert_eq!(dpi.scale(-5.0), -3);
        assert_eq!(dpi.scale(4.0), 2);
    }

    #[test]
    fn test_doubling_width_doubles_coordinates() {
        let single = DpiMultiplier::new(ImageDimensions::new(576.0, 400.0), LEGEND_REFERENCE_WIDTH).unwrap();
        let double = DpiMultiplier::new(ImageDimensions::new(1152.0, 800.0), LEGEND_REFERENCE_WIDTH).unwrap();
        for logical in [0.0, 16.0, 224.0, 852.0, 1188.0] {
            assert_eq!(double.scale(logical), 2 * single.scale(logical));
        }
    }

    #[test]
    fn test_rejects_unusable_widths() {
        for width in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            let result = DpiMultiplier::new(ImageDimensions::new(width, 100.0), OVERLAY_REFERENCE_WIDTH);
            assert!(matches!(result, Err(AnnotateError::ImageIntrospection { .. })));
        }
    }
}
