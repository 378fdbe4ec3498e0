// Numeric form values and the precision they were typed with
use regex::Regex;
use std::sync::LazyLock;

/// Upper bound on fraction digits carried into labels.
pub const MAX_DECIMAL_PLACES: usize = 20;

static LEADING_FLOAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("valid leading float pattern")
});

static DECIMAL_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\.(\d+))?(?:[eE]([+-]?\d+))?$").expect("valid decimal suffix pattern")
});

/// Parse the longest numeric prefix of `raw`, ignoring leading whitespace.
/// `"2.5abc"` is 2.5, `"abc"` is `None`.
pub fn parse_leading_float(raw: &str) -> Option<f64> {
    let trimmed = raw.trim_start();
    let matched = LEADING_FLOAT.find(trimmed)?;
    matched.as_str().parse::<f64>().ok()
}

/// Fraction digits implied by how the number was written: `"2.50"` is 2,
/// `"3"` is 0, `"1e2"` is 0, `"1.5e-3"` is 4.
pub fn decimal_places(raw: &str) -> usize {
    let Some(captures) = DECIMAL_SUFFIX.captures(raw) else {
        return 0;
    };

    let fraction = captures.get(1).map(|m| m.as_str().len() as i64).unwrap_or(0);
    let exponent = match captures.get(2) {
        // An exponent too large for i64 pushes the result to one of the bounds.
        Some(m) => m.as_str().parse::<i64>().unwrap_or_else(|_| {
            if m.as_str().starts_with('-') { i64::MIN / 2 } else { i64::MAX / 2 }
        }),
        None => 0,
    };

    (fraction - exponent).clamp(0, MAX_DECIMAL_PLACES as i64) as usize
}

/// A finite, non-zero number together with its display precision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleValue {
    pub value: f64,
    pub decimals: usize,
}

impl ScaleValue {
    pub const ZERO: ScaleValue = ScaleValue {
        value: 0.0,
        decimals: 0,
    };

    pub fn new(value: f64, decimals: usize) -> Self {
        Self { value, decimals }
    }

    /// Accept a raw form value only when it reads as a finite, non-zero number.
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        let raw = raw?;
        let value = parse_leading_float(raw)?;
        if !value.is_finite() || value == 0.0 {
            return None;
        }

        Some(Self {
            value,
            decimals: decimal_places(raw),
        })
    }

    pub fn parse_or_zero(raw: Option<&str>) -> Self {
        Self::parse(raw).unwrap_or(Self::ZERO)
    }

    /// `factor * value`, printed with the precision of the original input.
    pub fn format_multiple(&self, factor: f64) -> String {
        format_fixed(self.value * factor, self.decimals)
    }
}

/// Fixed-point formatting that never prints a negative zero.
pub fn format_fixed(value: f64, decimals: usize) -> String {
    let text = format!("{:.*}", decimals, value);
    match text.strip_prefix('-') {
        Some(unsigned) if unsigned.chars().all(|c| c == '0' || c == '.') => unsigned.to_string(),
        _ => text,
    }
}

/// `"<number> <unit>"`, or just the number when no unit was given.
pub fn label_text(number: &str, unit: &str) -> String {
    let unit = unit.trim();
    if unit.is_empty() {
        number.to_string()
    } else {
        format!("{} {}", number, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_leading_float() {
        assert_eq!(parse_leading_float("2.50"), Some(2.5));
        assert_eq!(parse_leading_float("  3"), Some(3.0));
        assert_eq!(parse_leading_float("2.5abc"), Some(2.5));
        assert_eq!(parse_leading_float("1e2"), Some(100.0));
        assert_eq!(parse_leading_float("-.5"), Some(-0.5));
        assert_eq!(parse_leading_float("1e"), Some(1.0));
        assert_eq!(parse_leading_float("abc"), None);
        assert_eq!(parse_leading_float(""), None);
    }

    #[test]
    fn test_decimal_places() {
        assert_eq!(decimal_places("2.50"), 2);
        assert_eq!(decimal_places("3"), 0);
        assert_eq!(decimal_places("1e2"), 0);
        assert_eq!(decimal_places("1.5e-3"), 4);
        assert_eq!(decimal_places("1.25E1"), 1);
        assert_eq!(decimal_places("12.5m"), 0);
        assert_eq!(decimal_places("1e-999999999999999999999"), MAX_DECIMAL_PLACES);
    }

    #[test]
    fn test_precision_follows_input_not_result() {
        let interval = ScaleValue::parse(Some("2.50")).unwrap();
        assert_eq!(interval.format_multiple(2.0), "5.00");
        assert_eq!(interval.format_multiple(-1.0), "-2.50");
    }

    #[test]
    fn test_zero_and_garbage_fall_back() {
        assert_eq!(ScaleValue::parse(Some("0")), None);
        assert_eq!(ScaleValue::parse(Some("0.000")), None);
        assert_eq!(ScaleValue::parse(Some("metres")), None);
        assert_eq!(ScaleValue::parse(None), None);
        assert_eq!(ScaleValue::parse_or_zero(Some("")), ScaleValue::ZERO);
    }

    #[test]
    fn test_format_fixed_has_no_negative_zero() {
        assert_eq!(format_fixed(-0.0, 0), "0");
        assert_eq!(format_fixed(-0.0, 2), "0.00");
        assert_eq!(ScaleValue::ZERO.format_multiple(-1.0), "0");
        assert_eq!(format_fixed(-3.0, 0), "-3");
    }

    #[test]
    fn test_label_text() {
        assert_eq!(label_text("5", "m"), "5 m");
        assert_eq!(label_text("10", ""), "10");
        assert_eq!(label_text("10", "  "), "10");
    }
}
