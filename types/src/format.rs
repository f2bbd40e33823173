//! Numeric display formatting.
//!
//! Values whose magnitude is below `1e-6` or above `999_999_999` are shown in
//! exponential notation with six fractional digits (`1.234568e+9`). Everything
//! else is rounded to twelve significant digits and printed as the shortest
//! decimal that round-trips, which hides binary floating-point artifacts such
//! as `0.30000000000000004`.

const SMALL_MAGNITUDE: f64 = 1e-6;
const LARGE_MAGNITUDE: f64 = 999_999_999.0;

/// Format operand or result text for display.
///
/// Empty input shows as `"0"`; text that is not a number is returned verbatim.
#[must_use]
pub fn format_number(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return "0".to_string();
    }
    match parse_literal(trimmed) {
        Some(value) => format_value(value),
        None => raw.to_string(),
    }
}

/// Decimal digits with an optional exponent, or `Infinity`. The other
/// spellings `f64::from_str` accepts (`inf`, `infinity`, `nan`) are not
/// numbers here.
fn parse_literal(text: &str) -> Option<f64> {
    let unsigned = text.strip_prefix(['-', '+']).unwrap_or(text);
    if unsigned.starts_with(|c: char| c.is_ascii_alphabetic()) && unsigned != "Infinity" {
        return None;
    }
    text.parse::<f64>().ok().filter(|value| !value.is_nan())
}

/// Format a numeric value for display.
#[must_use]
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if !needs_exponent(value) {
        return plain(value);
    }

    let text = exponential(value);
    // Rounding the mantissa can carry the value back across the threshold
    // (9.9999999e-7 -> 1.000000e-6); keep the output a fixed point of itself.
    match text.parse::<f64>() {
        Ok(rounded) if !needs_exponent(rounded) => plain(rounded),
        _ => text,
    }
}

/// Canonical operand text for a number: shortest round-trip decimal, never
/// exponential, and `"0"` for both zeros.
#[must_use]
pub fn number_to_operand(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        format!("{value}")
    }
}

/// Numeric value of operand text. A bare `"."` or `"-"` reads as zero.
#[must_use]
pub fn parse_operand(raw: &str) -> f64 {
    raw.trim().parse::<f64>().unwrap_or(0.0)
}

fn needs_exponent(value: f64) -> bool {
    let magnitude = value.abs();
    (magnitude > 0.0 && magnitude < SMALL_MAGNITUDE) || magnitude > LARGE_MAGNITUDE
}

fn exponential(value: f64) -> String {
    let text = format!("{value:.6e}");
    match text.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => text,
    }
}

fn plain(value: f64) -> String {
    // Twelve significant digits: one before the point, eleven after.
    let rounded = format!("{value:.11e}").parse::<f64>().unwrap_or(value);
    number_to_operand(rounded)
}
