//! Height and time display strings.
//!
//! Corrected heights are centimeters. The tables print meters (`h / 100`) and
//! feet (`meters × 3.28084`), each as the shortest decimal that reads back to
//! the same value, cut to its first five characters: `0.9`, `2.952`, `-0.82`.

/// Feet in one meter.
pub const FEET_PER_METER: f64 = 3.28084;

/// Maximum characters of a printed height.
pub const HEIGHT_WIDTH: usize = 5;

/// Raw `HHMM` time, zero-padded to four digits.
pub fn time_text(time: i32) -> String {
    format!("{:04}", time)
}

/// Centimeters to meters.
pub fn meters(height_cm: f64) -> f64 {
    height_cm / 100.0
}

/// Centimeters to feet, going through meters.
pub fn feet(height_cm: f64) -> f64 {
    meters(height_cm) * FEET_PER_METER
}

/// Printed meters for a height in centimeters.
pub fn meters_text(height_cm: f64) -> String {
    truncate(decimal_text(meters(height_cm)))
}

/// Printed feet for a height in centimeters.
pub fn feet_text(height_cm: f64) -> String {
    truncate(decimal_text(feet(height_cm)))
}

/// Shortest round-trip decimal form of `value`.
///
/// Always carries a fractional part (`2.0`, not `2`) and switches to exponent
/// notation (`1e-05`, `1.5e+16`) outside `1e-4 <= |value| < 1e16`.
pub fn decimal_text(value: f64) -> String {
    let magnitude = value.abs();
    if value != 0.0 && magnitude.is_finite() && !(1e-4..1e16).contains(&magnitude) {
        return exponent_text(value);
    }

    let text = value.to_string();
    if text.contains(['.', 'N', 'i']) {
        text
    } else {
        format!("{text}.0")
    }
}

fn exponent_text(value: f64) -> String {
    let text = format!("{value:e}");
    match text.split_once('e') {
        Some((mantissa, exponent)) => match exponent.parse::<i32>() {
            Ok(exp) => {
                let sign = if exp < 0 { '-' } else { '+' };
                format!("{mantissa}e{sign}{:02}", exp.abs())
            }
            Err(_) => text.clone(),
        },
        None => text.clone(),
    }
}

fn truncate(mut text: String) -> String {
    if let Some((index, _)) = text.char_indices().nth(HEIGHT_WIDTH) {
        text.truncate(index);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_is_zero_padded() {
        assert_eq!(time_text(615), "0615");
        assert_eq!(time_text(5), "0005");
        assert_eq!(time_text(2359), "2359");
    }

    #[test]
    fn test_heights_are_cut_to_five_characters() {
        assert_eq!(meters_text(90.0), "0.9");
        assert_eq!(feet_text(90.0), "2.952");

        assert_eq!(meters_text(250.0), "2.5");
        assert_eq!(feet_text(250.0), "8.202");

        assert_eq!(meters_text(1234.0), "12.34");
        assert_eq!(feet_text(1234.0), "40.48");
    }

    #[test]
    fn test_negative_heights_keep_their_sign() {
        assert_eq!(meters_text(-25.0), "-0.25");
        assert_eq!(feet_text(-25.0), "-0.82");
        assert_eq!(meters_text(-1.0), "-0.01");
        assert_eq!(feet_text(-1.0), "-0.03");
    }

    #[test]
    fn test_whole_values_keep_a_fraction() {
        assert_eq!(meters_text(200.0), "2.0");
        assert_eq!(feet_text(200.0), "6.561");
        assert_eq!(meters_text(0.0), "0.0");
        assert_eq!(feet_text(0.0), "0.0");
    }

    #[test]
    fn test_fractional_baseline() {
        // 120 - 30.5 leaves a half centimeter
        assert_eq!(meters_text(89.5), "0.895");
        assert_eq!(feet_text(89.5), "2.936");
    }

    #[test]
    fn test_decimal_text_forms() {
        assert_eq!(decimal_text(2.0), "2.0");
        assert_eq!(decimal_text(-0.0), "-0.0");
        assert_eq!(decimal_text(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(decimal_text(0.0001), "0.0001");
        assert_eq!(decimal_text(0.00001), "1e-05");
        assert_eq!(decimal_text(-0.000015), "-1.5e-05");
        assert_eq!(decimal_text(1e16), "1e+16");
    }
}
