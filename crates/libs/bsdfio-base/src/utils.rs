//! Utility functions.

/// Significant digits used by [`format_g`].
pub const DEFAULT_PRECISION: usize = 6;

/// Formats a number the way C's `%g` conversion does with the default
/// precision of 6 significant digits.
///
/// Fixed notation is used when the decimal exponent lies in `[-4, 6)`,
/// scientific notation (`1.5e+07`) otherwise. Trailing zeros and a trailing
/// decimal point are removed.
pub fn format_g(value: f32) -> String { format_g_with_precision(value as f64, DEFAULT_PRECISION) }

/// Same as [`format_g`] with an explicit number of significant digits.
pub fn format_g_with_precision(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return String::from("nan");
    }
    if value.is_infinite() {
        return String::from(if value > 0.0 { "inf" } else { "-inf" });
    }
    if value == 0.0 {
        return String::from(if value.is_sign_negative() { "-0" } else { "0" });
    }

    let precision = precision.max(1);
    // Rounding to the requested digits may bump the exponent (9.999995 -> 10),
    // so the exponent is taken from the rounded scientific form.
    let sci = format!("{:.*e}", precision - 1, value);
    let (mantissa, exponent) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => return sci,
    };

    if exponent < -4 || exponent >= precision as i32 {
        format!(
            "{}e{}{:02}",
            trim_fraction(mantissa),
            if exponent < 0 { '-' } else { '+' },
            exponent.unsigned_abs()
        )
    } else {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[track_caller]
    fn check(value: f32, expected: &str) {
        assert_eq!(format_g(value), expected, "formatting {}", value);
    }

    #[test]
    fn fixed_notation() {
        check(0.0, "0");
        check(90.0, "90");
        check(0.5, "0.5");
        check(-2.5, "-2.5");
        check(1.0, "1");
        check(100000.0, "100000");
        check(0.0001, "0.0001");
        check(std::f32::consts::PI, "3.14159");
        check(0.1, "0.1");
        check(22.5, "22.5");
    }

    #[test]
    fn scientific_notation() {
        check(1234567.0, "1.23457e+06");
        check(0.00001, "1e-05");
        check(-0.000012345, "-1.2345e-05");
        check(1.0e20, "1e+20");
    }

    #[test]
    fn rounding_bumps_exponent() {
        assert_eq!(format_g_with_precision(999999.5, 6), "1e+06");
        assert_eq!(format_g_with_precision(9.9999996, 6), "10");
    }

    #[test]
    fn non_finite() {
        check(f32::NAN, "nan");
        check(f32::INFINITY, "inf");
        check(f32::NEG_INFINITY, "-inf");
    }
}
