/// Renders non-finite values the way report readers expect them
/// (`NaN`, `Infinity`, `-Infinity`) instead of Rust's `NaN` / `inf`.
fn non_finite(x: f64) -> Option<String> {
    if x.is_nan() {
        Some("NaN".to_owned())
    } else if x == f64::INFINITY {
        Some("Infinity".to_owned())
    } else if x == f64::NEG_INFINITY {
        Some("-Infinity".to_owned())
    } else {
        None
    }
}

/// Scientific notation with `digits` fractional mantissa digits and a signed,
/// at least two digit exponent: `scientific(1.0, 7) == "1.0000000e+00"`.
pub fn scientific(x: f64, digits: usize) -> String {
    if let Some(text) = non_finite(x) {
        return text;
    }

    let raw = format!("{:.*e}", digits, x);
    match raw.split_once('e') {
        Some((mantissa, exponent)) => {
            let exponent: i32 = exponent.parse().unwrap_or(0);
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exponent.abs())
        }
        None => raw,
    }
}

/// Fixed-point notation with `digits` decimals.
pub fn fixed(x: f64, digits: usize) -> String {
    non_finite(x).unwrap_or_else(|| format!("{:.*}", digits, x))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scientific_pads_and_signs_exponent() {
        assert_eq!(scientific(1.0, 7), "1.0000000e+00");
        assert_eq!(scientific(1.0078125, 7), "1.0078125e+00");
        assert_eq!(scientific(-0.0078125, 5), "-7.81250e-03");
        assert_eq!(scientific(1.5e123, 2), "1.50e+123");
    }

    #[test]
    fn non_finite_values_are_spelled_out() {
        assert_eq!(scientific(f64::NAN, 5), "NaN");
        assert_eq!(fixed(f64::INFINITY, 1), "Infinity");
        assert_eq!(fixed(f64::NEG_INFINITY, 1), "-Infinity");
    }

    #[test]
    fn fixed_rounds_to_requested_decimals() {
        assert_eq!(fixed(16.0, 1), "16.0");
        assert_eq!(fixed(2.048085969911831, 1), "2.0");
    }
}
