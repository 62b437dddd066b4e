/// Format `value` like C's `%g` with `precision` significant digits.
///
/// Trailing zeros are dropped, and scientific notation is used when the
/// decimal exponent is below -4 or at least `precision`.
pub fn general(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let precision = precision.max(1);
    // Rounding to `precision` digits can bump the exponent (9.9999 -> 10.00),
    // so read it back from the rounded scientific form.
    let sci = format!("{:.*e}", precision - 1, value);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if exp < -4 || exp >= precision as i32 {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_zeros(mantissa), sign, exp.abs())
    } else {
        let decimals = (precision as i32 - 1 - exp).max(0) as usize;
        trim_zeros(&format!("{value:.decimals$}")).to_string()
    }
}

fn trim_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_notation() {
        assert_eq!(general(1.0, 6), "1");
        assert_eq!(general(-5.0, 6), "-5");
        assert_eq!(general(0.5, 6), "0.5");
        assert_eq!(general(3.14159265, 6), "3.14159");
        assert_eq!(general(-2.5, 6), "-2.5");
        assert_eq!(general(123456.0, 6), "123456");
        assert_eq!(general(0.0001, 6), "0.0001");
    }

    #[test]
    fn scientific_notation() {
        assert_eq!(general(1234567.0, 6), "1.23457e+06");
        assert_eq!(general(0.00001234, 6), "1.234e-05");
        assert_eq!(general(1e100, 6), "1e+100");
    }

    #[test]
    fn rounding_carries_into_exponent() {
        assert_eq!(general(999999.7, 6), "1e+06");
        assert_eq!(general(9.9996, 4), "10");
    }

    #[test]
    fn color_precision() {
        assert_eq!(general(0.4, 4), "0.4");
        assert_eq!(general(f64::from(0.4f32), 4), "0.4");
        assert_eq!(general(0.123456, 4), "0.1235");
    }

    #[test]
    fn special_values() {
        assert_eq!(general(0.0, 6), "0");
        assert_eq!(general(-0.0, 6), "-0");
        assert_eq!(general(f64::NAN, 6), "nan");
        assert_eq!(general(f64::NEG_INFINITY, 6), "-inf");
    }
}
