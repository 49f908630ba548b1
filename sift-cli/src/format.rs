//! Number formatting for report lines.

/// Format `x` with `precision` significant digits.
///
/// Fixed-point output keeps at least one fractional digit (`1.0`), and
/// scientific notation is used when the decimal exponent is below -4 or at
/// least `precision - 1` (`1.2e+01` for 12 at two digits).
pub fn significant(x: f64, precision: usize) -> String {
    if x.is_nan() {
        return "nan".into();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf".into() } else { "-inf".into() };
    }
    if x == 0.0 {
        return if x.is_sign_negative() { "-0.0" } else { "0.0" }.into();
    }

    let p = precision.max(1);
    let sci = format!("{:.*e}", p - 1, x);
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let exp: i32 = exp.parse().unwrap_or(0);

    if exp < -4 || exp >= p as i32 - 1 {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_zeros(mantissa), sign, exp.abs())
    } else {
        let decimals = (p as i32 - 1 - exp) as usize;
        let fixed = format!("{:.*}", decimals, x);
        let trimmed = trim_zeros(&fixed);
        if trimmed.contains('.') {
            trimmed.to_string()
        } else {
            format!("{trimmed}.0")
        }
    }
}

/// A metric that may be undefined; undefined prints as `nan`.
pub fn metric(value: Option<f64>, precision: usize) -> String {
    significant(value.unwrap_or(f64::NAN), precision)
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
    fn three_digits() {
        assert_eq!(significant(2.0 / 3.0, 3), "0.667");
        assert_eq!(significant(1.0, 3), "1.0");
        assert_eq!(significant(0.5, 3), "0.5");
        assert_eq!(significant(0.125, 3), "0.125");
        assert_eq!(significant(0.0001234, 3), "0.000123");
        assert_eq!(significant(0.00001234, 3), "1.23e-05");
        assert_eq!(significant(100.0, 3), "1e+02");
        assert_eq!(significant(42.0, 3), "42.0");
    }

    #[test]
    fn two_digits() {
        assert_eq!(significant(0.0, 2), "0.0");
        assert_eq!(significant(3.0, 2), "3.0");
        assert_eq!(significant(12.0, 2), "1.2e+01");
        assert_eq!(significant(0.8, 2), "0.8");
        assert_eq!(significant(0.123, 2), "0.12");
        assert_eq!(significant(-0.456, 2), "-0.46");
    }

    #[test]
    fn non_finite() {
        assert_eq!(significant(f64::NAN, 3), "nan");
        assert_eq!(significant(f64::INFINITY, 2), "inf");
        assert_eq!(metric(None, 3), "nan");
        assert_eq!(metric(Some(0.75), 3), "0.75");
    }
}
