//! General-format number rendering, matching C++ iostream defaults.
//!
//! `%g` semantics: `precision` significant digits, fixed notation when
//! the decimal exponent lies in `[-4, precision)`, scientific otherwise,
//! trailing zeros removed. Exponents carry a sign and at least two digits.

/// Significant digits used by every diagnostics line.
pub const PRECISION: usize = 6;

/// Column width of the data log.
pub const COLUMN_WIDTH: usize = 14;

/// Render `value` with `precision` significant digits in general format.
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

    let p = precision.max(1);
    // Rounded scientific form gives the post-rounding exponent.
    let sci = format!("{:.*e}", p - 1, value);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if exp < -4 || exp >= p as i32 {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{sign}{:02}", strip_zeros(mantissa), exp.abs())
    } else {
        let decimals = (p as i32 - 1 - exp).max(0) as usize;
        strip_zeros(&format!("{value:.decimals$}")).to_string()
    }
}

/// [`general`] at [`PRECISION`], right-aligned in [`COLUMN_WIDTH`].
pub fn column(value: f64) -> String {
    format!("{:>COLUMN_WIDTH$}", general(value, PRECISION))
}

fn strip_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn g(v: f64) -> String {
        general(v, PRECISION)
    }

    #[test]
    fn integers_and_zero() {
        assert_eq!(g(0.0), "0");
        assert_eq!(g(1.0), "1");
        assert_eq!(g(-42.0), "-42");
        assert_eq!(g(100000.0), "100000");
    }

    #[test]
    fn switches_to_scientific_at_precision() {
        assert_eq!(g(1000000.0), "1e+06");
        assert_eq!(g(1234567.0), "1.23457e+06");
        assert_eq!(g(6.0e9), "6e+09");
        assert_eq!(g(-2.5e-7), "-2.5e-07");
    }

    #[test]
    fn small_values_stay_fixed_down_to_1e_minus_4() {
        assert_eq!(g(0.0001), "0.0001");
        assert_eq!(g(0.00001), "1e-05");
        assert_eq!(g(0.1), "0.1");
        assert_eq!(g(0.5), "0.5");
    }

    #[test]
    fn rounding_to_six_digits() {
        assert_eq!(g(3.14159265), "3.14159");
        assert_eq!(g(2.0 / 3.0), "0.666667");
        // rounding carries into a new digit and the exponent
        assert_eq!(g(999999.5), "1e+06");
        assert_eq!(g(1.0e100), "1e+100");
    }

    #[test]
    fn non_finite() {
        assert_eq!(g(f64::NAN), "nan");
        assert_eq!(g(f64::INFINITY), "inf");
        assert_eq!(g(f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn column_is_right_aligned() {
        assert_eq!(column(1.5), "           1.5");
        assert_eq!(column(-1.0e-10), "        -1e-10");
        assert_eq!(column(1.5).len(), COLUMN_WIDTH);
    }
}
