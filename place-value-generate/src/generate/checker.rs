pub fn is_usable_option(v: f64) -> bool {
    v.is_finite()
}

/// Rounds to `digits` significant digits through decimal text so the result
/// is the double nearest the decimal string, e.g. 3.3 * 100 becomes 330.
pub fn round_to_significant(value: f64, digits: usize) -> f64 {
    if !value.is_finite() || value == 0.0 || digits == 0 {
        return value;
    }
    format!("{:.*e}", digits - 1, value).parse().unwrap_or(value)
}

pub fn round_to_decimals(value: f64, places: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.*}", places, value).parse().unwrap_or(value)
}
