//! Fixed-point quantities
//!
//! Every quantity in the simulator (liters, kilometres, wear percentage) is
//! stored as an `i64` count of hundredths, matching the two-decimal columns
//! the persistence layer uses. This module provides the scaled arithmetic
//! and the decimal-string conversions used at the integration boundary.
//!
//! # Critical Invariants
//!
//! 1. All quantity values are i64 hundredths (1.00 = 100)
//! 2. Intermediate products are computed in i128 and saturate when narrowed
//! 3. Rounding direction is always chosen explicitly by the caller

use thiserror::Error;

/// Number of stored units per whole unit (two decimal places)
pub const SCALE: i64 = 100;

/// Errors raised when converting external decimal values
#[derive(Debug, Error, PartialEq)]
pub enum UnitsError {
    #[error("Invalid amount: '{0}' is not a decimal number")]
    InvalidAmount(String),

    #[error("Invalid amount: '{0}' has more than two decimal places")]
    TooPrecise(String),
}

/// Convert a whole number of units into hundredths
///
/// # Example
/// ```
/// use fleet_simulator_core_rs::core::units::whole;
///
/// assert_eq!(whole(40), 4_000);
/// ```
pub const fn whole(units: i64) -> i64 {
    units * SCALE
}

/// Narrow an i128 result, saturating at the i64 bounds
fn saturate(value: i128) -> i64 {
    value.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

/// `value * num / den`, rounded towards negative infinity
///
/// `den` must be positive. Results outside the i64 range saturate.
pub fn ratio_floor(value: i64, num: i64, den: i64) -> i64 {
    debug_assert!(den > 0, "denominator must be positive");
    let product = value as i128 * num as i128;
    saturate(product.div_euclid(den as i128))
}

/// `value * num / den`, rounded towards positive infinity
///
/// `den` must be positive. Results outside the i64 range saturate.
///
/// # Example
/// ```
/// use fleet_simulator_core_rs::core::units::ratio_ceil;
///
/// assert_eq!(ratio_ceil(101, 100, 800), 13);
/// assert_eq!(ratio_ceil(i64::MAX / 10, 100, 1), i64::MAX);
/// ```
pub fn ratio_ceil(value: i64, num: i64, den: i64) -> i64 {
    debug_assert!(den > 0, "denominator must be positive");
    let product = value as i128 * num as i128;
    let den = den as i128;
    let quotient = product.div_euclid(den);
    if product.rem_euclid(den) == 0 {
        saturate(quotient)
    } else {
        saturate(quotient + 1)
    }
}

/// Render hundredths as a two-decimal string (`1250` → `"12.50"`)
///
/// # Example
/// ```
/// use fleet_simulator_core_rs::format_fixed;
///
/// assert_eq!(format_fixed(1_250), "12.50");
/// assert_eq!(format_fixed(-5), "-0.05");
/// ```
pub fn format_fixed(value: i64) -> String {
    let sign = if value < 0 { "-" } else { "" };
    let abs = value.unsigned_abs();
    let scale = SCALE as u64;
    format!("{}{}.{:02}", sign, abs / scale, abs % scale)
}

/// Parse a decimal string into hundredths
///
/// Accepts an optional sign, an integer part and up to two decimal places
/// (`"8"`, `"8.5"`, `"-0.25"`). Anything else is `InvalidAmount`.
///
/// # Example
/// ```
/// use fleet_simulator_core_rs::parse_fixed;
///
/// assert_eq!(parse_fixed("12.5"), Ok(1_250));
/// assert!(parse_fixed("twelve").is_err());
/// ```
pub fn parse_fixed(input: &str) -> Result<i64, UnitsError> {
    let trimmed = input.trim();
    let invalid = || UnitsError::InvalidAmount(input.to_string());

    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let (int_part, frac_part) = match digits.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (digits, ""),
    };

    if int_part.is_empty() && frac_part.is_empty() {
        return Err(invalid());
    }
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if !all_digits(int_part) || !all_digits(frac_part) {
        return Err(invalid());
    }
    if frac_part.len() > 2 {
        return Err(UnitsError::TooPrecise(input.to_string()));
    }

    let int_value: i64 = if int_part.is_empty() {
        0
    } else {
        int_part.parse().map_err(|_| invalid())?
    };
    let frac_value: i64 = match frac_part.len() {
        0 => 0,
        1 => frac_part.parse::<i64>().map_err(|_| invalid())? * 10,
        _ => frac_part.parse().map_err(|_| invalid())?,
    };

    let magnitude = int_value
        .checked_mul(SCALE)
        .and_then(|v| v.checked_add(frac_value))
        .ok_or_else(invalid)?;

    Ok(if negative { -magnitude } else { magnitude })
}
