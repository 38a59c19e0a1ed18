//! Ray fixed-point conversions between underlying amounts and scaled balances.
//!
//! ## Overview
//!
//! Balances are stored in index units: a supplier holding `s` pool units owns
//! `s * pool_index` of the underlying asset. Indexes are `u128` values scaled
//! by 10^27 (one RAY represents a growth factor of 1.0), amounts and scaled
//! balances are `u64`.
//!
//! ## Rounding
//!
//! Both directions round toward zero. This is the only source of dust in the
//! matching engine and it is the same for all four matching operations:
//!
//! - `ray_mul(scaled, index) = floor(scaled * index / RAY)`
//! - `ray_div(amount, index) = floor(amount * RAY / index)`
//!
//! The products are formed in 256 bits, so no intermediate can overflow.
//! Results that do not fit in a `u64` saturate at `u64::MAX`.
//!
//! ## Examples
//!
//! ```
//! use p2p_matcher::types::ray::{RAY, ray_mul, ray_div, to_ray};
//!
//! let index = to_ray("1.5").unwrap();
//! assert_eq!(ray_mul(3, index), 4);         // 4.5 floored
//! assert_eq!(ray_div(4, index), Some(2));   // 2.66.. floored
//! assert_eq!(ray_mul(100, RAY), 100);
//! ```

use primitive_types::U256;
use rust_decimal::Decimal;
use std::num::NonZeroU128;
use std::str::FromStr;

/// Number of decimal places carried by an index.
pub const RAY_DECIMALS: u32 = 27;

/// One RAY: the index value representing 1.0.
pub const RAY: u128 = 1_000_000_000_000_000_000_000_000_000;

// ============================================================================
// Conversion between scaled balances and underlying amounts
// ============================================================================

#[inline]
fn saturate_u64(value: U256) -> u64 {
    if value > U256::from(u64::MAX) {
        u64::MAX
    } else {
        value.low_u64()
    }
}

/// Convert a scaled balance to its underlying amount, rounding down.
///
/// # Example
///
/// ```
/// use p2p_matcher::types::ray::{RAY, ray_mul};
///
/// assert_eq!(ray_mul(50, 2 * RAY), 100);
/// assert_eq!(ray_mul(0, 2 * RAY), 0);
/// ```
#[inline]
pub fn ray_mul(scaled: u64, index: u128) -> u64 {
    saturate_u64(U256::from(scaled) * U256::from(index) / U256::from(RAY))
}

/// [`ray_mul`] that returns `None` instead of saturating.
///
/// ```
/// use p2p_matcher::types::ray::{RAY, ray_mul_checked};
///
/// assert_eq!(ray_mul_checked(50, 2 * RAY), Some(100));
/// assert_eq!(ray_mul_checked(u64::MAX, 2 * RAY), None);
/// ```
#[inline]
pub fn ray_mul_checked(scaled: u64, index: u128) -> Option<u64> {
    let value = U256::from(scaled) * U256::from(index) / U256::from(RAY);
    (value <= U256::from(u64::MAX)).then(|| value.low_u64())
}

/// Convert an underlying amount to a scaled balance, rounding down.
///
/// Returns `None` for a zero index.
///
/// # Example
///
/// ```
/// use p2p_matcher::types::ray::{RAY, ray_div};
///
/// assert_eq!(ray_div(100, 2 * RAY), Some(50));
/// assert_eq!(ray_div(100, 0), None);
/// ```
#[inline]
pub fn ray_div(amount: u64, index: u128) -> Option<u64> {
    NonZeroU128::new(index).map(|index| ray_div_nonzero(amount, index))
}

/// [`ray_div`] for an index already known to be non-zero.
#[inline]
pub fn ray_div_nonzero(amount: u64, index: NonZeroU128) -> u64 {
    saturate_u64(U256::from(amount) * U256::from(RAY) / U256::from(index.get()))
}

/// Subtraction that clamps at zero instead of underflowing.
///
/// Rounding makes exact equality between a balance and the amount taken out
/// of it unreliable; any negative result is treated as zero.
#[inline]
pub fn zero_floor_sub(a: u64, b: u64) -> u64 {
    a.saturating_sub(b)
}

// ============================================================================
// Decimal parsing and display
// ============================================================================

/// Parse a decimal string into a ray value.
///
/// Digits beyond the 27th decimal place are truncated.
///
/// # Returns
///
/// * `Some(u128)` - The ray representation
/// * `None` - If parsing fails, the value is negative, or it does not fit
///
/// # Example
///
/// ```
/// use p2p_matcher::types::ray::{RAY, to_ray};
///
/// assert_eq!(to_ray("1"), Some(RAY));
/// assert_eq!(to_ray("1.05"), Some(RAY + RAY / 20));
/// assert_eq!(to_ray("-1"), None);
/// ```
pub fn to_ray(s: &str) -> Option<u128> {
    let decimal = Decimal::from_str(s).ok()?;
    decimal_to_ray(decimal)
}

/// Convert a `Decimal` to a ray value, or `None` if negative.
pub fn decimal_to_ray(d: Decimal) -> Option<u128> {
    if d.is_sign_negative() && !d.is_zero() {
        return None;
    }

    let mantissa = u128::try_from(d.mantissa()).ok()?;
    let scale = d.scale();
    if scale <= RAY_DECIMALS {
        mantissa.checked_mul(10u128.checked_pow(RAY_DECIMALS - scale)?)
    } else {
        Some(mantissa / 10u128.pow(scale - RAY_DECIMALS))
    }
}

/// Format a ray value as a normalized decimal string.
///
/// Returns `None` for values too large for `Decimal` (roughly 79.2 RAY).
///
/// # Example
///
/// ```
/// use p2p_matcher::types::ray::{RAY, from_ray};
///
/// assert_eq!(from_ray(RAY).as_deref(), Some("1"));
/// assert_eq!(from_ray(RAY + RAY / 4).as_deref(), Some("1.25"));
/// ```
pub fn from_ray(value: u128) -> Option<String> {
    let signed = i128::try_from(value).ok()?;
    let decimal = Decimal::try_from_i128_with_scale(signed, RAY_DECIMALS).ok()?;
    Some(decimal.normalize().to_string())
}

/// Compare two amounts with a tolerance (for testing)
///
/// `true` if |a - b| <= tolerance
pub fn approx_eq(a: u64, b: u64, tolerance: u64) -> bool {
    a.abs_diff(b) <= tolerance
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_constant() {
        assert_eq!(RAY, 10u128.pow(RAY_DECIMALS));
    }

    #[test]
    fn test_unit_index_is_identity() {
        for amount in [0u64, 1, 7, 1_000_000, u64::MAX] {
            assert_eq!(ray_mul(amount, RAY), amount);
            assert_eq!(ray_div(amount, RAY), Some(amount));
        }
    }

    #[test]
    fn test_rounding_is_floor_both_ways() {
        let index = to_ray("1.5").unwrap();

        assert_eq!(ray_mul(3, index), 4);
        assert_eq!(ray_mul(1, index), 1);
        assert_eq!(ray_div(4, index), Some(2));
        assert_eq!(ray_div(1, index), Some(0));
    }

    #[test]
    fn test_round_trip_loses_at_most_one_unit_per_conversion() {
        let index = to_ray("1.123456789").unwrap();

        for amount in [1u64, 99, 10_000, 123_456_789] {
            let scaled = ray_div(amount, index).unwrap();
            let back = ray_mul(scaled, index);
            assert!(back <= amount);
            assert!(approx_eq(back, amount, 2), "amount {} came back as {}", amount, back);
        }
    }

    #[test]
    fn test_no_intermediate_overflow() {
        // u64::MAX * 3 RAY would overflow u128
        let index = 3 * RAY;
        assert_eq!(ray_div(u64::MAX, index), Some(u64::MAX / 3));
        // saturates instead of wrapping
        assert_eq!(ray_mul(u64::MAX, index), u64::MAX);
    }

    #[test]
    fn test_ray_mul_checked_flags_saturation() {
        assert_eq!(ray_mul_checked(u64::MAX, RAY), Some(u64::MAX));
        assert_eq!(ray_mul_checked(u64::MAX / 2 + 1, 2 * RAY), None);
        assert_eq!(ray_mul(u64::MAX / 2 + 1, 2 * RAY), u64::MAX);
    }

    #[test]
    fn test_ray_div_zero_index() {
        assert_eq!(ray_div(10, 0), None);
    }

    #[test]
    fn test_zero_floor_sub() {
        assert_eq!(zero_floor_sub(10, 3), 7);
        assert_eq!(zero_floor_sub(3, 10), 0);
        assert_eq!(zero_floor_sub(0, 0), 0);
    }

    #[test]
    fn test_to_ray() {
        assert_eq!(to_ray("1"), Some(RAY));
        assert_eq!(to_ray("1.0"), Some(RAY));
        assert_eq!(to_ray("0"), Some(0));
        assert_eq!(to_ray("2.5"), Some(5 * RAY / 2));
        assert_eq!(to_ray("0.000000000000000000000000001"), Some(1));

        assert_eq!(to_ray("-0.5"), None);
        assert_eq!(to_ray("abc"), None);
        assert_eq!(to_ray(""), None);
    }

    #[test]
    fn test_to_ray_truncates_extra_precision() {
        // 28 decimal places, the last one is dropped
        assert_eq!(to_ray("0.0000000000000000000000000019"), Some(1));
    }

    #[test]
    fn test_from_ray() {
        assert_eq!(from_ray(RAY).as_deref(), Some("1"));
        assert_eq!(from_ray(0).as_deref(), Some("0"));
        assert_eq!(from_ray(3 * RAY / 2).as_deref(), Some("1.5"));
        assert_eq!(from_ray(u128::MAX), None);
    }

    #[test]
    fn test_ray_string_roundtrip() {
        for s in ["1", "1.05", "0.5", "2.000000000000000000000000001"] {
            let ray = to_ray(s).unwrap();
            let back = from_ray(ray).unwrap();
            assert_eq!(
                Decimal::from_str(s).unwrap().normalize(),
                Decimal::from_str(&back).unwrap(),
                "roundtrip failed for {}",
                s
            );
        }
    }

    #[test]
    fn test_approx_eq() {
        assert!(approx_eq(100, 100, 0));
        assert!(approx_eq(100, 101, 1));
        assert!(approx_eq(101, 100, 1));
        assert!(!approx_eq(100, 102, 1));
    }
}
