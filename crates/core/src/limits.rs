//! Value ranges and default sizes
//!
//! The fast stream produces 12-digit numbers, the slow stream fixed-length
//! alphanumeric strings. Defaults mirror a 250ms / 5s cadence with a window
//! of 5 slow values and 7 pairings.

/// Smallest 12-digit value (10^11)
pub const FAST_VALUE_MIN: u64 = 100_000_000_000;

/// Modulus applied to the raw 64-bit draw before offsetting into range
pub const FAST_VALUE_SPAN: u64 = 899_999_999_999;

/// Largest 12-digit value (10^12 - 1)
pub const FAST_VALUE_MAX: u64 = 999_999_999_999;

/// Largest value the fast generator can produce, one below [`FAST_VALUE_MAX`]
pub const FAST_GENERATED_MAX: u64 = FAST_VALUE_MIN + FAST_VALUE_SPAN - 1;

/// Characters slow values are drawn from
pub const ALPHANUMERIC: &[u8; 62] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Default slow value length
pub const DEFAULT_SLOW_LENGTH: usize = 8;

/// Default capacity of the slow store
pub const DEFAULT_SLOW_CAPACITY: usize = 5;

/// Default capacity of the pairing store
pub const DEFAULT_PAIRING_CAPACITY: usize = 7;

/// Default fast generator period in milliseconds
pub const DEFAULT_FAST_PERIOD_MS: u64 = 250;

/// Default slow generator period in milliseconds
pub const DEFAULT_SLOW_PERIOD_MS: u64 = 5_000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fast_range_is_twelve_digits() {
        assert_eq!(FAST_VALUE_MIN.to_string().len(), 12);
        assert_eq!(FAST_VALUE_MAX.to_string().len(), 12);
        assert!(FAST_VALUE_MAX < 1_000_000_000_000);
    }

    #[test]
    fn test_generated_max_inside_twelve_digit_range() {
        assert_eq!(FAST_GENERATED_MAX, 999_999_999_998);
        assert!(FAST_GENERATED_MAX < FAST_VALUE_MAX);
    }

    #[test]
    fn test_alphabet_is_alphanumeric_and_unique() {
        let mut seen = std::collections::HashSet::new();
        for &c in ALPHANUMERIC.iter() {
            assert!(c.is_ascii_alphanumeric());
            assert!(seen.insert(c));
        }
        assert_eq!(seen.len(), 62);
    }
}
