//! Key validation for traces handed over by a caller.
//!
//! The engine works on `u64` keys only. Callers that already hold numbers in
//! a wider or looser type go through these helpers, which reject anything that
//! is not a non-negative integer and report where it was found.

extern crate alloc;

use crate::error::SimError;
use crate::Key;
use alloc::string::ToString;
use alloc::vec::Vec;

/// Converts signed integers to keys, rejecting negatives.
///
/// ```
/// use hybrid_cache::trace::keys_from_signed;
///
/// assert_eq!(keys_from_signed(&[3, 0, 7]).unwrap(), vec![3, 0, 7]);
/// assert!(keys_from_signed(&[3, -1]).is_err());
/// ```
pub fn keys_from_signed(values: &[i64]) -> Result<Vec<Key>, SimError> {
    values
        .iter()
        .enumerate()
        .map(|(index, &value)| {
            Key::try_from(value).map_err(|_| SimError::InvalidKey {
                index,
                value: value.to_string(),
            })
        })
        .collect()
}

/// Converts floating-point values to keys.
///
/// Rejects NaN, infinities, negatives, fractional values and anything too
/// large to be represented exactly as a key.
pub fn keys_from_f64(values: &[f64]) -> Result<Vec<Key>, SimError> {
    // 2^64 as f64; every integral value below it fits in a u64
    const LIMIT: f64 = 18_446_744_073_709_551_616.0;

    values
        .iter()
        .enumerate()
        .map(|(index, &value)| {
            let integral = value.is_finite() && value >= 0.0 && value < LIMIT && value % 1.0 == 0.0;
            if integral {
                Ok(value as Key)
            } else {
                Err(SimError::InvalidKey {
                    index,
                    value: value.to_string(),
                })
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_signed_reports_first_bad_index() {
        let err = keys_from_signed(&[1, 2, -3, -4]).unwrap_err();
        assert_eq!(
            err,
            SimError::InvalidKey {
                index: 2,
                value: "-3".to_string()
            }
        );
        assert_eq!(keys_from_signed(&[]).unwrap(), Vec::<Key>::new());
    }

    #[test]
    fn test_f64_rejects_non_integers() {
        assert_eq!(keys_from_f64(&[0.0, 12.0, 1e6]).unwrap(), vec![0, 12, 1_000_000]);
        for bad in [1.5, -1.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 1e20] {
            assert!(
                matches!(keys_from_f64(&[bad]), Err(SimError::InvalidKey { index: 0, .. })),
                "{bad} accepted"
            );
        }
    }
}
