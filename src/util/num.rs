use num_bigint::BigUint;
use num_traits::ToPrimitive;

use crate::{error::RuntimeError, interpreter::evaluator::core::EvalResult};

/// Converts a literal's value into a radix, accepting only values inside
/// `2..=64`.
///
/// Used wherever a program supplies a base at runtime, for example the target
/// base of `rebase`.
///
/// ## Errors
/// Returns `RuntimeError::BaseOutOfRange` carrying the rejected value.
///
/// ## Example
/// ```
/// use mbase::{error::RuntimeError, util::num::biguint_to_base_checked};
/// use num_bigint::BigUint;
///
/// assert_eq!(biguint_to_base_checked(&BigUint::from(16_u32)).unwrap(), 16);
///
/// let err = biguint_to_base_checked(&BigUint::from(65_u32)).unwrap_err();
/// assert_eq!(err, RuntimeError::BaseOutOfRange { base: BigUint::from(65_u32) });
/// ```
pub fn biguint_to_base_checked(value: &BigUint) -> EvalResult<u32> {
    use crate::interpreter::value::base_literal::{MAX_BASE, MIN_BASE};

    match value.to_u32() {
        Some(base) if (MIN_BASE..=MAX_BASE).contains(&base) => Ok(base),
        _ => Err(RuntimeError::BaseOutOfRange { base: value.clone() }),
    }
}

/// Converts a literal's value into a `u64`.
///
/// ## Errors
/// Returns `RuntimeError::Overflow` for values above `u64::MAX`.
///
/// ## Example
/// ```
/// use mbase::{error::RuntimeError, util::num::biguint_to_u64_checked};
/// use num_bigint::BigUint;
///
/// assert_eq!(biguint_to_u64_checked(&BigUint::from(3_u32)).unwrap(), 3);
///
/// let huge = BigUint::from(u64::MAX) + 1_u32;
/// assert!(matches!(biguint_to_u64_checked(&huge), Err(RuntimeError::Overflow)));
/// ```
pub fn biguint_to_u64_checked(value: &BigUint) -> EvalResult<u64> {
    value.to_u64().ok_or(RuntimeError::Overflow)
}
