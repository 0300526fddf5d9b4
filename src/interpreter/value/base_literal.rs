use std::cmp::Ordering;

use num_bigint::BigUint;
use num_traits::{CheckedDiv, CheckedSub, Zero};

use crate::{error::RuntimeError, interpreter::evaluator::core::EvalResult};

/// The shared 64-symbol digit alphabet. A base `N` uses its first `N`
/// symbols.
pub const DIGIT_ALPHABET: &str = "0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ+/";
/// Smallest supported base.
pub const MIN_BASE: u32 = 2;
/// Largest supported base.
pub const MAX_BASE: u32 = 64;

/// An unsigned integer of any size written in an explicit base between 2
/// and 64.
///
/// Digits given to [`BaseLiteral::new`] are lower-cased. For bases up to 36
/// this makes literals case-insensitive; above 36 the upper-case half of the
/// alphabet cannot be written, so `b64@A` and `b64@a` denote the same value.
/// This is a known limitation of the notation. Literals built from a value use
/// the whole alphabet.
///
/// The derived `PartialEq` compares base and digits exactly and is what `===`
/// uses. Value equality regardless of base is [`BaseLiteral::loose_eq`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseLiteral {
    base:   u32,
    digits: String,
}

/// Right-hand side of a literal operation: either another literal or a plain
/// unsigned integer that is used as-is.
#[derive(Debug, Clone)]
pub enum Operand<'a> {
    /// A base literal, converted through [`BaseLiteral::to_integer`].
    Literal(&'a BaseLiteral),
    /// A plain integer.
    Integer(BigUint),
}

impl<'a> From<&'a BaseLiteral> for Operand<'a> {
    fn from(literal: &'a BaseLiteral) -> Self {
        Self::Literal(literal)
    }
}

impl From<BigUint> for Operand<'_> {
    fn from(value: BigUint) -> Self {
        Self::Integer(value)
    }
}

impl From<u32> for Operand<'_> {
    fn from(value: u32) -> Self {
        Self::Integer(BigUint::from(value))
    }
}

impl Operand<'_> {
    fn to_integer(self) -> EvalResult<BigUint> {
        match self {
            Self::Literal(literal) => literal.to_integer(),
            Self::Integer(value) => Ok(value),
        }
    }
}

/// Returns the digits allowed in `base`.
fn alphabet(base: u32) -> &'static str {
    let len = usize::try_from(base.min(MAX_BASE)).unwrap_or(64);
    &DIGIT_ALPHABET[..len]
}

fn check_base(base: u32) -> EvalResult<()> {
    if (MIN_BASE..=MAX_BASE).contains(&base) {
        Ok(())
    } else {
        Err(RuntimeError::BaseOutOfRange { base: BigUint::from(base) })
    }
}

impl BaseLiteral {
    /// Creates a literal after validating the base and every digit.
    ///
    /// # Parameters
    /// - `base`: The radix, which must lie in `2..=64`.
    /// - `digits`: Digit string; matched case-insensitively and stored
    ///   lower-cased.
    ///
    /// # Returns
    /// - `Ok(BaseLiteral)`: The validated literal.
    /// - `Err(RuntimeError::BaseOutOfRange)`: If the base is unsupported.
    /// - `Err(RuntimeError::EmptyDigits)`: If no digits were given.
    /// - `Err(RuntimeError::InvalidDigit)`: If a digit is outside the base's
    ///   alphabet.
    ///
    /// # Example
    /// ```
    /// use mbase::interpreter::value::base_literal::BaseLiteral;
    ///
    /// let literal = BaseLiteral::new(16, "FF").unwrap();
    /// assert_eq!(literal.digits(), "ff");
    /// assert!(BaseLiteral::new(2, "102").is_err());
    /// assert!(BaseLiteral::new(65, "1").is_err());
    /// ```
    pub fn new(base: u32, digits: &str) -> EvalResult<Self> {
        check_base(base)?;
        if digits.is_empty() {
            return Err(RuntimeError::EmptyDigits { base });
        }

        let digits = digits.to_lowercase();
        let allowed = alphabet(base);
        if let Some(digit) = digits.chars().find(|ch| !allowed.contains(*ch)) {
            return Err(RuntimeError::InvalidDigit { digit, base });
        }

        Ok(Self { base, digits })
    }

    /// The radix of the literal.
    #[must_use]
    pub const fn base(&self) -> u32 {
        self.base
    }

    /// The stored, lower-cased digit string.
    #[must_use]
    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// Evaluates the digits positionally, most significant first.
    ///
    /// Values are not bounded by any machine word. A digit missing from the
    /// alphabet fails instead of panicking.
    ///
    /// # Example
    /// ```
    /// use mbase::interpreter::value::base_literal::BaseLiteral;
    /// use num_bigint::BigUint;
    ///
    /// let literal = BaseLiteral::new(16, "ff").unwrap();
    /// assert_eq!(literal.to_integer().unwrap(), BigUint::from(255_u32));
    /// ```
    pub fn to_integer(&self) -> EvalResult<BigUint> {
        let allowed = alphabet(self.base);
        let invalid = |digit| RuntimeError::InvalidDigit { digit, base: self.base };

        let indices = self.digits
                          .chars()
                          .map(|digit| {
                              allowed.find(digit)
                                     .and_then(|index| u8::try_from(index).ok())
                                     .ok_or_else(|| invalid(digit))
                          })
                          .collect::<EvalResult<Vec<u8>>>()?;

        BigUint::from_radix_be(&indices, self.base)
            .ok_or_else(|| RuntimeError::BaseOutOfRange { base: BigUint::from(self.base) })
    }

    /// Builds the literal that represents `value` in `base`.
    ///
    /// Zero is written as the single digit `0`.
    ///
    /// # Example
    /// ```
    /// use mbase::interpreter::value::base_literal::BaseLiteral;
    /// use num_bigint::BigUint;
    ///
    /// let literal = BaseLiteral::from_integer(2, &BigUint::from(10_u32)).unwrap();
    /// assert_eq!(literal.to_string(), "b2@1010");
    /// ```
    pub fn from_integer(base: u32, value: &BigUint) -> EvalResult<Self> {
        check_base(base)?;

        let symbols = alphabet(base).as_bytes();
        let digits = value.to_radix_be(base)
                          .into_iter()
                          .map(|index| char::from(symbols[usize::from(index)]))
                          .collect();

        Ok(Self { base, digits })
    }

    /// Re-expresses the value in `target_base`.
    ///
    /// # Example
    /// ```
    /// use mbase::interpreter::value::base_literal::BaseLiteral;
    ///
    /// let literal = BaseLiteral::new(16, "ff").unwrap();
    /// assert_eq!(literal.rebase(2).unwrap().digits(), "11111111");
    /// ```
    pub fn rebase(&self, target_base: u32) -> EvalResult<Self> {
        Self::from_integer(target_base, &self.to_integer()?)
    }

    fn combine<'a>(&self,
                   other: impl Into<Operand<'a>>,
                   op: impl FnOnce(BigUint, BigUint) -> EvalResult<BigUint>)
                   -> EvalResult<Self> {
        let result = op(self.to_integer()?, other.into().to_integer()?)?;
        Self::from_integer(self.base, &result)
    }

    /// Adds `other`, keeping this literal's base.
    pub fn add<'a>(&self, other: impl Into<Operand<'a>>) -> EvalResult<Self> {
        self.combine(other, |a, b| Ok(a + b))
    }

    /// Subtracts `other`, keeping this literal's base. A negative difference is
    /// a `NegativeValue` error.
    pub fn sub<'a>(&self, other: impl Into<Operand<'a>>) -> EvalResult<Self> {
        self.combine(other, |a, b| a.checked_sub(&b).ok_or(RuntimeError::NegativeValue))
    }

    /// Multiplies by `other`, keeping this literal's base.
    pub fn mul<'a>(&self, other: impl Into<Operand<'a>>) -> EvalResult<Self> {
        self.combine(other, |a, b| Ok(a * b))
    }

    /// Integer division by `other`, keeping this literal's base.
    pub fn div<'a>(&self, other: impl Into<Operand<'a>>) -> EvalResult<Self> {
        self.combine(other, |a, b| a.checked_div(&b).ok_or(RuntimeError::DivisionByZero))
    }

    /// Compares integer values, ignoring bases and digit spelling.
    ///
    /// # Example
    /// ```
    /// use mbase::interpreter::value::base_literal::BaseLiteral;
    ///
    /// let binary = BaseLiteral::new(2, "1010").unwrap();
    /// let decimal = BaseLiteral::new(10, "10").unwrap();
    /// assert!(binary.loose_eq(&decimal).unwrap());
    /// assert_ne!(binary, decimal);
    /// ```
    pub fn loose_eq<'a>(&self, other: impl Into<Operand<'a>>) -> EvalResult<bool> {
        Ok(self.to_integer()? == other.into().to_integer()?)
    }

    /// Orders by integer value.
    pub fn compare<'a>(&self, other: impl Into<Operand<'a>>) -> EvalResult<Ordering> {
        Ok(self.to_integer()?.cmp(&other.into().to_integer()?))
    }

    /// Whether the value is nonzero.
    pub fn is_nonzero(&self) -> EvalResult<bool> {
        Ok(!self.to_integer()?.is_zero())
    }
}

impl std::fmt::Display for BaseLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.base == 10 {
            write!(f, "{}", self.digits)
        } else {
            write!(f, "b{}@{}", self.base, self.digits)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(base: u32, digits: &str) -> BaseLiteral {
        BaseLiteral::new(base, digits).unwrap()
    }

    #[test]
    fn construction_validates_base_and_digits() {
        assert_eq!(BaseLiteral::new(1, "0"),
                   Err(RuntimeError::BaseOutOfRange { base: BigUint::from(1_u32) }));
        assert_eq!(BaseLiteral::new(65, "0"),
                   Err(RuntimeError::BaseOutOfRange { base: BigUint::from(65_u32) }));
        assert_eq!(BaseLiteral::new(8, "18"), Err(RuntimeError::InvalidDigit { digit: '8', base: 8 }));
        assert_eq!(BaseLiteral::new(10, ""), Err(RuntimeError::EmptyDigits { base: 10 }));
        assert_eq!(lit(64, "+/").digits(), "+/");
    }

    #[test]
    fn digits_are_lowercased() {
        assert_eq!(lit(16, "DeAdBeEf").digits(), "deadbeef");
        assert_eq!(lit(64, "Z"), lit(64, "z"));
    }

    #[test]
    fn round_trip_through_integers() {
        let cases = [(2, "1011"), (8, "777"), (10, "0"), (16, "ff"), (36, "zz"), (64, "a+/")];
        for (base, digits) in cases {
            let literal = lit(base, digits);
            let value = literal.to_integer().unwrap();
            assert_eq!(BaseLiteral::from_integer(base, &value).unwrap(), literal);
        }
    }

    #[test]
    fn rebase_preserves_value() {
        let original = lit(16, "beef");
        for target in [2, 3, 7, 10, 16, 36] {
            let back = original.rebase(target).unwrap().rebase(16).unwrap();
            assert_eq!(back.to_integer().unwrap(), original.to_integer().unwrap());
        }
        assert_eq!(original.rebase(1),
                   Err(RuntimeError::BaseOutOfRange { base: BigUint::from(1_u32) }));
    }

    #[test]
    fn arithmetic_uses_left_base() {
        let hex = lit(16, "a");
        let bin = lit(2, "11");

        assert_eq!(hex.add(&bin).unwrap(), lit(16, "d"));
        assert_eq!(bin.mul(&hex).unwrap(), lit(2, "11110"));
        assert_eq!(hex.div(&bin).unwrap(), lit(16, "3"));
        assert_eq!(hex.sub(3_u32).unwrap(), lit(16, "7"));
    }

    #[test]
    fn arithmetic_failures() {
        let small = lit(10, "2");
        let big = lit(10, "5");

        assert_eq!(small.sub(&big), Err(RuntimeError::NegativeValue));
        assert_eq!(big.div(0_u32), Err(RuntimeError::DivisionByZero));
        assert_eq!(lit(2, "0").sub(1_u32), Err(RuntimeError::NegativeValue));
    }

    #[test]
    fn values_are_not_bounded_by_machine_integers() {
        let nines = lit(10, &"9".repeat(45));
        let sum = nines.add(1_u32).unwrap();
        assert_eq!(sum.digits(), format!("1{}", "0".repeat(45)));
        assert!(sum.is_nonzero().unwrap());
        assert_eq!(sum.sub(&nines).unwrap(), lit(10, "1"));

        let wide = lit(64, &"z".repeat(40));
        assert_eq!(wide.rebase(2).unwrap().rebase(64).unwrap(), wide);
        assert_eq!(wide.mul(&wide).unwrap().div(&wide).unwrap(), wide);
        assert_eq!(wide.compare(&nines).unwrap(), Ordering::Greater);
    }

    #[test]
    fn strict_equality_is_finer_than_loose() {
        let a = lit(2, "1010");
        let b = lit(10, "10");
        let c = lit(2, "1010");

        assert!(a.loose_eq(&b).unwrap());
        assert_ne!(a, b);
        assert_eq!(a, c);
        assert!(a.loose_eq(&c).unwrap());
        assert_eq!(a.compare(&lit(16, "b")).unwrap(), Ordering::Less);
    }

    #[test]
    fn display_omits_prefix_for_base_ten() {
        assert_eq!(lit(10, "42").to_string(), "42");
        assert_eq!(lit(16, "ff").to_string(), "b16@ff");
    }
}
