use num_bigint::BigUint;

use crate::interpreter::{evaluator::core::EvalResult, value::base_literal::BaseLiteral};

/// Represents a runtime value in the interpreter.
///
/// Programs only ever handle three kinds of values: base literals, text, and
/// the absence of a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// An integer in an explicit base.
    Literal(BaseLiteral),
    /// A host string.
    Text(String),
    /// No result. Produced by assignments, declarations, `if`, loops and
    /// functions that never reach `ret`.
    Unit,
}

impl From<BaseLiteral> for Value {
    fn from(literal: BaseLiteral) -> Self {
        Self::Literal(literal)
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl Value {
    /// Truthiness as used by `if`, `while`, `&&` and `||`.
    ///
    /// `Unit` is false, a literal is true if its value is nonzero, and a text
    /// is true if it is not empty.
    ///
    /// # Example
    /// ```
    /// use mbase::interpreter::value::{base_literal::BaseLiteral, core::Value};
    ///
    /// assert!(!Value::Unit.is_truthy().unwrap());
    /// assert!(!Value::from(BaseLiteral::new(2, "0").unwrap()).is_truthy().unwrap());
    /// assert!(Value::from("x").is_truthy().unwrap());
    /// ```
    pub fn is_truthy(&self) -> EvalResult<bool> {
        match self {
            Self::Literal(literal) => literal.is_nonzero(),
            Self::Text(text) => Ok(!text.is_empty()),
            Self::Unit => Ok(false),
        }
    }

    /// Encodes a boolean as the base-10 literal `1` or `0`.
    #[must_use]
    pub fn from_bool(value: bool) -> Self {
        let digit = BigUint::from(u32::from(value));
        BaseLiteral::from_integer(10, &digit).map_or(Self::Unit, Self::Literal)
    }

    /// Short description of the value's kind for error messages.
    #[must_use]
    pub fn type_name(&self) -> String {
        match self {
            Self::Literal(literal) => format!("b{}", literal.base()),
            Self::Text(_) => "str".to_string(),
            Self::Unit => "unit".to_string(),
        }
    }

    /// Returns `true` if the value is [`Value::Unit`].
    #[must_use]
    pub const fn is_unit(&self) -> bool {
        matches!(self, Self::Unit)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Literal(literal) => write!(f, "{literal}"),
            Self::Text(text) => write!(f, "{text}"),
            Self::Unit => Ok(()),
        }
    }
}
