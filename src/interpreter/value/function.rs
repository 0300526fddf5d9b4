use std::rc::Rc;

use crate::{
    ast::Node,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::{
            base_literal::{MAX_BASE, MIN_BASE},
            core::Value,
        },
    },
};

/// Host implementation of a native function.
///
/// Receives the already type-checked arguments and the calling context, which
/// gives access to the console and to the functions visible at the call site.
pub type NativeFn = fn(&[Value], &Context) -> EvalResult<Value>;

/// Declared type of a function parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTag {
    /// `b_`: any base literal.
    AnyBase,
    /// `bN`: a base literal whose base is exactly `N`.
    ExactBase(u32),
    /// `str`: a text value.
    Text,
}

impl TypeTag {
    /// Parses a tag as written in a declaration.
    ///
    /// # Example
    /// ```
    /// use mbase::interpreter::value::function::TypeTag;
    ///
    /// assert_eq!(TypeTag::parse("b_").unwrap(), TypeTag::AnyBase);
    /// assert_eq!(TypeTag::parse("b16").unwrap(), TypeTag::ExactBase(16));
    /// assert_eq!(TypeTag::parse("str").unwrap(), TypeTag::Text);
    /// assert!(TypeTag::parse("int").is_err());
    /// ```
    pub fn parse(tag: &str) -> EvalResult<Self> {
        match tag {
            "b_" => Ok(Self::AnyBase),
            "str" => Ok(Self::Text),
            _ => tag.strip_prefix('b')
                    .filter(|base| !base.is_empty() && base.chars().all(|c| c.is_ascii_digit()))
                    .and_then(|base| base.parse::<u32>().ok())
                    .filter(|base| (MIN_BASE..=MAX_BASE).contains(base))
                    .map(Self::ExactBase)
                    .ok_or_else(|| RuntimeError::UnknownTypeTag { tag: tag.to_string() }),
        }
    }

    /// Whether `value` satisfies this tag.
    #[must_use]
    pub const fn accepts(self, value: &Value) -> bool {
        match (self, value) {
            (Self::AnyBase, Value::Literal(_)) | (Self::Text, Value::Text(_)) => true,
            (Self::ExactBase(base), Value::Literal(literal)) => literal.base() == base,
            _ => false,
        }
    }
}

impl std::fmt::Display for TypeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AnyBase => write!(f, "b_"),
            Self::ExactBase(base) => write!(f, "b{base}"),
            Self::Text => write!(f, "str"),
        }
    }
}

/// What runs when a function is called.
#[derive(Debug, Clone)]
pub enum FunctionBody {
    /// Statements of a user function.
    Interpreted(Rc<[Node]>),
    /// A host function.
    Native(NativeFn),
}

/// A callable registered in a context, either declared by the program or
/// provided by the host.
#[derive(Debug, Clone)]
pub struct Function {
    /// Name the function is called by.
    pub name:        String,
    /// Parameters in declaration order.
    pub params:      Vec<(TypeTag, String)>,
    /// Declared return tag. Recorded for display only, never checked.
    pub return_type: Option<String>,
    /// Implementation.
    pub body:        FunctionBody,
}

impl Function {
    /// Returns `true` for host functions.
    #[must_use]
    pub const fn is_native(&self) -> bool {
        matches!(self.body, FunctionBody::Native(_))
    }

    /// Renders `fn name(tag arg, ...) ret`.
    ///
    /// # Example
    /// ```
    /// use mbase::interpreter::value::function::{Function, FunctionBody, TypeTag};
    ///
    /// let function = Function { name:        "add".to_string(),
    ///                           params:      vec![(TypeTag::ExactBase(10), "a".to_string()),
    ///                                             (TypeTag::AnyBase, "b".to_string())],
    ///                           return_type: Some("b10".to_string()),
    ///                           body:        FunctionBody::Interpreted(Vec::new().into()), };
    ///
    /// assert_eq!(function.signature(), "fn add(b10 a, b_ b) b10");
    /// ```
    #[must_use]
    pub fn signature(&self) -> String {
        let params = self.params
                         .iter()
                         .map(|(tag, name)| format!("{tag} {name}"))
                         .collect::<Vec<_>>()
                         .join(", ");

        match &self.return_type {
            Some(ret) => format!("fn {}({params}) {ret}", self.name),
            None => format!("fn {}({params})", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::value::base_literal::BaseLiteral;

    #[test]
    fn tags_outside_supported_bases_are_unknown() {
        for tag in ["b1", "b65", "b", "bx", "B10", "b+2"] {
            assert_eq!(TypeTag::parse(tag),
                       Err(RuntimeError::UnknownTypeTag { tag: tag.to_string() }));
        }
    }

    #[test]
    fn tag_acceptance() {
        let hex = Value::Literal(BaseLiteral::new(16, "f").unwrap());
        let text = Value::from("f");

        assert!(TypeTag::AnyBase.accepts(&hex));
        assert!(TypeTag::ExactBase(16).accepts(&hex));
        assert!(!TypeTag::ExactBase(10).accepts(&hex));
        assert!(!TypeTag::Text.accepts(&hex));
        assert!(TypeTag::Text.accepts(&text));
        assert!(!TypeTag::AnyBase.accepts(&text));
        assert!(!TypeTag::AnyBase.accepts(&Value::Unit));
    }
}
