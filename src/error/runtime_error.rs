use num_bigint::BigUint;

use crate::error::ParseError;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Represents all errors that can occur during evaluation and runtime.
pub enum RuntimeError {
    /// Tried to read a variable that is not bound.
    UnknownVariable {
        /// The name of the variable.
        name: String,
    },
    /// Called a function that is not registered in the environment.
    UnknownFunction {
        /// The name of the function.
        name:   String,
        /// Character offset of the call.
        offset: usize,
    },
    /// The wrong number of arguments was supplied to a function.
    ArgumentCountMismatch {
        /// The name of the function.
        name:     String,
        /// Number of declared parameters.
        expected: usize,
        /// Number of supplied arguments.
        found:    usize,
        /// Character offset of the call.
        offset:   usize,
    },
    /// An argument did not satisfy the parameter's type tag.
    ArgumentTypeMismatch {
        /// The name of the function.
        name:     String,
        /// One-based position of the argument.
        position: usize,
        /// The declared type tag.
        expected: String,
        /// Description of the supplied value.
        found:    String,
        /// Character offset of the call.
        offset:   usize,
    },
    /// A function declaration used a type tag outside `b_`, `bN` and `str`.
    UnknownTypeTag {
        /// The tag as written.
        tag: String,
    },
    /// An operator was applied to values it does not support.
    UnsupportedOperation {
        /// Details about the operands.
        details: String,
    },
    /// A digit does not belong to the alphabet of the literal's base.
    InvalidDigit {
        /// The offending digit.
        digit: char,
        /// The base of the literal.
        base:  u32,
    },
    /// A base literal was given no digits.
    EmptyDigits {
        /// The base of the literal.
        base: u32,
    },
    /// A base outside `2..=64` was requested.
    BaseOutOfRange {
        /// The rejected base.
        base: BigUint,
    },
    /// A negative value cannot be represented as a base literal.
    NegativeValue,
    /// Integer division by zero.
    DivisionByZero,
    /// A value is too large for a host limit, such as a sleep duration.
    Overflow,
    /// `break` or `continue` found no enclosing construct it applies to.
    UnmatchedControlFlow {
        /// Either `break` or `continue`.
        keyword: &'static str,
        /// The label, if one was written.
        label:   Option<String>,
    },
    /// Interpreted calls nested deeper than the interpreter allows.
    CallDepthExceeded {
        /// The function whose call was refused.
        name:   String,
        /// The nesting limit.
        limit:  usize,
        /// Character offset of the call.
        offset: usize,
    },
    /// An interpolated text failed to parse.
    Syntax(ParseError),
    /// A native function failed to talk to the host.
    Io {
        /// Details reported by the host.
        details: String,
    },
}

impl RuntimeError {
    /// Returns the character offset this error is anchored at, if it has one.
    #[must_use]
    pub const fn offset(&self) -> Option<usize> {
        match self {
            Self::UnknownFunction { offset, .. }
            | Self::ArgumentCountMismatch { offset, .. }
            | Self::ArgumentTypeMismatch { offset, .. }
            | Self::CallDepthExceeded { offset, .. } => Some(*offset),
            Self::Syntax(error) => Some(error.offset()),
            _ => None,
        }
    }

    /// Returns the failure kind shown in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UnknownVariable { .. } | Self::UnknownFunction { .. } => "NameError",
            Self::ArgumentCountMismatch { .. } => "ArityError",
            Self::ArgumentTypeMismatch { .. }
            | Self::UnknownTypeTag { .. }
            | Self::UnsupportedOperation { .. } => "TypeError",
            Self::InvalidDigit { .. }
            | Self::EmptyDigits { .. }
            | Self::BaseOutOfRange { .. }
            | Self::NegativeValue
            | Self::DivisionByZero
            | Self::Overflow => "ValueError",
            Self::UnmatchedControlFlow { .. } => "ControlFlowError",
            Self::CallDepthExceeded { .. } => "RecursionError",
            Self::Syntax(error) => error.kind(),
            Self::Io { .. } => "IoError",
        }
    }
}

impl From<ParseError> for RuntimeError {
    fn from(error: ParseError) -> Self {
        Self::Syntax(error)
    }
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownVariable { name } => write!(f, "Undefined variable '{name}'"),
            Self::UnknownFunction { name, .. } => write!(f, "Unknown function '{name}'"),
            Self::ArgumentCountMismatch { name,
                                          expected,
                                          found,
                                          .. } => write!(f,
                                                          "'{name}' expects {expected} argument(s), got {found}"),
            Self::ArgumentTypeMismatch { name,
                                         position,
                                         expected,
                                         found,
                                         .. } => write!(f,
                                                         "Argument {position} of '{name}' must be {expected}, got {found}"),
            Self::UnknownTypeTag { tag } => write!(f, "Unknown type tag '{tag}'"),
            Self::UnsupportedOperation { details } => write!(f, "Unsupported operation: {details}"),
            Self::InvalidDigit { digit, base } => {
                write!(f, "Digit '{digit}' not valid in base {base}")
            },
            Self::EmptyDigits { base } => write!(f, "Base {base} literal has no digits"),
            Self::BaseOutOfRange { base } => {
                write!(f, "Base {base} not supported (must be 2-64)")
            },
            Self::NegativeValue => write!(f, "Base literals cannot represent negative values"),
            Self::DivisionByZero => write!(f, "Division by zero"),
            Self::Overflow => write!(f, "Value is too large for this operation"),
            Self::UnmatchedControlFlow { keyword, label } => match label {
                Some(label) => write!(f, "'{keyword} @{label}' has no enclosing construct labeled '{label}'"),
                None => write!(f, "'{keyword}' outside of a loop"),
            },
            Self::CallDepthExceeded { name, limit, .. } => {
                write!(f, "Call depth limit exceeded calling '{name}' (max: {limit})")
            },
            Self::Syntax(error) => write!(f, "{error}"),
            Self::Io { details } => write!(f, "I/O failure: {details}"),
        }
    }
}

impl std::error::Error for RuntimeError {}
