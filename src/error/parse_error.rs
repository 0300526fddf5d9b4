#[derive(Debug, Clone, PartialEq, Eq)]
/// Represents all errors that can occur during lexing or parsing.
///
/// Every variant carries the character offset into the source it refers to, so
/// the diagnostic reporter can render line and column context.
pub enum ParseError {
    /// The lexer met a character that starts no token.
    UnexpectedCharacter {
        /// The offending character.
        ch:     char,
        /// Character offset of the offending character.
        offset: usize,
    },
    /// A double-quoted text literal was never closed.
    UnterminatedText {
        /// Character offset of the opening quote.
        offset: usize,
    },
    /// A parenthesized base literal payload (`b16@(...)`) was never closed.
    UnterminatedBaseLiteral {
        /// Character offset of the literal.
        offset: usize,
    },
    /// Found a token the grammar does not allow at this position.
    UnexpectedToken {
        /// Description of the token encountered.
        found:    String,
        /// Description of what the parser was looking for.
        expected: String,
        /// Character offset of the token.
        offset:   usize,
    },
    /// A literal could not be turned into a valid base literal.
    InvalidLiteral {
        /// Why the literal was rejected.
        details: String,
        /// Character offset of the literal.
        offset:  usize,
    },
    /// An interpolation inside a text literal was opened with `{` but never
    /// closed.
    UnterminatedInterpolation {
        /// Offset of the opening brace.
        offset: usize,
    },
    /// An interpolation did not contain exactly one expression.
    InterpolationArity {
        /// Number of expressions found between the braces.
        count:  usize,
        /// Offset of the opening brace.
        offset: usize,
    },
}

impl ParseError {
    /// Returns the character offset this error is anchored at.
    #[must_use]
    pub const fn offset(&self) -> usize {
        match self {
            Self::UnexpectedCharacter { offset, .. }
            | Self::UnterminatedText { offset }
            | Self::UnterminatedBaseLiteral { offset }
            | Self::UnexpectedToken { offset, .. }
            | Self::InvalidLiteral { offset, .. }
            | Self::UnterminatedInterpolation { offset }
            | Self::InterpolationArity { offset, .. } => *offset,
        }
    }

    /// Returns the failure kind shown in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UnexpectedCharacter { .. }
            | Self::UnterminatedText { .. }
            | Self::UnterminatedBaseLiteral { .. } => "LexError",
            Self::InvalidLiteral { .. } => "ValueError",
            Self::UnexpectedToken { .. }
            | Self::UnterminatedInterpolation { .. }
            | Self::InterpolationArity { .. } => "SyntaxError",
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedCharacter { ch, .. } => write!(f, "Unexpected character: {ch:?}"),
            Self::UnterminatedText { .. } => write!(f, "Unterminated text literal"),
            Self::UnterminatedBaseLiteral { .. } => {
                write!(f, "Unclosed base literal, expected ')'")
            },
            Self::UnexpectedToken { found, expected, .. } => {
                write!(f, "Unexpected {found}, expected {expected}")
            },
            Self::InvalidLiteral { details, .. } => write!(f, "Invalid literal: {details}"),
            Self::UnterminatedInterpolation { .. } => write!(f, "Unclosed '{{' in text"),
            Self::InterpolationArity { count, .. } => write!(f,
                                                             "Expected one expression inside '{{}}', found {count}"),
        }
    }
}

impl std::error::Error for ParseError {}
