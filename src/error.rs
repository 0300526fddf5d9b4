/// Lexing and parsing errors.
///
/// Defines the errors raised before any evaluation starts: unexpected
/// characters, unterminated literals, unexpected tokens and malformed
/// interpolations. Any of them aborts the whole unit of source.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during evaluation: unknown
/// names, arity and type tag mismatches, invalid digits or bases, arithmetic
/// failures and stray `break`/`continue`.
pub mod runtime_error;

pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;
