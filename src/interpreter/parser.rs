/// Program and expression entry points.
///
/// Declares `ParseResult` and drives top-level parsing.
pub mod core;

/// Binary operator precedence levels.
///
/// Implements precedence climbing from logical operators down to
/// multiplication and division.
pub mod binary;

/// Primary expressions: literals, calls, variables, text, `ret` and control
/// constructs in expression position.
pub mod primary;

/// `if`, `while`, `loop`, `break` and `continue`, with optional labels.
pub mod control;

/// Brace-delimited statement lists.
pub mod block;

/// Statement dispatch, assignments and function declarations.
pub mod statement;

/// Splitting interpolated text into literal spans and expressions.
pub mod template;

/// Shared token helpers.
pub mod utils;
