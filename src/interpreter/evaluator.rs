/// Binary operator evaluation logic.
///
/// Handles arithmetic, loose and strict equality, ordering and the
/// short-circuiting logical operators, and reports failures of operator nodes
/// without aborting the unit.
pub mod binary;

/// Core evaluation logic and context management.
///
/// Contains the main dispatch over AST nodes, the runtime context, control
/// flow outcomes and error reporting.
pub mod core;

/// Evaluation of `if`, `while` and `loop`, including labeled `break` and
/// `continue`.
pub mod control;

/// Function evaluation.
///
/// Handles user-defined and native function calls, argument checking, and
/// return value computation.
pub mod function;

/// Interpolation of `{...}` expressions in text literals.
pub mod template;
