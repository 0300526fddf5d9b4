/// Arbitrary-base integer literals.
///
/// Defines `BaseLiteral`, the numeric type every program value is built on,
/// with validation, conversion to and from host integers, arithmetic in the
/// left operand's base, loose and strict equality, and rebasing.
pub mod base_literal;
/// The runtime `Value` enum.
pub mod core;
/// Callable functions and parameter type tags.
pub mod function;
