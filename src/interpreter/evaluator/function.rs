/// Native function implementations.
///
/// Every function a fresh context starts with: console I/O, text and literal
/// conversions, integer square root and rebasing.
pub mod builtin;

/// Function declaration and call dispatch.
///
/// Holds the native function table, and checks arity and type tags before
/// running natives or interpreted bodies.
pub mod core;
