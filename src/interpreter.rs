/// The evaluator module executes AST nodes and computes results.
///
/// The evaluator walks the AST of a unit statement by statement, manages
/// variables and functions, and resolves `break`, `continue` and `ret` through
/// explicit control flow outcomes. It is the core execution engine of the
/// interpreter.
///
/// # Responsibilities
/// - Evaluates every node kind, including labeled loops and interpolated text.
/// - Checks arity and type tags of every call before running it.
/// - Reports runtime errors such as undefined names or division by zero.
pub mod evaluator;
/// The lexer module tokenizes source code for further parsing.
///
/// The lexer reads the raw source text and produces tokens for keywords,
/// identifiers, decimal numbers, base literals, texts and operators. Every
/// token carries the character offset it starts at. This is the first stage of
/// interpretation.
///
/// # Responsibilities
/// - Converts the input character stream into tokens with source offsets.
/// - Decodes text escapes and scans `b<base>@<digits>` literals.
/// - Reports lexical errors for characters outside the language.
pub mod lexer;
/// The parser module builds the abstract syntax tree (AST) from tokens.
///
/// The parser processes the token stream produced by the lexer with recursive
/// descent and constructs one node per top-level statement.
///
/// # Responsibilities
/// - Converts tokens into AST nodes with operator precedence.
/// - Validates grammar, reporting errors anchored at the offending token.
/// - Splits interpolated texts into literal spans and expressions.
pub mod parser;
/// The value module defines the runtime data types for evaluation.
///
/// Programs work with arbitrary-base integer literals, texts and the unit
/// value. Functions are values of the context rather than of programs.
///
/// # Responsibilities
/// - Defines the `Value` enum and the `BaseLiteral` numeric model.
/// - Implements checked arithmetic, comparison and rebasing.
/// - Defines callable functions and the type tags checked at calls.
pub mod value;
