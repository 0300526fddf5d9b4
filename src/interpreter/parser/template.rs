use crate::{
    ast::Node,
    error::ParseError,
    interpreter::{
        lexer::{Lexer, TextLiteral},
        parser::core::{ParseResult, parse_program},
    },
};

/// A piece of an interpolated text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplatePart {
    /// Text copied as-is.
    Literal(String),
    /// An embedded `{...}` expression.
    Expr(Node),
}

/// Splits decoded text into literal spans and embedded expressions.
///
/// Every `{...}` span is tokenized and parsed on its own and must contain
/// exactly one expression. `\{` and `\}` stand for literal braces. Offsets of
/// the embedded tokens point into the enclosing source through the literal's
/// recorded positions, with `offset` being the position of the text's opening
/// quote.
///
/// # Errors
/// - `UnterminatedInterpolation` if a `{` has no matching `}`.
/// - `InterpolationArity` if a span holds zero or several expressions.
/// - Any lexing or parsing error raised by the embedded source.
///
/// # Example
/// ```
/// use mbase::interpreter::{
///     lexer::TextLiteral,
///     parser::template::{TemplatePart, split_template},
/// };
///
/// let parts = split_template(&TextLiteral::plain("sum = {1 + 2}"), 0).unwrap();
///
/// assert_eq!(parts.len(), 2);
/// assert_eq!(parts[0], TemplatePart::Literal("sum = ".to_string()));
/// assert!(matches!(parts[1], TemplatePart::Expr(_)));
/// ```
pub fn split_template(literal: &TextLiteral, offset: usize) -> ParseResult<Vec<TemplatePart>> {
    let chars: Vec<char> = literal.text.chars().collect();
    let position = |i: usize| offset + literal.positions.get(i).copied().unwrap_or(i + 1);
    let mut parts = Vec::new();
    let mut buffer = String::new();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '\\' if matches!(chars.get(i + 1), Some('{' | '}')) => {
                buffer.push(chars[i + 1]);
                i += 2;
            },
            '{' => {
                let close = chars[i + 1..].iter()
                                          .position(|&c| c == '}')
                                          .map(|p| i + 1 + p)
                                          .ok_or(ParseError::UnterminatedInterpolation { offset: position(i) })?;

                if !buffer.is_empty() {
                    parts.push(TemplatePart::Literal(std::mem::take(&mut buffer)));
                }

                let inner: String = chars[i + 1..close].iter().collect();
                let positions: Vec<usize> = (i + 1..=close).map(position).collect();
                let tokens = Lexer::with_positions(&inner, &positions).collect::<ParseResult<Vec<_>>>()?;
                let mut nodes = parse_program(&tokens)?;

                if nodes.len() != 1 {
                    return Err(ParseError::InterpolationArity { count:  nodes.len(),
                                                                offset: position(i), });
                }
                if let Some(node) = nodes.pop() {
                    parts.push(TemplatePart::Expr(node));
                }

                i = close + 1;
            },
            ch => {
                buffer.push(ch);
                i += 1;
            },
        }
    }

    if !buffer.is_empty() {
        parts.push(TemplatePart::Literal(buffer));
    }

    Ok(parts)
}
