use std::iter::Peekable;

use crate::{
    ast::Node,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{
            block::parse_block,
            core::{ParseResult, parse_expression},
            utils::{expect, parse_label, peek_kind, skip_newlines},
        },
    },
};

/// Parses a parenthesized condition.
fn parse_condition<'a, I>(tokens: &mut Peekable<I>, keyword: &str) -> ParseResult<Node>
    where I: Iterator<Item = &'a Token> + Clone
{
    expect(tokens, &TokenKind::LParen, &format!("'(' after '{keyword}'"))?;
    let condition = parse_expression(tokens)?;
    expect(tokens, &TokenKind::RParen, "')' after condition")?;
    Ok(condition)
}

/// Parses an `if` expression with optional `else` and chained `else if`.
///
/// Syntax:
/// ```text
///     if [@label] (<condition>) { ... }
///     else if (<condition>) { ... }
///     else { ... }
/// ```
/// `else` may start on a later line than the closing brace. A chained
/// `else if` becomes an `else` body holding a single nested `If`.
///
/// # Parameters
/// - `tokens`: Token stream positioned after the `if` keyword.
pub fn parse_if<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a Token> + Clone
{
    let label = parse_label(tokens)?;
    let condition = parse_condition(tokens, "if")?;
    let then_body = parse_block(tokens)?;

    let mut lookahead = tokens.clone();
    skip_newlines(&mut lookahead);
    let else_body = if let Some(TokenKind::Else) = peek_kind(&mut lookahead) {
        skip_newlines(tokens);
        tokens.next();

        if let Some(TokenKind::If) = peek_kind(tokens) {
            tokens.next();
            Some(vec![parse_if(tokens)?])
        } else {
            Some(parse_block(tokens)?)
        }
    } else {
        None
    };

    Ok(Node::If { label,
                  condition: Box::new(condition),
                  then_body,
                  else_body })
}

/// Parses `while [@label] (<condition>) { ... }` after the `while` keyword.
pub fn parse_while<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a Token> + Clone
{
    let label = parse_label(tokens)?;
    let condition = parse_condition(tokens, "while")?;
    let body = parse_block(tokens)?;

    Ok(Node::While { label,
                     condition: Box::new(condition),
                     body })
}

/// Parses `loop [@label] { ... }` after the `loop` keyword.
pub fn parse_loop<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a Token> + Clone
{
    let label = parse_label(tokens)?;
    let body = parse_block(tokens)?;

    Ok(Node::Loop { label, body })
}

/// Parses `break [@label]` after the `break` keyword.
pub fn parse_break<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a Token> + Clone
{
    Ok(Node::Break(parse_label(tokens)?))
}

/// Parses `continue [@label]` after the `continue` keyword.
pub fn parse_continue<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a Token> + Clone
{
    Ok(Node::Continue(parse_label(tokens)?))
}
