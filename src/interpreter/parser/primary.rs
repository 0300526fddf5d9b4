use std::iter::Peekable;

use crate::{
    ast::Node,
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{
            control::{parse_break, parse_continue, parse_if, parse_loop, parse_while},
            core::{ParseResult, parse_expression},
            utils::{expect, next_token, parse_comma_separated, peek_kind, unexpected},
        },
        value::base_literal::BaseLiteral,
    },
};

/// Parses the highest-precedence expressions.
///
/// Handles:
/// - base literals (`b16@ff`) and plain decimal numbers (`42`),
/// - text literals,
/// - parenthesized sub-expressions,
/// - calls (`name(...)`) and variable references,
/// - `ret <expr>`,
/// - `if`, `while`, `loop`, `break` and `continue`, which are expressions too.
///
/// # Errors
/// - `InvalidLiteral` if a literal names an unsupported base or contains
///   digits the base does not allow.
/// - `UnexpectedToken` for anything that cannot start an expression.
pub fn parse_primary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a Token> + Clone
{
    if let Some(token) = tokens.peek().copied()
       && token.kind == TokenKind::Eof
    {
        return Err(unexpected(token, "an expression"));
    }

    let token = next_token(tokens)?;
    let offset = token.offset;

    match &token.kind {
        TokenKind::Number(digits) => literal(10, digits, offset),
        TokenKind::BaseLiteral((base, digits)) => literal(*base, digits, offset),
        TokenKind::Text(text) => Ok(Node::TextTemplate { text: text.clone(),
                                                         offset }),
        TokenKind::LParen => {
            let expr = parse_expression(tokens)?;
            expect(tokens, &TokenKind::RParen, "')'")?;
            Ok(expr)
        },
        TokenKind::Identifier(name) => {
            if let Some(TokenKind::LParen) = peek_kind(tokens) {
                tokens.next();
                let args = parse_comma_separated(tokens, parse_expression, &TokenKind::RParen)?;
                return Ok(Node::Call { name: name.clone(),
                                       args,
                                       offset });
            }
            Ok(Node::Var(name.clone()))
        },
        TokenKind::Ret => {
            let value = parse_expression(tokens)?;
            Ok(Node::Return { value: Box::new(value),
                              offset })
        },
        TokenKind::If => parse_if(tokens),
        TokenKind::While => parse_while(tokens),
        TokenKind::Loop => parse_loop(tokens),
        TokenKind::Break => parse_break(tokens),
        TokenKind::Continue => parse_continue(tokens),
        _ => Err(unexpected(token, "an expression")),
    }
}

fn literal(base: u32, digits: &str, offset: usize) -> ParseResult<Node> {
    BaseLiteral::new(base, digits).map(Node::Literal)
                                  .map_err(|error| ParseError::InvalidLiteral { details: error.to_string(),
                                                                                offset })
}
