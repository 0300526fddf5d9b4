use std::iter::Peekable;

use crate::{
    ast::{FunctionDecl, Node, Param},
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{
            block::parse_block,
            core::{ParseResult, parse_expression},
            utils::{expect, parse_comma_separated, parse_identifier, peek_kind, unexpected},
        },
    },
};

/// Parses a single statement.
///
/// A statement may be one of:
/// - a function declaration (`fn ...`),
/// - an assignment (`name = expr`),
/// - an expression used as a statement, including control constructs.
///
/// Every statement must be followed by `;`, a newline, the end of input, or
/// the `}` closing the enclosing block. Only `;` and newlines are consumed.
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the first token of the statement.
///
/// # Returns
/// A parsed [`Node`].
pub fn parse_statement<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a Token> + Clone
{
    let statement = if let Some(TokenKind::Fn) = peek_kind(tokens) {
        tokens.next();
        parse_function_declaration(tokens)?
    } else if let Some(statement) = parse_assignment(tokens)? {
        statement
    } else {
        parse_expression(tokens)?
    };

    parse_terminator(tokens)?;
    Ok(statement)
}

/// Consumes the separator after a statement.
fn parse_terminator<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<()>
    where I: Iterator<Item = &'a Token> + Clone
{
    match tokens.peek().copied() {
        Some(Token { kind: TokenKind::Semicolon | TokenKind::NewLine,
                     .. }) => {
            tokens.next();
            Ok(())
        },
        Some(Token { kind: TokenKind::Eof | TokenKind::RBrace,
                     .. })
        | None => Ok(()),
        Some(token) => Err(unexpected(token, "';' or a newline")),
    }
}

/// Parses `name = expr` if the next two tokens are an identifier and `=`.
///
/// Returns `Ok(None)` without consuming anything otherwise.
fn parse_assignment<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Option<Node>>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut lookahead = tokens.clone();

    if let Some(Token { kind: TokenKind::Identifier(name),
                        .. }) = lookahead.next()
       && let Some(TokenKind::Equals) = peek_kind(&mut lookahead)
    {
        tokens.next();
        tokens.next();
        let value = parse_expression(tokens)?;
        return Ok(Some(Node::Assign { name:  name.clone(),
                                      value: Box::new(value), }));
    }

    Ok(None)
}

/// Parses a function declaration after the `fn` keyword.
///
/// Syntax:
/// ```text
///     fn name(tag arg, tag arg, ...) [return_tag] { ... }
/// ```
/// The return tag is only recognized as an identifier directly followed by
/// `{`. Type tags are kept as written and checked when the declaration is
/// evaluated.
pub fn parse_function_declaration<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a Token> + Clone
{
    let (name, _) = parse_identifier(tokens, "a function name after 'fn'")?;
    expect(tokens, &TokenKind::LParen, "'(' after function name")?;
    let params = parse_comma_separated(tokens, parse_param, &TokenKind::RParen)?;

    let mut lookahead = tokens.clone();
    let return_type = if let Some(TokenKind::Identifier(tag)) = peek_kind(&mut lookahead)
                         && let Some(_) = lookahead.next()
                         && let Some(TokenKind::LBrace) = peek_kind(&mut lookahead)
    {
        tokens.next();
        Some(tag.clone())
    } else {
        None
    };

    let body = parse_block(tokens)?;

    Ok(Node::FunctionDecl(FunctionDecl { name,
                                         params,
                                         return_type,
                                         body: body.into() }))
}

fn parse_param<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Param>
    where I: Iterator<Item = &'a Token> + Clone
{
    let (type_tag, _) = parse_identifier(tokens, "a parameter type tag")?;
    let (name, _) = parse_identifier(tokens, "a parameter name")?;
    Ok(Param { type_tag, name })
}
