use std::iter::Peekable;

use crate::{
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::core::ParseResult,
    },
};

/// Builds the error for a token the grammar does not allow here.
pub(in crate::interpreter::parser) fn unexpected(token: &Token, expected: &str) -> ParseError {
    ParseError::UnexpectedToken { found:    token.kind.to_string(),
                                  expected: expected.to_string(),
                                  offset:   token.offset, }
}

/// Consumes and returns the next token.
///
/// Every stream produced by the lexer ends with `Eof`, which the parser never
/// consumes, so running dry means the caller fed a stream without one.
pub(in crate::interpreter::parser) fn next_token<'a, I>(tokens: &mut Peekable<I>)
                                                        -> ParseResult<&'a Token>
    where I: Iterator<Item = &'a Token> + Clone
{
    tokens.next().ok_or_else(|| ParseError::UnexpectedToken { found:    "end of input".to_string(),
                                                              expected: "a token".to_string(),
                                                              offset:   0, })
}

/// Returns the kind of the next token without consuming it.
pub(in crate::interpreter::parser) fn peek_kind<'a, I>(tokens: &mut Peekable<I>) -> Option<&'a TokenKind>
    where I: Iterator<Item = &'a Token> + Clone
{
    tokens.peek().copied().map(|token| &token.kind)
}

/// Consumes the next token if it is `kind`, failing otherwise.
///
/// The `Eof` token is never consumed.
pub(in crate::interpreter::parser) fn expect<'a, I>(tokens: &mut Peekable<I>,
                                                    kind: &TokenKind,
                                                    expected: &str)
                                                    -> ParseResult<&'a Token>
    where I: Iterator<Item = &'a Token> + Clone
{
    match tokens.peek().copied() {
        Some(token) if token.kind == *kind && token.kind != TokenKind::Eof => {
            tokens.next();
            Ok(token)
        },
        Some(token) => Err(unexpected(token, expected)),
        None => next_token(tokens),
    }
}

/// Parses a plain identifier and returns its name and offset.
pub(in crate::interpreter::parser) fn parse_identifier<'a, I>(tokens: &mut Peekable<I>,
                                                              expected: &str)
                                                              -> ParseResult<(String, usize)>
    where I: Iterator<Item = &'a Token> + Clone
{
    match tokens.peek().copied() {
        Some(Token { kind: TokenKind::Identifier(name),
                     offset, }) => {
            tokens.next();
            Ok((name.clone(), *offset))
        },
        Some(token) => Err(unexpected(token, expected)),
        None => next_token(tokens).map(|token| (String::new(), token.offset)),
    }
}

/// Parses an optional `@label`.
pub(in crate::interpreter::parser) fn parse_label<'a, I>(tokens: &mut Peekable<I>)
                                                         -> ParseResult<Option<String>>
    where I: Iterator<Item = &'a Token> + Clone
{
    if let Some(TokenKind::At) = peek_kind(tokens) {
        tokens.next();
        let (label, _) = parse_identifier(tokens, "a label name after '@'")?;
        return Ok(Some(label));
    }
    Ok(None)
}

/// Skips any number of newline tokens.
pub(in crate::interpreter::parser) fn skip_newlines<'a, I>(tokens: &mut Peekable<I>)
    where I: Iterator<Item = &'a Token> + Clone
{
    while let Some(TokenKind::NewLine) = peek_kind(tokens) {
        tokens.next();
    }
}

/// Skips newline and `;` tokens, which are no-op separators between
/// statements.
pub(in crate::interpreter::parser) fn skip_separators<'a, I>(tokens: &mut Peekable<I>)
    where I: Iterator<Item = &'a Token> + Clone
{
    while let Some(TokenKind::NewLine | TokenKind::Semicolon) = peek_kind(tokens) {
        tokens.next();
    }
}

/// Parses a comma-separated list of items until a closing token.
///
/// Shared by call arguments and function parameters. An immediately
/// encountered closing token produces an empty list. Newlines directly inside
/// the delimiters are allowed.
///
/// Grammar (simplified): `list := item ("," item)*`
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the first item or closing token.
/// - `parse_item`: Function used to parse each list element.
/// - `closing`: The token that terminates the list.
///
/// # Returns
/// A vector of parsed items.
pub(in crate::interpreter::parser) fn parse_comma_separated<'a, I, T>(
    tokens: &mut Peekable<I>,
    parse_item: impl Fn(&mut Peekable<I>) -> ParseResult<T>,
    closing: &TokenKind)
    -> ParseResult<Vec<T>>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut items = Vec::new();
    skip_newlines(tokens);

    if peek_kind(tokens) == Some(closing) {
        tokens.next();
        return Ok(items);
    }

    loop {
        items.push(parse_item(tokens)?);
        skip_newlines(tokens);

        let token = next_token(tokens)?;
        match &token.kind {
            TokenKind::Comma => skip_newlines(tokens),
            kind if kind == closing => break,
            _ => return Err(unexpected(token, &format!("',' or '{}'", closing_symbol(closing)))),
        }
    }

    Ok(items)
}

fn closing_symbol(kind: &TokenKind) -> &'static str {
    match kind {
        TokenKind::RParen => ")",
        TokenKind::RBrace => "}",
        _ => "closing delimiter",
    }
}
