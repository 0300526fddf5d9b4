use std::iter::Peekable;

use crate::{
    ast::Node,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{
            core::ParseResult,
            statement::parse_statement,
            utils::{expect, peek_kind, skip_separators},
        },
    },
};

/// Parses a brace-delimited statement list.
///
/// Newlines and semicolons between statements are ignored. Parsing continues
/// until the closing `}`; reaching the end of input first is an error.
///
/// Grammar: `block := "{" statement* "}"`
///
/// # Parameters
/// - `tokens`: Token stream positioned at the opening brace.
///
/// # Returns
/// The statements of the block, in order.
pub fn parse_block<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Vec<Node>>
    where I: Iterator<Item = &'a Token> + Clone
{
    expect(tokens, &TokenKind::LBrace, "'{'")?;
    let mut statements = Vec::new();

    loop {
        skip_separators(tokens);

        match peek_kind(tokens) {
            Some(TokenKind::RBrace) => {
                tokens.next();
                break;
            },
            Some(TokenKind::Eof) | None => {
                expect(tokens, &TokenKind::RBrace, "'}'")?;
            },
            Some(_) => statements.push(parse_statement(tokens)?),
        }
    }

    Ok(statements)
}
