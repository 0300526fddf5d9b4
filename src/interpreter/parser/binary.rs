use std::iter::Peekable;

use crate::{
    ast::{BinaryOperator, Node},
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{core::ParseResult, primary::parse_primary},
    },
};

/// Parses one left-associative precedence level.
///
/// Repeatedly parses an operand with `operand` and folds it into the tree as
/// long as the next token is an operator accepted by `accepts`. Each node
/// records the offset of its operator token.
fn parse_level<'a, I>(tokens: &mut Peekable<I>,
                      operand: fn(&mut Peekable<I>) -> ParseResult<Node>,
                      accepts: fn(BinaryOperator) -> bool)
                      -> ParseResult<Node>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut left = operand(tokens)?;
    loop {
        if let Some(token) = tokens.peek().copied()
           && let Some(op) = token_to_binary_operator(&token.kind)
           && accepts(op)
        {
            tokens.next();
            let right = operand(tokens)?;
            left = Node::BinaryOp { op,
                                    left: Box::new(left),
                                    right: Box::new(right),
                                    offset: Some(token.offset) };
            continue;
        }
        break;
    }
    Ok(left)
}

/// Parses logical expressions. `&&` and `||` share the lowest precedence
/// level and associate to the left.
///
/// The rule is: `logical := equality (("&&" | "||") equality)*`
pub fn parse_logical<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a Token> + Clone
{
    parse_level(tokens, parse_equality, |op| {
        matches!(op, BinaryOperator::And | BinaryOperator::Or)
    })
}

/// Parses loose and strict equality.
///
/// The rule is: `equality := comparison (("==" | "===" | "!=" | "!==")
/// comparison)*`
pub fn parse_equality<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a Token> + Clone
{
    parse_level(tokens, parse_comparison, |op| {
        matches!(op,
                 BinaryOperator::Equal
                 | BinaryOperator::StrictEqual
                 | BinaryOperator::NotEqual
                 | BinaryOperator::StrictNotEqual)
    })
}

/// Parses ordering comparisons.
///
/// The rule is: `comparison := additive (("<" | "<=" | ">" | ">=")
/// additive)*`
pub fn parse_comparison<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a Token> + Clone
{
    parse_level(tokens, parse_additive, |op| {
        matches!(op,
                 BinaryOperator::Less
                 | BinaryOperator::LessEqual
                 | BinaryOperator::Greater
                 | BinaryOperator::GreaterEqual)
    })
}

/// Parses addition and subtraction expressions.
///
/// The rule is: `additive := multiplicative (("+" | "-") multiplicative)*`
pub fn parse_additive<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a Token> + Clone
{
    parse_level(tokens, parse_multiplicative, |op| {
        matches!(op, BinaryOperator::Add | BinaryOperator::Sub)
    })
}

/// Parses multiplication and integer division.
///
/// The rule is: `multiplicative := primary (("*" | "/") primary)*`
pub fn parse_multiplicative<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a Token> + Clone
{
    parse_level(tokens, parse_primary, |op| {
        matches!(op, BinaryOperator::Mul | BinaryOperator::Div)
    })
}

/// Maps an operator token to its binary operator, if it is one.
pub(in crate::interpreter::parser) const fn token_to_binary_operator(token: &TokenKind)
                                                                     -> Option<BinaryOperator> {
    match token {
        TokenKind::Plus => Some(BinaryOperator::Add),
        TokenKind::Minus => Some(BinaryOperator::Sub),
        TokenKind::Star => Some(BinaryOperator::Mul),
        TokenKind::Slash => Some(BinaryOperator::Div),
        TokenKind::EqualEqual => Some(BinaryOperator::Equal),
        TokenKind::StrictEqual => Some(BinaryOperator::StrictEqual),
        TokenKind::BangEqual => Some(BinaryOperator::NotEqual),
        TokenKind::StrictNotEqual => Some(BinaryOperator::StrictNotEqual),
        TokenKind::Less => Some(BinaryOperator::Less),
        TokenKind::LessEqual => Some(BinaryOperator::LessEqual),
        TokenKind::Greater => Some(BinaryOperator::Greater),
        TokenKind::GreaterEqual => Some(BinaryOperator::GreaterEqual),
        TokenKind::AndAnd => Some(BinaryOperator::And),
        TokenKind::OrOr => Some(BinaryOperator::Or),
        _ => None,
    }
}
