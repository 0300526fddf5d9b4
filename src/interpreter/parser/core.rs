use std::iter::Peekable;

use log::trace;

use crate::{
    ast::Node,
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{
            binary::parse_logical,
            statement::parse_statement,
            utils::{peek_kind, skip_separators},
        },
    },
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Parses a full expression.
///
/// This is the entry point for expression parsing. It begins at the
/// lowest-precedence level, where `||` and `&&` live, and recursively descends
/// through the precedence hierarchy.
///
/// Grammar: `expression := logical`
pub fn parse_expression<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a Token> + Clone
{
    parse_logical(tokens)
}

/// Parses a whole program: top-level statements up to `Eof`.
///
/// Stray newlines and semicolons between statements are skipped.
///
/// # Example
/// ```
/// use mbase::interpreter::{lexer::tokenize, parser::core::parse_program};
///
/// let tokens = tokenize("x = 5\n\nret x + 3;").unwrap();
/// let program = parse_program(&tokens).unwrap();
///
/// assert_eq!(program.len(), 2);
/// ```
pub fn parse_program(tokens: &[Token]) -> ParseResult<Vec<Node>> {
    let mut iter = tokens.iter().peekable();
    let mut program = Vec::new();

    loop {
        skip_separators(&mut iter);
        match peek_kind(&mut iter) {
            Some(TokenKind::Eof) | None => break,
            Some(_) => {
                let node = parse_statement(&mut iter)?;
                trace!("parsed {node:?}");
                program.push(node);
            },
        }
    }

    Ok(program)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ast::BinaryOperator,
        interpreter::{lexer::tokenize, value::base_literal::BaseLiteral},
    };

    fn parse(source: &str) -> ParseResult<Vec<Node>> {
        parse_program(&tokenize(source)?)
    }

    fn lit(base: u32, digits: &str) -> Node {
        Node::Literal(BaseLiteral::new(base, digits).unwrap())
    }

    #[test]
    fn precedence_climbs_from_logical_to_multiplicative() {
        let program = parse("1 + 2 * 3 == 7 && 1").unwrap();
        let Node::BinaryOp { op: BinaryOperator::And, left, .. } = &program[0] else {
            panic!("expected '&&' at the root, got {:?}", program[0]);
        };
        let Node::BinaryOp { op: BinaryOperator::Equal, left, .. } = left.as_ref() else {
            panic!("expected '==' under '&&'");
        };
        let Node::BinaryOp { op: BinaryOperator::Add, right, .. } = left.as_ref() else {
            panic!("expected '+' under '=='");
        };
        assert!(matches!(right.as_ref(), Node::BinaryOp { op: BinaryOperator::Mul, .. }));
    }

    #[test]
    fn operators_are_left_associative() {
        let program = parse("8 - 2 - 1").unwrap();
        let Node::BinaryOp { left, right, offset, .. } = &program[0] else {
            panic!("expected a binary operation");
        };
        assert_eq!(*offset, Some(6));
        assert_eq!(right.as_ref(), &lit(10, "1"));
        assert!(matches!(left.as_ref(), Node::BinaryOp { op: BinaryOperator::Sub, .. }));
    }

    #[test]
    fn assignment_and_expression_statements() {
        let program = parse("x = b16@ff; x").unwrap();
        assert_eq!(program,
                   vec![Node::Assign { name:  "x".to_string(),
                                       value: Box::new(lit(16, "ff")), },
                        Node::Var("x".to_string())]);
    }

    #[test]
    fn statements_need_terminators() {
        let error = parse("x y").unwrap_err();
        assert_eq!(error,
                   ParseError::UnexpectedToken { found:    "identifier 'y'".to_string(),
                                                 expected: "';' or a newline".to_string(),
                                                 offset:   2, });
    }

    #[test]
    fn invalid_literals_are_reported_at_the_literal() {
        let error = parse("1 + b10@(1f)").unwrap_err();
        assert!(matches!(error, ParseError::InvalidLiteral { offset: 4, .. }));
        assert_eq!(error.kind(), "ValueError");
    }

    #[test]
    fn function_declaration() {
        let program = parse("fn add(b10 a, b_ b) b10 {\n  ret a + b\n}").unwrap();
        let Node::FunctionDecl(decl) = &program[0] else {
            panic!("expected a declaration");
        };
        assert_eq!(decl.name, "add");
        assert_eq!(decl.params.iter().map(|p| p.type_tag.as_str()).collect::<Vec<_>>(),
                   vec!["b10", "b_"]);
        assert_eq!(decl.return_type.as_deref(), Some("b10"));
        assert!(matches!(decl.body[0], Node::Return { offset: 28, .. }));
    }

    #[test]
    fn function_without_return_tag() {
        let program = parse("fn hi() { out(\"hi\") }").unwrap();
        let Node::FunctionDecl(decl) = &program[0] else {
            panic!("expected a declaration");
        };
        assert!(decl.params.is_empty());
        assert!(decl.return_type.is_none());
        assert_eq!(decl.body.len(), 1);
    }

    #[test]
    fn labeled_loops_and_else_if_chains() {
        let source = "loop @outer {\n while (1) { break @outer }\n}\n\
                      if (x) { 1 }\nelse if (y) { 2 } else { 3 }";
        let program = parse(source).unwrap();

        let Node::Loop { label, body } = &program[0] else {
            panic!("expected a loop");
        };
        assert_eq!(label.as_deref(), Some("outer"));
        let Node::While { body, .. } = &body[0] else {
            panic!("expected a while loop");
        };
        assert_eq!(body[0], Node::Break(Some("outer".to_string())));

        let Node::If { else_body: Some(else_body), .. } = &program[1] else {
            panic!("expected an if with else");
        };
        assert!(matches!(&else_body[..], [Node::If { else_body: Some(_), .. }]));
    }

    #[test]
    fn unclosed_block_reports_end_of_input() {
        let error = parse("loop {\n x = 1\n").unwrap_err();
        assert_eq!(error,
                   ParseError::UnexpectedToken { found:    "end of input".to_string(),
                                                 expected: "'}'".to_string(),
                                                 offset:   14, });
    }

    #[test]
    fn control_constructs_are_expressions() {
        let program = parse("x = if (1) { 2 }").unwrap();
        assert!(matches!(&program[0], Node::Assign { value, .. } if matches!(value.as_ref(), Node::If { .. })));
    }
}
