use std::rc::Rc;

use crate::interpreter::{lexer::TextLiteral, value::base_literal::BaseLiteral};

/// An abstract syntax tree node.
///
/// Statements and expressions share one node type: control constructs are
/// valid wherever an expression is, and any expression can stand alone as a
/// statement. Nodes are never mutated after the parser builds them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A literal value, from either `b<base>@<digits>` or plain decimal digits.
    Literal(BaseLiteral),
    /// A text literal. Interpolations are kept in `text` and extracted when
    /// the node is evaluated.
    TextTemplate {
        /// Decoded text, including any `{...}` spans.
        text:   TextLiteral,
        /// Character offset of the opening quote.
        offset: usize,
    },
    /// Reference to a variable by name.
    Var(String),
    /// `name = value`
    Assign {
        /// Variable being bound.
        name:  String,
        /// Right-hand side.
        value: Box<Self>,
    },
    /// A binary operation.
    BinaryOp {
        /// The operator.
        op:     BinaryOperator,
        /// Left operand.
        left:   Box<Self>,
        /// Right operand.
        right:  Box<Self>,
        /// Character offset of the operator, used to report failures.
        offset: Option<usize>,
    },
    /// Function call such as `out("hi")`.
    Call {
        /// Name of the function being called.
        name:   String,
        /// Argument expressions, in order.
        args:   Vec<Self>,
        /// Character offset of the function name.
        offset: usize,
    },
    /// `ret value`
    Return {
        /// Value being returned.
        value:  Box<Self>,
        /// Character offset of the `ret` keyword.
        offset: usize,
    },
    /// `if [@label] (cond) { ... } [else { ... }]`
    If {
        /// Optional label.
        label:     Option<String>,
        /// Condition expression.
        condition: Box<Self>,
        /// Statements run when the condition holds.
        then_body: Vec<Self>,
        /// Statements run otherwise. `else if` is a single nested `If`.
        else_body: Option<Vec<Self>>,
    },
    /// `while [@label] (cond) { ... }`
    While {
        /// Optional label.
        label:     Option<String>,
        /// Condition checked before every iteration.
        condition: Box<Self>,
        /// Loop body.
        body:      Vec<Self>,
    },
    /// `loop [@label] { ... }`
    Loop {
        /// Optional label.
        label: Option<String>,
        /// Loop body.
        body:  Vec<Self>,
    },
    /// `break [@label]`
    Break(Option<String>),
    /// `continue [@label]`
    Continue(Option<String>),
    /// `fn name(tag arg, ...) [ret_tag] { ... }`
    FunctionDecl(FunctionDecl),
}

/// A function declaration as written in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDecl {
    /// Function name.
    pub name:        String,
    /// Parameters in declaration order.
    pub params:      Vec<Param>,
    /// Return tag, recognized only when an identifier directly precedes the
    /// body.
    pub return_type: Option<String>,
    /// Body statements. Shared with every `Function` registered from this
    /// declaration.
    pub body:        Rc<[Node]>,
}

/// One declared parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Type tag as written, e.g. `b_`, `b10` or `str`.
    pub type_tag: String,
    /// Parameter name.
    pub name:     String,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    /// Addition (`+`).
    Add,
    /// Subtraction (`-`).
    Sub,
    /// Multiplication (`*`).
    Mul,
    /// Integer division (`/`).
    Div,
    /// Value equality (`==`).
    Equal,
    /// Base and digit equality (`===`).
    StrictEqual,
    /// Value inequality (`!=`).
    NotEqual,
    /// Base or digit inequality (`!==`).
    StrictNotEqual,
    /// `<`
    Less,
    /// `<=`
    LessEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,
    /// Logical and (`&&`).
    And,
    /// Logical or (`||`).
    Or,
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Equal => "==",
            Self::StrictEqual => "===",
            Self::NotEqual => "!=",
            Self::StrictNotEqual => "!==",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::And => "&&",
            Self::Or => "||",
        };
        write!(f, "{symbol}")
    }
}
