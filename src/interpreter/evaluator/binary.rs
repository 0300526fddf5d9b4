use log::debug;

use crate::{
    ast::{BinaryOperator, Node},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult, Flow, value_of},
        value::core::Value,
    },
};

impl Context {
    /// Evaluates a `BinaryOp` node.
    ///
    /// Operands are evaluated left to right; `&&` and `||` skip the right
    /// operand when the left one decides the result.
    ///
    /// A failure raised anywhere inside this node is not propagated when the
    /// node carries an offset: it is reported through the console, anchored at
    /// the failure's own offset if it has one and at the operator otherwise,
    /// and the node yields `Unit`. Sibling statements keep running. Exceeding
    /// the call depth limit is the exception and always aborts the unit.
    pub(crate) fn eval_binary_op(&mut self,
                                 op: BinaryOperator,
                                 left: &Node,
                                 right: &Node,
                                 offset: Option<usize>)
                                 -> EvalResult<Flow> {
        match self.binary_flow(op, left, right) {
            Ok(flow) => Ok(flow),
            Err(error @ RuntimeError::CallDepthExceeded { .. }) => Err(error),
            Err(error) => match offset {
                Some(offset) => {
                    debug!("'{op}' failed and yields unit: {error}");
                    self.report(&error, error.offset().unwrap_or(offset));
                    Ok(Flow::Normal(Value::Unit))
                },
                None => Err(error),
            },
        }
    }

    fn binary_flow(&mut self, op: BinaryOperator, left: &Node, right: &Node) -> EvalResult<Flow> {
        let lhs = value_of!(self.evaluate(left));

        let result = match op {
            BinaryOperator::And => {
                if lhs.is_truthy()? {
                    value_of!(self.evaluate(right)).is_truthy()?
                } else {
                    false
                }
            },
            BinaryOperator::Or => {
                if lhs.is_truthy()? {
                    true
                } else {
                    value_of!(self.evaluate(right)).is_truthy()?
                }
            },
            _ => {
                let rhs = value_of!(self.evaluate(right));
                return Ok(Flow::Normal(Self::eval_binary(op, &lhs, &rhs)?));
            },
        };

        Ok(Flow::Normal(Value::from_bool(result)))
    }

    /// Applies a binary operator to two evaluated values.
    ///
    /// - `+ - * /` work on two literals and produce a literal in the left
    ///   operand's base. `+` also concatenates two texts.
    /// - `==` and `!=` compare literal values across bases, or text contents.
    /// - `===` and `!==` compare exactly; values of different kinds are simply
    ///   unequal.
    /// - `< <= > >=` order two literals by value.
    /// - `&&` and `||` combine truthiness. Both operands are already evaluated
    ///   here, so no short-circuiting happens at this level.
    ///
    /// Comparisons and logical operators yield the base-10 literals `1` and
    /// `0`.
    ///
    /// # Example
    /// ```
    /// use mbase::{
    ///     ast::BinaryOperator,
    ///     interpreter::{
    ///         evaluator::core::Context,
    ///         value::{base_literal::BaseLiteral, core::Value},
    ///     },
    /// };
    ///
    /// let hex = Value::Literal(BaseLiteral::new(16, "f").unwrap());
    /// let one = Value::Literal(BaseLiteral::new(10, "1").unwrap());
    ///
    /// let sum = Context::eval_binary(BinaryOperator::Add, &hex, &one).unwrap();
    /// assert_eq!(sum.to_string(), "b16@10");
    /// ```
    pub fn eval_binary(op: BinaryOperator, left: &Value, right: &Value) -> EvalResult<Value> {
        use BinaryOperator::{
            Add, And, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mul, NotEqual, Or,
            StrictEqual, StrictNotEqual, Sub,
        };
        use Value::{Literal, Text};

        let unsupported = || RuntimeError::UnsupportedOperation { details: format!("'{op}' between {} and {}",
                                                                                    left.type_name(),
                                                                                    right.type_name()), };

        match (op, left, right) {
            (Add, Literal(a), Literal(b)) => Ok(Literal(a.add(b)?)),
            (Add, Text(a), Text(b)) => Ok(Text(format!("{a}{b}"))),
            (Sub, Literal(a), Literal(b)) => Ok(Literal(a.sub(b)?)),
            (Mul, Literal(a), Literal(b)) => Ok(Literal(a.mul(b)?)),
            (Div, Literal(a), Literal(b)) => Ok(Literal(a.div(b)?)),

            (Equal | NotEqual, Literal(a), Literal(b)) => {
                Ok(Value::from_bool(a.loose_eq(b)? == (op == Equal)))
            },
            (Equal | NotEqual, Text(a), Text(b)) => Ok(Value::from_bool((a == b) == (op == Equal))),
            (StrictEqual, ..) => Ok(Value::from_bool(left == right)),
            (StrictNotEqual, ..) => Ok(Value::from_bool(left != right)),

            (Less | LessEqual | Greater | GreaterEqual, Literal(a), Literal(b)) => {
                let ordering = a.compare(b)?;
                let result = match op {
                    Less => ordering.is_lt(),
                    LessEqual => ordering.is_le(),
                    Greater => ordering.is_gt(),
                    _ => ordering.is_ge(),
                };
                Ok(Value::from_bool(result))
            },

            (And, ..) => Ok(Value::from_bool(left.is_truthy()? && right.is_truthy()?)),
            (Or, ..) => Ok(Value::from_bool(left.is_truthy()? || right.is_truthy()?)),

            _ => Err(unsupported()),
        }
    }
}
