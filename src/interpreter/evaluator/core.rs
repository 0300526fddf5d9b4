use std::{collections::HashMap, rc::Rc};

use log::trace;

use crate::{
    ast::Node,
    diagnostic::{Console, Diagnostic},
    error::RuntimeError,
    interpreter::{
        evaluator::function::core::native_functions,
        value::{core::Value, function::Function},
    },
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// Extracts the value of a [`Flow::Normal`] outcome, returning any other
/// outcome from the enclosing function unchanged.
macro_rules! value_of {
    ($flow:expr) => {
        match $flow? {
            $crate::interpreter::evaluator::core::Flow::Normal(value) => value,
            other => return Ok(other),
        }
    };
}
pub(crate) use value_of;

/// Facts about the unit being run, used only for error reporting.
#[derive(Debug, Clone, Default)]
pub struct RunMetadata {
    /// Full source text of the unit.
    pub source:   String,
    /// Name of the file the source came from, or `<input>`.
    pub filename: String,
    /// Label shown for failures that abort the unit.
    pub origin:   String,
}

/// How evaluating a node ended.
///
/// `break`, `continue` and `ret` do not unwind the host stack: they are
/// returned as values and consumed by the nearest loop, labeled construct or
/// call frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    /// Evaluation produced a value.
    Normal(Value),
    /// `break`, with its label if one was written.
    Break(Option<String>),
    /// `continue`, with its label if one was written.
    Continue(Option<String>),
    /// `ret` inside a function body.
    Return(Value),
}

/// Stores the runtime evaluation context.
///
/// Holds variable bindings, visible functions, the metadata of the running
/// unit, and the console used for input, output and diagnostics.
///
/// ## Scoping
///
/// A call runs in a full copy of the caller's context with the parameters
/// bound on top. Assignments and declarations made by the callee never reach
/// the caller.
#[derive(Clone)]
pub struct Context {
    /// Variable bindings.
    pub variables:  HashMap<String, Value>,
    /// Functions visible in this context, natives included.
    pub functions:  HashMap<String, Function>,
    /// Metadata of the running unit.
    pub metadata:   Rc<RunMetadata>,
    /// Host console.
    pub console:    Rc<dyn Console>,
    /// Number of interpreted calls this context is nested in.
    pub call_depth: usize,
}

impl Context {
    /// Creates a context with no variables, seeded with the native function
    /// table.
    #[must_use]
    pub fn new(metadata: RunMetadata, console: Rc<dyn Console>) -> Self {
        Self { variables: HashMap::new(),
               functions: native_functions(),
               metadata: Rc::new(metadata),
               console,
               call_depth: 0 }
    }

    /// Evaluates a node and returns how it ended.
    ///
    /// This is the main dispatch of the evaluator. Control constructs report
    /// `break`, `continue` and `ret` through [`Flow`] instead of failing.
    pub fn evaluate(&mut self, node: &Node) -> EvalResult<Flow> {
        trace!("evaluating {node:?}");

        match node {
            Node::Literal(literal) => Ok(Flow::Normal(Value::Literal(literal.clone()))),
            Node::TextTemplate { text, offset } => self.eval_template(text, *offset),
            Node::Var(name) => {
                self.variables
                    .get(name)
                    .cloned()
                    .map(Flow::Normal)
                    .ok_or_else(|| RuntimeError::UnknownVariable { name: name.clone() })
            },
            Node::Assign { name, value } => {
                let value = value_of!(self.evaluate(value));
                self.variables.insert(name.clone(), value);
                Ok(Flow::Normal(Value::Unit))
            },
            Node::BinaryOp { op,
                             left,
                             right,
                             offset, } => self.eval_binary_op(*op, left, right, *offset),
            Node::Call { name, args, offset } => self.eval_call(name, args, *offset),
            Node::Return { value, .. } => {
                let value = value_of!(self.evaluate(value));
                if self.call_depth > 0 {
                    Ok(Flow::Return(value))
                } else {
                    Ok(Flow::Normal(value))
                }
            },
            Node::If { label,
                       condition,
                       then_body,
                       else_body, } => {
                self.eval_if(label.as_deref(), condition, then_body, else_body.as_deref())
            },
            Node::While { label,
                          condition,
                          body, } => self.eval_while(label.as_deref(), condition, body),
            Node::Loop { label, body } => self.eval_loop(label.as_deref(), body),
            Node::Break(label) => Ok(Flow::Break(label.clone())),
            Node::Continue(label) => Ok(Flow::Continue(label.clone())),
            Node::FunctionDecl(decl) => {
                self.declare_function(decl)?;
                Ok(Flow::Normal(Value::Unit))
            },
        }
    }

    /// Evaluates a top-level node to a value.
    ///
    /// A `break` or `continue` that reaches this point matched no enclosing
    /// construct and is reported as a control-flow error.
    pub fn eval(&mut self, node: &Node) -> EvalResult<Value> {
        match self.evaluate(node)? {
            Flow::Normal(value) | Flow::Return(value) => Ok(value),
            Flow::Break(label) => Err(RuntimeError::UnmatchedControlFlow { keyword: "break",
                                                                           label }),
            Flow::Continue(label) => Err(RuntimeError::UnmatchedControlFlow { keyword: "continue",
                                                                              label }),
        }
    }

    /// Runs a statement sequence, stopping at the first statement that does
    /// not end normally.
    ///
    /// # Returns
    /// - `Flow::Normal(Value::Unit)` if every statement ended normally.
    /// - The first `Break`, `Continue` or `Return` outcome otherwise.
    pub fn run_block(&mut self, body: &[Node]) -> EvalResult<Flow> {
        for statement in body {
            match self.evaluate(statement)? {
                Flow::Normal(_) => {},
                other => return Ok(other),
            }
        }
        Ok(Flow::Normal(Value::Unit))
    }

    /// Sends a position-anchored diagnostic for `error` to the console.
    pub fn report(&self, error: &RuntimeError, offset: usize) {
        let diagnostic = Diagnostic::anchored(&self.metadata.source,
                                              offset,
                                              error.kind(),
                                              error.to_string(),
                                              self.metadata.filename.as_str());
        self.console.report(&diagnostic);
    }
}
