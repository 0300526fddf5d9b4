use crate::{
    ast::Node,
    interpreter::{
        evaluator::core::{Context, EvalResult, Flow, value_of},
        value::core::Value,
    },
};

/// Whether a `break`/`continue` with `target` applies to a construct labeled
/// `label`. Unlabeled jumps apply to the innermost loop.
fn applies_to(label: Option<&str>, target: Option<&str>) -> bool {
    target.is_none() || target == label
}

/// What a loop does after one run of its body.
enum Step {
    Next,
    Exit,
    Propagate(Flow),
}

fn step(label: Option<&str>, flow: Flow) -> Step {
    match flow {
        Flow::Normal(_) => Step::Next,
        Flow::Continue(target) if applies_to(label, target.as_deref()) => Step::Next,
        Flow::Break(target) if applies_to(label, target.as_deref()) => Step::Exit,
        other => Step::Propagate(other),
    }
}

impl Context {
    /// Evaluates an `if` construct.
    ///
    /// Runs exactly one branch depending on the truthiness of the condition.
    /// A `break` naming this construct's label leaves it early. The result is
    /// always `Unit`.
    pub(crate) fn eval_if(&mut self,
                          label: Option<&str>,
                          condition: &Node,
                          then_body: &[Node],
                          else_body: Option<&[Node]>)
                          -> EvalResult<Flow> {
        let condition = value_of!(self.evaluate(condition));

        let flow = if condition.is_truthy()? {
            self.run_block(then_body)?
        } else if let Some(else_body) = else_body {
            self.run_block(else_body)?
        } else {
            Flow::Normal(Value::Unit)
        };

        match flow {
            Flow::Break(Some(target)) if label == Some(target.as_str()) => Ok(Flow::Normal(Value::Unit)),
            Flow::Normal(_) => Ok(Flow::Normal(Value::Unit)),
            other => Ok(other),
        }
    }

    /// Evaluates a `while` loop.
    ///
    /// The condition is checked before every iteration, including after a
    /// `continue`. Jumps labeled for an enclosing construct and `ret` leave
    /// the loop and propagate.
    pub(crate) fn eval_while(&mut self,
                             label: Option<&str>,
                             condition: &Node,
                             body: &[Node])
                             -> EvalResult<Flow> {
        loop {
            let condition = value_of!(self.evaluate(condition));
            if !condition.is_truthy()? {
                break;
            }

            match step(label, self.run_block(body)?) {
                Step::Next => {},
                Step::Exit => break,
                Step::Propagate(flow) => return Ok(flow),
            }
        }

        Ok(Flow::Normal(Value::Unit))
    }

    /// Evaluates an unconditional `loop`.
    pub(crate) fn eval_loop(&mut self, label: Option<&str>, body: &[Node]) -> EvalResult<Flow> {
        loop {
            match step(label, self.run_block(body)?) {
                Step::Next => {},
                Step::Exit => break,
                Step::Propagate(flow) => return Ok(flow),
            }
        }

        Ok(Flow::Normal(Value::Unit))
    }
}
