use crate::interpreter::{
    evaluator::core::{Context, EvalResult, Flow, value_of},
    lexer::TextLiteral,
    parser::template::{TemplatePart, split_template},
    value::core::Value,
};

impl Context {
    /// Evaluates a text literal, substituting its `{...}` expressions.
    ///
    /// The text is split on every evaluation, so an invalid interpolation only
    /// fails when the literal is actually reached. Embedded values are
    /// rendered with their display form: base-10 literals bare, other bases as
    /// `b<base>@<digits>`, and `Unit` as nothing.
    ///
    /// # Parameters
    /// - `literal`: Decoded text with interpolations still in place.
    /// - `offset`: Offset of the opening quote in the unit's source.
    pub(crate) fn eval_template(&mut self, literal: &TextLiteral, offset: usize) -> EvalResult<Flow> {
        let mut text = String::new();

        for part in split_template(literal, offset)? {
            match part {
                TemplatePart::Literal(piece) => text.push_str(&piece),
                TemplatePart::Expr(node) => {
                    let value = value_of!(self.evaluate(&node));
                    text.push_str(&value.to_string());
                },
            }
        }

        Ok(Flow::Normal(Value::Text(text)))
    }
}
