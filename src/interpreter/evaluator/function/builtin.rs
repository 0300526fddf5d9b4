use std::{thread, time::Duration};

use log::debug;
use num_bigint::BigUint;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::{base_literal::BaseLiteral, core::Value},
    },
    util::num::{biguint_to_base_checked, biguint_to_u64_checked},
};

/// Returns the text argument at `index`.
///
/// Arguments reach natives already checked against their type tags, so a
/// mismatch here means the native table and the function disagree.
fn text_arg(args: &[Value], index: usize) -> EvalResult<&str> {
    match args.get(index) {
        Some(Value::Text(text)) => Ok(text),
        other => Err(mismatch("str", other)),
    }
}

/// Returns the base literal argument at `index`.
fn literal_arg(args: &[Value], index: usize) -> EvalResult<&BaseLiteral> {
    match args.get(index) {
        Some(Value::Literal(literal)) => Ok(literal),
        other => Err(mismatch("b_", other)),
    }
}

fn mismatch(expected: &str, found: Option<&Value>) -> RuntimeError {
    let found = found.map_or_else(|| "nothing".to_string(), Value::type_name);
    RuntimeError::UnsupportedOperation { details: format!("expected {expected}, got {found}") }
}

fn io_error(error: &std::io::Error) -> RuntimeError {
    RuntimeError::Io { details: error.to_string() }
}

/// Writes a text to the console without a line break.
///
/// # Example
/// ```
/// use std::rc::Rc;
///
/// use mbase::{
///     diagnostic::BufferConsole,
///     interpreter::{
///         evaluator::{
///             core::{Context, RunMetadata},
///             function::builtin::out,
///         },
///         value::core::Value,
///     },
/// };
///
/// let console = Rc::new(BufferConsole::new());
/// let ctx = Context::new(RunMetadata::default(), console.clone());
///
/// assert_eq!(out(&[Value::from("hi")], &ctx).unwrap(), Value::Unit);
/// assert_eq!(console.output(), "hi");
/// ```
pub fn out(args: &[Value], ctx: &Context) -> EvalResult<Value> {
    let text = text_arg(args, 0)?;
    ctx.console.write_out(text).map_err(|error| io_error(&error))?;
    Ok(Value::Unit)
}

/// Reads one line from the console.
pub fn input(_args: &[Value], ctx: &Context) -> EvalResult<Value> {
    let line = ctx.console.read_line().map_err(|error| io_error(&error))?;
    Ok(Value::Text(line))
}

/// Counts the characters of a text.
pub fn len(args: &[Value], _ctx: &Context) -> EvalResult<Value> {
    let count = BigUint::from(text_arg(args, 0)?.chars().count());
    Ok(Value::Literal(BaseLiteral::from_integer(10, &count)?))
}

/// Renders a literal the way it is displayed: bare digits for base 10,
/// `b<base>@<digits>` otherwise.
pub fn to_text(args: &[Value], _ctx: &Context) -> EvalResult<Value> {
    Ok(Value::Text(literal_arg(args, 0)?.to_string()))
}

/// Builds a base-10 literal from a text of decimal digits.
///
/// # Errors
/// - `EmptyDigits` for an empty text.
/// - `InvalidDigit` for anything that is not a decimal digit, signs included.
pub fn number(args: &[Value], _ctx: &Context) -> EvalResult<Value> {
    let raw = text_arg(args, 0)?;
    Ok(Value::Literal(BaseLiteral::new(10, raw.trim())?))
}

/// Integer square root, rounded down, in the base of the argument.
///
/// # Example
/// ```
/// use std::rc::Rc;
///
/// use mbase::{
///     diagnostic::BufferConsole,
///     interpreter::{
///         evaluator::{
///             core::{Context, RunMetadata},
///             function::builtin::sqrt,
///         },
///         value::{base_literal::BaseLiteral, core::Value},
///     },
/// };
///
/// let ctx = Context::new(RunMetadata::default(), Rc::new(BufferConsole::new()));
/// let root = sqrt(&[Value::from(BaseLiteral::new(2, "10001").unwrap())], &ctx).unwrap();
///
/// assert_eq!(root.to_string(), "b2@100");
/// ```
pub fn sqrt(args: &[Value], _ctx: &Context) -> EvalResult<Value> {
    let literal = literal_arg(args, 0)?;
    let root = literal.to_integer()?.sqrt();
    Ok(Value::Literal(BaseLiteral::from_integer(literal.base(), &root)?))
}

/// Re-expresses a literal in the base given by the value of the second
/// argument.
///
/// # Errors
/// `BaseOutOfRange` if the requested base lies outside `2..=64`.
pub fn rebase(args: &[Value], _ctx: &Context) -> EvalResult<Value> {
    let literal = literal_arg(args, 0)?;
    let base = biguint_to_base_checked(&literal_arg(args, 1)?.to_integer()?)?;

    Ok(Value::Literal(literal.rebase(base)?))
}

/// Writes the signatures of every function visible at the call site, sorted
/// by name.
pub fn funcs(_args: &[Value], ctx: &Context) -> EvalResult<Value> {
    let mut functions = ctx.functions.values().collect::<Vec<_>>();
    functions.sort_by(|a, b| a.name.cmp(&b.name));

    let listing = functions.iter()
                           .map(|function| function.signature())
                           .collect::<Vec<_>>()
                           .join(", ");

    ctx.console
       .write_out(&format!("Available functions: {listing}\n"))
       .map_err(|error| io_error(&error))?;
    Ok(Value::Unit)
}

/// Blocks the interpreter for the given number of seconds.
pub fn wait(args: &[Value], _ctx: &Context) -> EvalResult<Value> {
    let seconds = biguint_to_u64_checked(&literal_arg(args, 0)?.to_integer()?)?;
    debug!("waiting {seconds}s");
    thread::sleep(Duration::from_secs(seconds));
    Ok(Value::Unit)
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::{diagnostic::BufferConsole, interpreter::evaluator::core::RunMetadata};

    fn context(console: &Rc<BufferConsole>) -> Context {
        Context::new(RunMetadata::default(), console.clone())
    }

    fn lit(base: u32, digits: &str) -> Value {
        Value::Literal(BaseLiteral::new(base, digits).unwrap())
    }

    #[test]
    fn input_reads_lines_in_order() {
        let console = Rc::new(BufferConsole::with_input(["42", "x"]));
        let ctx = context(&console);

        assert_eq!(input(&[], &ctx), Ok(Value::from("42")));
        assert_eq!(input(&[], &ctx), Ok(Value::from("x")));
        assert_eq!(input(&[], &ctx).unwrap_err().kind(), "IoError");
    }

    #[test]
    fn len_counts_characters() {
        let console = Rc::new(BufferConsole::new());
        assert_eq!(len(&[Value::from("héllo")], &context(&console)), Ok(lit(10, "5")));
        assert_eq!(len(&[Value::from("")], &context(&console)), Ok(lit(10, "0")));
    }

    #[test]
    fn str_and_number_convert_between_text_and_literals() {
        let console = Rc::new(BufferConsole::new());
        let ctx = context(&console);

        assert_eq!(to_text(&[lit(16, "ff")], &ctx), Ok(Value::from("b16@ff")));
        assert_eq!(to_text(&[lit(10, "12")], &ctx), Ok(Value::from("12")));
        assert_eq!(number(&[Value::from("120")], &ctx), Ok(lit(10, "120")));
        assert_eq!(number(&[Value::from("-1")], &ctx),
                   Err(RuntimeError::InvalidDigit { digit: '-', base: 10 }));
        assert_eq!(number(&[Value::from("")], &ctx), Err(RuntimeError::EmptyDigits { base: 10 }));
    }

    #[test]
    fn sqrt_rounds_down_and_keeps_the_base() {
        let console = Rc::new(BufferConsole::new());
        let ctx = context(&console);

        assert_eq!(sqrt(&[lit(10, "17")], &ctx), Ok(lit(10, "4")));
        assert_eq!(sqrt(&[lit(16, "0")], &ctx), Ok(lit(16, "0")));
        assert_eq!(sqrt(&[lit(16, "100")], &ctx), Ok(lit(16, "10")));

        let square = format!("1{}", "0".repeat(60));
        let root = format!("1{}", "0".repeat(30));
        assert_eq!(sqrt(&[lit(10, &square)], &ctx), Ok(lit(10, &root)));
    }

    #[test]
    fn rebase_uses_the_value_of_the_base_argument() {
        let console = Rc::new(BufferConsole::new());
        let ctx = context(&console);

        assert_eq!(rebase(&[lit(16, "ff"), lit(2, "10")], &ctx), Ok(lit(2, "11111111")));
        assert_eq!(rebase(&[lit(10, "1"), lit(10, "65")], &ctx),
                   Err(RuntimeError::BaseOutOfRange { base: BigUint::from(65_u32) }));
    }

    #[test]
    fn funcs_lists_sorted_signatures() {
        let console = Rc::new(BufferConsole::new());
        funcs(&[], &context(&console)).unwrap();

        let output = console.output();
        assert!(output.starts_with("Available functions: fn funcs(), fn in() str, "));
        assert!(output.contains("fn rebase(b_ val, b_ base) b_"));
        assert!(output.ends_with("fn wait(b_ seconds)\n"));
    }

    #[test]
    fn wait_for_zero_seconds_returns_unit() {
        let console = Rc::new(BufferConsole::new());
        assert_eq!(wait(&[lit(10, "0")], &context(&console)), Ok(Value::Unit));
        assert_eq!(wait(&[lit(16, &"f".repeat(17))], &context(&console)),
                   Err(RuntimeError::Overflow));
    }
}
