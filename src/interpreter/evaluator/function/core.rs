use std::collections::HashMap;

use log::debug;

use crate::{
    ast::{FunctionDecl, Node},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult, Flow, value_of},
            function::builtin,
        },
        value::{
            core::Value,
            function::{Function, FunctionBody, NativeFn, TypeTag},
        },
    },
};

/// Deepest nesting of interpreted calls before a call fails instead of
/// exhausting the host stack.
pub const MAX_CALL_DEPTH: usize = 1000;

/// Defines native functions by generating a lookup table.
///
/// Each entry provides:
/// - a string name,
/// - the parameters as `(type tag, display name)` pairs,
/// - the return tag shown in signatures,
/// - a function pointer implementing the native.
///
/// The macro produces:
/// - `NativeDef` (internal metadata),
/// - `NATIVE_TABLE` (static table used to seed every context),
/// - `NATIVE_FUNCTIONS` (the declared names, checked against the table in
///   tests).
macro_rules! native_functions {
    (
        $(
            $name:literal => {
                params: [$(($tag:expr, $param:literal)),* $(,)?],
                returns: $returns:expr,
                func: $func:expr $(,)?
            }
        ),* $(,)?
    ) => {
        struct NativeDef {
            name:    &'static str,
            params:  &'static [(TypeTag, &'static str)],
            returns: Option<&'static str>,
            func:    NativeFn,
        }
        static NATIVE_TABLE: &[NativeDef] = &[
            $(
                NativeDef { name: $name, params: &[$(($tag, $param)),*], returns: $returns, func: $func },
            )*
        ];
        #[cfg(test)]
        const NATIVE_FUNCTIONS: &[&str] = &[
            $($name,)*
        ];
    };
}

native_functions! {
    "out"    => { params: [(TypeTag::Text, "text")],                          returns: None,         func: builtin::out },
    "in"     => { params: [],                                                 returns: Some("str"),  func: builtin::input },
    "len"    => { params: [(TypeTag::Text, "text")],                          returns: Some("b10"),  func: builtin::len },
    "str"    => { params: [(TypeTag::AnyBase, "val")],                        returns: Some("str"),  func: builtin::to_text },
    "number" => { params: [(TypeTag::Text, "raw")],                           returns: Some("b10"),  func: builtin::number },
    "sqrt"   => { params: [(TypeTag::AnyBase, "val")],                        returns: Some("b_"),   func: builtin::sqrt },
    "rebase" => { params: [(TypeTag::AnyBase, "val"), (TypeTag::AnyBase, "base")], returns: Some("b_"), func: builtin::rebase },
    "funcs"  => { params: [],                                                 returns: None,         func: builtin::funcs },
    "wait"   => { params: [(TypeTag::AnyBase, "seconds")],                    returns: None,         func: builtin::wait },
}

/// Builds the native function table every new context starts with.
#[must_use]
pub fn native_functions() -> HashMap<String, Function> {
    NATIVE_TABLE.iter()
                .map(|def| {
                    let function =
                        Function { name:        def.name.to_string(),
                                   params:      def.params
                                                   .iter()
                                                   .map(|(tag, param)| (*tag, (*param).to_string()))
                                                   .collect(),
                                   return_type: def.returns.map(str::to_string),
                                   body:        FunctionBody::Native(def.func), };
                    (def.name.to_string(), function)
                })
                .collect()
}

impl Context {
    /// Registers a declared function in this context.
    ///
    /// Type tags are resolved here, so a declaration with an unknown tag fails
    /// before the function can ever be called. A later declaration with the
    /// same name replaces the earlier one, natives included.
    pub(crate) fn declare_function(&mut self, decl: &FunctionDecl) -> EvalResult<()> {
        let params = decl.params
                         .iter()
                         .map(|param| Ok((TypeTag::parse(&param.type_tag)?, param.name.clone())))
                         .collect::<EvalResult<Vec<_>>>()?;

        let function = Function { name: decl.name.clone(),
                                  params,
                                  return_type: decl.return_type.clone(),
                                  body: FunctionBody::Interpreted(decl.body.clone()) };

        debug!("declared {}", function.signature());
        self.functions.insert(decl.name.clone(), function);
        Ok(())
    }

    /// Evaluates a function call.
    ///
    /// Arguments are evaluated eagerly, left to right. The function is then
    /// resolved by name, and the argument count and every argument's type tag
    /// are checked before anything runs.
    ///
    /// # Parameters
    /// - `name`: Function name.
    /// - `args`: Argument expressions.
    /// - `offset`: Offset of the call, used to anchor failures.
    ///
    /// # Returns
    /// The function result, `Unit` if an interpreted body never reaches `ret`.
    /// A `break` or `continue` left unconsumed by the body is handed on to the
    /// loops around the call site.
    ///
    /// # Errors
    /// - `UnknownFunction` if no function has this name.
    /// - `ArgumentCountMismatch` if the number of arguments is wrong.
    /// - `ArgumentTypeMismatch` if an argument violates its type tag.
    /// - `CallDepthExceeded` if the call would nest deeper than
    ///   [`MAX_CALL_DEPTH`].
    /// - Anything raised by the function itself.
    pub(crate) fn eval_call(&mut self, name: &str, args: &[Node], offset: usize) -> EvalResult<Flow> {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(value_of!(self.evaluate(arg)));
        }

        let function = self.functions
                           .get(name)
                           .cloned()
                           .ok_or_else(|| RuntimeError::UnknownFunction { name: name.to_string(),
                                                                          offset })?;

        check_arguments(&function, &values, offset)?;
        debug!("calling {} with {} argument(s)", function.signature(), values.len());

        match &function.body {
            FunctionBody::Native(func) => Ok(Flow::Normal(func(&values, self)?)),
            FunctionBody::Interpreted(body) => self.call_interpreted(&function, body, values, offset),
        }
    }

    /// Runs an interpreted body in a copy of this context.
    ///
    /// The copy carries every variable and function of the caller with the
    /// parameters bound on top, and is discarded afterwards.
    fn call_interpreted(&self,
                        function: &Function,
                        body: &[Node],
                        values: Vec<Value>,
                        offset: usize)
                        -> EvalResult<Flow> {
        if self.call_depth >= MAX_CALL_DEPTH {
            return Err(RuntimeError::CallDepthExceeded { name: function.name.clone(),
                                                         limit: MAX_CALL_DEPTH,
                                                         offset });
        }

        let mut local = self.clone();
        local.call_depth += 1;

        for ((_, param), value) in function.params.iter().zip(values) {
            local.variables.insert(param.clone(), value);
        }

        match local.run_block(body)? {
            Flow::Return(value) => Ok(Flow::Normal(value)),
            Flow::Normal(_) => Ok(Flow::Normal(Value::Unit)),
            jump @ (Flow::Break(_) | Flow::Continue(_)) => Ok(jump),
        }
    }
}

/// Checks argument count, then every argument against its type tag.
fn check_arguments(function: &Function, values: &[Value], offset: usize) -> EvalResult<()> {
    if values.len() != function.params.len() {
        return Err(RuntimeError::ArgumentCountMismatch { name: function.name.clone(),
                                                         expected: function.params.len(),
                                                         found: values.len(),
                                                         offset });
    }

    for (position, ((tag, _), value)) in function.params.iter().zip(values).enumerate() {
        if !tag.accepts(value) {
            return Err(RuntimeError::ArgumentTypeMismatch { name: function.name.clone(),
                                                            position: position + 1,
                                                            expected: tag.to_string(),
                                                            found: value.type_name(),
                                                            offset });
        }
    }

    Ok(())
}
