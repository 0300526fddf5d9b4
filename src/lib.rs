//! # mbase
//!
//! mbase is a small scripting language whose numbers are integer literals in
//! an explicit base between 2 and 64, such as `b16@ff` or `b2@1010`.
//! Programs are lexed, parsed into an AST and run by a tree-walking evaluator
//! with labeled loops, typed function parameters and interpolated texts.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use std::{error::Error, rc::Rc, time::Instant};

use log::{debug, info};

use crate::{
    ast::Node,
    diagnostic::{Console, Diagnostic},
    interpreter::{
        evaluator::core::{Context, RunMetadata},
        lexer::tokenize,
        parser::core::{ParseResult, parse_program},
        value::core::Value,
    },
};

/// Defines the structure of parsed code.
///
/// This module declares the `Node` enum and related types that represent the
/// syntactic structure of a program as a tree. The AST is built by the parser
/// and traversed by the evaluator.
///
/// # Responsibilities
/// - Defines node types for every language construct.
/// - Attaches source offsets to the nodes whose failures are reported.
pub mod ast;
/// Source positions, error reports and the host console.
///
/// Turns character offsets into line and column, renders diagnostics with
/// the offending line and a caret, and defines the `Console` every program
/// reads from and writes to.
pub mod diagnostic;
/// Provides unified error types for parsing and evaluation.
///
/// This module defines all errors that can be raised during lexing, parsing,
/// or evaluating code, each with the failure kind shown to the user and, where
/// one exists, the character offset it is anchored at.
///
/// # Responsibilities
/// - Defines error enums for all failure modes (lexer, parser, evaluator).
/// - Maps every error to its reported kind, such as `SyntaxError`.
/// - Supports integration with standard error handling traits.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together lexing, parsing, evaluation and value
/// representations.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, parser, evaluator, and value
///   types.
/// - Provides entry points for parsing and evaluating user code.
/// - Manages the flow of data and errors between phases.
pub mod interpreter;
/// General utilities for safe numeric conversion.
///
/// # Responsibilities
/// - Safely narrow arbitrary-precision values to `u32` and `u64` without
///   silent data loss.
pub mod util;

/// How a unit of source is run and reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Name shown for failures raised inside operator expressions.
    pub filename:     String,
    /// Name shown for failures that abort the unit.
    pub origin_label: String,
    /// Echo top-level results to the console, the way the REPL does.
    pub echo:         bool,
}

impl RunOptions {
    /// Options for running a file.
    pub fn file(filename: impl Into<String>) -> Self {
        let filename = filename.into();
        Self { origin_label: filename.clone(),
               filename,
               echo: false }
    }

    /// Options for one REPL submission: echo on, failures labeled `<repl>`.
    #[must_use]
    pub fn repl() -> Self {
        Self { filename:     "<input>".to_string(),
               origin_label: "<repl>".to_string(),
               echo:         true, }
    }
}

impl Default for RunOptions {
    fn default() -> Self {
        Self { filename:     "<input>".to_string(),
               origin_label: "<input>".to_string(),
               echo:         false, }
    }
}

/// Runs a unit of source in a fresh context.
///
/// The source is tokenized and parsed completely before anything runs, so a
/// lexical or syntax error anywhere prevents every statement from running.
/// Top-level statements then run in order until the first failure that is not
/// recovered inside an operator expression.
///
/// Every failure is reported through `console`, anchored at its offset when it
/// has one, and returned as the error.
///
/// # Parameters
/// - `source`: Program text.
/// - `options`: Names used in reports, and whether results are echoed.
/// - `console`: Host console for program I/O and diagnostics.
///
/// # Returns
/// The last top-level result that is not `Unit`, if any.
///
/// # Errors
/// The first lexing, parsing or runtime error of the unit.
///
/// # Examples
/// ```
/// use std::rc::Rc;
///
/// use mbase::{RunOptions, diagnostic::BufferConsole, run_source};
///
/// let console = Rc::new(BufferConsole::new());
///
/// let result = run_source("x = b16@ff\nret x", &RunOptions::default(), console.clone()).unwrap();
/// assert_eq!(result.unwrap().to_string(), "b16@ff");
///
/// // A failure inside an operator expression is reported and yields unit.
/// assert!(run_source("x = y + 1", &RunOptions::default(), console.clone()).is_ok());
/// assert_eq!(console.diagnostics().len(), 1);
///
/// // Any other failure aborts the unit.
/// assert!(run_source("x = y", &RunOptions::default(), console.clone()).is_err());
/// assert_eq!(console.diagnostics()[1].label, "NameError");
/// ```
pub fn run_source(source: &str,
                  options: &RunOptions,
                  console: Rc<dyn Console>)
                  -> Result<Option<Value>, Box<dyn Error>> {
    debug!("running unit '{}'", options.origin_label);

    let program = match parse_unit(source) {
        Ok(program) => program,
        Err(error) => {
            console.report(&Diagnostic::anchored(source,
                                                 error.offset(),
                                                 error.kind(),
                                                 error.to_string(),
                                                 options.origin_label.as_str()));
            return Err(Box::new(error));
        },
    };

    let metadata = RunMetadata { source:   source.to_string(),
                                 filename: options.filename.clone(),
                                 origin:   options.origin_label.clone(), };
    let mut context = Context::new(metadata, Rc::clone(&console));

    let started = Instant::now();
    let mut result = None;

    for node in &program {
        let value = match context.eval(node) {
            Ok(value) => value,
            Err(error) => {
                let diagnostic = match error.offset() {
                    Some(offset) => Diagnostic::anchored(source,
                                                         offset,
                                                         error.kind(),
                                                         error.to_string(),
                                                         options.origin_label.as_str()),
                    None => Diagnostic::plain(error.kind(),
                                              error.to_string(),
                                              options.origin_label.as_str()),
                };
                console.report(&diagnostic);
                return Err(Box::new(error));
            },
        };

        if options.echo {
            echo(console.as_ref(), node, &value)?;
        }
        if !value.is_unit() {
            result = Some(value);
        }
    }

    info!("evaluated in {}us", started.elapsed().as_micros());
    debug!("finished unit '{}'", options.origin_label);
    Ok(result)
}

/// Tokenizes and parses a whole unit.
fn parse_unit(source: &str) -> ParseResult<Vec<Node>> {
    let started = Instant::now();
    let tokens = tokenize(source)?;
    info!("tokenized {} token(s) in {}us", tokens.len(), started.elapsed().as_micros());

    let started = Instant::now();
    let program = parse_program(&tokens)?;
    info!("parsed {} statement(s) in {}us", program.len(), started.elapsed().as_micros());

    Ok(program)
}

/// Prints a top-level result for interactive use.
///
/// `out` leaves the cursor after its text, so a statement that calls it gets a
/// line break instead of its (unit) result.
fn echo(console: &dyn Console, node: &Node, value: &Value) -> std::io::Result<()> {
    match node {
        Node::Call { name, .. } if name == "out" => console.write_out("\n"),
        _ if value.is_unit() => Ok(()),
        _ => console.write_out(&format!("{value}\n")),
    }
}
