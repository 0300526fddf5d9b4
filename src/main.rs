use std::{fs, io::IsTerminal, path::PathBuf, process::ExitCode, rc::Rc, thread};

use chrono::{DateTime, Local};
use clap::Parser;
use log::debug;
use mbase::{
    RunOptions,
    diagnostic::{Console, StdConsole},
    run_source,
};
use rustyline::{DefaultEditor, error::ReadlineError};

const PROMPT: &str = "mbase> ";
const CONTINUATION_PROMPT: &str = "...  > ";
/// Programs run on a thread with this much stack, enough for the deepest call
/// nesting the evaluator allows.
const INTERPRETER_STACK_SIZE: usize = 256 * 1024 * 1024;

/// mbase is a small scripting language whose numbers are integers written in
/// any base from 2 to 64.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Program file to run. Starts the REPL when neither a file nor
    /// `--eval` is given.
    file: Option<PathBuf>,

    /// Runs the given source instead of a file.
    #[arg(short, long, conflicts_with = "file")]
    eval: Option<String>,

    /// Prints the last top-level value that is not unit.
    #[arg(short, long)]
    print_result: bool,

    /// Disables colored diagnostics.
    #[arg(long)]
    no_color: bool,

    /// Starts the REPL without the banner.
    #[arg(long)]
    no_banner: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let started = Local::now();
    let args = Args::parse();

    let interpreter = thread::Builder::new().name("interpreter".to_string())
                                            .stack_size(INTERPRETER_STACK_SIZE)
                                            .spawn(move || run(&args, started));

    match interpreter {
        Ok(handle) => handle.join().unwrap_or(ExitCode::FAILURE),
        Err(error) => {
            eprintln!("Could not start the interpreter: {error}");
            ExitCode::FAILURE
        },
    }
}

fn run(args: &Args, started: DateTime<Local>) -> ExitCode {
    let color = !args.no_color
                && std::io::stdout().is_terminal()
                && std::env::var("TERM").map_or(true, |term| term != "dumb");
    let console: Rc<dyn Console> = Rc::new(StdConsole::new(color));

    if let Some(source) = &args.eval {
        return run_batch(source, &RunOptions::default(), console, args.print_result);
    }

    if let Some(path) = &args.file {
        let Ok(source) = fs::read_to_string(path) else {
            eprintln!("Failed to read the input file '{}'. Perhaps this file does not exist?",
                      path.display());
            return ExitCode::FAILURE;
        };
        let options = RunOptions::file(path.display().to_string());
        return run_batch(&source, &options, console, args.print_result);
    }

    repl(&console, (!args.no_banner).then_some(started))
}

fn run_batch(source: &str,
             options: &RunOptions,
             console: Rc<dyn Console>,
             print_result: bool)
             -> ExitCode {
    match run_source(source, options, console) {
        Ok(result) => {
            if print_result && let Some(value) = result {
                println!("{value}");
            }
            ExitCode::SUCCESS
        },
        Err(_) => ExitCode::FAILURE,
    }
}

/// Reads submissions until `exit`, `quit`, Ctrl-C or Ctrl-D.
///
/// Lines are collected while braces are open, and each submission then runs
/// as its own unit with a fresh environment.
fn repl(console: &Rc<dyn Console>, banner: Option<DateTime<Local>>) -> ExitCode {
    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(error) => {
            eprintln!("Could not start the REPL: {error}");
            return ExitCode::FAILURE;
        },
    };

    if let Some(started) = banner {
        println!("{} {} (started {})",
                 env!("CARGO_PKG_NAME"),
                 env!("CARGO_PKG_VERSION"),
                 started.format("%Y-%m-%d %H:%M:%S"));
        println!("Type 'exit' or 'quit' to leave.");
    }

    let mut buffer = String::new();

    loop {
        let prompt = if buffer.is_empty() { PROMPT } else { CONTINUATION_PROMPT };

        let line = match editor.readline(prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(error) => {
                eprintln!("Failed to read input: {error}");
                return ExitCode::FAILURE;
            },
        };

        if buffer.is_empty() && matches!(line.trim(), "exit" | "quit") {
            break;
        }
        if buffer.is_empty() && line.trim().is_empty() {
            continue;
        }

        buffer.push_str(&line);
        buffer.push('\n');
        if brace_depth(&buffer) > 0 {
            continue;
        }

        let _ = editor.add_history_entry(buffer.trim_end());
        debug!("submitting {} byte(s)", buffer.len());
        // Failures are already reported through the console.
        let _ = run_source(&buffer, &RunOptions::repl(), Rc::clone(console));
        buffer.clear();
    }

    ExitCode::SUCCESS
}

/// Net number of open braces outside of texts and comments.
fn brace_depth(source: &str) -> isize {
    let mut depth = 0;
    let mut in_text = false;
    let mut in_comment = false;
    let mut escaped = false;

    for ch in source.chars() {
        match ch {
            '\n' if in_comment => in_comment = false,
            _ if in_comment => {},
            _ if escaped => escaped = false,
            '\\' if in_text => escaped = true,
            '"' => in_text = !in_text,
            '#' if !in_text => in_comment = true,
            '{' if !in_text => depth += 1,
            '}' if !in_text => depth -= 1,
            _ => {},
        }
    }

    depth
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn braces_inside_texts_are_ignored() {
        assert_eq!(brace_depth("while (1) {\n"), 1);
        assert_eq!(brace_depth("out(\"{\")"), 0);
        assert_eq!(brace_depth("x = \"\\\"{\" {"), 1);
        assert_eq!(brace_depth("loop { if (1) { break } }"), 0);
    }

    #[test]
    fn braces_inside_comments_are_ignored() {
        assert_eq!(brace_depth("x = 1 # {\n"), 0);
        assert_eq!(brace_depth("loop { # }\n"), 1);
        assert_eq!(brace_depth("out(\"#{\") {\n}"), 0);
        assert_eq!(brace_depth("# }\nwhile (1) {\n"), 1);
    }
}
