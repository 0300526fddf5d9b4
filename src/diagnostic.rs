use std::{
    cell::RefCell,
    collections::VecDeque,
    io::{self, BufRead, Write},
};

const RED: &str = "\x1b[91m";
const YELLOW: &str = "\x1b[93m";
const RESET: &str = "\x1b[0m";

/// A resolved source position: 1-based line and column plus the text of the
/// line it falls on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    /// 1-based line number.
    pub line:      usize,
    /// 1-based column, counted in characters.
    pub column:    usize,
    /// The full text of the line, without its line terminator.
    pub line_text: String,
}

/// Resolves a character offset into a [`Position`].
///
/// Offsets count characters, the same unit the lexer reports. An offset equal
/// to the length of the source points just past the last character, which is
/// where end-of-input errors are anchored.
///
/// Returns `None` when the offset lies beyond the end of the source.
///
/// # Example
/// ```
/// use mbase::diagnostic::locate;
///
/// let position = locate("x = 1\ny = $", 10).unwrap();
/// assert_eq!((position.line, position.column), (2, 5));
/// assert_eq!(position.line_text, "y = $");
/// ```
#[must_use]
pub fn locate(source: &str, offset: usize) -> Option<Position> {
    let mut line_start = 0;

    for (index, line) in source.split('\n').enumerate() {
        let length = line.chars().count();
        if offset <= line_start + length {
            return Some(Position { line:      index + 1,
                                   column:    offset - line_start + 1,
                                   line_text: line.trim_end_matches('\r').to_string(), });
        }
        line_start += length + 1;
    }

    None
}

/// A rendered-on-demand, human readable error report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Failure kind, e.g. `SyntaxError`.
    pub label:    &'static str,
    /// One-line description of the failure.
    pub message:  String,
    /// Name of the unit the failure happened in.
    pub filename: String,
    /// Where the failure happened, when known.
    pub position: Option<Position>,
}

impl Diagnostic {
    /// Creates a diagnostic without position information.
    pub fn plain(label: &'static str, message: impl Into<String>, filename: impl Into<String>) -> Self {
        Self { label,
               message: message.into(),
               filename: filename.into(),
               position: None }
    }

    /// Creates a diagnostic anchored at `offset` in `source`.
    ///
    /// Falls back to a plain diagnostic if the offset cannot be resolved.
    pub fn anchored(source: &str,
                    offset: usize,
                    label: &'static str,
                    message: impl Into<String>,
                    filename: impl Into<String>)
                    -> Self {
        Self { label,
               message: message.into(),
               filename: filename.into(),
               position: locate(source, offset) }
    }

    /// Renders the diagnostic as printable text.
    ///
    /// Anchored diagnostics print `file:line:column`, the offending line and a
    /// caret under the offending column before the message line.
    ///
    /// # Example
    /// ```
    /// use mbase::diagnostic::Diagnostic;
    ///
    /// let diagnostic = Diagnostic::anchored("a + ?", 4, "LexError", "Unexpected character: '?'", "<input>");
    ///
    /// assert_eq!(diagnostic.render(false),
    ///            "<input>:1:5\na + ?\n    ^\n[LexError]: Unexpected character: '?'");
    /// ```
    #[must_use]
    pub fn render(&self, color: bool) -> String {
        let mut out = String::new();

        if let Some(position) = &self.position {
            let caret = format!("{}^", " ".repeat(position.column - 1));
            out.push_str(&format!("{}:{}:{}\n", self.filename, position.line, position.column));
            if color {
                out.push_str(&format!("{YELLOW}{}{RESET}\n{YELLOW}{caret}{RESET}\n",
                                      position.line_text));
            } else {
                out.push_str(&format!("{}\n{caret}\n", position.line_text));
            }
        }

        if color {
            out.push_str(&format!("{RED}[{}]: {}{RESET}", self.label, self.message));
        } else {
            out.push_str(&format!("[{}]: {}", self.label, self.message));
        }

        out
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render(false))
    }
}

/// The host side of a running program.
///
/// Native functions write program output and read input through it, and the
/// interpreter hands every diagnostic it produces to [`Console::report`].
/// Nothing in the interpreter touches stdout, stdin or stderr directly.
pub trait Console {
    /// Writes program output, without adding a line break.
    fn write_out(&self, text: &str) -> io::Result<()>;
    /// Blocks until one line of input is available and returns it without its
    /// line terminator.
    fn read_line(&self) -> io::Result<String>;
    /// Receives a diagnostic.
    fn report(&self, diagnostic: &Diagnostic);
}

/// Console bound to the process' standard streams.
pub struct StdConsole {
    color: bool,
}

impl StdConsole {
    /// Creates a console; `color` enables ANSI colored diagnostics.
    #[must_use]
    pub const fn new(color: bool) -> Self {
        Self { color }
    }
}

impl Console for StdConsole {
    fn write_out(&self, text: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(text.as_bytes())?;
        stdout.flush()
    }

    fn read_line(&self) -> io::Result<String> {
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim_end_matches(['\n', '\r']).to_string())
    }

    fn report(&self, diagnostic: &Diagnostic) {
        eprintln!("{}", diagnostic.render(self.color));
    }
}

/// In-memory console used by tests and embedders.
///
/// Output is accumulated into a string, input is served from a queue of
/// lines, and diagnostics are collected.
#[derive(Default)]
pub struct BufferConsole {
    output:      RefCell<String>,
    input:       RefCell<VecDeque<String>>,
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl BufferConsole {
    /// Creates an empty console.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a console whose `read_line` serves the given lines in order.
    #[must_use]
    pub fn with_input<I, S>(lines: I) -> Self
        where I: IntoIterator<Item = S>,
              S: Into<String>
    {
        Self { input: RefCell::new(lines.into_iter().map(Into::into).collect()),
               ..Self::default() }
    }

    /// Everything written so far.
    #[must_use]
    pub fn output(&self) -> String {
        self.output.borrow().clone()
    }

    /// Every diagnostic reported so far.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }
}

impl Console for BufferConsole {
    fn write_out(&self, text: &str) -> io::Result<()> {
        self.output.borrow_mut().push_str(text);
        Ok(())
    }

    fn read_line(&self) -> io::Result<String> {
        self.input
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no input left"))
    }

    fn report(&self, diagnostic: &Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locate_first_and_later_lines() {
        let source = "abc\ndef\n";
        assert_eq!(locate(source, 0).map(|p| (p.line, p.column)), Some((1, 1)));
        assert_eq!(locate(source, 5).map(|p| (p.line, p.column)), Some((2, 2)));
        assert_eq!(locate(source, 5).unwrap().line_text, "def");
    }

    #[test]
    fn end_of_input_is_located_after_last_character() {
        let source = "abc\n";
        let position = locate(source, 4).unwrap();
        assert_eq!((position.line, position.column), (2, 1));
        assert_eq!(position.line_text, "");
        assert!(locate(source, 10).is_none());
    }

    #[test]
    fn columns_count_characters_not_bytes() {
        let source = "\"héllo\" $";
        let position = locate(source, 8).unwrap();
        assert_eq!(position.column, 9);
    }

    #[test]
    fn plain_diagnostic_renders_message_only() {
        let diagnostic = Diagnostic::plain("NameError", "Undefined variable 'x'", "<input>");
        assert_eq!(diagnostic.render(false), "[NameError]: Undefined variable 'x'");
    }

    #[test]
    fn colored_rendering_wraps_lines() {
        let diagnostic = Diagnostic::anchored("1 / 0", 2, "ValueError", "Division by zero", "t.mb");
        let rendered = diagnostic.render(true);
        assert!(rendered.starts_with("t.mb:1:3\n"));
        assert!(rendered.contains(YELLOW));
        assert!(rendered.ends_with(RESET));
    }

    #[test]
    fn buffer_console_serves_input_and_collects_output() {
        let console = BufferConsole::with_input(["first", "second"]);
        assert_eq!(console.read_line().unwrap(), "first");
        assert_eq!(console.read_line().unwrap(), "second");
        assert!(console.read_line().is_err());

        console.write_out("a").unwrap();
        console.write_out("b").unwrap();
        assert_eq!(console.output(), "ab");
    }
}
