use log::trace;
use logos::Logos;

use crate::{
    error::ParseError,
    interpreter::{
        parser::core::ParseResult,
        value::base_literal::{DIGIT_ALPHABET, MAX_BASE},
    },
};

/// Represents the kind of a lexical token.
///
/// Produced by the `logos` generated scanner. Offsets are attached separately
/// by [`Lexer`], which converts byte spans into character offsets.
#[derive(Logos, Debug, PartialEq, Eq, Clone)]
#[logos(error = LexFailure)]
pub enum TokenKind {
    /// Base literal such as `b16@ff` or `b2@(1010)`, carrying the base as
    /// written and the raw payload.
    #[regex(r"b[0-9][0-9]?@", lex_base_literal)]
    BaseLiteral((u32, String)),
    /// Plain decimal digits such as `42`.
    #[regex(r"[0-9]+", |lex| lex.slice().to_string())]
    Number(String),
    /// Decoded contents of a double-quoted text. Interpolation braces are kept
    /// verbatim, and so are the escapes `\{` and `\}`.
    #[token("\"", lex_text)]
    Text(TextLiteral),
    /// Identifier tokens; variable, function or type tag names.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),
    /// `fn`
    #[token("fn")]
    Fn,
    /// `ret`
    #[token("ret")]
    Ret,
    /// `if`
    #[token("if")]
    If,
    /// `else`
    #[token("else")]
    Else,
    /// `while`
    #[token("while")]
    While,
    /// `loop`
    #[token("loop")]
    Loop,
    /// `break`
    #[token("break")]
    Break,
    /// `continue`
    #[token("continue")]
    Continue,
    /// `===`
    #[token("===")]
    StrictEqual,
    /// `!==`
    #[token("!==")]
    StrictNotEqual,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `!=`
    #[token("!=")]
    BangEqual,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `&&`
    #[token("&&")]
    AndAnd,
    /// `||`
    #[token("||")]
    OrOr,
    /// `;`
    #[token(";")]
    Semicolon,
    /// `,`
    #[token(",")]
    Comma,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `=`
    #[token("=")]
    Equals,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `<`
    #[token("<")]
    Less,
    /// `>`
    #[token(">")]
    Greater,
    /// `!`
    #[token("!")]
    Bang,
    /// `@`
    #[token("@")]
    At,
    /// `# Comments.`
    #[regex(r"#[^\n]*", logos::skip, allow_greedy = true)]
    Comment,
    /// Line break; separates statements.
    #[token("\n")]
    NewLine,
    /// Spaces, tabs, carriage returns and feeds.
    #[regex(r"[ \t\r\f]+", logos::skip)]
    Ignored,
    /// End of input. Never produced by the scanner itself.
    Eof,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BaseLiteral((base, digits)) => write!(f, "literal 'b{base}@{digits}'"),
            Self::Number(digits) => write!(f, "number '{digits}'"),
            Self::Text(literal) => write!(f, "text {:?}", literal.text),
            Self::Identifier(name) => write!(f, "identifier '{name}'"),
            Self::NewLine => write!(f, "newline"),
            Self::Eof => write!(f, "end of input"),
            other => write!(f, "'{}'", other.symbol()),
        }
    }
}

impl TokenKind {
    /// Source spelling of keywords and punctuation.
    const fn symbol(&self) -> &'static str {
        match self {
            Self::Fn => "fn",
            Self::Ret => "ret",
            Self::If => "if",
            Self::Else => "else",
            Self::While => "while",
            Self::Loop => "loop",
            Self::Break => "break",
            Self::Continue => "continue",
            Self::StrictEqual => "===",
            Self::StrictNotEqual => "!==",
            Self::EqualEqual => "==",
            Self::BangEqual => "!=",
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
            Self::AndAnd => "&&",
            Self::OrOr => "||",
            Self::Semicolon => ";",
            Self::Comma => ",",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::Equals => "=",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Less => "<",
            Self::Greater => ">",
            Self::Bang => "!",
            Self::At => "@",
            _ => "",
        }
    }
}

/// Why the scanner rejected its input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LexFailure {
    /// No token starts with the current character.
    #[default]
    UnexpectedCharacter,
    /// A text literal reached the end of input without its closing quote.
    UnterminatedText,
    /// A `b<base>@(` payload reached the end of input without `)`.
    UnterminatedBaseLiteral,
}

/// Decoded contents of a text literal, remembering where each character came
/// from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextLiteral {
    /// The decoded characters.
    pub text:      String,
    /// For every character of `text`, its offset from the opening quote. An
    /// escape sequence maps to the position of its backslash.
    pub positions: Vec<usize>,
}

impl TextLiteral {
    /// A literal written without escapes: character `i` sits at `i + 1`.
    ///
    /// # Example
    /// ```
    /// use mbase::interpreter::lexer::TextLiteral;
    ///
    /// let literal = TextLiteral::plain("héllo");
    /// assert_eq!(literal.positions, vec![1, 2, 3, 4, 5]);
    /// ```
    #[must_use]
    pub fn plain(text: &str) -> Self {
        Self { text:      text.to_string(),
               positions: (1..=text.chars().count()).collect(), }
    }

    fn push(&mut self, ch: char, position: usize) {
        self.text.push(ch);
        self.positions.push(position);
    }
}

/// A token with its character offset into the scanned source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// What was scanned.
    pub kind:   TokenKind,
    /// Character offset of the token's first character.
    pub offset: usize,
}

/// Scans the payload following `b<base>@`.
///
/// A parenthesized payload runs up to the next `)` and is taken verbatim.
/// Otherwise the payload is the longest run of characters that are digits of
/// the base. Neither the base nor the digits are validated here.
fn lex_base_literal(lex: &mut logos::Lexer<TokenKind>) -> Result<(u32, String), LexFailure> {
    let slice = lex.slice();
    let base = slice[1..slice.len() - 1].parse::<u32>()
                                        .map_err(|_| LexFailure::UnexpectedCharacter)?;
    let remainder = lex.remainder();

    if let Some(rest) = remainder.strip_prefix('(') {
        let close = rest.find(')').ok_or(LexFailure::UnterminatedBaseLiteral)?;
        let payload = rest[..close].to_string();
        lex.bump(close + 2);
        return Ok((base, payload));
    }

    let limit = usize::try_from(base.min(MAX_BASE)).unwrap_or(0);
    let allowed = &DIGIT_ALPHABET[..limit];
    let length = remainder.find(|c: char| !c.is_ascii() || !allowed.contains(c.to_ascii_lowercase()))
                          .unwrap_or(remainder.len());
    let payload = remainder[..length].to_string();
    lex.bump(length);

    Ok((base, payload))
}

/// Scans a double-quoted text after its opening quote and decodes escapes.
fn lex_text(lex: &mut logos::Lexer<TokenKind>) -> Result<TextLiteral, LexFailure> {
    let mut literal = TextLiteral::default();
    let mut chars = lex.remainder().char_indices();
    let mut column = 0;

    while let Some((index, ch)) = chars.next() {
        column += 1;
        let start = column;

        match ch {
            '"' => {
                lex.bump(index + 1);
                return Ok(literal);
            },
            '\\' => {
                column += 1;
                match chars.next() {
                    Some((_, 'n')) => literal.push('\n', start),
                    Some((_, 't')) => literal.push('\t', start),
                    Some((_, brace @ ('{' | '}'))) => {
                        literal.push('\\', start);
                        literal.push(brace, start + 1);
                    },
                    Some((_, other)) => literal.push(other, start),
                    None => break,
                }
            },
            other => literal.push(other, start),
        }
    }

    Err(LexFailure::UnterminatedText)
}

/// Positioned token stream over a source string.
///
/// Wraps the generated scanner, converts byte spans into character offsets,
/// and terminates the stream with [`TokenKind::Eof`]. The first lexical error
/// ends the stream.
pub struct Lexer<'src> {
    inner:       logos::Lexer<'src, TokenKind>,
    source:      &'src str,
    positions:   Option<&'src [usize]>,
    byte_cursor: usize,
    char_cursor: usize,
    finished:    bool,
}

impl<'src> Lexer<'src> {
    /// Creates a lexer whose offsets are character indices into `source`.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self { inner: TokenKind::lexer(source),
               source,
               positions: None,
               byte_cursor: 0,
               char_cursor: 0,
               finished: false }
    }

    /// Creates a lexer for a fragment embedded in a larger source.
    ///
    /// `positions[i]` is the offset in the larger source of the fragment's
    /// character `i`. One more entry than the fragment has characters places
    /// the end of input.
    #[must_use]
    pub fn with_positions(source: &'src str, positions: &'src [usize]) -> Self {
        Self { positions: Some(positions),
               ..Self::new(source) }
    }

    fn char_offset(&mut self, byte: usize) -> usize {
        let advanced = self.source
                           .get(self.byte_cursor..byte)
                           .map_or(0, |skipped| skipped.chars().count());
        self.byte_cursor = byte;
        self.char_cursor += advanced;

        match self.positions {
            Some(positions) => positions.get(self.char_cursor)
                                        .or_else(|| positions.last())
                                        .copied()
                                        .unwrap_or(self.char_cursor),
            None => self.char_cursor,
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = ParseResult<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.inner.next() {
            Some(Ok(kind)) => {
                let offset = self.char_offset(self.inner.span().start);
                trace!("token {kind:?} at {offset}");
                Some(Ok(Token { kind, offset }))
            },
            Some(Err(failure)) => {
                self.finished = true;
                let offset = self.char_offset(self.inner.span().start);
                let error = match failure {
                    LexFailure::UnexpectedCharacter => {
                        let ch = self.inner.slice().chars().next().unwrap_or('\0');
                        ParseError::UnexpectedCharacter { ch, offset }
                    },
                    LexFailure::UnterminatedText => ParseError::UnterminatedText { offset },
                    LexFailure::UnterminatedBaseLiteral => {
                        ParseError::UnterminatedBaseLiteral { offset }
                    },
                };
                Some(Err(error))
            },
            None => {
                self.finished = true;
                let offset = self.char_offset(self.source.len());
                Some(Ok(Token { kind: TokenKind::Eof,
                                offset }))
            },
        }
    }
}

/// Scans a whole source string, stopping at the first lexical error.
///
/// # Example
/// ```
/// use mbase::interpreter::lexer::{TokenKind, tokenize};
///
/// let tokens = tokenize("x = b16@ff").unwrap();
/// let kinds: Vec<_> = tokens.into_iter().map(|t| t.kind).collect();
///
/// assert_eq!(kinds,
///            vec![TokenKind::Identifier("x".to_string()),
///                 TokenKind::Equals,
///                 TokenKind::BaseLiteral((16, "ff".to_string())),
///                 TokenKind::Eof]);
/// ```
pub fn tokenize(source: &str) -> ParseResult<Vec<Token>> {
    Lexer::new(source).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn operators_prefer_longest_match() {
        assert_eq!(kinds("=== !== == != <= >= && || = < > !"),
                   vec![TokenKind::StrictEqual,
                        TokenKind::StrictNotEqual,
                        TokenKind::EqualEqual,
                        TokenKind::BangEqual,
                        TokenKind::LessEqual,
                        TokenKind::GreaterEqual,
                        TokenKind::AndAnd,
                        TokenKind::OrOr,
                        TokenKind::Equals,
                        TokenKind::Less,
                        TokenKind::Greater,
                        TokenKind::Bang,
                        TokenKind::Eof]);
    }

    #[test]
    fn keywords_and_identifiers() {
        assert_eq!(kinds("fn ret if else while loop break continue fnord"),
                   vec![TokenKind::Fn,
                        TokenKind::Ret,
                        TokenKind::If,
                        TokenKind::Else,
                        TokenKind::While,
                        TokenKind::Loop,
                        TokenKind::Break,
                        TokenKind::Continue,
                        TokenKind::Identifier("fnord".to_string()),
                        TokenKind::Eof]);
    }

    #[test]
    fn base_literal_payload_stops_at_first_foreign_character() {
        assert_eq!(kinds("b2@10121"),
                   vec![TokenKind::BaseLiteral((2, "101".to_string())),
                        TokenKind::Number("21".to_string()),
                        TokenKind::Eof]);
        assert_eq!(kinds("b16@FFg"),
                   vec![TokenKind::BaseLiteral((16, "FF".to_string())),
                        TokenKind::Identifier("g".to_string()),
                        TokenKind::Eof]);
    }

    #[test]
    fn parenthesized_payload_is_verbatim() {
        assert_eq!(kinds("b10@(12z) + 1"),
                   vec![TokenKind::BaseLiteral((10, "12z".to_string())),
                        TokenKind::Plus,
                        TokenKind::Number("1".to_string()),
                        TokenKind::Eof]);
        assert_eq!(tokenize("x = b8@(17"),
                   Err(ParseError::UnterminatedBaseLiteral { offset: 4 }));
    }

    #[test]
    fn base_without_at_is_an_identifier() {
        assert_eq!(kinds("b16"), vec![TokenKind::Identifier("b16".to_string()), TokenKind::Eof]);
    }

    #[test]
    fn text_escapes_are_decoded() {
        let text = |source: &str| match kinds(source).remove(0) {
            TokenKind::Text(literal) => literal,
            other => panic!("expected a text, got {other}"),
        };

        assert_eq!(text(r#""a\nb\t\"q\" \\ \x""#).text, "a\nb\t\"q\" \\ x");
        assert_eq!(text(r#""\{x\} {y}""#).text, r"\{x\} {y}");
        assert_eq!(tokenize("\"open"), Err(ParseError::UnterminatedText { offset: 0 }));
    }

    #[test]
    fn comments_and_newlines() {
        assert_eq!(kinds("x # note\n\ty"),
                   vec![TokenKind::Identifier("x".to_string()),
                        TokenKind::NewLine,
                        TokenKind::Identifier("y".to_string()),
                        TokenKind::Eof]);
    }

    #[test]
    fn offsets_count_characters() {
        let tokens = tokenize("\"héllo\" + x").unwrap();
        let offsets: Vec<_> = tokens.iter().map(|t| t.offset).collect();
        assert_eq!(offsets, vec![0, 8, 10, 11]);
    }

    #[test]
    fn eof_offset_is_source_length() {
        let tokens = tokenize("ab\n").unwrap();
        assert_eq!(tokens.last().map(|t| t.offset), Some(3));
    }

    #[test]
    fn unexpected_character_stops_scanning() {
        assert_eq!(tokenize("x = 1\ny = $"),
                   Err(ParseError::UnexpectedCharacter { ch: '$', offset: 10 }));
    }

    #[test]
    fn escapes_remember_their_source_position() {
        let literal = match kinds(r#""\n{x}""#).remove(0) {
            TokenKind::Text(literal) => literal,
            other => panic!("expected a text, got {other}"),
        };
        assert_eq!(literal.text, "\n{x}");
        assert_eq!(literal.positions, vec![1, 3, 4, 5]);
    }

    #[test]
    fn positions_relocate_fragments() {
        let positions = [7, 8, 9, 12, 13, 14];
        let tokens: Vec<_> = Lexer::with_positions("a + b", &positions).collect::<ParseResult<_>>().unwrap();
        assert_eq!(tokens.iter().map(|t| t.offset).collect::<Vec<_>>(), vec![7, 9, 13, 14]);
    }
}
