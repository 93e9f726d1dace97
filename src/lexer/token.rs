use std::fmt;

/// Location of a lexeme in the source text.
///
/// `start`/`end` are byte offsets; `line` and `column` are 0-based and only
/// converted to 1-based numbers when an error is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Identifier,
    Number,
    String,
    Boolean,

    // Covers both arithmetic (+ - * /) and comparison (== != < > ...) operators;
    // the literal text tells them apart.
    BinaryOperator,
    Assign, // =

    // Delimiters
    LParen, // (
    RParen, // )
    LBrace, // {
    RBrace, // }
    EndOfStatement, // ;
    Comma,          // ,

    // Keywords
    Function,
    Print,
    Variable,
    While,
    If,
    Return,

    EndOfInput,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Raw lexeme. String literals have their quotes stripped; the end-of-input
    /// marker has empty text.
    pub text: &'a str,
    pub span: Span,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, text: &'a str, span: Span) -> Self {
        Self { kind, text, span }
    }

    /// True for a `BinaryOperator` token whose text is exactly one of `operators`.
    pub fn is_operator(&self, operators: &[&str]) -> bool {
        self.kind == TokenKind::BinaryOperator && operators.contains(&self.text)
    }
}

/// Human-friendly description of a lexeme used in diagnostics.
pub fn describe_lexeme(kind: &TokenKind, text: &str) -> String {
    match kind {
        TokenKind::EndOfInput => "end of input".to_string(),
        TokenKind::String => format!("'{text}'"),
        _ => format!("\"{text}\""),
    }
}
