//! Lexical analysis: turns source text into a flat token sequence that always
//! ends in exactly one `EndOfInput` token.

use std::{iter::Peekable, str::CharIndices};

pub mod error;
pub mod token;

pub use error::{LexError, LexResult};
pub use token::{Span, Token, TokenKind};

const OPERATOR_CHARS: &[char] = &['!', '=', '+', '-', '<', '>', '*', '/', ';', ','];

pub struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
            line: 0,
            column: 0,
        }
    }

    /// Returns the next token. Once the input is exhausted every call yields
    /// `EndOfInput` at the final position.
    pub fn next_token(&mut self) -> LexResult<Token<'a>> {
        loop {
            let Some(&(start, ch)) = self.chars.peek() else {
                return Ok(self.end_of_input());
            };
            let line = self.line;
            let column = self.column;

            match ch {
                ' ' => {
                    self.advance_char();
                }
                '\r' if self.peek_second() == Some('\n') => {
                    self.chars.next();
                    self.chars.next();
                    self.line += 1;
                    self.column = 0;
                }
                c if c.is_alphabetic() => return Ok(self.read_word(start, line, column)),
                c if c.is_ascii_digit() => return Ok(self.read_number(start, line, column)),
                c if OPERATOR_CHARS.contains(&c) => {
                    return Ok(self.read_operator(start, line, column));
                }
                '(' => return Ok(self.read_single(TokenKind::LParen, start, line, column)),
                ')' => return Ok(self.read_single(TokenKind::RParen, start, line, column)),
                '{' => return Ok(self.read_single(TokenKind::LBrace, start, line, column)),
                '}' => return Ok(self.read_single(TokenKind::RBrace, start, line, column)),
                '\'' => return self.read_string(start, line, column),
                _ => {
                    return Err(LexError::UnexpectedCharacter {
                        character: ch,
                        line: line + 1,
                        column: column + 1,
                    });
                }
            }
        }
    }

    fn read_word(&mut self, start: usize, line: usize, column: usize) -> Token<'a> {
        self.advance_char(); // Consume first letter
        while let Some(&(_, c)) = self.chars.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.advance_char();
            } else {
                break;
            }
        }

        let end = self.current_index();
        let word = &self.input[start..end];
        let kind = match word {
            "function" => TokenKind::Function,
            "var" => TokenKind::Variable,
            "while" => TokenKind::While,
            "print" => TokenKind::Print,
            "if" => TokenKind::If,
            "return" => TokenKind::Return,
            "true" | "false" => TokenKind::Boolean,
            _ => TokenKind::Identifier,
        };
        Token::new(kind, word, self.span(start, end, line, column))
    }

    fn read_number(&mut self, start: usize, line: usize, column: usize) -> Token<'a> {
        let mut seen_point = false;
        while let Some(&(_, c)) = self.chars.peek() {
            if c.is_ascii_digit() {
                self.advance_char();
            } else if c == '.' && !seen_point {
                seen_point = true;
                self.advance_char();
            } else {
                break;
            }
        }

        let end = self.current_index();
        Token::new(
            TokenKind::Number,
            &self.input[start..end],
            self.span(start, end, line, column),
        )
    }

    fn read_operator(&mut self, start: usize, line: usize, column: usize) -> Token<'a> {
        let Some((_, first)) = self.advance_char() else {
            return self.end_of_input();
        };

        // Any operator character followed by `=` forms a two-character operator.
        if self.chars.peek().map(|&(_, c)| c) == Some('=') {
            self.advance_char();
            let end = self.current_index();
            return Token::new(
                TokenKind::BinaryOperator,
                &self.input[start..end],
                self.span(start, end, line, column),
            );
        }

        let kind = match first {
            '=' => TokenKind::Assign,
            ';' => TokenKind::EndOfStatement,
            ',' => TokenKind::Comma,
            _ => TokenKind::BinaryOperator,
        };
        let end = self.current_index();
        Token::new(kind, &self.input[start..end], self.span(start, end, line, column))
    }

    fn read_single(
        &mut self,
        kind: TokenKind,
        start: usize,
        line: usize,
        column: usize,
    ) -> Token<'a> {
        self.advance_char();
        let end = self.current_index();
        Token::new(kind, &self.input[start..end], self.span(start, end, line, column))
    }

    fn read_string(&mut self, start: usize, line: usize, column: usize) -> LexResult<Token<'a>> {
        self.advance_char(); // Consume opening quote
        let content_start = self.current_index();
        while let Some((idx, c)) = self.advance_char() {
            if c == '\r' && self.chars.peek().map(|&(_, next)| next) == Some('\n') {
                self.chars.next();
                self.line += 1;
                self.column = 0;
                continue;
            }
            if c == '\'' {
                let end = self.current_index();
                return Ok(Token::new(
                    TokenKind::String,
                    &self.input[content_start..idx],
                    self.span(start, end, line, column),
                ));
            }
        }
        Err(LexError::UnterminatedString {
            line: line + 1,
            column: column + 1,
        })
    }

    fn end_of_input(&self) -> Token<'a> {
        let end = self.input.len();
        Token::new(
            TokenKind::EndOfInput,
            "",
            self.span(end, end, self.line, self.column),
        )
    }

    fn span(&self, start: usize, end: usize, line: usize, column: usize) -> Span {
        Span {
            start,
            end,
            line,
            column,
        }
    }
}

impl<'a> Lexer<'a> {
    fn advance_char(&mut self) -> Option<(usize, char)> {
        let next = self.chars.next();
        if next.is_some() {
            self.column += 1;
        }
        next
    }

    fn peek_second(&self) -> Option<char> {
        let mut lookahead = self.chars.clone();
        lookahead.next();
        lookahead.peek().map(|&(_, c)| c)
    }

    fn current_index(&mut self) -> usize {
        self.chars
            .peek()
            .map(|(idx, _)| *idx)
            .unwrap_or(self.input.len())
    }
}

pub fn tokenize(input: &str) -> LexResult<Vec<Token<'_>>> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let is_end = token.kind == TokenKind::EndOfInput;
        tokens.push(token);
        if is_end {
            break;
        }
    }
    log::debug!("lexed {} tokens from {} bytes", tokens.len(), input.len());
    Ok(tokens)
}
