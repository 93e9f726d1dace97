use thiserror::Error;

use crate::lexer::token::{TokenKind, describe_lexeme};

/// Syntax failures. `found` holds the raw text of the offending token;
/// positions are 1-based.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error(
        "Expected {expected}, but found {} at line {line}, column {column}",
        describe_lexeme(.found_kind, .found)
    )]
    UnexpectedToken {
        expected: TokenKind,
        found_kind: TokenKind,
        found: String,
        line: usize,
        column: usize,
    },
    #[error(
        "Expected a statement, but found {} at line {line}, column {column}",
        describe_lexeme(.found_kind, .found)
    )]
    ExpectedStatement {
        found_kind: TokenKind,
        found: String,
        line: usize,
        column: usize,
    },
    #[error(
        "Expected a number, identifier, literal or '(', but found {} at line {line}, column {column}",
        describe_lexeme(.found_kind, .found)
    )]
    ExpectedFactor {
        found_kind: TokenKind,
        found: String,
        line: usize,
        column: usize,
    },
    #[error("Nesting deeper than {limit} levels at line {line}, column {column}")]
    NestingTooDeep {
        limit: usize,
        line: usize,
        column: usize,
    },
}

pub type ParseResult<T> = Result<T, ParseError>;
