//! Crate-level error covering every stage of the pipeline.

use thiserror::Error;

use crate::lexer::LexError;
use crate::parser::ParseError;
use crate::transpiler::TranspileError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("Lexer error: {0}")]
    Lex(#[from] LexError),
    #[error("Parser error: {0}")]
    Parse(#[from] ParseError),
    #[error("Code generator error: {0}")]
    Transpile(#[from] TranspileError),
}

pub type CompileResult<T> = Result<T, CompileError>;
