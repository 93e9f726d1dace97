//! Translates mylang scripts into Python source.
//!
//! The stages run strictly in order, each consuming the previous stage's
//! output in full:
//! - `lexer` turns source text into tokens ending in `EndOfInput`.
//! - `parser` builds the syntax tree rooted at a `Compound`.
//! - `transpiler` walks the tree, checks declarations and emits Python.
//!
//! `pipeline` wires the stages to a source provider and output sinks from `io`.

pub mod error;
pub mod io;
pub mod lexer;
pub mod parser;
pub mod pipeline;
pub mod transpiler;

pub use error::{CompileError, CompileResult};
pub use pipeline::Pipeline;
pub use transpiler::TranspileOptions;

/// Translate one source unit with default options.
pub fn translate(source: &str) -> CompileResult<String> {
    Pipeline::default().translate(source)
}
