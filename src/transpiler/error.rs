use thiserror::Error;

/// Semantic failures raised while emitting code.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TranspileError {
    #[error("Identifier \"{name}\" is used before it is declared")]
    UndeclaredIdentifier { name: String },
    #[error("Function \"{name}\" is called before it is defined")]
    UndeclaredFunction { name: String },
    #[error("Identifier \"{name}\" is a reserved word in Python")]
    ReservedName { name: String },
}

pub type TranspileResult<T> = Result<T, TranspileError>;
