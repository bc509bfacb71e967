use thiserror::Error;

/// Errors produced while loading or parsing a register machine program.
///
/// Execution itself cannot fail, so every variant here belongs to the
/// parsing or input stage.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MachineError {
    /// A line did not split into the expected number of tokens.
    #[error("operand count mismatch: expected {expected} tokens, got {actual}")]
    ArityMismatch { expected: usize, actual: usize },
    /// Mutation verb other than `inc` or `dec`.
    #[error("unknown mutation '{verb}' (expected 'inc' or 'dec')")]
    InvalidMutation { verb: String },
    /// The condition did not start with the `if` keyword.
    #[error("expected 'if', got '{token}'")]
    ExpectedCondition { token: String },
    /// Comparison symbol outside `<`, `<=`, `==`, `!=`, `>=`, `>`.
    #[error("unknown comparison operator '{symbol}'")]
    InvalidOperator { symbol: String },
    /// Amount or comparison value is not a signed integer.
    #[error("invalid integer '{token}'")]
    InvalidInteger { token: String },
    /// Parse failure with source location context.
    #[error("line {line}: {message}")]
    ParseError {
        line: usize,
        offset: usize,
        message: String,
    },
    /// The program source could not be read.
    #[error("io error reading {path}: {reason}")]
    IoError { path: String, reason: String },
}
