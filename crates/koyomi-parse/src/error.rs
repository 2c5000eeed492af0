use thiserror::Error;

/// Expression engine errors. The offending input is preserved for
/// diagnostics; nothing is retried or downgraded.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Unrecognized date expression: {0:?}")]
    UnrecognizedExpression(String),

    #[error("Invalid calendar date: {0}")]
    InvalidDate(String),

    #[error("Date arithmetic out of range: {0}")]
    OutOfRange(String),
}

pub type ParseResult<T> = std::result::Result<T, ParseError>;
