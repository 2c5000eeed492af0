use thiserror::Error;

/// Core error type with minimal dependencies
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Unknown timezone: {0}")]
    UnknownZone(String),

    #[error("Invalid option: {0}")]
    InvalidOption(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Timestamp out of representable range: {0}")]
    OutOfRangeTimestamp(i64),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
