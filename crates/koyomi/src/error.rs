use thiserror::Error;

use koyomi_core::error::CoreError;
use koyomi_parse::ParseError;

/// Date creation errors. Failures from the engine and the offset database
/// pass through unchanged; nothing is retried or recovered locally.
#[derive(Error, Debug)]
pub enum DateError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}

pub type DateResult<T> = std::result::Result<T, DateError>;
