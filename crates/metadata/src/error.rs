use std::result;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("unknown OS/2 key '{0}' (prefix custom keys with 'x_')")]
    UnknownKey(String),

    #[error("invalid value for '{key}': expected {expected}")]
    InvalidValue { key: String, expected: &'static str },

    #[error("invalid version '{0}'; expected MAJOR.MINOR, optionally prefixed with 'v'")]
    InvalidVersion(String),
}

pub type Result<T> = result::Result<T, MetadataError>;
