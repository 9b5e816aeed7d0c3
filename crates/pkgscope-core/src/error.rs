use thiserror::Error;

/// All the ways things can go wrong in PkgScope
///
/// We use thiserror here because it generates the boilerplate for us.
/// Life's too short to manually implement Display and Error traits.
///
/// Note that individual data-source failures never surface through this
/// enum: the capability adapters absorb them into absent fields so one
/// flaky lookup cannot sink a whole derivation. What's left here are
/// caller-facing failures.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Unknown error occurred: {0}")]
    Unknown(String),
}
