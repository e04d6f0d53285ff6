//! Error types for terrastream

use thiserror::Error;

/// Main error type for the crate
///
/// The tracker itself never fails; these variants cover the configuration
/// boundary where settings are read from disk or supplied by a caller.
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}
