use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building or displaying a graph widget
#[derive(Error, Debug)]
pub enum Error {
    #[error("`{parameter}` {message}")]
    InvalidArgument {
        parameter: &'static str,
        message: String,
    },

    #[error("Bundled asset `{asset}` not found at {path}")]
    ResourceNotFound { asset: &'static str, path: PathBuf },

    #[error("Failed to serialize graph data: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTML shell has no `{token}` placeholder; the bundle does not match this injection strategy")]
    Placeholder { token: &'static str },

    #[error("Failed to read config file {0}: {1}")]
    ConfigRead(PathBuf, std::io::Error),

    #[error("Failed to parse config file {0}: {1}")]
    ConfigParse(PathBuf, toml::de::Error),

    #[error("Failed to write widget output: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub(crate) fn invalid(parameter: &'static str, message: impl Into<String>) -> Self {
        Error::InvalidArgument {
            parameter,
            message: message.into(),
        }
    }

    /// Name of the offending parameter for [`Error::InvalidArgument`].
    pub fn parameter(&self) -> Option<&'static str> {
        match self {
            Error::InvalidArgument { parameter, .. } => Some(parameter),
            _ => None,
        }
    }
}
