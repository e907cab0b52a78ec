//! Error types for the autopilot

use std::io;
use std::path::PathBuf;

/// Result type used across the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while driving the device or preparing a turn
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The device tool could not be started at all
    #[error("failed to run `{program}`: {source}")]
    Command {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The device tool ran but reported failure
    #[error("`{command}` exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    /// A screenshot could not be decoded
    #[error("failed to decode screenshot: {0}")]
    Decode(#[from] image::ImageError),

    /// The piece template could not be loaded
    #[error("piece template {path:?} could not be loaded: {source}")]
    TemplateMissing {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Invalid TOML configuration
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] io::Error),

    /// Replay directory holds no screenshots
    #[error("no screenshots found in {0:?}")]
    NoFrames(PathBuf),
}

impl Error {
    /// Whether this error means no screenshot could be produced this turn
    pub fn is_acquisition(&self) -> bool {
        matches!(
            self,
            Error::Command { .. } | Error::CommandFailed { .. } | Error::Decode(_) | Error::Io(_)
        )
    }
}
