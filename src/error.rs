// Error taxonomy shared by every component

use thiserror::Error;

/// Errors surfaced by jita. Everything propagates to the top level and
/// terminates the process with exit code 1; nothing is retried.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or invalid required configuration field.
    #[error("configuration: {0}")]
    Config(String),

    /// The marker file or its directory could not be read or written.
    #[error("marker storage: {message}")]
    Storage {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// A start was requested while an issue is already being tracked.
    /// Only one issue may be tracked at a time, system-wide.
    #[error("issue {key} is already started")]
    AlreadyActive { key: String },

    /// A stop was requested with no active issue.
    #[error("no issue has been started")]
    NotActive,

    /// A lifecycle hook could not be spawned or exited non-zero.
    #[error("hook '{hook}' failed: {message}")]
    Hook { hook: String, message: String },

    /// Any failure reported by the remote tracker, treated opaquely.
    #[error("tracker: {0}")]
    Tracker(String),

    /// Malformed command-line or interactive input.
    #[error("{0}")]
    Input(String),
}

impl Error {
    pub fn storage(message: impl Into<String>, source: std::io::Error) -> Self {
        Error::Storage {
            message: message.into(),
            source: Some(source),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Tracker(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
