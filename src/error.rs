//! Unified error types for daily-todo.
//!
//! Most failures end the command: storage errors, transport errors from the
//! text generator and bad arguments all propagate to `main`, which prints them
//! and exits non-zero. The few recoverable paths (malformed intent responses,
//! unreadable optional config files) go through [`FailOpen`] and log a warning.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for daily-todo operations.
#[derive(Error, Debug)]
pub enum TodoError {
    /// I/O errors from day-file or config file operations.
    #[error("storage error at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Configuration loading or validation errors, including a missing API key.
    #[error("config error: {message}")]
    Config { message: String },

    /// Failures talking to the text generator (transport, HTTP status, body).
    #[error("generator error: {message}")]
    Generator { message: String },

    /// A command-line argument that parsed but makes no sense.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
}

/// A specialized Result type for daily-todo operations.
pub type Result<T> = std::result::Result<T, TodoError>;

impl TodoError {
    /// Create a storage error from an I/O error.
    pub fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a generator error.
    pub fn generator(message: impl Into<String>) -> Self {
        Self::Generator {
            message: message.into(),
        }
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

/// Trait for fail-open error handling.
///
/// Log the error and continue with a safe default instead of aborting.
pub trait FailOpen<T> {
    /// Handle an error by logging a warning and returning the default value.
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default;
}

impl<T> FailOpen<T> for Result<T> {
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default,
    {
        match self {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("{}: {} (fail-open: using default)", context, err);
                T::default()
            }
        }
    }
}

/// Exit codes for the daily-todo CLI.
pub mod exit_codes {
    /// The command completed.
    pub const SUCCESS: i32 = 0;

    /// The command failed (storage, generator, config or argument error).
    pub const ERROR: i32 = 1;

    /// The process panicked.
    pub const CRASH: i32 = 3;
}
