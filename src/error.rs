//! Error taxonomy for a staging run.
//!
//! Every variant is fatal for the run; "nothing to stage" is never an error.
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StageError {
    /// Two configured destination directories are equal or nested.
    #[error(
        "asset target of {first} ({first_path}) conflicts with asset target of {second} ({second_path})"
    )]
    ConfigurationConflict {
        first: String,
        first_path: String,
        second: String,
        second_path: String,
    },

    /// An explicitly configured entry is absent from the package.
    #[error("entry '{entry}' not found in package '{package}'")]
    FileNotFound { entry: String, package: String },

    /// The configured entry is absolute, escapes the package directory or
    /// names no file.
    #[error("entry '{entry}' of package '{package}' does not name a path inside the package")]
    InvalidEntry { entry: String, package: String },

    #[error("source {} does not exist", path.display())]
    SourceMissing { path: PathBuf },

    #[error("{action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The transfer engine was handed a strategy it cannot execute.
    #[error("unknown staging strategy '{0}'")]
    UnknownStrategy(String),

    #[error("invalid option '{option}': {reason}")]
    InvalidOption { option: String, reason: String },
}

impl StageError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_option(option: &str, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            option: option.to_string(),
            reason: reason.into(),
        }
    }
}
