//! Error types for phrasemine-core.

use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading a corpus.
///
/// Per-file read failures during tokenization are not errors: such files are
/// skipped and contribute an empty document. Only failures that make the
/// whole load impossible surface here.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The input path does not exist.
    #[error("input path does not exist: {path}")]
    InputNotFound {
        /// The path that was requested.
        path: String,
    },

    /// An I/O failure on the CSV input or the on-disk corpus file.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The tokenization worker pool could not be constructed.
    #[error("failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result type alias using [`LoadError`].
pub type LoadResult<T> = Result<T, LoadError>;
