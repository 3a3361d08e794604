use thiserror::Error;

/// Errors raised while building or querying a corpus index.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// The corpus has no strings, so there is nothing to index.
    #[error("cannot build an index over an empty corpus")]
    EmptyCorpus,

    /// The corpus has more strings than there are sentinel symbols available.
    #[error("corpus of {strings} strings exceeds the sentinel capacity of {max}")]
    Capacity { strings: usize, max: usize },

    /// A corpus index outside `[0, len)`.
    #[error("index {index} out of range for corpus of {len} strings")]
    OutOfRange { index: usize, len: usize },

    /// Invalid or missing similarity thresholds.
    #[error("invalid similarity thresholds: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
