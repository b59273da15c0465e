//! Reader errors

/// Errors raised by the virtual screen reader.
///
/// Everything else (invalid references, unmatched jumps, excluded
/// containers) is absorbed as a no-op.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReaderError {
    #[error("no container configured, or it is not an element or document node")]
    MissingContainer,

    #[error("reader has not been started")]
    NotStarted,
}

pub type Result<T> = std::result::Result<T, ReaderError>;
