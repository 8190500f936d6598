use thiserror::Error;

/// Errors that can occur when navigating a timing tree.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A read-only lookup asked for a child tag that does not exist under the node.
    ///
    /// Use [`Timing::child_or_insert()`][crate::Timing::child_or_insert] if the child
    /// should be created on demand instead.
    #[error("no child timing tagged '{tag}'")]
    TagNotFound {
        /// The tag that was looked up.
        tag: String,
    },
}

/// A specialized `Result` type for timing tree operations, returning the crate's
/// [`Error`] type as the error value.
pub type Result<T> = std::result::Result<T, Error>;
