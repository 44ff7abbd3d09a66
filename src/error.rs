//! Error types for ownership resolution.

use thiserror::Error;

/// Result type alias for distribution operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the distribution resolver.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The fleet size or the expected format cannot be used.
    ///
    /// Returned by reconfiguration; the previously installed
    /// configuration remains in effect.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The object descriptor does not match the expected format.
    #[error("descriptor {descriptor:?} does not match format {format:?}")]
    UnparsableDescriptor { descriptor: String, format: String },

    /// A task or partition identifier is out of contract (negative).
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Build an [`Error::UnparsableDescriptor`] from borrowed parts.
    pub fn unparsable(descriptor: &str, format: &str) -> Self {
        Error::UnparsableDescriptor {
            descriptor: descriptor.to_string(),
            format: format.to_string(),
        }
    }

    /// Whether the caller should skip the object and carry on.
    ///
    /// Only descriptor parse failures are local to a single object; the
    /// other kinds indicate a caller or configuration defect.
    pub fn is_skippable(&self) -> bool {
        matches!(self, Error::UnparsableDescriptor { .. })
    }
}
