//! Error types for the registry.

/// Registry errors.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// A record for this (name, form factor) pair already exists.
    #[error("'{name}' is already registered as a {form}")]
    Duplicate { name: String, form: String },

    /// The record to be written is unusable.
    #[error("invalid record: {message}")]
    InvalidRecord { message: String },

    /// Underlying database failure.
    #[error("storage error: {message}")]
    Storage { message: String },

    /// Reference-image I/O failure.
    #[error("image error at {path}: {message}")]
    ImageIo { path: String, message: String },
}

impl From<rusqlite::Error> for RegistryError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Storage {
            message: err.to_string(),
        }
    }
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
