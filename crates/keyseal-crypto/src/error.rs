//! Crypto error types.

/// Coarse failure category, for callers that branch on the kind of error
/// rather than its message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    CorruptedInput,
    DecryptionFailure,
    CurveError,
    Config,
    Io,
}

/// Errors from cryptographic operations.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Corrupted or invalid envelope: {0}")]
    CorruptedInput(String),

    #[error("Decryption failed: {0}")]
    DecryptionFailure(String),

    #[error("Curve error: {0}")]
    CurveError(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl CryptoError {
    /// The category this error belongs to.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::CorruptedInput(_) => ErrorKind::CorruptedInput,
            Self::DecryptionFailure(_) => ErrorKind::DecryptionFailure,
            Self::CurveError(_) => ErrorKind::CurveError,
            Self::KeyDerivationFailed(_) | Self::Config(_) | Self::SerializationError(_) => {
                ErrorKind::Config
            }
            Self::IoError(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn empty_argument(name: &str) -> Self {
        Self::InvalidArgument(format!("{name} must not be empty"))
    }
}
