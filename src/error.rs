use thiserror::Error;

pub type Result<T> = std::result::Result<T, CriptesError>;

#[derive(Debug, Error)]
pub enum CriptesError {
    /// Blank or out-of-bound input, rejected before any crypto call
    #[error("{0}")]
    Validation(String),

    /// Provider-level failure (bad key, bad padding, malformed ciphertext)
    #[error("{0}")]
    Crypto(String),

    #[error("Image too small: message needs {required_bits} bits, carrier holds {available_bits} (max ~{} characters)", max_chars(.available_bits))]
    Capacity {
        required_bits: usize,
        available_bits: usize,
    },

    #[error("No hidden message found in this image. Make sure it was produced by criptes.")]
    NotFound,

    #[error("No RSA key pair found. Run 'criptes rsa keygen' first.")]
    KeysNotFound,

    #[error("An RSA key pair already exists. Use --force to overwrite it.")]
    KeysAlreadyExist,

    #[error("Operation cancelled by user")]
    Cancelled,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Rough character budget for a carrier, ignoring the terminator bytes
fn max_chars(available_bits: &usize) -> usize {
    (available_bits / 8).saturating_sub(crate::stego::TERMINATOR.len())
}

impl CriptesError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub(crate) fn crypto(context: &str, cause: impl std::fmt::Display) -> Self {
        Self::Crypto(format!("{context}: {cause}"))
    }
}
