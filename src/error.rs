//! use sslutil::error::SslUtilError;

use thiserror::Error;

/// Represents errors that can occur while building, signing or persisting certificates.
///
/// Every failure is terminal for the current invocation; callers print it and stop.
#[derive(Debug, Error)]
pub enum SslUtilError {
    /// Error during data encoding.
    #[error("Failed to encode data: {0}")]
    EncodingError(String),

    /// Error during data decoding (PEM blocks, DER structures).
    #[error("Failed to decode data: {0}")]
    DecodingError(String),

    /// Error due to invalid input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The JSON subject description could not be parsed.
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Error during key generation.
    #[error("Key generation error: {0}")]
    KeyGenerationError(String),

    /// Error related to certificate operations.
    #[error("Certificate error: {0}")]
    CertificateError(String),

    /// Error from RSA operations.
    #[error("RSA error: {0}")]
    RsaError(String),

    /// Error from RSA PKCS1 operations.
    #[error("RSA PKCS1 error: {0}")]
    RsaPkcs1Error(String),

    /// Error from PKCS8 operations.
    #[error("PKCS8 error: {0}")]
    RsaPkcs8Error(String),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Coarse classification of an [`SslUtilError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Unreadable or malformed configuration, certificate or key input.
    Input,
    /// Key generation or certificate signing failed.
    Crypto,
    /// Output directory or file could not be written.
    Io,
}

impl SslUtilError {
    /// Returns the category this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            SslUtilError::DecodingError(_)
            | SslUtilError::InvalidInput(_)
            | SslUtilError::ConfigError(_) => ErrorCategory::Input,
            SslUtilError::EncodingError(_)
            | SslUtilError::KeyGenerationError(_)
            | SslUtilError::CertificateError(_)
            | SslUtilError::RsaError(_)
            | SslUtilError::RsaPkcs1Error(_)
            | SslUtilError::RsaPkcs8Error(_) => ErrorCategory::Crypto,
            SslUtilError::IoError(_) => ErrorCategory::Io,
        }
    }
}

pub type Result<T> = std::result::Result<T, SslUtilError>;

impl From<der::Error> for SslUtilError {
    /// Converts a `der::Error` into a `SslUtilError`.
    fn from(err: der::Error) -> Self {
        SslUtilError::DecodingError(err.to_string())
    }
}

impl From<rsa::Error> for SslUtilError {
    fn from(err: rsa::Error) -> Self {
        SslUtilError::RsaError(err.to_string())
    }
}

impl From<rsa::pkcs1::Error> for SslUtilError {
    fn from(err: rsa::pkcs1::Error) -> Self {
        SslUtilError::RsaPkcs1Error(err.to_string())
    }
}

impl From<pkcs8::Error> for SslUtilError {
    fn from(err: pkcs8::Error) -> Self {
        SslUtilError::RsaPkcs8Error(err.to_string())
    }
}

impl From<pkcs8::spki::Error> for SslUtilError {
    fn from(err: pkcs8::spki::Error) -> Self {
        SslUtilError::DecodingError(err.to_string())
    }
}

impl From<pem::PemError> for SslUtilError {
    fn from(err: pem::PemError) -> Self {
        SslUtilError::DecodingError(err.to_string())
    }
}

impl From<serde_json::Error> for SslUtilError {
    fn from(err: serde_json::Error) -> Self {
        SslUtilError::ConfigError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SslUtilError::InvalidInput("parent key given without certificate".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid input: parent key given without certificate"
        );
    }

    #[test]
    fn test_error_categories() {
        let io = SslUtilError::from(std::io::Error::other("disk full"));
        assert_eq!(io.category(), ErrorCategory::Io);
        assert_eq!(
            SslUtilError::ConfigError("bad json".into()).category(),
            ErrorCategory::Input
        );
        assert_eq!(
            SslUtilError::CertificateError("bad name".into()).category(),
            ErrorCategory::Crypto
        );
    }
}
