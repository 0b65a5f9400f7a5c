use thiserror::Error;

/// Error type for service token verification.
///
/// Verification is single-shot: a failure is never retried and always leaves
/// the request anonymous.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceTokenError {
    #[error("No token supplied in the authorization header")]
    NoToken,

    #[error("Unsupported authentication scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Service token is not valid")]
    InvalidToken,

    #[error("Service token has expired")]
    Expired,
}
