use thiserror::Error;

use crate::domain::roles::errors::RegistryError;
use crate::domain::roles::errors::RoleStoreError;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for pre-hashed password validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordDigestError {
    #[error("Password must be {expected} hex characters, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Password must be a hex string")]
    NotHex,
}

/// Error for email dispatch operations
#[derive(Debug, Clone, Error)]
pub enum MailerError {
    #[error("Failed to build email message: {0}")]
    BuildFailed(String),

    #[error("Failed to send email: {0}")]
    SendFailed(String),
}

/// Top-level error for all account operations.
///
/// Every variant carries a stable machine-readable code at the HTTP
/// boundary. Credential-check and password paths deliberately collapse
/// multiple causes into one variant to avoid leaking which factor failed.
#[derive(Debug, Clone, Error)]
pub enum AccountError {
    // Value object validation errors (converted via #[from])
    #[error("Invalid user ID: {0}")]
    InvalidUserId(#[from] UserIdError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Invalid password: {0}")]
    InvalidPassword(#[from] PasswordDigestError),

    // Domain-level errors
    #[error("This email is already registered")]
    EmailAlreadyRegistered,

    #[error("The email or the password is incorrect")]
    WrongEmailPassword,

    #[error("The user does not exist")]
    UserNotExist,

    #[error("The service '{0}' does not exist")]
    ServiceNotExist(String),

    #[error("One of the requested roles is not valid")]
    RoleNotValid,

    #[error("This email is not associated with any user")]
    EmailNotExist,

    #[error("The token does not exist")]
    TokenNotExist,

    // Infrastructure errors
    #[error("Email dispatch failed: {0}")]
    Mailer(#[from] MailerError),

    #[error("Role store error: {0}")]
    RoleStore(#[from] RoleStoreError),

    #[error("Service registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AccountError {
    fn from(err: anyhow::Error) -> Self {
        AccountError::Unknown(err.to_string())
    }
}
