use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::account::errors::EmailError;
use crate::domain::account::errors::PasswordDigestError;
use crate::domain::account::errors::UserIdError;

/// User aggregate entity.
///
/// Represents a registered account. The password field always holds a stored
/// digest, never plaintext; the forgot-password token is valid only while
/// non-null and is consumed atomically with the reset it authorizes.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub email: EmailAddress,
    pub password: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub membership_number: Option<String>,
    pub forgot_password_token: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates format using an RFC 5322 compliant parser and normalizes to
/// lowercase. Uniqueness of the normalized form is enforced at the storage
/// layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated, lowercase-normalized email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        let email = email.trim().to_lowercase();
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    /// Get email as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Client-supplied pre-hashed password.
///
/// Clients hash passwords before transmission; the wire form is a 64
/// character hex string. That boundary invariant is validated here so the
/// core can assume it when applying the second storage digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    const LENGTH: usize = 64;

    /// Validate a pre-hashed password received at the request boundary.
    ///
    /// # Errors
    /// * `InvalidLength` - Not exactly 64 characters
    /// * `NotHex` - Contains non-hexadecimal characters
    pub fn new(value: String) -> Result<Self, PasswordDigestError> {
        if value.len() != Self::LENGTH {
            return Err(PasswordDigestError::InvalidLength {
                expected: Self::LENGTH,
                actual: value.len(),
            });
        }
        if !value.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(PasswordDigestError::NotHex);
        }
        Ok(Self(value))
    }

    /// Get the digest as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Command to register a new user with domain types
#[derive(Debug)]
pub struct RegisterUserCommand {
    pub email: EmailAddress,
    pub password: PasswordDigest,
    pub first_name: String,
    pub last_name: Option<String>,
    pub membership_number: Option<String>,
}

/// Command to update an existing user's profile.
///
/// All fields are optional to support partial updates; only provided fields
/// are written. Password changes go through the dedicated password flows.
#[derive(Debug, Default)]
pub struct UpdateUserCommand {
    pub email: Option<EmailAddress>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub membership_number: Option<String>,
}
