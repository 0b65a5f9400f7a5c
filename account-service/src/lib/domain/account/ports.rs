use async_trait::async_trait;

use crate::domain::account::errors::AccountError;
use crate::domain::account::errors::MailerError;
use crate::domain::account::models::UpdateUserCommand;
use crate::domain::account::models::User;
use crate::domain::account::models::UserId;

/// Persistence operations for the user aggregate.
///
/// Password and token mutations are expressed as single-statement predicate
/// updates (the predicate travels with the write) so concurrent requests on
/// the same row cannot produce lost updates. A return of `0` affected rows
/// means the predicate did not match; classification into a domain error is
/// the caller's job.
#[async_trait]
pub trait AccountRepository: Send + Sync + 'static {
    /// Persist a new user.
    ///
    /// # Errors
    /// * `EmailAlreadyRegistered` - Unique constraint violation on email
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: User) -> Result<User, AccountError>;

    /// Retrieve a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AccountError>;

    /// Retrieve a user by lowercase-normalized email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AccountError>;

    /// Retrieve all users.
    async fn list_all(&self) -> Result<Vec<User>, AccountError>;

    /// Apply a partial profile update and return the updated user.
    ///
    /// # Returns
    /// `None` when no row matched the id
    ///
    /// # Errors
    /// * `EmailAlreadyRegistered` - New email already taken
    /// * `DatabaseError` - Database operation failed
    async fn update_profile(
        &self,
        id: &UserId,
        command: &UpdateUserCommand,
    ) -> Result<Option<User>, AccountError>;

    /// Store a forgot-password token on the user with this email, replacing
    /// any prior unredeemed token.
    ///
    /// # Returns
    /// Number of rows updated (`0` when the email is unknown)
    async fn store_forgot_token(&self, email: &str, token: &str) -> Result<u64, AccountError>;

    /// Redeem a forgot-password token: set the new password digest and clear
    /// the token in one statement, targeting rows where the token matches.
    ///
    /// Two concurrent redemptions of the same token see exactly one success;
    /// the second matches zero rows.
    ///
    /// # Returns
    /// Number of rows updated (`0` when the token does not exist)
    async fn redeem_forgot_token(
        &self,
        token: &str,
        new_password_digest: &str,
    ) -> Result<u64, AccountError>;

    /// Set a new password digest where `(id, current digest)` both match.
    ///
    /// # Returns
    /// Number of rows updated (`0` on unknown id or wrong current password)
    async fn update_password(
        &self,
        id: &UserId,
        current_digest: &str,
        new_digest: &str,
    ) -> Result<u64, AccountError>;
}

/// Outbound email dispatch.
///
/// Constructed once at startup from configuration and injected into the
/// account service; there is no process-global transport registry.
#[async_trait]
pub trait Mailer: Send + Sync + 'static {
    /// Send the password-reset email carrying the opaque token.
    ///
    /// # Errors
    /// * `BuildFailed` - Message construction failed
    /// * `SendFailed` - Transport error; the caller does not retry
    async fn send_password_reset(&self, to: &str, token: &str) -> Result<(), MailerError>;
}
