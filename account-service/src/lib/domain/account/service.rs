use std::sync::Arc;

use auth::random_token;
use auth::Hasher;
use chrono::Utc;

use crate::domain::account::errors::AccountError;
use crate::domain::account::models::PasswordDigest;
use crate::domain::account::models::RegisterUserCommand;
use crate::domain::account::models::UpdateUserCommand;
use crate::domain::account::models::User;
use crate::domain::account::models::UserId;
use crate::domain::account::ports::AccountRepository;
use crate::domain::account::ports::Mailer;
use crate::domain::roles::models::RoleMap;
use crate::domain::roles::ports::RoleStore;
use crate::domain::roles::ports::ServiceRegistry;

/// Byte length of forgot-password tokens (hex-encoded to twice this many
/// characters).
const FORGOT_TOKEN_BYTES: usize = 16;

/// Domain service for the account lifecycle.
///
/// All multi-row mutations delegate atomicity to the repository / role store
/// (predicate updates and transactions); the service itself holds no mutable
/// state and is safe to share across requests.
pub struct AccountService<AR, RS, SG, M>
where
    AR: AccountRepository,
    RS: RoleStore,
    SG: ServiceRegistry,
    M: Mailer,
{
    repository: Arc<AR>,
    role_store: Arc<RS>,
    registry: Arc<SG>,
    mailer: Arc<M>,
}

impl<AR, RS, SG, M> AccountService<AR, RS, SG, M>
where
    AR: AccountRepository,
    RS: RoleStore,
    SG: ServiceRegistry,
    M: Mailer,
{
    /// Create a new account service with injected dependencies.
    pub fn new(repository: Arc<AR>, role_store: Arc<RS>, registry: Arc<SG>, mailer: Arc<M>) -> Self {
        Self {
            repository,
            role_store,
            registry,
            mailer,
        }
    }

    /// Register a new user.
    ///
    /// The incoming pre-hashed password gets a second deterministic digest
    /// before storage.
    ///
    /// # Errors
    /// * `EmailAlreadyRegistered` - Email already taken
    /// * `DatabaseError` - Storage failure
    pub async fn register(&self, command: RegisterUserCommand) -> Result<User, AccountError> {
        let user = User {
            id: UserId::new(),
            email: command.email,
            password: Hasher::digest(command.password.as_str()),
            first_name: command.first_name,
            last_name: command.last_name,
            membership_number: command.membership_number,
            forgot_password_token: None,
            created_at: Utc::now(),
        };

        self.repository.create(user).await
    }

    /// Verify a user's credentials and return their id.
    ///
    /// User-not-found and digest mismatch collapse into the same error so
    /// the response leaks nothing about which factor was wrong.
    ///
    /// # Errors
    /// * `WrongEmailPassword` - Unknown email or wrong password
    pub async fn check_credentials(
        &self,
        email: &str,
        password: &PasswordDigest,
    ) -> Result<UserId, AccountError> {
        let user = self
            .repository
            .find_by_email(&email.trim().to_lowercase())
            .await?
            .ok_or(AccountError::WrongEmailPassword)?;

        if user.password != Hasher::digest(password.as_str()) {
            return Err(AccountError::WrongEmailPassword);
        }

        Ok(user.id)
    }

    /// Retrieve a user by id.
    ///
    /// # Errors
    /// * `UserNotExist` - No such user
    pub async fn get_user(&self, id: &UserId) -> Result<User, AccountError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(AccountError::UserNotExist)
    }

    /// Retrieve all users.
    pub async fn list_users(&self) -> Result<Vec<User>, AccountError> {
        self.repository.list_all().await
    }

    /// Apply a partial profile update.
    ///
    /// # Errors
    /// * `UserNotExist` - No row matched the id
    /// * `EmailAlreadyRegistered` - New email already taken
    pub async fn update_user(
        &self,
        id: &UserId,
        command: UpdateUserCommand,
    ) -> Result<User, AccountError> {
        self.repository
            .update_profile(id, &command)
            .await?
            .ok_or(AccountError::UserNotExist)
    }

    /// Full role map across all downstream services for a user.
    ///
    /// # Errors
    /// * `UserNotExist` - No such user
    pub async fn get_user_roles(&self, id: &UserId) -> Result<RoleMap, AccountError> {
        if self.repository.find_by_id(id).await?.is_none() {
            return Err(AccountError::UserNotExist);
        }

        Ok(self.role_store.list_roles(id).await?)
    }

    /// Replace role sets for every requested (service, roles) pair.
    ///
    /// Every service path and every role name is validated against the
    /// registry before any write; the store then applies all pairs in one
    /// transaction. A failure anywhere leaves storage unchanged.
    ///
    /// # Errors
    /// * `UserNotExist` - No such user
    /// * `ServiceNotExist` - A path is not in the registry
    /// * `RoleNotValid` - A role is outside its service's vocabulary
    pub async fn assign_roles(
        &self,
        id: &UserId,
        assignment: &RoleMap,
    ) -> Result<(), AccountError> {
        if self.repository.find_by_id(id).await?.is_none() {
            return Err(AccountError::UserNotExist);
        }

        let services = self.registry.all_services().await?;
        for (service_path, roles) in assignment {
            let service = services
                .iter()
                .find(|service| &service.path == service_path)
                .ok_or_else(|| AccountError::ServiceNotExist(service_path.clone()))?;

            if !roles.iter().all(|role| service.roles.contains(role)) {
                return Err(AccountError::RoleNotValid);
            }
        }

        self.role_store.replace_roles(id, assignment).await?;

        Ok(())
    }

    /// Issue a forgot-password token and mail it to the user.
    ///
    /// A fresh token overwrites any prior unredeemed one; only the latest is
    /// valid. Mail failures propagate without retry.
    ///
    /// # Errors
    /// * `EmailNotExist` - Email not associated with any user
    /// * `Mailer` - Dispatch failed
    pub async fn forgot_password(&self, email: &str) -> Result<(), AccountError> {
        let token = random_token(FORGOT_TOKEN_BYTES);

        let updated = self
            .repository
            .store_forgot_token(&email.trim().to_lowercase(), &token)
            .await?;
        if updated == 0 {
            return Err(AccountError::EmailNotExist);
        }

        self.mailer.send_password_reset(email, &token).await?;

        Ok(())
    }

    /// Redeem a forgot-password token.
    ///
    /// The store clears the token and sets the new digest in one statement,
    /// so of two concurrent redemptions exactly one succeeds.
    ///
    /// # Errors
    /// * `TokenNotExist` - Token unknown or already consumed
    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &PasswordDigest,
    ) -> Result<(), AccountError> {
        let updated = self
            .repository
            .redeem_forgot_token(token, &Hasher::digest(new_password.as_str()))
            .await?;
        if updated == 0 {
            return Err(AccountError::TokenNotExist);
        }

        Ok(())
    }

    /// Change a user's password, requiring the exact current digest in the
    /// update predicate.
    ///
    /// # Errors
    /// * `UserNotExist` - Unknown id or wrong current password (deliberately
    ///   not distinguished)
    pub async fn change_password(
        &self,
        id: &UserId,
        current_password: &PasswordDigest,
        new_password: &PasswordDigest,
    ) -> Result<(), AccountError> {
        let updated = self
            .repository
            .update_password(
                id,
                &Hasher::digest(current_password.as_str()),
                &Hasher::digest(new_password.as_str()),
            )
            .await?;
        if updated == 0 {
            return Err(AccountError::UserNotExist);
        }

        Ok(())
    }
}
