use async_trait::async_trait;

use crate::domain::account::models::UserId;
use crate::domain::roles::errors::RegistryError;
use crate::domain::roles::errors::RoleStoreError;
use crate::domain::roles::models::RoleMap;
use crate::domain::roles::models::ServiceDescriptor;

/// Persistence operations for per-(user, service) role sets.
///
/// At most one binding exists per (user, service path) pair; writes replace
/// the whole role set for a pair atomically.
#[async_trait]
pub trait RoleStore: Send + Sync + 'static {
    /// Replace the role sets for every (user, service) pair in `assignment`.
    ///
    /// All pairs are written inside a single transaction: a failure on any
    /// pair leaves no pair updated.
    ///
    /// # Errors
    /// * `DatabaseError` - Transaction failed and was rolled back
    async fn replace_roles(
        &self,
        user_id: &UserId,
        assignment: &RoleMap,
    ) -> Result<(), RoleStoreError>;

    /// Whether the stored role set for the pair is a superset of `required`.
    ///
    /// An absent binding is never a match. An empty `required` set is
    /// vacuously true; callers must not pass one unless "any role holder" is
    /// the intended check.
    async fn has_all_roles(
        &self,
        user_id: &UserId,
        service_path: &str,
        required: &[String],
    ) -> Result<bool, RoleStoreError>;

    /// Whether the stored role set for the pair intersects `candidate`.
    async fn has_any_roles(
        &self,
        user_id: &UserId,
        service_path: &str,
        candidate: &[String],
    ) -> Result<bool, RoleStoreError>;

    /// Full role map across all services for a user.
    async fn list_roles(&self, user_id: &UserId) -> Result<RoleMap, RoleStoreError>;
}

/// Read access to the gateway's registry of downstream services and their
/// declared role vocabularies.
#[async_trait]
pub trait ServiceRegistry: Send + Sync + 'static {
    /// All registered services.
    ///
    /// # Errors
    /// * `Unavailable` - Registry could not be reached
    async fn all_services(&self) -> Result<Vec<ServiceDescriptor>, RegistryError>;
}
