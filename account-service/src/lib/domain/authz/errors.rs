use thiserror::Error;

use crate::domain::roles::errors::RoleStoreError;

/// Authorization gate failures.
///
/// All variants are terminal for the request: the guarded operation never
/// starts.
#[derive(Debug, Clone, Error)]
pub enum AuthzError {
    #[error("You have to authenticate as a service to do this")]
    ServiceAuthRequired,

    #[error("You have to authenticate as a user to do this")]
    AuthRequired,

    #[error("You have to authenticate with one of these methods ({0}) to do this")]
    AnyAuthRequired(String),

    #[error("You are not authorized to do this")]
    NotHasRoles,

    #[error("Role store error: {0}")]
    Store(#[from] RoleStoreError),
}
