use thiserror::Error;

/// Error for role store operations
#[derive(Debug, Clone, Error)]
pub enum RoleStoreError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Error for service registry lookups
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    #[error("Service registry unavailable: {0}")]
    Unavailable(String),
}
