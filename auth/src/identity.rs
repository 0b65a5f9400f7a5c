use uuid::Uuid;

/// Per-request authentication state.
///
/// Exactly one of three states holds for a request: anonymous (neither field
/// set), user-authenticated (user id set), or service-authenticated (service
/// path set, optionally acting on behalf of a user). Constructed fresh per
/// request and discarded at request end; never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityContext {
    /// Acting end-user id, taken from the trusted `x-userid` header once the
    /// service token has been verified.
    pub user_id: Option<Uuid>,

    /// Authenticated caller service path, taken from the trusted `x-service`
    /// header.
    pub service_path: Option<String>,
}

impl IdentityContext {
    /// An unauthenticated context.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A service-authenticated context.
    ///
    /// # Arguments
    /// * `service_path` - Verified caller service path
    /// * `user_id` - Acting user id, if the caller supplied one
    pub fn service(service_path: Option<String>, user_id: Option<Uuid>) -> Self {
        Self {
            user_id,
            service_path,
        }
    }

    /// Whether an acting end user is present.
    pub fn is_user(&self) -> bool {
        self.user_id.is_some()
    }

    /// Whether the caller authenticated as a service.
    pub fn is_service(&self) -> bool {
        self.service_path.is_some()
    }
}
