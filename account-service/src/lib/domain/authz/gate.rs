use std::fmt;
use std::sync::Arc;

use auth::IdentityContext;

use crate::domain::account::models::UserId;
use crate::domain::authz::errors::AuthzError;
use crate::domain::roles::ports::RoleStore;

/// Authentication mode a guarded operation may require.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginMode {
    User,
    Service,
}

impl fmt::Display for LoginMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoginMode::User => write!(f, "User"),
            LoginMode::Service => write!(f, "Service"),
        }
    }
}

/// Composable predicate checks run before a guarded operation.
///
/// Checks evaluate in declared order and short-circuit on the first failed
/// (or, for "any" semantics, first satisfied) condition. This is plain
/// function composition over the identity context and the role store, not a
/// framework middleware chain.
pub struct AuthorizationGate<RS>
where
    RS: RoleStore,
{
    role_store: Arc<RS>,
    service_path: String,
}

impl<RS> AuthorizationGate<RS>
where
    RS: RoleStore,
{
    /// Create a gate checking roles against this service's own path.
    pub fn new(role_store: Arc<RS>, service_path: impl Into<String>) -> Self {
        Self {
            role_store,
            service_path: service_path.into(),
        }
    }

    /// Require every listed mode to be satisfied, failing fast on the first
    /// unmet one.
    ///
    /// # Errors
    /// * `ServiceAuthRequired` / `AuthRequired` - Typed per unmet mode
    pub fn require_all_logged_in(
        &self,
        identity: &IdentityContext,
        modes: &[LoginMode],
    ) -> Result<(), AuthzError> {
        for mode in modes {
            match mode {
                LoginMode::Service if !identity.is_service() => {
                    return Err(AuthzError::ServiceAuthRequired)
                }
                LoginMode::User if !identity.is_user() => return Err(AuthzError::AuthRequired),
                _ => {}
            }
        }
        Ok(())
    }

    /// Succeed on the first satisfied mode.
    ///
    /// # Errors
    /// * `AnyAuthRequired` - No listed mode holds; names the attempted modes
    pub fn require_any_logged_in(
        &self,
        identity: &IdentityContext,
        modes: &[LoginMode],
    ) -> Result<(), AuthzError> {
        for mode in modes {
            match mode {
                LoginMode::Service if identity.is_service() => return Ok(()),
                LoginMode::User if identity.is_user() => return Ok(()),
                _ => {}
            }
        }

        let attempted = modes
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        Err(AuthzError::AnyAuthRequired(attempted))
    }

    /// Require a user identity holding every listed role for this service.
    ///
    /// # Errors
    /// * `AuthRequired` - No user-authenticated identity
    /// * `NotHasRoles` - Stored role set is not a superset
    pub async fn require_all_roles(
        &self,
        identity: &IdentityContext,
        roles: &[&str],
    ) -> Result<(), AuthzError> {
        let user_id = self.acting_user(identity)?;
        let required: Vec<String> = roles.iter().map(|role| role.to_string()).collect();

        if !self
            .role_store
            .has_all_roles(&user_id, &self.service_path, &required)
            .await?
        {
            return Err(AuthzError::NotHasRoles);
        }
        Ok(())
    }

    /// Require a user identity holding at least one of the listed roles for
    /// this service.
    ///
    /// # Errors
    /// * `AuthRequired` - No user-authenticated identity
    /// * `NotHasRoles` - No role in common
    pub async fn require_any_roles(
        &self,
        identity: &IdentityContext,
        roles: &[&str],
    ) -> Result<(), AuthzError> {
        let user_id = self.acting_user(identity)?;
        let candidate: Vec<String> = roles.iter().map(|role| role.to_string()).collect();

        if !self
            .role_store
            .has_any_roles(&user_id, &self.service_path, &candidate)
            .await?
        {
            return Err(AuthzError::NotHasRoles);
        }
        Ok(())
    }

    /// Bind the operation's target to the identity's own user id, letting a
    /// request act on "myself" without supplying an id.
    ///
    /// # Errors
    /// * `AuthRequired` - Anonymous context
    pub fn load_self(&self, identity: &IdentityContext) -> Result<UserId, AuthzError> {
        self.acting_user(identity)
    }

    fn acting_user(&self, identity: &IdentityContext) -> Result<UserId, AuthzError> {
        identity
            .user_id
            .map(UserId)
            .ok_or(AuthzError::AuthRequired)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use mockall::mock;
    use uuid::Uuid;

    use super::*;
    use crate::domain::roles::errors::RoleStoreError;
    use crate::domain::roles::models::RoleMap;

    mock! {
        pub TestRoleStore {}

        #[async_trait]
        impl RoleStore for TestRoleStore {
            async fn replace_roles(
                &self,
                user_id: &UserId,
                assignment: &RoleMap,
            ) -> Result<(), RoleStoreError>;
            async fn has_all_roles(
                &self,
                user_id: &UserId,
                service_path: &str,
                required: &[String],
            ) -> Result<bool, RoleStoreError>;
            async fn has_any_roles(
                &self,
                user_id: &UserId,
                service_path: &str,
                candidate: &[String],
            ) -> Result<bool, RoleStoreError>;
            async fn list_roles(&self, user_id: &UserId) -> Result<RoleMap, RoleStoreError>;
        }
    }

    fn user_identity() -> IdentityContext {
        IdentityContext::service(Some("gateway".to_string()), Some(Uuid::new_v4()))
    }

    fn service_only_identity() -> IdentityContext {
        IdentityContext::service(Some("gateway".to_string()), None)
    }

    #[test]
    fn test_require_all_logged_in_passes_for_service() {
        let gate = AuthorizationGate::new(Arc::new(MockTestRoleStore::new()), "users");
        let result =
            gate.require_all_logged_in(&service_only_identity(), &[LoginMode::Service]);
        assert!(result.is_ok());
    }

    #[test]
    fn test_require_all_logged_in_fails_on_first_unmet_mode() {
        let gate = AuthorizationGate::new(Arc::new(MockTestRoleStore::new()), "users");

        let result = gate.require_all_logged_in(
            &IdentityContext::anonymous(),
            &[LoginMode::Service, LoginMode::User],
        );
        assert!(matches!(
            result.unwrap_err(),
            AuthzError::ServiceAuthRequired
        ));

        let result =
            gate.require_all_logged_in(&service_only_identity(), &[LoginMode::User]);
        assert!(matches!(result.unwrap_err(), AuthzError::AuthRequired));
    }

    #[test]
    fn test_require_any_logged_in_short_circuits() {
        let gate = AuthorizationGate::new(Arc::new(MockTestRoleStore::new()), "users");
        let result = gate.require_any_logged_in(
            &service_only_identity(),
            &[LoginMode::User, LoginMode::Service],
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_require_any_logged_in_names_attempted_modes() {
        let gate = AuthorizationGate::new(Arc::new(MockTestRoleStore::new()), "users");
        let result = gate.require_any_logged_in(
            &IdentityContext::anonymous(),
            &[LoginMode::User, LoginMode::Service],
        );
        assert!(matches!(
            result.unwrap_err(),
            AuthzError::AnyAuthRequired(modes) if modes == "User,Service"
        ));
    }

    #[tokio::test]
    async fn test_require_all_roles_delegates_to_store() {
        let identity = user_identity();
        let user_id = identity.user_id.unwrap();

        let mut role_store = MockTestRoleStore::new();
        role_store
            .expect_has_all_roles()
            .withf(move |id, path, required| {
                id.0 == user_id && path == "users" && required == ["admin".to_string()]
            })
            .times(1)
            .returning(|_, _, _| Ok(true));

        let gate = AuthorizationGate::new(Arc::new(role_store), "users");
        gate.require_all_roles(&identity, &["admin"]).await.unwrap();
    }

    #[tokio::test]
    async fn test_require_all_roles_missing_binding_is_forbidden() {
        let mut role_store = MockTestRoleStore::new();
        role_store
            .expect_has_all_roles()
            .times(1)
            .returning(|_, _, _| Ok(false));

        let gate = AuthorizationGate::new(Arc::new(role_store), "users");
        let result = gate.require_all_roles(&user_identity(), &["admin"]).await;
        assert!(matches!(result.unwrap_err(), AuthzError::NotHasRoles));
    }

    #[tokio::test]
    async fn test_require_all_roles_needs_user_identity() {
        let mut role_store = MockTestRoleStore::new();
        role_store.expect_has_all_roles().times(0);

        let gate = AuthorizationGate::new(Arc::new(role_store), "users");
        let result = gate
            .require_all_roles(&service_only_identity(), &["admin"])
            .await;
        assert!(matches!(result.unwrap_err(), AuthzError::AuthRequired));
    }

    #[tokio::test]
    async fn test_require_any_roles() {
        let mut role_store = MockTestRoleStore::new();
        role_store
            .expect_has_any_roles()
            .times(1)
            .returning(|_, _, _| Ok(false));

        let gate = AuthorizationGate::new(Arc::new(role_store), "users");
        let result = gate
            .require_any_roles(&user_identity(), &["admin", "editor"])
            .await;
        assert!(matches!(result.unwrap_err(), AuthzError::NotHasRoles));
    }

    #[test]
    fn test_load_self_binds_to_own_user_id() {
        let identity = user_identity();
        let gate = AuthorizationGate::new(Arc::new(MockTestRoleStore::new()), "users");

        let user_id = gate.load_self(&identity).unwrap();
        assert_eq!(user_id.0, identity.user_id.unwrap());

        let result = gate.load_self(&IdentityContext::anonymous());
        assert!(matches!(result.unwrap_err(), AuthzError::AuthRequired));
    }
}
