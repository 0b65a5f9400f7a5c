use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use auth::IdentityContext;

use super::ApiError;
use crate::domain::account::models::UserId;
use crate::domain::account::ports::AccountRepository;
use crate::domain::account::ports::Mailer;
use crate::domain::roles::models::RoleMap;
use crate::domain::roles::ports::RoleStore;
use crate::domain::roles::ports::ServiceRegistry;
use crate::inbound::http::router::AppState;

#[derive(Debug, Clone, Deserialize)]
pub struct AssignRolesRequest {
    roles: RoleMap,
}

impl AssignRolesRequest {
    /// Service paths are matched case-insensitively against the registry.
    fn normalized(self) -> RoleMap {
        self.roles
            .into_iter()
            .map(|(path, roles)| (path.trim().to_lowercase(), roles))
            .collect()
    }
}

pub async fn assign_roles<AR: AccountRepository, RS: RoleStore, SG: ServiceRegistry, M: Mailer>(
    State(state): State<AppState<AR, RS, SG, M>>,
    Extension(identity): Extension<IdentityContext>,
    Path(user_id): Path<String>,
    Json(body): Json<AssignRolesRequest>,
) -> Result<StatusCode, ApiError> {
    state.gate.require_all_roles(&identity, &["admin"]).await?;

    let user_id = UserId::from_string(&user_id)?;
    state
        .account_service
        .assign_roles(&user_id, &body.normalized())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
