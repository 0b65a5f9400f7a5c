use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use auth::IdentityContext;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::account::models::UserId;
use crate::domain::account::ports::AccountRepository;
use crate::domain::account::ports::Mailer;
use crate::domain::roles::models::RoleMap;
use crate::domain::roles::ports::RoleStore;
use crate::domain::roles::ports::ServiceRegistry;
use crate::inbound::http::router::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct RolesResponse {
    pub roles: RoleMap,
}

pub async fn get_self_roles<AR: AccountRepository, RS: RoleStore, SG: ServiceRegistry, M: Mailer>(
    State(state): State<AppState<AR, RS, SG, M>>,
    Extension(identity): Extension<IdentityContext>,
) -> Result<ApiSuccess<RolesResponse>, ApiError> {
    let user_id = state.gate.load_self(&identity)?;
    fetch_roles(&state, &user_id).await
}

pub async fn get_user_roles<AR: AccountRepository, RS: RoleStore, SG: ServiceRegistry, M: Mailer>(
    State(state): State<AppState<AR, RS, SG, M>>,
    Extension(identity): Extension<IdentityContext>,
    Path(user_id): Path<String>,
) -> Result<ApiSuccess<RolesResponse>, ApiError> {
    state.gate.require_all_roles(&identity, &["admin"]).await?;
    let user_id = UserId::from_string(&user_id)?;
    fetch_roles(&state, &user_id).await
}

async fn fetch_roles<AR: AccountRepository, RS: RoleStore, SG: ServiceRegistry, M: Mailer>(
    state: &AppState<AR, RS, SG, M>,
    user_id: &UserId,
) -> Result<ApiSuccess<RolesResponse>, ApiError> {
    let roles = state.account_service.get_user_roles(user_id).await?;

    Ok(ApiSuccess::new(StatusCode::OK, RolesResponse { roles }))
}
