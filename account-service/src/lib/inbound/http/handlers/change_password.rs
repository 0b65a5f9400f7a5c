use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use auth::IdentityContext;

use super::ApiError;
use crate::domain::account::models::PasswordDigest;
use crate::domain::account::models::UserId;
use crate::domain::account::ports::AccountRepository;
use crate::domain::account::ports::Mailer;
use crate::domain::roles::ports::RoleStore;
use crate::domain::roles::ports::ServiceRegistry;
use crate::inbound::http::router::AppState;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    current_password: String,
    new_password: String,
}

pub async fn change_self_password<
    AR: AccountRepository,
    RS: RoleStore,
    SG: ServiceRegistry,
    M: Mailer,
>(
    State(state): State<AppState<AR, RS, SG, M>>,
    Extension(identity): Extension<IdentityContext>,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<StatusCode, ApiError> {
    let user_id = state.gate.load_self(&identity)?;
    apply_change(&state, &user_id, body).await
}

pub async fn change_password<AR: AccountRepository, RS: RoleStore, SG: ServiceRegistry, M: Mailer>(
    State(state): State<AppState<AR, RS, SG, M>>,
    Extension(identity): Extension<IdentityContext>,
    Path(user_id): Path<String>,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<StatusCode, ApiError> {
    state.gate.require_all_roles(&identity, &["admin"]).await?;
    let user_id = UserId::from_string(&user_id)?;
    apply_change(&state, &user_id, body).await
}

async fn apply_change<AR: AccountRepository, RS: RoleStore, SG: ServiceRegistry, M: Mailer>(
    state: &AppState<AR, RS, SG, M>,
    user_id: &UserId,
    body: ChangePasswordRequest,
) -> Result<StatusCode, ApiError> {
    let current = PasswordDigest::new(body.current_password)?;
    let new = PasswordDigest::new(body.new_password)?;
    state
        .account_service
        .change_password(user_id, &current, &new)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
