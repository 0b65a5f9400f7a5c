use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use auth::IdentityContext;

use super::get_user::UserBody;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::account::ports::AccountRepository;
use crate::domain::account::ports::Mailer;
use crate::domain::roles::ports::RoleStore;
use crate::domain::roles::ports::ServiceRegistry;
use crate::inbound::http::router::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct UsersResponse {
    pub users: Vec<UserBody>,
}

pub async fn list_users<AR: AccountRepository, RS: RoleStore, SG: ServiceRegistry, M: Mailer>(
    State(state): State<AppState<AR, RS, SG, M>>,
    Extension(identity): Extension<IdentityContext>,
) -> Result<ApiSuccess<UsersResponse>, ApiError> {
    state.gate.require_all_roles(&identity, &["admin"]).await?;

    let users = state.account_service.list_users().await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        UsersResponse {
            users: users.iter().map(UserBody::from).collect(),
        },
    ))
}
