use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use auth::IdentityContext;

use super::get_user::UserResponse;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::UpdateUserCommand;
use crate::domain::account::models::UserId;
use crate::domain::account::ports::AccountRepository;
use crate::domain::account::ports::Mailer;
use crate::domain::roles::ports::RoleStore;
use crate::domain::roles::ports::ServiceRegistry;
use crate::inbound::http::router::AppState;

/// HTTP request body for a partial profile update (raw JSON)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    membership_number: Option<String>,
}

impl UpdateUserRequest {
    fn try_into_command(self) -> Result<UpdateUserCommand, ApiError> {
        let email = self.email.map(EmailAddress::new).transpose()?;

        if let Some(first_name) = &self.first_name {
            if first_name.trim().is_empty() {
                return Err(ApiError::invalid_fields("First name cannot be empty"));
            }
        }

        Ok(UpdateUserCommand {
            email,
            first_name: self.first_name.map(|name| name.trim().to_string()),
            last_name: self.last_name.map(|name| name.trim().to_string()),
            membership_number: self.membership_number,
        })
    }
}

pub async fn update_self<AR: AccountRepository, RS: RoleStore, SG: ServiceRegistry, M: Mailer>(
    State(state): State<AppState<AR, RS, SG, M>>,
    Extension(identity): Extension<IdentityContext>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<ApiSuccess<UserResponse>, ApiError> {
    let user_id = state.gate.load_self(&identity)?;
    apply_update(&state, &user_id, body).await
}

pub async fn update_user<AR: AccountRepository, RS: RoleStore, SG: ServiceRegistry, M: Mailer>(
    State(state): State<AppState<AR, RS, SG, M>>,
    Extension(identity): Extension<IdentityContext>,
    Path(user_id): Path<String>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<ApiSuccess<UserResponse>, ApiError> {
    state.gate.require_all_roles(&identity, &["admin"]).await?;
    let user_id = UserId::from_string(&user_id)?;
    apply_update(&state, &user_id, body).await
}

async fn apply_update<AR: AccountRepository, RS: RoleStore, SG: ServiceRegistry, M: Mailer>(
    state: &AppState<AR, RS, SG, M>,
    user_id: &UserId,
    body: UpdateUserRequest,
) -> Result<ApiSuccess<UserResponse>, ApiError> {
    let user = state
        .account_service
        .update_user(user_id, body.try_into_command()?)
        .await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        UserResponse {
            user: (&user).into(),
        },
    ))
}
