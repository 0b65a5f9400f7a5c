use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use auth::IdentityContext;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::account::models::User;
use crate::domain::account::models::UserId;
use crate::domain::account::ports::AccountRepository;
use crate::domain::account::ports::Mailer;
use crate::domain::roles::ports::RoleStore;
use crate::domain::roles::ports::ServiceRegistry;
use crate::inbound::http::router::AppState;

/// Public projection of a user.
///
/// Password and forgot-password token never leave the service.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserBody {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub membership_number: Option<String>,
}

impl From<&User> for UserBody {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.as_str().to_string(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            membership_number: user.membership_number.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub user: UserBody,
}

pub async fn get_self<AR: AccountRepository, RS: RoleStore, SG: ServiceRegistry, M: Mailer>(
    State(state): State<AppState<AR, RS, SG, M>>,
    Extension(identity): Extension<IdentityContext>,
) -> Result<ApiSuccess<UserResponse>, ApiError> {
    let user_id = state.gate.load_self(&identity)?;
    fetch_user(&state, &user_id).await
}

pub async fn get_user<AR: AccountRepository, RS: RoleStore, SG: ServiceRegistry, M: Mailer>(
    State(state): State<AppState<AR, RS, SG, M>>,
    Extension(identity): Extension<IdentityContext>,
    Path(user_id): Path<String>,
) -> Result<ApiSuccess<UserResponse>, ApiError> {
    state.gate.require_all_roles(&identity, &["admin"]).await?;
    let user_id = UserId::from_string(&user_id)?;
    fetch_user(&state, &user_id).await
}

async fn fetch_user<AR: AccountRepository, RS: RoleStore, SG: ServiceRegistry, M: Mailer>(
    state: &AppState<AR, RS, SG, M>,
    user_id: &UserId,
) -> Result<ApiSuccess<UserResponse>, ApiError> {
    let user = state.account_service.get_user(user_id).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        UserResponse {
            user: (&user).into(),
        },
    ))
}
