use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use auth::IdentityContext;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::account::models::PasswordDigest;
use crate::domain::account::ports::AccountRepository;
use crate::domain::account::ports::Mailer;
use crate::domain::authz::LoginMode;
use crate::domain::roles::ports::RoleStore;
use crate::domain::roles::ports::ServiceRegistry;
use crate::inbound::http::router::AppState;

#[derive(Debug, Clone, Deserialize)]
pub struct CheckCredentialsRequest {
    email: String,
    password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckCredentialsResponse {
    pub user_id: String,
}

/// Credential verification for upstream services.
///
/// Only callable service-to-service; a generic error covers both unknown
/// email and wrong password.
pub async fn check_credentials<
    AR: AccountRepository,
    RS: RoleStore,
    SG: ServiceRegistry,
    M: Mailer,
>(
    State(state): State<AppState<AR, RS, SG, M>>,
    Extension(identity): Extension<IdentityContext>,
    Json(body): Json<CheckCredentialsRequest>,
) -> Result<ApiSuccess<CheckCredentialsResponse>, ApiError> {
    state
        .gate
        .require_all_logged_in(&identity, &[LoginMode::Service])?;

    let password = PasswordDigest::new(body.password)?;
    let user_id = state
        .account_service
        .check_credentials(&body.email, &password)
        .await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        CheckCredentialsResponse {
            user_id: user_id.to_string(),
        },
    ))
}
