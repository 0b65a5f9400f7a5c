use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::ports::AccountRepository;
use crate::domain::account::ports::Mailer;
use crate::domain::roles::ports::RoleStore;
use crate::domain::roles::ports::ServiceRegistry;
use crate::inbound::http::router::AppState;

#[derive(Debug, Clone, Deserialize)]
pub struct ForgotPasswordRequest {
    email: String,
}

pub async fn forgot_password<AR: AccountRepository, RS: RoleStore, SG: ServiceRegistry, M: Mailer>(
    State(state): State<AppState<AR, RS, SG, M>>,
    Json(body): Json<ForgotPasswordRequest>,
) -> Result<StatusCode, ApiError> {
    let email = EmailAddress::new(body.email)?;
    state
        .account_service
        .forgot_password(email.as_str())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
