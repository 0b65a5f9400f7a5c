use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::PasswordDigest;
use crate::domain::account::models::RegisterUserCommand;
use crate::domain::account::ports::AccountRepository;
use crate::domain::account::ports::Mailer;
use crate::domain::roles::ports::RoleStore;
use crate::domain::roles::ports::ServiceRegistry;
use crate::inbound::http::router::AppState;

/// HTTP request body for registration (raw JSON)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    email: String,
    password: String,
    first_name: String,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    membership_number: Option<String>,
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterUserCommand, ApiError> {
        let first_name = self.first_name.trim().to_string();
        if first_name.is_empty() {
            return Err(ApiError::invalid_fields("First name is required"));
        }

        Ok(RegisterUserCommand {
            email: EmailAddress::new(self.email)?,
            password: PasswordDigest::new(self.password)?,
            first_name,
            last_name: self.last_name.map(|name| name.trim().to_string()),
            membership_number: self.membership_number,
        })
    }
}

pub async fn register<AR: AccountRepository, RS: RoleStore, SG: ServiceRegistry, M: Mailer>(
    State(state): State<AppState<AR, RS, SG, M>>,
    Json(body): Json<RegisterRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .account_service
        .register(body.try_into_command()?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
