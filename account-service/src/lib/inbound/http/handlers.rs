use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use auth::ServiceTokenError;

use crate::domain::account::errors::AccountError;
use crate::domain::account::errors::EmailError;
use crate::domain::account::errors::PasswordDigestError;
use crate::domain::account::errors::UserIdError;
use crate::domain::authz::AuthzError;

pub mod assign_roles;
pub mod change_password;
pub mod check_credentials;
pub mod forgot_password;
pub mod get_user;
pub mod get_user_roles;
pub mod list_users;
pub mod register;
pub mod reset_password;
pub mod update_user;

/// Successful JSON response with explicit status.
#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize>(StatusCode, Json<T>);

impl<T: Serialize> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(data))
    }
}

impl<T: Serialize> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// Error response carrying a stable machine-readable code next to the
/// human-readable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

#[derive(Debug, Clone, Serialize)]
struct ApiErrorBody {
    message: String,
    code: &'static str,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn invalid_fields(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid_fields", message)
    }

    fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_server_error",
            "Internal server error",
        )
    }

    pub fn code(&self) -> &'static str {
        self.code
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ApiErrorBody {
                message: self.message,
                code: self.code,
            }),
        )
            .into_response()
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        let message = err.to_string();
        match err {
            AccountError::EmailAlreadyRegistered => {
                Self::new(StatusCode::BAD_REQUEST, "email_already_registered", message)
            }
            AccountError::WrongEmailPassword => {
                Self::new(StatusCode::BAD_REQUEST, "wrong_email_password", message)
            }
            AccountError::UserNotExist => {
                Self::new(StatusCode::BAD_REQUEST, "user_not_exist", message)
            }
            AccountError::ServiceNotExist(_) => {
                Self::new(StatusCode::BAD_REQUEST, "service_not_exist", message)
            }
            AccountError::RoleNotValid => {
                Self::new(StatusCode::BAD_REQUEST, "role_not_valid", message)
            }
            AccountError::EmailNotExist => {
                Self::new(StatusCode::BAD_REQUEST, "email_not_exist", message)
            }
            AccountError::TokenNotExist => {
                Self::new(StatusCode::BAD_REQUEST, "token_not_exist", message)
            }
            AccountError::InvalidEmail(_)
            | AccountError::InvalidUserId(_)
            | AccountError::InvalidPassword(_) => Self::invalid_fields(message),
            AccountError::Mailer(_)
            | AccountError::RoleStore(_)
            | AccountError::Registry(_)
            | AccountError::DatabaseError(_)
            | AccountError::Unknown(_) => {
                // No internal detail crosses the boundary.
                tracing::error!(error = %message, "Account operation failed");
                Self::internal()
            }
        }
    }
}

impl From<AuthzError> for ApiError {
    fn from(err: AuthzError) -> Self {
        let message = err.to_string();
        match err {
            AuthzError::ServiceAuthRequired => {
                Self::new(StatusCode::UNAUTHORIZED, "service_auth_required", message)
            }
            AuthzError::AuthRequired | AuthzError::AnyAuthRequired(_) => {
                Self::new(StatusCode::UNAUTHORIZED, "auth_required", message)
            }
            AuthzError::NotHasRoles => {
                Self::new(StatusCode::FORBIDDEN, "user_not_has_roles", message)
            }
            AuthzError::Store(_) => {
                tracing::error!(error = %message, "Authorization check failed");
                Self::internal()
            }
        }
    }
}

impl From<ServiceTokenError> for ApiError {
    fn from(err: ServiceTokenError) -> Self {
        let message = err.to_string();
        match err {
            ServiceTokenError::NoToken => {
                Self::new(StatusCode::UNAUTHORIZED, "auth_no_token", message)
            }
            ServiceTokenError::UnsupportedScheme(_) => {
                Self::new(StatusCode::UNAUTHORIZED, "auth_type_not_valid", message)
            }
            ServiceTokenError::InvalidToken => {
                Self::new(StatusCode::UNAUTHORIZED, "auth_token_not_valid", message)
            }
            ServiceTokenError::Expired => {
                Self::new(StatusCode::UNAUTHORIZED, "auth_token_expired", message)
            }
        }
    }
}

impl From<UserIdError> for ApiError {
    fn from(err: UserIdError) -> Self {
        Self::invalid_fields(err.to_string())
    }
}

impl From<EmailError> for ApiError {
    fn from(err: EmailError) -> Self {
        Self::invalid_fields(err.to_string())
    }
}

impl From<PasswordDigestError> for ApiError {
    fn from(err: PasswordDigestError) -> Self {
        Self::invalid_fields(err.to_string())
    }
}
