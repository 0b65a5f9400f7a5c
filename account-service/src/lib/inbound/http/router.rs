use std::sync::Arc;
use std::time::Duration;

use auth::ServiceTokenVerifier;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::assign_roles::assign_roles;
use super::handlers::change_password::change_password;
use super::handlers::change_password::change_self_password;
use super::handlers::check_credentials::check_credentials;
use super::handlers::forgot_password::forgot_password;
use super::handlers::get_user::get_self;
use super::handlers::get_user::get_user;
use super::handlers::get_user_roles::get_self_roles;
use super::handlers::get_user_roles::get_user_roles;
use super::handlers::list_users::list_users;
use super::handlers::register::register;
use super::handlers::reset_password::reset_password;
use super::handlers::update_user::update_self;
use super::handlers::update_user::update_user;
use super::middleware::authenticate;
use crate::domain::account::ports::AccountRepository;
use crate::domain::account::ports::Mailer;
use crate::domain::account::service::AccountService;
use crate::domain::authz::AuthorizationGate;
use crate::domain::roles::ports::RoleStore;
use crate::domain::roles::ports::ServiceRegistry;

/// Role vocabulary this service declares for itself at the gateway.
pub const SERVICE_ROLES: &[&str] = &["admin"];

pub struct AppState<AR, RS, SG, M>
where
    AR: AccountRepository,
    RS: RoleStore,
    SG: ServiceRegistry,
    M: Mailer,
{
    pub account_service: Arc<AccountService<AR, RS, SG, M>>,
    pub gate: Arc<AuthorizationGate<RS>>,
}

// Derived Clone would put bounds on the type parameters; the Arcs clone
// regardless.
impl<AR, RS, SG, M> Clone for AppState<AR, RS, SG, M>
where
    AR: AccountRepository,
    RS: RoleStore,
    SG: ServiceRegistry,
    M: Mailer,
{
    fn clone(&self) -> Self {
        Self {
            account_service: Arc::clone(&self.account_service),
            gate: Arc::clone(&self.gate),
        }
    }
}

pub fn create_router<AR, RS, SG, M>(
    account_service: Arc<AccountService<AR, RS, SG, M>>,
    gate: Arc<AuthorizationGate<RS>>,
    verifier: Arc<ServiceTokenVerifier>,
) -> Router
where
    AR: AccountRepository,
    RS: RoleStore,
    SG: ServiceRegistry,
    M: Mailer,
{
    let state = AppState {
        account_service,
        gate,
    };

    let user_routes = Router::new()
        .route("/register", post(register::<AR, RS, SG, M>))
        .route("/checkCredentials", post(check_credentials::<AR, RS, SG, M>))
        .route("/all", get(list_users::<AR, RS, SG, M>))
        .route(
            "/self",
            get(get_self::<AR, RS, SG, M>).patch(update_self::<AR, RS, SG, M>),
        )
        .route("/self/roles", get(get_self_roles::<AR, RS, SG, M>))
        .route(
            "/self/changePassword",
            post(change_self_password::<AR, RS, SG, M>),
        )
        .route("/forgotPassword", post(forgot_password::<AR, RS, SG, M>))
        .route(
            "/changePassword/:token",
            post(reset_password::<AR, RS, SG, M>),
        )
        .route(
            "/:user_id",
            get(get_user::<AR, RS, SG, M>).patch(update_user::<AR, RS, SG, M>),
        )
        .route(
            "/:user_id/roles",
            get(get_user_roles::<AR, RS, SG, M>).patch(assign_roles::<AR, RS, SG, M>),
        )
        .route(
            "/:user_id/changePassword",
            post(change_password::<AR, RS, SG, M>),
        );

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .nest("/api/user", user_routes)
        .layer(middleware::from_fn_with_state(verifier, authenticate))
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
