use std::sync::Arc;

use axum::extract::Request;
use axum::extract::State;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use http::header::AsHeaderName;
use http::header::AUTHORIZATION;

use auth::ServiceTokenVerifier;

use crate::inbound::http::handlers::ApiError;

/// Trusted header carrying the acting end-user id.
const USER_ID_HEADER: &str = "x-userid";
/// Trusted header carrying the calling service's path.
const SERVICE_HEADER: &str = "x-service";

/// Middleware establishing the per-request identity context.
///
/// Runs the service token verifier over the authorization header and stores
/// the resulting `IdentityContext` in request extensions. A request without
/// an authorization header proceeds as anonymous; a failed verification is
/// terminal and the request stays anonymous.
pub async fn authenticate(
    State(verifier): State<Arc<ServiceTokenVerifier>>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let authorization = header_str(&req, AUTHORIZATION);
    let user_id = header_str(&req, USER_ID_HEADER);
    let service_path = header_str(&req, SERVICE_HEADER);

    let identity = verifier
        .verify(authorization, user_id, service_path)
        .map_err(|e| {
            tracing::warn!(error = %e, "Service token verification failed");
            ApiError::from(e).into_response()
        })?;

    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

fn header_str(req: &Request, name: impl AsHeaderName) -> Option<&str> {
    req.headers().get(name).and_then(|value| value.to_str().ok())
}
