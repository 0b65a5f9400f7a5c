use chrono::Utc;
use uuid::Uuid;

use super::errors::ServiceTokenError;
use crate::hasher::Hasher;
use crate::identity::IdentityContext;

/// Maximum allowed clock difference between the token timestamp and
/// verification time, symmetric in both directions.
const FRESHNESS_WINDOW_MS: i64 = 5 * 60 * 1000;

/// Verifier for inter-service authentication headers.
///
/// Header grammar: `Service <token> <servicePath> <timestampMillis>` where
/// `token = sha256_hex(secret ‖ servicePath ‖ timestampMillis)`. A matching
/// token proves the caller holds the shared secret; the acting user identity
/// is then read verbatim from the trusted `x-userid` / `x-service` headers
/// (trust delegated to the upstream gateway).
///
/// No nonce or replay cache is kept: a token stays valid for its entire
/// freshness window if replayed. That is an accepted protocol limitation.
pub struct ServiceTokenVerifier {
    secret: String,
}

impl ServiceTokenVerifier {
    /// Create a verifier for a shared secret.
    ///
    /// # Arguments
    /// * `secret` - Secret shared with legitimate upstream services
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Compute the token a caller would send for a service path and timestamp.
    ///
    /// Used to sign outbound inter-service requests and by tests.
    ///
    /// # Arguments
    /// * `service_path` - Path of the calling service
    /// * `timestamp_millis` - Unix timestamp in milliseconds
    ///
    /// # Returns
    /// Hex token string
    pub fn sign(&self, service_path: &str, timestamp_millis: i64) -> String {
        Hasher::digest(&format!(
            "{}{}{}",
            self.secret, service_path, timestamp_millis
        ))
    }

    /// Verify an authorization header and build the request identity.
    ///
    /// # Arguments
    /// * `authorization` - Raw `Authorization` header value, if present
    /// * `user_id_header` - Trusted `x-userid` header value, if present
    /// * `service_header` - Trusted `x-service` header value, if present
    ///
    /// # Returns
    /// Identity context: anonymous when no header was supplied, otherwise
    /// service-authenticated
    ///
    /// # Errors
    /// * `NoToken` - Header present but carries no token
    /// * `UnsupportedScheme` - Scheme other than `Service`
    /// * `InvalidToken` - Recomputed token does not match
    /// * `Expired` - Timestamp outside the freshness window
    pub fn verify(
        &self,
        authorization: Option<&str>,
        user_id_header: Option<&str>,
        service_header: Option<&str>,
    ) -> Result<IdentityContext, ServiceTokenError> {
        let Some(header) = authorization else {
            return Ok(IdentityContext::anonymous());
        };

        let mut parts = header.split_whitespace();
        let scheme = parts.next().unwrap_or_default();
        let token = parts.next().ok_or(ServiceTokenError::NoToken)?;

        if scheme != "Service" {
            return Err(ServiceTokenError::UnsupportedScheme(scheme.to_string()));
        }

        // Recompute over the raw header fields so that any tampering with
        // path or timestamp also invalidates the token.
        let service_path = parts.next().unwrap_or_default();
        let timestamp = parts.next().unwrap_or_default();
        let expected = Hasher::digest(&format!("{}{}{}", self.secret, service_path, timestamp));
        if expected != token {
            return Err(ServiceTokenError::InvalidToken);
        }

        let timestamp_millis: i64 = timestamp
            .parse()
            .map_err(|_| ServiceTokenError::Expired)?;
        let now = Utc::now().timestamp_millis();
        if (now - timestamp_millis).abs() > FRESHNESS_WINDOW_MS {
            return Err(ServiceTokenError::Expired);
        }

        let user_id = user_id_header.and_then(|raw| Uuid::parse_str(raw).ok());
        let caller = service_header.map(str::to_string);

        Ok(IdentityContext::service(caller, user_id))
    }
}
