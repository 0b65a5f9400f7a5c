use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;

use auth::ServiceTokenVerifier;

use crate::config::GatewayConfig;
use crate::config::ServiceConfig;
use crate::domain::roles::errors::RegistryError;
use crate::domain::roles::models::ServiceDescriptor;
use crate::domain::roles::ports::ServiceRegistry;

/// HTTP client for the gateway's service registry.
///
/// Signs its own requests with a freshly minted service token on every call;
/// tokens are time-boxed so none is cached.
pub struct GatewayClient {
    http: reqwest::Client,
    base_url: String,
    signer: ServiceTokenVerifier,
    service_path: String,
}

/// Registration payload announcing this service to the gateway.
#[derive(Debug, Serialize)]
pub struct ServiceRegistration {
    pub name: String,
    pub path: String,
    pub url: String,
    pub roles: Vec<String>,
}

impl GatewayClient {
    pub fn new(gateway: &GatewayConfig, service: &ServiceConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: gateway.url.trim_end_matches('/').to_string(),
            signer: ServiceTokenVerifier::new(gateway.secret.clone()),
            service_path: service.path.clone(),
        }
    }

    fn authorization_header(&self) -> String {
        let timestamp = Utc::now().timestamp_millis();
        let token = self.signer.sign(&self.service_path, timestamp);
        format!("Service {} {} {}", token, self.service_path, timestamp)
    }

    /// Announce this service (path, url, role vocabulary) to the gateway.
    ///
    /// # Errors
    /// * `Unavailable` - Gateway unreachable or rejected the registration
    pub async fn register(&self, registration: &ServiceRegistration) -> Result<(), RegistryError> {
        let response = self
            .http
            .post(format!("{}/services", self.base_url))
            .header("authorization", self.authorization_header())
            .header("x-service", &self.service_path)
            .json(registration)
            .send()
            .await
            .map_err(|e| RegistryError::Unavailable(e.to_string()))?;

        response
            .error_for_status()
            .map_err(|e| RegistryError::Unavailable(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl ServiceRegistry for GatewayClient {
    async fn all_services(&self) -> Result<Vec<ServiceDescriptor>, RegistryError> {
        let response = self
            .http
            .get(format!("{}/services", self.base_url))
            .header("authorization", self.authorization_header())
            .header("x-service", &self.service_path)
            .send()
            .await
            .map_err(|e| RegistryError::Unavailable(e.to_string()))?
            .error_for_status()
            .map_err(|e| RegistryError::Unavailable(e.to_string()))?;

        response
            .json()
            .await
            .map_err(|e| RegistryError::Unavailable(e.to_string()))
    }
}
