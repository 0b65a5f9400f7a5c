use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use account_service::domain::account::errors::AccountError;
use account_service::domain::account::errors::MailerError;
use account_service::domain::account::models::UpdateUserCommand;
use account_service::domain::account::models::User;
use account_service::domain::account::models::UserId;
use account_service::domain::account::ports::AccountRepository;
use account_service::domain::account::ports::Mailer;
use account_service::domain::account::service::AccountService;
use account_service::domain::authz::AuthorizationGate;
use account_service::domain::roles::errors::RegistryError;
use account_service::domain::roles::errors::RoleStoreError;
use account_service::domain::roles::models::RoleMap;
use account_service::domain::roles::models::ServiceDescriptor;
use account_service::domain::roles::ports::RoleStore;
use account_service::domain::roles::ports::ServiceRegistry;
use account_service::inbound::http::router::create_router;
use async_trait::async_trait;
use auth::Hasher;
use auth::ServiceTokenVerifier;
use chrono::Utc;

/// Secret shared between the test caller and the spawned server.
pub const SERVICE_SECRET: &str = "test-service-secret";

/// Path this service is registered under; role checks run against it.
pub const OWN_SERVICE_PATH: &str = "user";

/// Path the simulated upstream caller identifies as.
pub const CALLER_PATH: &str = "gateway";

/// In-memory account repository mirroring the predicate-update contract of
/// the Postgres implementation.
#[derive(Default)]
pub struct InMemoryAccountRepository {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn create(&self, user: User) -> Result<User, AccountError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|existing| existing.email == user.email) {
            return Err(AccountError::EmailAlreadyRegistered);
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AccountError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|user| user.id == *id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AccountError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|user| user.email.as_str() == email).cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, AccountError> {
        Ok(self.users.lock().unwrap().clone())
    }

    async fn update_profile(
        &self,
        id: &UserId,
        command: &UpdateUserCommand,
    ) -> Result<Option<User>, AccountError> {
        let mut users = self.users.lock().unwrap();

        if let Some(email) = &command.email {
            if users
                .iter()
                .any(|user| user.email == *email && user.id != *id)
            {
                return Err(AccountError::EmailAlreadyRegistered);
            }
        }

        let Some(user) = users.iter_mut().find(|user| user.id == *id) else {
            return Ok(None);
        };

        if let Some(email) = &command.email {
            user.email = email.clone();
        }
        if let Some(first_name) = &command.first_name {
            user.first_name = first_name.clone();
        }
        if let Some(last_name) = &command.last_name {
            user.last_name = Some(last_name.clone());
        }
        if let Some(membership_number) = &command.membership_number {
            user.membership_number = Some(membership_number.clone());
        }

        Ok(Some(user.clone()))
    }

    async fn store_forgot_token(&self, email: &str, token: &str) -> Result<u64, AccountError> {
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|user| user.email.as_str() == email) {
            Some(user) => {
                user.forgot_password_token = Some(token.to_string());
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn redeem_forgot_token(
        &self,
        token: &str,
        new_password_digest: &str,
    ) -> Result<u64, AccountError> {
        let mut users = self.users.lock().unwrap();
        match users
            .iter_mut()
            .find(|user| user.forgot_password_token.as_deref() == Some(token))
        {
            Some(user) => {
                user.password = new_password_digest.to_string();
                user.forgot_password_token = None;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn update_password(
        &self,
        id: &UserId,
        current_digest: &str,
        new_digest: &str,
    ) -> Result<u64, AccountError> {
        let mut users = self.users.lock().unwrap();
        match users
            .iter_mut()
            .find(|user| user.id == *id && user.password == current_digest)
        {
            Some(user) => {
                user.password = new_digest.to_string();
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

/// In-memory role store keyed by (user, service path).
#[derive(Default)]
pub struct InMemoryRoleStore {
    bindings: Mutex<HashMap<(UserId, String), Vec<String>>>,
}

impl InMemoryRoleStore {
    /// Seed a role binding directly, bypassing the assignment flow.
    pub fn grant(&self, user_id: UserId, service_path: &str, roles: &[&str]) {
        self.bindings.lock().unwrap().insert(
            (user_id, service_path.to_string()),
            roles.iter().map(|role| role.to_string()).collect(),
        );
    }
}

#[async_trait]
impl RoleStore for InMemoryRoleStore {
    async fn replace_roles(
        &self,
        user_id: &UserId,
        assignment: &RoleMap,
    ) -> Result<(), RoleStoreError> {
        let mut bindings = self.bindings.lock().unwrap();
        for (service_path, roles) in assignment {
            bindings.insert((*user_id, service_path.clone()), roles.clone());
        }
        Ok(())
    }

    async fn has_all_roles(
        &self,
        user_id: &UserId,
        service_path: &str,
        required: &[String],
    ) -> Result<bool, RoleStoreError> {
        let bindings = self.bindings.lock().unwrap();
        Ok(bindings
            .get(&(*user_id, service_path.to_string()))
            .is_some_and(|held| required.iter().all(|role| held.contains(role))))
    }

    async fn has_any_roles(
        &self,
        user_id: &UserId,
        service_path: &str,
        candidate: &[String],
    ) -> Result<bool, RoleStoreError> {
        let bindings = self.bindings.lock().unwrap();
        Ok(bindings
            .get(&(*user_id, service_path.to_string()))
            .is_some_and(|held| candidate.iter().any(|role| held.contains(role))))
    }

    async fn list_roles(&self, user_id: &UserId) -> Result<RoleMap, RoleStoreError> {
        let bindings = self.bindings.lock().unwrap();
        Ok(bindings
            .iter()
            .filter(|((id, _), _)| id == user_id)
            .map(|((_, path), roles)| (path.clone(), roles.clone()))
            .collect())
    }
}

/// Fixed service registry standing in for the gateway.
pub struct StaticServiceRegistry {
    services: Vec<ServiceDescriptor>,
}

#[async_trait]
impl ServiceRegistry for StaticServiceRegistry {
    async fn all_services(&self) -> Result<Vec<ServiceDescriptor>, RegistryError> {
        Ok(self.services.clone())
    }
}

/// Mailer that records outgoing reset tokens instead of sending anything.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingMailer {
    pub fn last_token(&self) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .last()
            .map(|(_, token)| token.clone())
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_password_reset(&self, to: &str, token: &str) -> Result<(), MailerError> {
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), token.to_string()));
        Ok(())
    }
}

/// Test application that spawns a real server over in-memory adapters
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub role_store: Arc<InMemoryRoleStore>,
    pub mailer: Arc<RecordingMailer>,
    signer: ServiceTokenVerifier,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let repository = Arc::new(InMemoryAccountRepository::default());
        let role_store = Arc::new(InMemoryRoleStore::default());
        let registry = Arc::new(StaticServiceRegistry {
            services: vec![
                ServiceDescriptor {
                    path: OWN_SERVICE_PATH.to_string(),
                    roles: vec!["admin".to_string()],
                },
                ServiceDescriptor {
                    path: "orders".to_string(),
                    roles: vec!["admin".to_string(), "viewer".to_string()],
                },
            ],
        });
        let mailer = Arc::new(RecordingMailer::default());

        let account_service = Arc::new(AccountService::new(
            repository,
            Arc::clone(&role_store),
            registry,
            Arc::clone(&mailer),
        ));
        let gate = Arc::new(AuthorizationGate::new(
            Arc::clone(&role_store),
            OWN_SERVICE_PATH,
        ));
        let verifier = Arc::new(ServiceTokenVerifier::new(SERVICE_SECRET));

        let router = create_router(account_service, gate, verifier);

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            role_store,
            mailer,
            signer: ServiceTokenVerifier::new(SERVICE_SECRET),
        }
    }

    /// Helper to make an unauthenticated GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make an unauthenticated POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make a GET request carrying a valid service token
    pub fn get_as(&self, path: &str, user_id: Option<UserId>) -> reqwest::RequestBuilder {
        self.with_identity(self.get(path), user_id)
    }

    /// Helper to make a POST request carrying a valid service token
    pub fn post_as(&self, path: &str, user_id: Option<UserId>) -> reqwest::RequestBuilder {
        self.with_identity(self.post(path), user_id)
    }

    /// Helper to make a PATCH request carrying a valid service token
    pub fn patch_as(&self, path: &str, user_id: Option<UserId>) -> reqwest::RequestBuilder {
        self.with_identity(
            self.api_client.patch(format!("{}{}", self.address, path)),
            user_id,
        )
    }

    /// Authorization header signed at an arbitrary timestamp
    pub fn authorization_at(&self, timestamp: i64) -> String {
        let token = self.signer.sign(CALLER_PATH, timestamp);
        format!("Service {} {} {}", token, CALLER_PATH, timestamp)
    }

    /// Attach a freshly signed authorization header plus the trusted
    /// identity headers a gateway would forward
    fn with_identity(
        &self,
        builder: reqwest::RequestBuilder,
        user_id: Option<UserId>,
    ) -> reqwest::RequestBuilder {
        let timestamp = Utc::now().timestamp_millis();
        let token = self.signer.sign(CALLER_PATH, timestamp);
        let builder = builder
            .header(
                "authorization",
                format!("Service {} {} {}", token, CALLER_PATH, timestamp),
            )
            .header("x-service", CALLER_PATH);

        match user_id {
            Some(id) => builder.header("x-userid", id.to_string()),
            None => builder,
        }
    }
}

/// Client-side password digest as a real client would compute before
/// transmission.
pub fn pre_hash(password: &str) -> String {
    Hasher::digest(password)
}
