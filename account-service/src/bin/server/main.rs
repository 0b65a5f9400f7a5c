use std::sync::Arc;

use account_service::config::Config;
use account_service::domain::account::service::AccountService;
use account_service::domain::authz::AuthorizationGate;
use account_service::inbound::http::router::create_router;
use account_service::inbound::http::router::SERVICE_ROLES;
use account_service::outbound::email::SmtpMailer;
use account_service::outbound::gateway::GatewayClient;
use account_service::outbound::gateway::ServiceRegistration;
use account_service::outbound::repositories::PostgresAccountRepository;
use account_service::outbound::repositories::PostgresRoleStore;
use auth::ServiceTokenVerifier;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "account_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "account-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        service_path = %config.service.path,
        gateway_url = %config.gateway.url,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let verifier = Arc::new(ServiceTokenVerifier::new(config.service.secret.clone()));
    let account_repository = Arc::new(PostgresAccountRepository::new(pg_pool.clone()));
    let role_store = Arc::new(PostgresRoleStore::new(pg_pool));
    let gateway = Arc::new(GatewayClient::new(&config.gateway, &config.service));
    let mailer = Arc::new(SmtpMailer::new(&config.email)?);

    let account_service = Arc::new(AccountService::new(
        account_repository,
        Arc::clone(&role_store),
        Arc::clone(&gateway),
        mailer,
    ));
    let gate = Arc::new(AuthorizationGate::new(
        role_store,
        config.service.path.clone(),
    ));

    // Announce ourselves to the gateway. Startup proceeds even when the
    // gateway is down; registration can be retried by restarting.
    let registration = ServiceRegistration {
        name: config.service.name.clone(),
        path: config.service.path.clone(),
        url: config.service.url.clone(),
        roles: SERVICE_ROLES.iter().map(|role| role.to_string()).collect(),
    };
    match gateway.register(&registration).await {
        Ok(()) => tracing::info!(
            path = %registration.path,
            "Service registered at gateway"
        ),
        Err(e) => tracing::warn!(
            error = %e,
            gateway_url = %config.gateway.url,
            "Gateway registration failed, continuing without it"
        ),
    }

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(account_service, gate, verifier);
    axum::serve(http_listener, http_application).await?;

    Ok(())
}
