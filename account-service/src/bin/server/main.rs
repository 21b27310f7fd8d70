use std::sync::Arc;

use account_service::config::Config;
use account_service::domain::auth::service::AuthService;
use account_service::domain::user::service::UserService;
use account_service::inbound::http::router::router;
use account_service::inbound::http::router::AppState;
use account_service::outbound::repositories::PostgresUserRepository;
use account_service::outbound::session::PgSessionFactory;
use auth::Authenticator;
use jsonwebtoken::Algorithm;
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
        database_url = %config.database.url,
        http_port = config.server.http_port,
        jwt_algorithm = %config.jwt.algorithm,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let algorithm: Algorithm = config
        .jwt
        .algorithm
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid jwt.algorithm {:?}: {e:?}", config.jwt.algorithm))?;

    let authenticator = Arc::new(Authenticator::new(
        config.jwt.secret_key.as_bytes(),
        algorithm,
        config.jwt.access_token_expire_seconds,
    ));

    let user_repository = Arc::new(PostgresUserRepository::new());
    let user_service = Arc::new(UserService::new(Arc::clone(&user_repository)));
    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&user_repository),
        Arc::clone(&authenticator),
    ));
    let sessions = Arc::new(PgSessionFactory::new(pg_pool));

    let state = AppState {
        user_service,
        auth_service,
        sessions,
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, router(state)).await?;

    Ok(())
}
