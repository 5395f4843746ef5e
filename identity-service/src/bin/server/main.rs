use std::sync::Arc;

use auth::KeyMaterial;
use auth::PasswordHasher;
use auth::TokenCodec;
use auth::TokenIssuer;
use identity_service::config::Config;
use identity_service::domain::user::service::AuthService;
use identity_service::inbound::http::cookies::CookieSettings;
use identity_service::inbound::http::router::create_router;
use identity_service::outbound::repositories::PostgresUserDirectory;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "identity_service=debug,auth=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "identity-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        private_key_path = %config.auth.private_key_path,
        public_key_path = %config.auth.public_key_path,
        access_token_expires_in_minutes = config.auth.access_token_expires_in_minutes,
        refresh_token_expires_in_minutes = config.auth.refresh_token_expires_in_minutes,
        "Configuration loaded"
    );

    // Unusable key material is fatal before anything listens.
    let keys = KeyMaterial::from_pem_files(
        &config.auth.private_key_path,
        &config.auth.public_key_path,
    )
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to load signing keys");
        e
    })?;
    tracing::info!(algorithm = ?auth::jwt::keys::ALGORITHM, "Signing keys loaded");

    let token_issuer = TokenIssuer::new(
        TokenCodec::new(Arc::new(keys)),
        config.auth.token_lifetimes()?,
    );
    let lifetimes = token_issuer.lifetimes();
    let password_hasher = Arc::new(PasswordHasher::with_params(
        config.password.hashing_params(),
    )?);

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

    let user_directory = Arc::new(PostgresUserDirectory::new(pg_pool));
    let auth_service = Arc::new(AuthService::new(
        user_directory,
        password_hasher,
        token_issuer,
    ));

    let cookies = CookieSettings {
        access_max_age_seconds: lifetimes.access.num_seconds(),
        refresh_max_age_seconds: lifetimes.refresh.num_seconds(),
        secure: config.auth.cookie_secure,
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(auth_service, cookies);
    axum::serve(http_listener, http_application).await?;

    tracing::info!("Server exited successfully");

    Ok(())
}
