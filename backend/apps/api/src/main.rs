//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use accounts::{AccountsConfig, PgAccountRepository, accounts_router};
use anyhow::Context;
use axum::{
    Router, http,
    http::{Method, header},
};
use billing::{BillingConfig, StripeGateway, billing_router};
use devices::devices_router;
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use verify::{IdenfyProvider, VerifyConfig, verify_router};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,accounts=info,billing=info,verify=info,devices=info,tower_http=info"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let admin_token = env::var("ADMIN_TOKEN").ok();

    let accounts_config = AccountsConfig {
        admin_token: admin_token.clone(),
    };

    // Billing configuration
    let (billing_config, gateway) = if cfg!(debug_assertions) {
        (
            BillingConfig::development(),
            StripeGateway::new(
                env::var("STRIPE_SECRET_KEY").unwrap_or_else(|_| "sk_test_dev".to_string()),
            ),
        )
    } else {
        // In production, load secrets from environment
        let webhook_secret = env::var("STRIPE_WEBHOOK_SECRET")
            .context("STRIPE_WEBHOOK_SECRET must be set in production")?;
        let secret_key =
            env::var("STRIPE_SECRET_KEY").context("STRIPE_SECRET_KEY must be set in production")?;
        (
            BillingConfig::new(webhook_secret, admin_token.clone()),
            StripeGateway::new(secret_key),
        )
    };

    // Identity provider configuration
    let (verify_config, provider) = if cfg!(debug_assertions) {
        let config = VerifyConfig::development();
        let provider = IdenfyProvider::new(config.api_key.clone(), config.api_secret.clone());
        (config, provider)
    } else {
        let api_key =
            env::var("IDENFY_API_KEY").context("IDENFY_API_KEY must be set in production")?;
        let api_secret =
            env::var("IDENFY_API_SECRET").context("IDENFY_API_SECRET must be set in production")?;
        // The provider's webhook is unsigned unless a secret is agreed on
        let webhook_secret = env::var("IDENFY_WEBHOOK_SECRET").ok();
        let provider = IdenfyProvider::new(api_key.clone(), api_secret.clone());
        (VerifyConfig::new(api_key, api_secret, webhook_secret), provider)
    };

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:40922,http://127.0.0.1:40922".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let app = Router::new()
        .nest(
            "/api/accounts",
            accounts_router(PgAccountRepository::new(pool.clone()), accounts_config),
        )
        .nest(
            "/api/billing",
            billing_router(pool.clone(), gateway, billing_config),
        )
        .nest(
            "/api/verify",
            verify_router(pool.clone(), provider, verify_config),
        )
        .nest("/api/devices", devices_router(pool.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(31113u16);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
