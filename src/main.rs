//! Service entrypoint.
//!
//! Wires configuration, the PostgreSQL pool, the Redis event publisher and
//! the JWT verifier into the HTTP router, then serves until shutdown.

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use coupon_service::adapters::auth::{JwtConfig, JwtTokenVerifier};
use coupon_service::adapters::events::RedisEventPublisher;
use coupon_service::adapters::http::{api_router, AppState};
use coupon_service::adapters::postgres::{
    PostgresCampaignRepository, PostgresCouponStore, PostgresOrderRepository, PostgresUsageLog,
};
use coupon_service::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load and validate configuration
    let config = AppConfig::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level)),
        )
        .init();

    config.validate()?;

    tracing::info!(
        environment = ?config.server.environment,
        "starting coupon service"
    );

    // 2. Connect to PostgreSQL
    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        tracing::info!("running database migrations");
        sqlx::migrate!("./migrations").run(&pool).await?;
    }

    // 3. Connect to Redis for event publishing
    let redis_client = redis::Client::open(config.redis.url.as_str())?;
    let redis_conn = redis_client.get_multiplexed_async_connection().await?;
    let events =
        RedisEventPublisher::new(redis_conn).with_channel(config.redis.channel.clone());

    // 4. Assemble application state
    let jwt = JwtConfig {
        secret: config.auth.jwt_secret.clone(),
        leeway_secs: config.auth.token_leeway_secs,
    };

    let state = AppState {
        coupons: Arc::new(PostgresCouponStore::new(pool.clone())),
        campaigns: Arc::new(PostgresCampaignRepository::new(pool.clone())),
        orders: Arc::new(PostgresOrderRepository::new(pool.clone())),
        usage: Arc::new(PostgresUsageLog::new(pool)),
        events: Arc::new(events),
        verifier: Arc::new(JwtTokenVerifier::new(&jwt)),
    };

    // 5. Build the router with middleware layers
    let cors = cors_layer(&config);
    let app = api_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(cors);

    // 6. Serve
    let addr = config.server.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds the CORS layer from configured origins.
///
/// No configured origins means same-origin deployment; the layer then
/// allows nothing cross-origin.
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<_> = config
        .server
        .cors_origins_list()
        .iter()
        .filter_map(|o| o.parse::<http::HeaderValue>().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::new()
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([
                http::Method::GET,
                http::Method::POST,
                http::Method::PUT,
                http::Method::DELETE,
            ])
            .allow_headers([http::header::AUTHORIZATION, http::header::CONTENT_TYPE])
    }
}
