// src/main.rs
use anyhow::{Context, Result};
use quire_core::application::{
    ports::{
        security::{PasswordHasher, TokenManager},
        time::Clock,
    },
    services::ApplicationServices,
};
use quire_core::config::AppConfig;
use quire_core::domain::account::AccountRepository;
use quire_core::infrastructure::{
    database,
    repositories::PostgresAccountRepository,
    security::{password::Argon2PasswordHasher, token::JwtTokenManager},
    time::SystemClock,
};
use quire_core::presentation::http::{routes::build_router_with_rate_limiter, state::HttpState};
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    if let Err(err) = bootstrap().await {
        tracing::error!(error = %err, "fatal error");
        eprintln!("fatal error: {err:#}");
        std::process::exit(1);
    }
}

async fn bootstrap() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    tracing::debug!(?config, "configuration loaded");

    let pool = database::init_pool(config.database_url())
        .await
        .context("connecting to the database")?;
    database::run_migrations(&pool)
        .await
        .context("running migrations")?;

    let account_repo: Arc<dyn AccountRepository> = Arc::new(PostgresAccountRepository::new(pool));
    let password_hasher: Arc<dyn PasswordHasher> =
        Arc::new(Argon2PasswordHasher::new(config.password_hash_cost())?);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let token_manager: Arc<dyn TokenManager> = Arc::new(JwtTokenManager::new(
        config.jwt_secret(),
        config.token_ttl(),
        Arc::clone(&clock),
    )?);

    let services = Arc::new(ApplicationServices::new(
        Arc::clone(&account_repo),
        Arc::clone(&password_hasher),
        Arc::clone(&token_manager),
        Arc::clone(&clock),
    ));

    let state = HttpState {
        services: Arc::clone(&services),
    };

    let app = build_router_with_rate_limiter(
        state,
        config.allowed_origins(),
        config.login_rate_limit(),
    );
    let service = app.into_make_service_with_connect_info::<SocketAddr>();

    let listener = tokio::net::TcpListener::bind(config.listen_addr())
        .await
        .with_context(|| format!("binding {}", config.listen_addr()))?;
    let address: SocketAddr = listener.local_addr()?;
    tracing::info!("listening on {address}");

    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .ok()
        .unwrap_or_else(|| "info,tower_http=info,sqlx=warn".to_string());

    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(env_filter))
        .with(tracing_subscriber::fmt::layer());

    if subscriber.try_init().is_err() {
        tracing::warn!("tracing subscriber already initialised");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for CTRL+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("shutdown signal received");
}
