use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use inotebook_api::auth::google::{GoogleVerifier, IdentityVerifier};
use inotebook_api::config::ServerConfig;
use inotebook_api::router::build_app_router;
use inotebook_api::state::AppState;
use inotebook_notify::{
    ContactDigest, DigestConfig, DigestScheduler, EmailConfig, PgDigestStore, SmtpMailer,
};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "inotebook_api=debug,inotebook_db=info,inotebook_notify=info,tower_http=debug"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = inotebook_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    inotebook_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    inotebook_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Google sign-in ---
    let identity: Option<Arc<dyn IdentityVerifier>> = match &config.google {
        Some(google) => {
            tracing::info!("Google sign-in enabled");
            Some(Arc::new(GoogleVerifier::new(google)))
        }
        None => {
            tracing::warn!("GOOGLE_CLIENT_ID not set, Google sign-in disabled");
            None
        }
    };

    // --- Contact digest ---
    let digest_cancel = CancellationToken::new();
    let digest_handle = match EmailConfig::from_env() {
        Some(email_config) => {
            let mailer =
                SmtpMailer::new(&email_config).expect("Invalid SMTP configuration");
            let digest = ContactDigest::new(
                Arc::new(PgDigestStore::new(pool.clone())),
                Arc::new(mailer),
            );
            let scheduler = DigestScheduler::new(digest, DigestConfig::from_env());
            let cancel = digest_cancel.clone();
            tracing::info!("Contact digest scheduler started");
            Some(tokio::spawn(async move { scheduler.run(cancel).await }))
        }
        None => {
            tracing::warn!("SMTP_HOST not set, contact digest emails disabled");
            None
        }
    };

    // --- App state ---
    let shutdown_timeout = Duration::from_secs(config.shutdown_timeout_secs);
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );

    let state = AppState {
        pool,
        config: Arc::new(config),
        identity,
    };
    let app = build_app_router(state);

    // --- Start server ---
    tracing::info!(%addr, "Starting server");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    digest_cancel.cancel();
    if let Some(handle) = digest_handle {
        let wait = shutdown_timeout.min(Duration::from_secs(5));
        if tokio::time::timeout(wait, handle).await.is_err() {
            tracing::warn!("Digest scheduler did not stop in time");
        } else {
            tracing::info!("Digest scheduler stopped");
        }
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT (Ctrl-C) or SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
