use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use feedback_api::{AppStateInner, Config};
use feedback_db::{Database, FeedbackStore};
use feedback_notify::{EmailSender, HttpEmailSender, LogEmailSender, NotificationDispatcher, Notifier, RemoteNotifier};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "feedback=debug,feedback_api=debug,feedback_notify=debug,tower_http=debug".into()),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("FATAL: {e:#}");
            eprintln!("       Set it in your .env file and restart.");
            std::process::exit(1);
        }
    };

    // Init database
    let store: Arc<dyn FeedbackStore> = Arc::new(Database::open(&config.db_path)?);

    // Email delivery
    let sender: Arc<dyn EmailSender> = match &config.email_api_key {
        Some(key) => Arc::new(HttpEmailSender::new(&config.email_api_url, key)),
        None => {
            warn!("FEEDBACK_EMAIL_API_KEY not set, notification emails will only be logged");
            Arc::new(LogEmailSender)
        }
    };
    let dispatcher = NotificationDispatcher::new(store.clone(), sender, &config.email_from);

    // Detached dispatch target after ingestion
    let notifier: Arc<dyn Notifier> = match &config.notify_url {
        Some(url) => {
            info!("Forwarding notifications to {}", url);
            Arc::new(RemoteNotifier::new(url, &config.service_key))
        }
        None => Arc::new(dispatcher.clone()),
    };

    let state = Arc::new(AppStateInner {
        store,
        notifier,
        dispatcher,
        service_key: config.service_key.clone(),
        anon_key: config.anon_key.clone(),
    });

    let app = feedback_api::router::build(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Feedback server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(sigterm) => sigterm,
                Err(e) => {
                    warn!("Failed to install SIGTERM handler: {}", e);
                    ctrl_c.await.ok();
                    info!("Received Ctrl+C, shutting down...");
                    return;
                }
            };
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
