//! Application startup and lifecycle management.

use crate::build_router;
use crate::config::PeopleConfig;
use crate::services::{MongoDb, PersonStore};
use crate::AppState;
use service_core::error::AppError;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
    mongo: Option<MongoDb>,
}

impl Application {
    /// Connect to MongoDB and bind the HTTP listener.
    pub async fn build(config: PeopleConfig) -> Result<Self, AppError> {
        let db = MongoDb::connect(&config.mongodb.uri, config.mongodb.database.as_deref())
            .await
            .map_err(|e| {
                tracing::error!("Failed to connect to MongoDB: {}", e);
                e
            })?;

        let store: Arc<dyn PersonStore> = Arc::new(db.clone());
        let mut app = Self::build_with_store(config, store).await?;
        app.mongo = Some(db);
        Ok(app)
    }

    /// Bind the HTTP listener over an already constructed store.
    ///
    /// Port 0 binds a random port; see [`Application::port`].
    pub async fn build_with_store(
        config: PeopleConfig,
        store: Arc<dyn PersonStore>,
    ) -> Result<Self, AppError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on port {}", port);

        Ok(Self {
            port,
            listener,
            state: AppState::new(store),
            mongo: None,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until Ctrl+C or SIGTERM.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.run_with_shutdown(shutdown_signal()).await
    }

    /// Serve until `signal` resolves, let in-flight requests finish, then
    /// close the MongoDB client if this application opened one.
    pub async fn run_with_shutdown<F>(self, signal: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let router = build_router(self.state);
        let result = axum::serve(self.listener, router)
            .with_graceful_shutdown(signal)
            .await;

        if let Err(e) = &result {
            tracing::error!("HTTP server error: {}", e);
        }

        if let Some(db) = self.mongo {
            db.shutdown().await;
        }

        result
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
