//! Shared helpers for people-service integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use people_service::{
    build_router,
    config::{MongoConfig, PeopleConfig},
    models::{Person, PersonFields},
    services::{InMemoryStore, PersonStore},
    startup::Application,
    AppState,
};
use serde_json::Value;
use service_core::config::Config as CoreConfig;
use service_core::error::AppError;
use std::sync::Arc;
use tokio::sync::oneshot;
use tower::util::ServiceExt;

pub fn test_config() -> PeopleConfig {
    PeopleConfig {
        common: CoreConfig {
            port: 0, // Random port for testing
            log_level: "error".to_string(),
        },
        mongodb: MongoConfig {
            uri: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            database: None,
        },
    }
}

pub fn memory_router() -> Router {
    build_router(AppState::new(Arc::new(InMemoryStore::new())))
}

pub fn failing_router() -> Router {
    build_router(AppState::new(Arc::new(UnreachableStore)))
}

/// Send one request through the router. An empty response body reads as `null`.
pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("Failed to build request");

    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to execute request");

    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();

    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Response body is not JSON")
    };

    (status, json)
}

/// Store whose every call fails the way a dropped MongoDB connection would.
pub struct UnreachableStore;

fn unreachable() -> AppError {
    AppError::DatabaseError(anyhow::anyhow!("Server selection timeout: no available servers"))
}

#[async_trait]
impl PersonStore for UnreachableStore {
    async fn list_all(&self) -> Result<Vec<Person>, AppError> {
        Err(unreachable())
    }

    async fn create(&self, _fields: PersonFields) -> Result<Person, AppError> {
        Err(unreachable())
    }

    async fn get_by_id(&self, _id: &str) -> Result<Option<Person>, AppError> {
        Err(unreachable())
    }

    async fn update_by_id(
        &self,
        _id: &str,
        _fields: PersonFields,
    ) -> Result<Option<Person>, AppError> {
        Err(unreachable())
    }

    async fn delete_by_id(&self, _id: &str) -> Result<Option<Person>, AppError> {
        Err(unreachable())
    }
}

/// A running server over an in-memory store.
pub struct TestApp {
    pub address: String,
    pub port: u16,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let app = Application::build_with_store(test_config(), Arc::new(InMemoryStore::new()))
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);
        let (tx, rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            app.run_with_shutdown(async {
                rx.await.ok();
            })
            .await
            .ok();
        });

        // Wait for the server to accept connections
        let client = reqwest::Client::new();
        for _ in 0..50 {
            if client.get(&address).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            shutdown: Some(tx),
        }
    }

    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.stop();
    }
}
