//! Shared test helpers for integration tests.
//!
//! The suite runs against a real PostgreSQL database named by
//! `DRIVEHUB_TEST_DATABASE_URL`. When the variable is unset every test
//! returns early. Each test creates its own users, so tests do not share
//! rows and need no cleanup.

use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use drivehub_api::{AppState, build_app};
use drivehub_auth::JwtEncoder;
use drivehub_core::config::AppConfig;
use drivehub_core::types::UserId;
use drivehub_database::DatabasePool;
use drivehub_database::migration::run_migrations;
use drivehub_storage::StorageManager;

const BASE_URL: &str = "http://drive.test";
const BOUNDARY: &str = "drivehub-test-boundary";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Database pool for direct queries
    pub db_pool: PgPool,
    encoder: JwtEncoder,
}

/// A response with its JSON body decoded (or `Null` when not JSON).
pub struct TestResponse {
    /// HTTP status
    pub status: StatusCode,
    /// Decoded body
    pub body: Value,
    /// Raw body bytes
    pub bytes: bytes::Bytes,
}

/// A provisioned user and a bearer token for them.
pub struct TestUser {
    /// The user's id
    pub id: UserId,
    /// Bearer token
    pub token: String,
}

impl TestApp {
    /// Create a new test application, or `None` when no test database is configured.
    pub async fn new() -> Option<Self> {
        let url = std::env::var("DRIVEHUB_TEST_DATABASE_URL").ok()?;

        let config: AppConfig = serde_json::from_value(json!({
            "database": { "url": url, "run_migrations": true },
            "auth": { "jwt_secret": "integration-test-secret-0123456789" },
            "storage": {
                "provider": "memory",
                "public_base_url": BASE_URL,
                "max_upload_size_bytes": 1_048_576,
            },
        }))
        .expect("test config");

        let db_pool = PgPool::connect(&config.database.url)
            .await
            .expect("Failed to connect to test database");
        run_migrations(&db_pool)
            .await
            .expect("Failed to run migrations");

        let storage = StorageManager::from_config(&config.storage)
            .await
            .expect("Failed to init storage");
        let encoder = JwtEncoder::new(&config.auth);
        let state = AppState::new(config, DatabasePool::from_pool(db_pool.clone()), storage);

        Some(Self {
            router: build_app(state),
            db_pool,
            encoder,
        })
    }

    /// Insert a user row with the given quota and mint a token for them.
    pub async fn create_user(&self, quota_bytes: i64) -> TestUser {
        let id = UserId::new();
        sqlx::query("INSERT INTO users (id, email, storage_quota) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(format!("{id}@drive.test"))
            .bind(quota_bytes)
            .execute(&self.db_pool)
            .await
            .expect("Failed to create test user");

        let token = self
            .encoder
            .issue(id, chrono::Duration::minutes(10))
            .expect("Failed to issue token");
        TestUser { id, token }
    }

    /// Send a JSON request, optionally authenticated.
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        self.send(request).await
    }

    /// Upload `data` as `name` through the multipart endpoint.
    pub async fn upload(
        &self,
        user: &TestUser,
        parent_id: Option<&str>,
        name: &str,
        data: &[u8],
    ) -> TestResponse {
        let mut body = Vec::new();
        if let Some(parent_id) = parent_id {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"parentId\"\r\n\r\n{parent_id}\r\n"
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        let request = Request::builder()
            .method("POST")
            .uri("/api/resources/upload")
            .header(header::AUTHORIZATION, format!("Bearer {}", user.token))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .expect("request");

        self.send(request).await
    }

    /// Create a folder and return its id.
    pub async fn folder(&self, user: &TestUser, name: &str, parent_id: Option<&str>) -> String {
        let response = self
            .request(
                "POST",
                "/api/resources",
                Some(json!({ "name": name, "parentId": parent_id })),
                Some(&user.token),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        id_of(&response.body["data"])
    }

    /// Fetch a signed download link through the blob route.
    pub async fn fetch_signed(&self, signed_url: &str) -> TestResponse {
        let uri = signed_url
            .strip_prefix(BASE_URL)
            .expect("link under the configured base URL");
        let request = Request::builder().uri(uri).body(Body::empty()).expect("request");
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = tokio::time::timeout(
            Duration::from_secs(30),
            self.router.clone().oneshot(request),
        )
        .await
        .expect("request timed out")
        .expect("infallible");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        TestResponse {
            status,
            body,
            bytes,
        }
    }
}

/// The `id` field of a JSON resource as a string.
pub fn id_of(value: &Value) -> String {
    value["id"].as_str().expect("id").to_string()
}

/// A fresh random id, for addressing rows that do not exist.
pub fn missing_id() -> String {
    Uuid::new_v4().to_string()
}
