#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::Value;
use tower::ServiceExt;

use emargement_api::auth::jwt::{Claims, JwtConfig};
use emargement_api::config::ServerConfig;
use emargement_api::router::build_app_router;
use emargement_api::state::AppState;
use emargement_core::memory::InMemoryStore;
use emargement_core::roles::{ROLE_ADMIN, ROLE_CLIENT, ROLE_TRAINER};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        sign_max_attempts: 3,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
        },
    }
}

/// Build the full application router over `store`, with the same
/// middleware stack as production.
pub fn build_test_app(store: Arc<InMemoryStore>) -> Router {
    let config = test_config();
    let state = AppState {
        store: store.clone(),
        directory: store,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Sign a 15-minute access token the way the back office does.
fn token(user_id: i64, role: &str) -> String {
    let claims = Claims {
        sub: user_id,
        role: role.to_string(),
        exp: chrono::Utc::now().timestamp() + 15 * 60,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(test_config().jwt.secret.as_bytes()),
    )
    .unwrap()
}

pub fn admin_token() -> String {
    token(1, ROLE_ADMIN)
}

pub fn trainer_token() -> String {
    token(2, ROLE_TRAINER)
}

pub fn client_token() -> String {
    token(3, ROLE_CLIENT)
}

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    bearer: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str, bearer: Option<&str>) -> Response<Body> {
    send(app, Method::GET, uri, bearer, None).await
}

pub async fn post_json(
    app: Router,
    uri: &str,
    bearer: Option<&str>,
    body: Value,
) -> Response<Body> {
    send(app, Method::POST, uri, bearer, Some(body)).await
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
