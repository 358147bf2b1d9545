#![allow(dead_code)]

use std::io::Cursor;
use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use gemeinde_api::auth::password::hash_password;
use gemeinde_api::auth::session::SessionConfig;
use gemeinde_api::config::ServerConfig;
use gemeinde_api::router::build_app_router;
use gemeinde_api::state::AppState;
use gemeinde_core::types::DbId;
use gemeinde_db::models::user::CreateUser;
use gemeinde_db::repositories::{RoleRepo, UserRepo};
use gemeinde_storage::MemoryBlobStore;
use http_body_util::BodyExt;
use image::{ImageBuffer, ImageFormat, Rgb};
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

/// Password given to every user created by [`create_user`].
pub const PASSWORD: &str = "correct horse battery";

const BOUNDARY: &str = "gemeinde-test-boundary";

/// Build a test `ServerConfig` with safe defaults and a fixed session key.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3001".to_string()],
        request_timeout_secs: 30,
        max_upload_bytes: 1024 * 1024,
        session: SessionConfig {
            secret: b"test-secret-that-is-at-least-32-bytes-long".to_vec(),
            cookie_secure: false,
        },
        bootstrap_admin: None,
    }
}

/// Build the full application router over an in-memory blob store.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_store(pool).0
}

/// Like [`build_test_app`], also returning the blob store for inspection.
pub fn build_test_app_with_store(pool: PgPool) -> (Router, Arc<MemoryBlobStore>) {
    let config = test_config();
    let blobs = Arc::new(MemoryBlobStore::new());
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        blobs: blobs.clone(),
    };
    (build_app_router(state, &config), blobs)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert an active user with [`PASSWORD`] and the named seeded role.
pub async fn create_user(
    pool: &PgPool,
    username: &str,
    role: Option<&str>,
    verein_id: Option<DbId>,
) -> DbId {
    let role_id = match role {
        Some(name) => Some(
            RoleRepo::find_by_name(pool, name)
                .await
                .unwrap()
                .unwrap_or_else(|| panic!("role {name} is seeded"))
                .id,
        ),
        None => None,
    };
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.org"),
            password_hash: hash_password(PASSWORD).unwrap(),
            role_id,
            custom_permissions: vec![],
            verein_id,
        },
    )
    .await
    .unwrap()
    .id
}

/// Create a user and sign them in, returning the `Cookie` header value.
pub async fn signed_in(pool: &PgPool, app: &Router, username: &str, role: Option<&str>) -> String {
    create_user(pool, username, role, None).await;
    login(app, username).await
}

/// Log in with [`PASSWORD`] and return the `Cookie` header value.
pub async fn login(app: &Router, username: &str) -> String {
    let response = post_json(
        app.clone(),
        "/api/v1/auth/login",
        None,
        serde_json::json!({ "username": username, "password": PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK, "login as {username}");
    session_cookie_of(&response).expect("login sets the session cookie")
}

/// The `name=value` part of the response's session cookie.
pub fn session_cookie_of(response: &Response) -> Option<String> {
    let set_cookie = response.headers().get(SET_COOKIE)?.to_str().ok()?;
    set_cookie.split(';').next().map(|s| s.trim().to_string())
}

/// A small valid PNG.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::new(width, height);
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

/// Encode a multipart/form-data body with text `fields` and an optional `file`.
pub fn multipart_body(fields: &[(&str, &str)], file: Option<&[u8]>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(bytes) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"upload.png\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Upload a PNG through `POST /media` and return its `content/` key.
pub async fn upload_content_image(app: &Router, cookie: &str) -> String {
    let response = post_multipart(
        app.clone(),
        "/api/v1/media",
        Some(cookie),
        multipart_body(&[], Some(&png_bytes(4, 4))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED, "content upload");
    body_json(response).await["data"]["key"]
        .as_str()
        .unwrap()
        .to_string()
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_as(app: Router, uri: &str, cookie: &str) -> Response {
    send(app, Method::GET, uri, Some(cookie), None).await
}

pub async fn post_json(app: Router, uri: &str, cookie: Option<&str>, body: Value) -> Response {
    send(app, Method::POST, uri, cookie, Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, cookie: &str, body: Value) -> Response {
    send(app, Method::PUT, uri, Some(cookie), Some(body)).await
}

pub async fn delete(app: Router, uri: &str, cookie: &str) -> Response {
    send(app, Method::DELETE, uri, Some(cookie), None).await
}

pub async fn post_multipart(app: Router, uri: &str, cookie: Option<&str>, body: Vec<u8>) -> Response {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"));
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    app.oneshot(builder.body(Body::from(body)).unwrap())
        .await
        .unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}
