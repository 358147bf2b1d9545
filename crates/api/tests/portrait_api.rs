//! Integration tests for portrait submission and review.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, delete, get, get_as, multipart_body, png_bytes, post_json, post_multipart,
    signed_in,
};
use serde_json::{json, Value};
use sqlx::PgPool;

async fn submit(app: &axum::Router, with_photo: bool) -> Value {
    let photo = png_bytes(4, 4);
    let response = post_multipart(
        app.clone(),
        "/api/v1/portraits",
        None,
        multipart_body(
            &[
                ("name", "Anna Huber"),
                ("title", "Seit 40 Jahren Bäckerin"),
                ("body", "Jeden Morgen um vier ..."),
                ("contact_email", "anna@example.org"),
            ],
            with_photo.then_some(photo.as_slice()),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

async fn review(app: &axum::Router, cookie: &str, id: i64, decision: &str) -> axum::response::Response {
    post_json(
        app.clone(),
        &format!("/api/v1/portraits/{id}/review"),
        Some(cookie),
        json!({ "decision": decision, "note": "Danke!" }),
    )
    .await
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn submission_is_pending_and_private(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let portrait = submit(&app, false).await;

    // The public response never carries the contact address.
    assert!(portrait.get("contact_email").is_none());
    assert!(portrait.get("status").is_none());

    let public = body_json(get(app.clone(), "/api/v1/portraits").await).await;
    assert!(public["data"].as_array().unwrap().is_empty());

    let editor = signed_in(&pool, &app, "erika", Some("editor")).await;
    let queue = body_json(
        get_as(app, "/api/v1/portraits/submissions?status=pending", &editor).await,
    )
    .await;
    assert_eq!(queue["data"].as_array().unwrap().len(), 1);
    assert_eq!(queue["data"][0]["status"], "pending");
    assert_eq!(queue["data"][0]["contact_email"], "anna@example.org");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn approval_publishes_and_is_final(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let editor = signed_in(&pool, &app, "erika", Some("editor")).await;
    let id = submit(&app, false).await["id"].as_i64().unwrap();

    let approved = review(&app, &editor, id, "approve").await;
    assert_eq!(approved.status(), StatusCode::OK);
    let approved = body_json(approved).await;
    assert_eq!(approved["data"]["status"], "approved");
    assert_eq!(approved["data"]["review_note"], "Danke!");
    assert!(approved["data"]["reviewed_at"].is_string());

    let public = body_json(get(app.clone(), "/api/v1/portraits").await).await;
    assert_eq!(public["data"].as_array().unwrap().len(), 1);
    assert!(public["data"][0].get("contact_email").is_none());

    let again = review(&app, &editor, id, "reject").await;
    assert_eq!(again.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn photo_is_served_only_after_approval(pool: PgPool) {
    let (app, blobs) = common::build_test_app_with_store(pool.clone());
    let portrait = submit(&app, true).await;
    let id = portrait["id"].as_i64().unwrap();
    let key = portrait["image_key"].as_str().unwrap().to_string();
    assert!(key.starts_with("portraits/"));
    assert!(blobs.contains(&key).await);

    let media = format!("/api/v1/media/{key}");
    assert_eq!(get(app.clone(), &media).await.status(), StatusCode::NOT_FOUND);

    let editor = signed_in(&pool, &app, "erika", Some("editor")).await;
    assert_eq!(get_as(app.clone(), &media, &editor).await.status(), StatusCode::OK);

    review(&app, &editor, id, "approve").await;
    assert_eq!(get(app, &media).await.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn rejected_portraits_stay_hidden(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let editor = signed_in(&pool, &app, "erika", Some("editor")).await;
    let id = submit(&app, false).await["id"].as_i64().unwrap();

    assert_eq!(review(&app, &editor, id, "reject").await.status(), StatusCode::OK);
    let public = body_json(get(app, "/api/v1/portraits").await).await;
    assert!(public["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn review_and_delete_need_permissions(pool: PgPool) {
    let (app, blobs) = common::build_test_app_with_store(pool.clone());
    let club = signed_in(&pool, &app, "vera", Some("verein")).await;
    let editor = signed_in(&pool, &app, "erika", Some("editor")).await;
    let admin = signed_in(&pool, &app, "adam", Some("admin")).await;
    let portrait = submit(&app, true).await;
    let id = portrait["id"].as_i64().unwrap();

    assert_eq!(review(&app, &club, id, "approve").await.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        get_as(app.clone(), "/api/v1/portraits/submissions", &club).await.status(),
        StatusCode::FORBIDDEN
    );

    // Editors review but may not delete.
    let path = format!("/api/v1/portraits/{id}");
    assert_eq!(delete(app.clone(), &path, &editor).await.status(), StatusCode::FORBIDDEN);
    assert_eq!(delete(app, &path, &admin).await.status(), StatusCode::NO_CONTENT);
    assert!(!blobs.contains(portrait["image_key"].as_str().unwrap()).await);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn submission_requires_text_fields(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_multipart(
        app,
        "/api/v1/portraits",
        None,
        multipart_body(&[("name", "Anna"), ("title", "")], None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
