//! Integration tests for albums, image uploads and media serving.

mod common;

use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::http::StatusCode;
use common::{
    body_bytes, body_json, delete, get, multipart_body, png_bytes, post_json, post_multipart,
    put_json, signed_in,
};
use serde_json::json;
use sqlx::PgPool;

async fn album(app: &axum::Router, cookie: &str, title: &str, published: bool) -> i64 {
    let response = post_json(
        app.clone(),
        "/api/v1/gallery/albums",
        Some(cookie),
        json!({ "title": title, "is_published": published }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn upload_stores_blob_and_serves_it(pool: PgPool) {
    let (app, blobs) = common::build_test_app_with_store(pool.clone());
    let editor = signed_in(&pool, &app, "erika", Some("editor")).await;
    let album_id = album(&app, &editor, "Dorffest 2026", true).await;

    let png = png_bytes(8, 6);
    let response = post_multipart(
        app.clone(),
        &format!("/api/v1/gallery/albums/{album_id}/images"),
        Some(&editor),
        multipart_body(&[("caption", "Auf dem Dorfplatz")], Some(&png)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let image = body_json(response).await["data"].clone();
    let key = image["blob_key"].as_str().unwrap().to_string();
    assert!(key.starts_with(&format!("gallery/{album_id}/")));
    assert_eq!(image["width"], 8);
    assert_eq!(image["height"], 6);
    assert_eq!(image["content_type"], "image/png");
    assert_eq!(image["caption"], "Auf dem Dorfplatz");
    assert!(blobs.contains(&key).await);

    let served = get(app.clone(), &format!("/api/v1/media/{key}")).await;
    assert_eq!(served.status(), StatusCode::OK);
    assert_eq!(served.headers().get(CONTENT_TYPE).unwrap(), "image/png");
    assert!(served.headers().get(CACHE_CONTROL).is_some());
    assert_eq!(body_bytes(served).await, png);

    let detail = body_json(get(app, &format!("/api/v1/gallery/albums/{album_id}")).await).await;
    assert_eq!(detail["data"]["image_count"], 1);
    assert_eq!(detail["data"]["images"][0]["blob_key"], key.as_str());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_images_are_rejected_and_nothing_is_stored(pool: PgPool) {
    let (app, blobs) = common::build_test_app_with_store(pool.clone());
    let editor = signed_in(&pool, &app, "erika", Some("editor")).await;
    let album_id = album(&app, &editor, "Dorffest", true).await;

    let response = post_multipart(
        app.clone(),
        &format!("/api/v1/gallery/albums/{album_id}/images"),
        Some(&editor),
        multipart_body(&[], Some(b"%PDF-1.7 definitely not an image")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let missing = post_multipart(
        app,
        &format!("/api/v1/gallery/albums/{album_id}/images"),
        Some(&editor),
        multipart_body(&[("caption", "ohne Bild")], None),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
    assert!(blobs.is_empty().await);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_an_album_removes_its_blobs(pool: PgPool) {
    let (app, blobs) = common::build_test_app_with_store(pool.clone());
    let editor = signed_in(&pool, &app, "erika", Some("editor")).await;
    let album_id = album(&app, &editor, "Dorffest", true).await;

    for _ in 0..2 {
        let response = post_multipart(
            app.clone(),
            &format!("/api/v1/gallery/albums/{album_id}/images"),
            Some(&editor),
            multipart_body(&[], Some(&png_bytes(2, 2))),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }
    assert_eq!(blobs.len().await, 2);

    let response = delete(app.clone(), &format!("/api/v1/gallery/albums/{album_id}"), &editor).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(blobs.is_empty().await);
    assert_eq!(
        get(app, &format!("/api/v1/gallery/albums/{album_id}")).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn image_caption_and_delete(pool: PgPool) {
    let (app, blobs) = common::build_test_app_with_store(pool.clone());
    let editor = signed_in(&pool, &app, "erika", Some("editor")).await;
    let album_id = album(&app, &editor, "Dorffest", true).await;

    let uploaded = post_multipart(
        app.clone(),
        &format!("/api/v1/gallery/albums/{album_id}/images"),
        Some(&editor),
        multipart_body(&[], Some(&png_bytes(2, 2))),
    )
    .await;
    let image = body_json(uploaded).await["data"].clone();
    let image_id = image["id"].as_i64().unwrap();

    let updated = put_json(
        app.clone(),
        &format!("/api/v1/gallery/images/{image_id}"),
        &editor,
        json!({ "caption": "Neu", "sort_order": 5 }),
    )
    .await;
    assert_eq!(updated.status(), StatusCode::OK);
    let updated = body_json(updated).await;
    assert_eq!(updated["data"]["caption"], "Neu");
    assert_eq!(updated["data"]["sort_order"], 5);

    let removed = delete(app, &format!("/api/v1/gallery/images/{image_id}"), &editor).await;
    assert_eq!(removed.status(), StatusCode::NO_CONTENT);
    assert!(!blobs.contains(image["blob_key"].as_str().unwrap()).await);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unpublished_albums_are_hidden(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let editor = signed_in(&pool, &app, "erika", Some("editor")).await;
    let hidden = album(&app, &editor, "Intern", false).await;
    album(&app, &editor, "Öffentlich", true).await;

    let public = body_json(get(app.clone(), "/api/v1/gallery/albums").await).await;
    assert_eq!(public["data"].as_array().unwrap().len(), 1);
    assert_eq!(public["data"][0]["slug"], "oeffentlich");
    assert_eq!(
        get(app, &format!("/api/v1/gallery/albums/{hidden}")).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn media_keys_are_validated(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app.clone(), "/api/v1/media/gallery/../secret.png").await;
    assert!(response.status().is_client_error());

    let missing = get(app, "/api/v1/media/content/missing.png").await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn content_upload_returns_a_key(pool: PgPool) {
    let (app, blobs) = common::build_test_app_with_store(pool.clone());
    let editor = signed_in(&pool, &app, "erika", Some("editor")).await;
    let club = signed_in(&pool, &app, "vera", Some("verein")).await;
    let nobody = signed_in(&pool, &app, "nora", None).await;

    let response = post_multipart(
        app.clone(),
        "/api/v1/media",
        Some(&editor),
        multipart_body(&[], Some(&png_bytes(3, 3))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let key = body_json(response).await["data"]["key"].as_str().unwrap().to_string();
    assert!(key.starts_with("content/"));
    assert!(blobs.contains(&key).await);

    // Event editors may attach images too.
    let club_upload = post_multipart(
        app.clone(),
        "/api/v1/media",
        Some(&club),
        multipart_body(&[], Some(&png_bytes(3, 3))),
    )
    .await;
    assert_eq!(club_upload.status(), StatusCode::CREATED);

    let denied = post_multipart(
        app,
        "/api/v1/media",
        Some(&nobody),
        multipart_body(&[], Some(&png_bytes(3, 3))),
    )
    .await;
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn gallery_images_cannot_be_attached_to_content(pool: PgPool) {
    let (app, blobs) = common::build_test_app_with_store(pool.clone());
    let editor = signed_in(&pool, &app, "erika", Some("editor")).await;
    let album_id = album(&app, &editor, "Dorffest", true).await;

    let uploaded = post_multipart(
        app.clone(),
        &format!("/api/v1/gallery/albums/{album_id}/images"),
        Some(&editor),
        multipart_body(&[], Some(&png_bytes(2, 2))),
    )
    .await;
    let key = body_json(uploaded).await["data"]["blob_key"].as_str().unwrap().to_string();

    let news = post_json(
        app.clone(),
        "/api/v1/news",
        Some(&editor),
        json!({ "title": "Dorffest", "body": "Text", "image_key": key }),
    )
    .await;
    assert_eq!(news.status(), StatusCode::BAD_REQUEST);

    let event = post_json(
        app.clone(),
        "/api/v1/events",
        Some(&editor),
        json!({ "title": "Dorffest", "starts_at": "2026-07-04T14:00:00Z", "image_key": key }),
    )
    .await;
    assert_eq!(event.status(), StatusCode::BAD_REQUEST);

    assert!(blobs.contains(&key).await);
    assert_eq!(get(app, &format!("/api/v1/media/{key}")).await.status(), StatusCode::OK);
}
