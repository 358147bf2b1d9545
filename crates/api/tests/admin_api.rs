//! Integration tests for user, role and permission administration.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_user, delete, get_as, login, post_json, put_json, signed_in};
use gemeinde_api::bootstrap::{ensure_bootstrap_admin, BootstrapAdmin};
use gemeinde_core::permissions::CATALOG;
use gemeinde_db::repositories::RoleRepo;
use serde_json::json;
use sqlx::PgPool;

async fn role_id(pool: &PgPool, name: &str) -> i64 {
    RoleRepo::find_by_name(pool, name).await.unwrap().unwrap().id
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_creates_and_lists_users(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let admin = signed_in(&pool, &app, "adam", Some("admin")).await;
    let editor_role = role_id(&pool, "editor").await;

    let response = post_json(
        app.clone(),
        "/api/v1/admin/users",
        Some(&admin),
        json!({
            "username": "erika",
            "email": "erika@example.org",
            "password": "long enough password",
            "role_id": editor_role,
            "custom_permissions": ["contacts.create"],
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["data"]["role"], "editor");
    assert!(created["data"].get("password_hash").is_none());

    // The new account can sign in with the chosen password.
    let login = post_json(
        app.clone(),
        "/api/v1/auth/login",
        None,
        json!({ "username": "erika", "password": "long enough password" }),
    )
    .await;
    assert_eq!(login.status(), StatusCode::OK);

    let list = body_json(get_as(app, "/api/v1/admin/users", &admin).await).await;
    let names: Vec<&str> = list["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["username"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["adam", "erika"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn user_input_is_validated(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let admin = signed_in(&pool, &app, "adam", Some("admin")).await;

    for body in [
        json!({ "username": "x", "email": "x@example.org", "password": "short" }),
        json!({ "username": "x", "email": "not-an-email", "password": "long enough password" }),
        json!({ "username": "x", "email": "x@example.org", "password": "long enough password",
                "custom_permissions": ["News.Create"] }),
    ] {
        let response = post_json(app.clone(), "/api/v1/admin/users", Some(&admin), body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    let duplicate = post_json(
        app,
        "/api/v1/admin/users",
        Some(&admin),
        json!({ "username": "adam", "email": "other@example.org", "password": "long enough password" }),
    )
    .await;
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admins_cannot_escalate(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let admin = signed_in(&pool, &app, "adam", Some("admin")).await;
    let root_id = create_user(&pool, "root", Some("super_admin"), None).await;
    let super_role = role_id(&pool, "super_admin").await;

    let cases = [
        json!({ "username": "a", "email": "a@example.org", "password": "long enough password",
                "role_id": super_role }),
        json!({ "username": "b", "email": "b@example.org", "password": "long enough password",
                "custom_permissions": ["*"] }),
        json!({ "username": "c", "email": "c@example.org", "password": "long enough password",
                "custom_permissions": ["roles.manage"] }),
    ];
    for body in cases {
        let response = post_json(app.clone(), "/api/v1/admin/users", Some(&admin), body).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    let touch_root = put_json(
        app.clone(),
        &format!("/api/v1/admin/users/{root_id}"),
        &admin,
        json!({ "email": "hijack@example.org" }),
    )
    .await;
    assert_eq!(touch_root.status(), StatusCode::FORBIDDEN);

    let reset_root = post_json(
        app,
        &format!("/api/v1/admin/users/{root_id}/reset-password"),
        Some(&admin),
        json!({ "new_password": "another long password" }),
    )
    .await;
    assert_eq!(reset_root.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deactivation_and_password_reset(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let admin = signed_in(&pool, &app, "adam", Some("admin")).await;
    let erika = create_user(&pool, "erika", Some("editor"), None).await;
    let erika_cookie = login(&app, "erika").await;

    let reset = post_json(
        app.clone(),
        &format!("/api/v1/admin/users/{erika}/reset-password"),
        Some(&admin),
        json!({ "new_password": "a brand new password" }),
    )
    .await;
    assert_eq!(reset.status(), StatusCode::NO_CONTENT);
    let relogin = post_json(
        app.clone(),
        "/api/v1/auth/login",
        None,
        json!({ "username": "erika", "password": "a brand new password" }),
    )
    .await;
    assert_eq!(relogin.status(), StatusCode::OK);

    let removed = delete(app.clone(), &format!("/api/v1/admin/users/{erika}"), &admin).await;
    assert_eq!(removed.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        get_as(app.clone(), "/api/v1/auth/me", &erika_cookie).await.status(),
        StatusCode::UNAUTHORIZED
    );

    let me = body_json(get_as(app.clone(), "/api/v1/auth/me", &admin).await).await;
    let own_id = me["data"]["user"]["id"].as_i64().unwrap();
    let self_delete = delete(app, &format!("/api/v1/admin/users/{own_id}"), &admin).await;
    assert_eq!(self_delete.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn role_management(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let root = signed_in(&pool, &app, "root", Some("super_admin")).await;
    let admin = signed_in(&pool, &app, "adam", Some("admin")).await;

    // Admins may view roles but not manage them.
    assert_eq!(get_as(app.clone(), "/api/v1/admin/roles", &admin).await.status(), StatusCode::OK);
    let denied = post_json(
        app.clone(),
        "/api/v1/admin/roles",
        Some(&admin),
        json!({ "name": "fotograf", "permissions": ["gallery.upload"] }),
    )
    .await;
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);

    let created = post_json(
        app.clone(),
        "/api/v1/admin/roles",
        Some(&root),
        json!({ "name": "fotograf", "permissions": ["gallery.*"] }),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let id = body_json(created).await["data"]["id"].as_i64().unwrap();

    let invalid = put_json(
        app.clone(),
        &format!("/api/v1/admin/roles/{id}"),
        &root,
        json!({ "permissions": ["gallery"] }),
    )
    .await;
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

    let super_role = role_id(&pool, "super_admin").await;
    let protected = delete(app.clone(), &format!("/api/v1/admin/roles/{super_role}"), &root).await;
    assert_eq!(protected.status(), StatusCode::FORBIDDEN);

    let removed = delete(app, &format!("/api/v1/admin/roles/{id}"), &root).await;
    assert_eq!(removed.status(), StatusCode::NO_CONTENT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn permission_catalogue_is_grouped(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let admin = signed_in(&pool, &app, "adam", Some("admin")).await;

    let json = body_json(get_as(app, "/api/v1/admin/permissions", &admin).await).await;
    let groups = json["data"].as_array().unwrap();
    assert_eq!(groups[0]["category"], "events");
    let total: usize = groups
        .iter()
        .map(|g| g["permissions"].as_array().unwrap().len())
        .sum();
    assert_eq!(total, CATALOG.len());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn bootstrap_admin_only_on_empty_database(pool: PgPool) {
    let admin = BootstrapAdmin {
        username: "root".into(),
        email: "root@example.org".into(),
        password: "bootstrap password".into(),
    };
    assert!(ensure_bootstrap_admin(&pool, &admin).await.unwrap());
    assert!(!ensure_bootstrap_admin(&pool, &admin).await.unwrap());

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/login",
        None,
        json!({ "username": "root", "password": "bootstrap password" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["is_super_admin"], true);
}
