//! Integration tests for the pinned-news slots.

use assert_matches::assert_matches;
use gemeinde_core::error::CoreError;
use gemeinde_core::pinning::{plan_move, plan_pin, plan_reorder, plan_unpin, PinDirection};
use gemeinde_core::types::DbId;
use gemeinde_db::models::news::{CreateNews, News};
use gemeinde_db::models::user::CreateUser;
use gemeinde_db::repositories::{NewsRepo, PinUpdateError, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn author(pool: &PgPool) -> DbId {
    UserRepo::create(
        pool,
        &CreateUser {
            username: "redaktion".to_string(),
            email: "redaktion@gemeinde.test".to_string(),
            password_hash: "not-a-real-hash".to_string(),
            role_id: Some(3),
            custom_permissions: vec![],
            verein_id: None,
        },
    )
    .await
    .unwrap()
    .id
}

async fn news(pool: &PgPool, created_by: DbId, title: &str) -> News {
    let input = CreateNews {
        title: title.to_string(),
        slug: None,
        summary: None,
        body: "Text".to_string(),
        image_key: None,
        is_published: true,
    };
    let slug = title.to_lowercase().replace(' ', "-");
    NewsRepo::create(pool, &input, &slug, created_by).await.unwrap()
}

async fn pin(pool: &PgPool, id: DbId) -> Result<Vec<News>, PinUpdateError> {
    NewsRepo::update_pins(pool, |current| plan_pin(current, id)).await
}

fn slots(pinned: &[News]) -> Vec<(DbId, Option<i16>)> {
    pinned.iter().map(|n| (n.id, n.pin_order)).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_pins_fill_slots_in_order(pool: PgPool) {
    let user = author(&pool).await;
    let a = news(&pool, user, "Erste").await;
    let b = news(&pool, user, "Zweite").await;

    pin(&pool, a.id).await.unwrap();
    let pinned = pin(&pool, b.id).await.unwrap();

    assert_eq!(slots(&pinned), [(a.id, Some(1)), (b.id, Some(2))]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_fourth_pin_is_rejected(pool: PgPool) {
    let user = author(&pool).await;
    let mut ids = Vec::new();
    for title in ["Eins", "Zwei", "Drei", "Vier"] {
        ids.push(news(&pool, user, title).await.id);
    }
    for id in &ids[..3] {
        pin(&pool, *id).await.unwrap();
    }

    let result = pin(&pool, ids[3]).await;
    assert_matches!(result, Err(PinUpdateError::Rejected(CoreError::Conflict(_))));

    let pinned = NewsRepo::list_pinned(&pool).await.unwrap();
    assert_eq!(pinned.len(), 3);
    assert!(!NewsRepo::find_by_id(&pool, ids[3]).await.unwrap().unwrap().is_pinned);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_pins_respect_cap(pool: PgPool) {
    let user = author(&pool).await;
    let mut ids = Vec::new();
    for i in 0..6 {
        ids.push(news(&pool, user, &format!("Meldung {i}")).await.id);
    }

    let handles: Vec<_> = ids
        .iter()
        .map(|id| {
            let pool = pool.clone();
            let id = *id;
            tokio::spawn(async move { pin(&pool, id).await })
        })
        .collect();

    let mut accepted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => accepted += 1,
            Err(e) => assert_matches!(e, PinUpdateError::Rejected(CoreError::Conflict(_))),
        }
    }
    assert_eq!(accepted, 3);

    let orders: Vec<Option<i16>> = NewsRepo::list_pinned(&pool)
        .await
        .unwrap()
        .iter()
        .map(|n| n.pin_order)
        .collect();
    assert_eq!(orders, [Some(1), Some(2), Some(3)]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unpin_compacts_slots(pool: PgPool) {
    let user = author(&pool).await;
    let a = news(&pool, user, "A").await;
    let b = news(&pool, user, "B").await;
    let c = news(&pool, user, "C").await;
    for id in [a.id, b.id, c.id] {
        pin(&pool, id).await.unwrap();
    }

    let pinned = NewsRepo::update_pins(&pool, |current| Ok(plan_unpin(current, a.id)))
        .await
        .unwrap();

    assert_eq!(slots(&pinned), [(b.id, Some(1)), (c.id, Some(2))]);
    let a = NewsRepo::find_by_id(&pool, a.id).await.unwrap().unwrap();
    assert!(!a.is_pinned);
    assert_eq!(a.pin_order, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_move_and_reorder(pool: PgPool) {
    let user = author(&pool).await;
    let a = news(&pool, user, "A").await;
    let b = news(&pool, user, "B").await;
    let c = news(&pool, user, "C").await;
    for id in [a.id, b.id, c.id] {
        pin(&pool, id).await.unwrap();
    }

    let pinned = NewsRepo::update_pins(&pool, |current| plan_move(current, c.id, PinDirection::Up))
        .await
        .unwrap();
    assert_eq!(slots(&pinned), [(a.id, Some(1)), (c.id, Some(2)), (b.id, Some(3))]);

    let pinned = NewsRepo::update_pins(&pool, |current| plan_reorder(current, &[b.id, a.id, c.id]))
        .await
        .unwrap();
    assert_eq!(slots(&pinned), [(b.id, Some(1)), (a.id, Some(2)), (c.id, Some(3))]);

    let result =
        NewsRepo::update_pins(&pool, |current| plan_move(current, b.id, PinDirection::Up)).await;
    assert_matches!(result, Err(PinUpdateError::Rejected(CoreError::Validation(_))));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleting_pinned_news_frees_its_slot(pool: PgPool) {
    let user = author(&pool).await;
    let a = news(&pool, user, "A").await;
    let b = news(&pool, user, "B").await;
    pin(&pool, a.id).await.unwrap();
    pin(&pool, b.id).await.unwrap();

    let deleted = NewsRepo::delete(&pool, a.id).await.unwrap().unwrap();
    assert_eq!(deleted.id, a.id);

    let pinned = NewsRepo::list_pinned(&pool).await.unwrap();
    assert_eq!(slots(&pinned), [(b.id, Some(1))]);
    assert!(NewsRepo::delete(&pool, a.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_puts_pinned_first(pool: PgPool) {
    let user = author(&pool).await;
    let old = news(&pool, user, "Alt").await;
    let new = news(&pool, user, "Neu").await;
    pin(&pool, old.id).await.unwrap();

    let listed = NewsRepo::list(&pool, true, 10, 0).await.unwrap();
    let ids: Vec<DbId> = listed.iter().map(|n| n.id).collect();
    assert_eq!(ids, [old.id, new.id]);
}
