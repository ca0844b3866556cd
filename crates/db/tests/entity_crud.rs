//! Integration tests for the plain CRUD entities: users, profiles, posts
//! and the product catalog.

use chrono::Duration;
use sqlx::PgPool;
use shoply_db::models::post::{CreatePost, UpdatePost};
use shoply_db::models::product::{CreateProduct, UpdateProduct};
use shoply_db::models::profile::UpsertProfile;
use shoply_db::models::user::{CreateUser, UpdateUser, User};
use shoply_db::repositories::{
    CartRepo, PostRepo, ProductRepo, ProfileRepo, RoleRepo, UserRepo,
};

async fn new_user(pool: &PgPool, name: &str) -> User {
    let role = RoleRepo::find_by_name(pool, "customer")
        .await
        .unwrap()
        .expect("customer role is seeded");
    UserRepo::create(
        pool,
        &CreateUser {
            username: name.to_string(),
            email: format!("{name}@example.com"),
            password_hash: "$argon2id$test".to_string(),
            role_id: role.id,
        },
    )
    .await
    .unwrap()
}

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_roles_are_seeded(pool: PgPool) {
    let admin = RoleRepo::find_by_name(&pool, "admin").await.unwrap();
    let customer = RoleRepo::find_by_name(&pool, "customer").await.unwrap();
    assert!(admin.is_some());
    assert!(customer.is_some());

    let all = RoleRepo::list(&pool).await.unwrap();
    assert_eq!(all.len(), 2);
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_user_create_and_lookup(pool: PgPool) {
    let user = new_user(&pool, "alice").await;
    assert!(user.is_active);

    let by_id = UserRepo::find_by_id(&pool, user.id).await.unwrap();
    assert_eq!(by_id.map(|u| u.username), Some("alice".to_string()));

    let by_name = UserRepo::find_by_username(&pool, "alice").await.unwrap();
    assert_eq!(by_name.map(|u| u.id), Some(user.id));

    let missing = UserRepo::find_by_username(&pool, "ALICE").await.unwrap();
    assert!(missing.is_none(), "username lookup is case-sensitive");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_username_rejected(pool: PgPool) {
    let first = new_user(&pool, "alice").await;

    let result = UserRepo::create(
        &pool,
        &CreateUser {
            username: "alice".to_string(),
            email: "other@example.com".to_string(),
            password_hash: "$argon2id$test".to_string(),
            role_id: first.role_id,
        },
    )
    .await;

    match result {
        Err(sqlx::Error::Database(e)) => {
            assert_eq!(e.code().as_deref(), Some("23505"));
        }
        other => panic!("expected unique violation, got {other:?}"),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_email_rejected(pool: PgPool) {
    let first = new_user(&pool, "alice").await;

    let result = UserRepo::create(
        &pool,
        &CreateUser {
            username: "bob".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "$argon2id$test".to_string(),
            role_id: first.role_id,
        },
    )
    .await;
    assert!(result.is_err());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_user_partial_update(pool: PgPool) {
    let user = new_user(&pool, "alice").await;

    let updated = UserRepo::update(
        &pool,
        user.id,
        &UpdateUser {
            username: None,
            email: Some("new@example.com".to_string()),
            role_id: None,
            is_active: None,
        },
    )
    .await
    .unwrap()
    .expect("user exists");

    assert_eq!(updated.email, "new@example.com");
    assert_eq!(updated.username, "alice", "omitted fields are untouched");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_user_deactivate_is_soft(pool: PgPool) {
    let user = new_user(&pool, "alice").await;

    assert!(UserRepo::deactivate(&pool, user.id).await.unwrap());
    // Already-inactive users report no change.
    assert!(!UserRepo::deactivate(&pool, user.id).await.unwrap());

    // The row itself survives.
    let row = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(!row.is_active);
}

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_profile_upsert_roundtrip(pool: PgPool) {
    let user = new_user(&pool, "alice").await;

    assert!(ProfileRepo::find_by_user_id(&pool, user.id)
        .await
        .unwrap()
        .is_none());

    let created = ProfileRepo::upsert(
        &pool,
        user.id,
        &UpsertProfile {
            first_name: Some("Alice".to_string()),
            last_name: Some("Smith".to_string()),
            bio: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(created.first_name.as_deref(), Some("Alice"));

    // Second upsert replaces the whole profile, keeping the same row.
    let replaced = ProfileRepo::upsert(
        &pool,
        user.id,
        &UpsertProfile {
            first_name: Some("Alicia".to_string()),
            last_name: None,
            bio: Some("Hello".to_string()),
        },
    )
    .await
    .unwrap();
    assert_eq!(replaced.id, created.id);
    assert_eq!(replaced.first_name.as_deref(), Some("Alicia"));
    assert!(replaced.last_name.is_none(), "replace, not merge");
    assert_eq!(replaced.bio.as_deref(), Some("Hello"));
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_post_crud(pool: PgPool) {
    let user = new_user(&pool, "alice").await;

    let post = PostRepo::create(
        &pool,
        user.id,
        &CreatePost {
            title: "First".to_string(),
            body: "Hello world".to_string(),
        },
    )
    .await
    .unwrap();

    let updated = PostRepo::update(
        &pool,
        post.id,
        &UpdatePost {
            title: Some("Edited".to_string()),
            body: None,
        },
    )
    .await
    .unwrap()
    .expect("post exists");
    assert_eq!(updated.title, "Edited");
    assert_eq!(updated.body, "Hello world");

    assert!(PostRepo::delete(&pool, post.id).await.unwrap());
    assert!(!PostRepo::delete(&pool, post.id).await.unwrap());
    assert!(PostRepo::find_by_id(&pool, post.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_post_date_range_is_inclusive(pool: PgPool) {
    let user = new_user(&pool, "alice").await;
    let post = PostRepo::create(
        &pool,
        user.id,
        &CreatePost {
            title: "Dated".to_string(),
            body: "x".to_string(),
        },
    )
    .await
    .unwrap();

    // Exact boundaries include the post.
    let hits = PostRepo::list_by_date_range(&pool, post.created_at, post.created_at)
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);

    // A window strictly before the post excludes it.
    let before = post.created_at - Duration::days(2);
    let misses = PostRepo::list_by_date_range(&pool, before, before + Duration::days(1))
        .await
        .unwrap();
    assert!(misses.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_posts_deleted_with_user(pool: PgPool) {
    let user = new_user(&pool, "alice").await;
    PostRepo::create(
        &pool,
        user.id,
        &CreatePost {
            title: "T".to_string(),
            body: "B".to_string(),
        },
    )
    .await
    .unwrap();

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();

    let posts = PostRepo::list_by_user(&pool, user.id).await.unwrap();
    assert!(posts.is_empty(), "posts cascade with their author");
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_product_crud_and_price(pool: PgPool) {
    let product = ProductRepo::create(
        &pool,
        &CreateProduct {
            name: "Mug".to_string(),
            description: Some("Ceramic".to_string()),
            price: 500,
        },
    )
    .await
    .unwrap();

    assert_eq!(
        ProductRepo::get_price(&pool, product.id).await.unwrap(),
        Some(500)
    );

    let updated = ProductRepo::update(
        &pool,
        product.id,
        &UpdateProduct {
            name: None,
            description: None,
            price: Some(650),
        },
    )
    .await
    .unwrap()
    .expect("product exists");
    assert_eq!(updated.price, 650);
    assert_eq!(updated.name, "Mug");
    assert_eq!(
        ProductRepo::get_price(&pool, product.id).await.unwrap(),
        Some(650)
    );

    assert!(ProductRepo::delete(&pool, product.id).await.unwrap());
    assert!(ProductRepo::get_price(&pool, product.id)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_negative_price_rejected(pool: PgPool) {
    let result = ProductRepo::create(
        &pool,
        &CreateProduct {
            name: "Broken".to_string(),
            description: None,
            price: -1,
        },
    )
    .await;
    assert!(result.is_err(), "check constraint forbids negative prices");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_product_delete_removes_cart_items(pool: PgPool) {
    let user = new_user(&pool, "alice").await;
    let product = ProductRepo::create(
        &pool,
        &CreateProduct {
            name: "Mug".to_string(),
            description: None,
            price: 500,
        },
    )
    .await
    .unwrap();

    CartRepo::upsert_item(&pool, user.id, product.id, 2)
        .await
        .unwrap();
    assert!(ProductRepo::delete(&pool, product.id).await.unwrap());

    // Line item cascades away with the product.
    let items = CartRepo::list_items(&pool, user.id).await.unwrap();
    assert!(items.is_empty());
}
