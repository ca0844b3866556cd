//! Integration tests for the cart and checkout flow.
//!
//! Exercises the repository layer against a real database:
//! - Lazy cart creation and cart-id stability
//! - Replace-quantity upsert semantics and idempotent removal
//! - Price-snapshot isolation from catalog changes
//! - Checkout aggregates, cart emptying, and atomicity on failure

use assert_matches::assert_matches;
use chrono::Duration;
use sqlx::PgPool;
use shoply_db::models::order::CreateOrderRequest;
use shoply_db::models::product::CreateProduct;
use shoply_db::models::user::{CreateUser, User};
use shoply_db::repositories::{
    CartRepo, CheckoutError, CheckoutService, OrderRepo, ProductRepo, RoleRepo, UserRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

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

async fn new_product(pool: &PgPool, name: &str, price: i64) -> shoply_db::models::product::Product {
    ProductRepo::create(
        pool,
        &CreateProduct {
            name: name.to_string(),
            description: None,
            price,
        },
    )
    .await
    .unwrap()
}

fn checkout_request() -> CreateOrderRequest {
    CreateOrderRequest {
        comment: None,
        promo_code: None,
    }
}

// ---------------------------------------------------------------------------
// Cart basics
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_or_create_returns_same_cart(pool: PgPool) {
    let user = new_user(&pool, "alice").await;

    assert!(CartRepo::find_by_user(&pool, user.id)
        .await
        .unwrap()
        .is_none());

    let first = CartRepo::get_or_create(&pool, user.id).await.unwrap();
    let second = CartRepo::get_or_create(&pool, user.id).await.unwrap();
    assert_eq!(first.id, second.id, "cart must be created at most once");
    assert_eq!(first.user_id, user.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_or_create_unknown_user_fails(pool: PgPool) {
    let result = CartRepo::get_or_create(&pool, 999_999).await;
    assert!(result.is_err(), "FK violation must surface as an error");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_upsert_replaces_quantity(pool: PgPool) {
    let user = new_user(&pool, "bob").await;
    let product = new_product(&pool, "Widget", 500).await;

    let item = CartRepo::upsert_item(&pool, user.id, product.id, 2)
        .await
        .unwrap()
        .expect("product exists");
    assert_eq!(item.quantity, 2);
    assert_eq!(item.price_snapshot, 500);

    // Replace, not add: 2 then 5 leaves 5.
    let item = CartRepo::upsert_item(&pool, user.id, product.id, 5)
        .await
        .unwrap()
        .expect("product exists");
    assert_eq!(item.quantity, 5);

    let items = CartRepo::list_items(&pool, user.id).await.unwrap();
    assert_eq!(items.len(), 1, "one line item per (cart, product)");
    assert_eq!(items[0].quantity, 5);
    assert_eq!(CartRepo::count_items(&pool, user.id).await.unwrap(), 5);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_upsert_unknown_product_returns_none(pool: PgPool) {
    let user = new_user(&pool, "carol").await;
    let result = CartRepo::upsert_item(&pool, user.id, 424_242, 1).await.unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_remove_item_is_idempotent(pool: PgPool) {
    let user = new_user(&pool, "dave").await;
    let product = new_product(&pool, "Gadget", 900).await;

    CartRepo::upsert_item(&pool, user.id, product.id, 1)
        .await
        .unwrap();

    let removed = CartRepo::remove_item(&pool, user.id, product.id)
        .await
        .unwrap();
    assert!(removed.is_some(), "first removal deletes the row");

    // Second removal finds nothing and must not error.
    let removed = CartRepo::remove_item(&pool, user.id, product.id)
        .await
        .unwrap();
    assert!(removed.is_none());
    assert_eq!(CartRepo::count_items(&pool, user.id).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cart_aggregates(pool: PgPool) {
    let user = new_user(&pool, "erin").await;
    let p1 = new_product(&pool, "Mug", 500).await;
    let p2 = new_product(&pool, "Kettle", 1200).await;

    CartRepo::upsert_item(&pool, user.id, p1.id, 2).await.unwrap();
    CartRepo::upsert_item(&pool, user.id, p2.id, 1).await.unwrap();

    assert_eq!(CartRepo::count_items(&pool, user.id).await.unwrap(), 3);
    assert_eq!(CartRepo::total_price(&pool, user.id).await.unwrap(), 2200);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_clear_keeps_cart_row(pool: PgPool) {
    let user = new_user(&pool, "frank").await;
    let product = new_product(&pool, "Plate", 300).await;
    let cart = CartRepo::get_or_create(&pool, user.id).await.unwrap();

    CartRepo::upsert_item(&pool, user.id, product.id, 4)
        .await
        .unwrap();
    let cleared = CartRepo::clear(&pool, user.id).await.unwrap();
    assert_eq!(cleared, 1);
    assert_eq!(CartRepo::count_items(&pool, user.id).await.unwrap(), 0);

    let after = CartRepo::get_or_create(&pool, user.id).await.unwrap();
    assert_eq!(after.id, cart.id, "clearing must not recreate the cart");
}

// ---------------------------------------------------------------------------
// Price snapshot isolation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_price_snapshot_survives_catalog_change(pool: PgPool) {
    let user = new_user(&pool, "grace").await;
    let product = new_product(&pool, "Lamp", 1000).await;

    CartRepo::upsert_item(&pool, user.id, product.id, 1)
        .await
        .unwrap();

    // Catalog price changes after the item was added.
    ProductRepo::update(
        &pool,
        product.id,
        &shoply_db::models::product::UpdateProduct {
            name: None,
            description: None,
            price: Some(9_999),
        },
    )
    .await
    .unwrap();

    let items = CartRepo::list_items(&pool, user.id).await.unwrap();
    assert_eq!(items[0].price_snapshot, 1000, "cart keeps the old price");

    // Checkout uses the snapshot, not the live price.
    let placed = CheckoutService::create_order(&pool, user.id, &checkout_request())
        .await
        .unwrap();
    assert_eq!(placed.order.total_price, 1000);
    assert_eq!(placed.items[0].price_snapshot, 1000);

    // A later catalog change cannot alter the finished order either.
    ProductRepo::update(
        &pool,
        product.id,
        &shoply_db::models::product::UpdateProduct {
            name: None,
            description: None,
            price: Some(1),
        },
    )
    .await
    .unwrap();
    let items = OrderRepo::list_items(&pool, placed.order.id).await.unwrap();
    assert_eq!(items[0].price_snapshot, 1000);
}

// ---------------------------------------------------------------------------
// Checkout
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_checkout_totals_and_line_items(pool: PgPool) {
    let user = new_user(&pool, "heidi").await;
    let p1 = new_product(&pool, "Mug", 500).await;
    let p2 = new_product(&pool, "Kettle", 1200).await;
    let cart = CartRepo::get_or_create(&pool, user.id).await.unwrap();

    CartRepo::upsert_item(&pool, user.id, p1.id, 2).await.unwrap();
    CartRepo::upsert_item(&pool, user.id, p2.id, 1).await.unwrap();

    let placed = CheckoutService::create_order(&pool, user.id, &checkout_request())
        .await
        .unwrap();

    assert_eq!(placed.order.user_id, user.id);
    assert_eq!(placed.order.total_price, 2200);
    assert_eq!(placed.order.total_quantity, 3);
    assert_eq!(placed.items.len(), 2);

    let by_product = |id| placed.items.iter().find(|i| i.product_id == id).unwrap();
    assert_eq!(by_product(p1.id).quantity, 2);
    assert_eq!(by_product(p1.id).price_snapshot, 500);
    assert_eq!(by_product(p2.id).quantity, 1);
    assert_eq!(by_product(p2.id).price_snapshot, 1200);

    // Cart is emptied but the row survives with the same id.
    assert_eq!(CartRepo::count_items(&pool, user.id).await.unwrap(), 0);
    let after = CartRepo::get_or_create(&pool, user.id).await.unwrap();
    assert_eq!(after.id, cart.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_checkout_empty_cart_declined(pool: PgPool) {
    let user = new_user(&pool, "ivan").await;

    // No cart at all.
    let result = CheckoutService::create_order(&pool, user.id, &checkout_request()).await;
    assert_matches!(result, Err(CheckoutError::EmptyCart));

    // Cart exists but has no line items.
    CartRepo::get_or_create(&pool, user.id).await.unwrap();
    let result = CheckoutService::create_order(&pool, user.id, &checkout_request()).await;
    assert_matches!(result, Err(CheckoutError::EmptyCart));

    assert!(OrderRepo::list_by_user(&pool, user.id)
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_checkout_skips_zero_quantity_rows(pool: PgPool) {
    let user = new_user(&pool, "judy").await;
    let kept = new_product(&pool, "Mug", 500).await;
    let zeroed = new_product(&pool, "Kettle", 1200).await;

    CartRepo::upsert_item(&pool, user.id, kept.id, 2).await.unwrap();
    CartRepo::upsert_item(&pool, user.id, zeroed.id, 0).await.unwrap();

    let placed = CheckoutService::create_order(&pool, user.id, &checkout_request())
        .await
        .unwrap();
    assert_eq!(placed.items.len(), 1);
    assert_eq!(placed.items[0].product_id, kept.id);
    assert_eq!(placed.order.total_price, 1000);
    assert_eq!(placed.order.total_quantity, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_checkout_all_zero_cart_counts_as_empty(pool: PgPool) {
    let user = new_user(&pool, "kim").await;
    let product = new_product(&pool, "Mug", 500).await;

    CartRepo::upsert_item(&pool, user.id, product.id, 0)
        .await
        .unwrap();

    let result = CheckoutService::create_order(&pool, user.id, &checkout_request()).await;
    assert_matches!(result, Err(CheckoutError::EmptyCart));

    // The declined checkout must not have touched the zero-quantity row.
    let items = CartRepo::list_items(&pool, user.id).await.unwrap();
    assert_eq!(items.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_checkout_promo_code_validation(pool: PgPool) {
    let user = new_user(&pool, "lena").await;
    let product = new_product(&pool, "Mug", 500).await;
    CartRepo::upsert_item(&pool, user.id, product.id, 1)
        .await
        .unwrap();

    let request = CreateOrderRequest {
        comment: None,
        promo_code: Some("SHORT".to_string()),
    };
    let result = CheckoutService::create_order(&pool, user.id, &request).await;
    assert_matches!(result, Err(CheckoutError::InvalidPromoCode(_)));

    // Nothing was written; the cart is intact.
    assert_eq!(CartRepo::count_items(&pool, user.id).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_checkout_atomic_on_duplicate_promo_code(pool: PgPool) {
    let user = new_user(&pool, "mallory").await;
    let product = new_product(&pool, "Mug", 500).await;

    // First checkout claims the promo code.
    CartRepo::upsert_item(&pool, user.id, product.id, 1)
        .await
        .unwrap();
    let request = CreateOrderRequest {
        comment: None,
        promo_code: Some("PROMO12345".to_string()),
    };
    CheckoutService::create_order(&pool, user.id, &request)
        .await
        .unwrap();

    // Refill the cart and try to reuse the code: the unique constraint
    // fires mid-transaction and everything must roll back.
    CartRepo::upsert_item(&pool, user.id, product.id, 3)
        .await
        .unwrap();
    let result = CheckoutService::create_order(&pool, user.id, &request).await;
    assert_matches!(result, Err(CheckoutError::Database(_)));

    // Cart untouched, no second order, no stray line items.
    assert_eq!(CartRepo::count_items(&pool, user.id).await.unwrap(), 3);
    let orders = OrderRepo::list_by_user(&pool, user.id).await.unwrap();
    assert_eq!(orders.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_checkout_with_comment_and_promo(pool: PgPool) {
    let user = new_user(&pool, "nina").await;
    let product = new_product(&pool, "Mug", 500).await;
    CartRepo::upsert_item(&pool, user.id, product.id, 1)
        .await
        .unwrap();

    let request = CreateOrderRequest {
        comment: Some("Leave at the door".to_string()),
        promo_code: Some("WELCOME100".to_string()),
    };
    let placed = CheckoutService::create_order(&pool, user.id, &request)
        .await
        .unwrap();
    assert_eq!(placed.order.comment.as_deref(), Some("Leave at the door"));
    assert_eq!(placed.order.promo_code.as_deref(), Some("WELCOME100"));
}

// ---------------------------------------------------------------------------
// Order retrieval
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_order_ownership_scoped_read(pool: PgPool) {
    let owner = new_user(&pool, "olivia").await;
    let other = new_user(&pool, "peggy").await;
    let product = new_product(&pool, "Mug", 500).await;

    CartRepo::upsert_item(&pool, owner.id, product.id, 1)
        .await
        .unwrap();
    let placed = CheckoutService::create_order(&pool, owner.id, &checkout_request())
        .await
        .unwrap();

    let found = OrderRepo::find_by_user_and_id(&pool, owner.id, placed.order.id)
        .await
        .unwrap();
    assert!(found.is_some());

    let denied = OrderRepo::find_by_user_and_id(&pool, other.id, placed.order.id)
        .await
        .unwrap();
    assert!(denied.is_none(), "other users must not see the order");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_order_listings_newest_first_and_range_inclusive(pool: PgPool) {
    let alice = new_user(&pool, "sara").await;
    let bob = new_user(&pool, "tom").await;
    let product = new_product(&pool, "Mug", 500).await;

    // Three checkouts for alice, one for bob; each is its own transaction
    // so the orders carry distinct creation times.
    for quantity in 1..=3 {
        CartRepo::upsert_item(&pool, alice.id, product.id, quantity)
            .await
            .unwrap();
        CheckoutService::create_order(&pool, alice.id, &checkout_request())
            .await
            .unwrap();
    }
    CartRepo::upsert_item(&pool, bob.id, product.id, 1)
        .await
        .unwrap();
    CheckoutService::create_order(&pool, bob.id, &checkout_request())
        .await
        .unwrap();

    let newest_first = |orders: &[shoply_db::models::order::Order]| {
        orders.windows(2).all(|w| w[0].created_at >= w[1].created_at)
    };

    let mine = OrderRepo::list_by_user(&pool, alice.id).await.unwrap();
    assert_eq!(mine.len(), 3);
    assert!(mine.iter().all(|o| o.user_id == alice.id));
    assert!(newest_first(&mine));

    let all = OrderRepo::list(&pool).await.unwrap();
    assert_eq!(all.len(), 4);
    assert!(newest_first(&all));

    // Inclusive bounds: the exact earliest/latest creation times are inside.
    let earliest = all.iter().map(|o| o.created_at).min().unwrap();
    let latest = all.iter().map(|o| o.created_at).max().unwrap();
    let ranged = OrderRepo::list_by_date_range(&pool, earliest, latest)
        .await
        .unwrap();
    assert_eq!(ranged.len(), 4);
    assert!(newest_first(&ranged));

    // A window ending before the earliest order matches nothing.
    let before = earliest - Duration::seconds(1);
    let outside = OrderRepo::list_by_date_range(&pool, before - Duration::days(1), before)
        .await
        .unwrap();
    assert!(outside.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_order_partial_update_keeps_aggregates(pool: PgPool) {
    let user = new_user(&pool, "quinn").await;
    let product = new_product(&pool, "Mug", 500).await;
    CartRepo::upsert_item(&pool, user.id, product.id, 2)
        .await
        .unwrap();
    let placed = CheckoutService::create_order(&pool, user.id, &checkout_request())
        .await
        .unwrap();

    let updated = OrderRepo::update_partial(
        &pool,
        placed.order.id,
        &shoply_db::models::order::UpdateOrder {
            comment: Some("Corrected note".to_string()),
            promo_code: None,
        },
    )
    .await
    .unwrap()
    .expect("order exists");

    assert_eq!(updated.comment.as_deref(), Some("Corrected note"));
    assert_eq!(updated.total_price, placed.order.total_price);
    assert_eq!(updated.total_quantity, placed.order.total_quantity);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_order_delete_cascades_to_items(pool: PgPool) {
    let user = new_user(&pool, "rita").await;
    let product = new_product(&pool, "Mug", 500).await;
    CartRepo::upsert_item(&pool, user.id, product.id, 1)
        .await
        .unwrap();
    let placed = CheckoutService::create_order(&pool, user.id, &checkout_request())
        .await
        .unwrap();

    assert!(OrderRepo::delete(&pool, placed.order.id).await.unwrap());
    let items = OrderRepo::list_items(&pool, placed.order.id).await.unwrap();
    assert!(items.is_empty());
}
