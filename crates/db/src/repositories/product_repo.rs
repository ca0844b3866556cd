//! Repository for the `products` table (the product catalog).

use shoply_core::types::DbId;
use sqlx::PgPool;

use crate::models::product::{CreateProduct, Product, UpdateProduct};

const COLUMNS: &str = "id, name, description, price, created_at";

pub struct ProductRepo;

impl ProductRepo {
    pub async fn create(pool: &PgPool, input: &CreateProduct) -> Result<Product, sqlx::Error> {
        let query = format!(
            "INSERT INTO products (name, description, price)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.price)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE id = $1");
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products ORDER BY created_at DESC");
        sqlx::query_as::<_, Product>(&query).fetch_all(pool).await
    }

    /// Current catalog price. Cart and order line items never read this
    /// after their snapshot is taken.
    pub async fn get_price(pool: &PgPool, id: DbId) -> Result<Option<i64>, sqlx::Error> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT price FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(|(price,)| price))
    }

    /// Update a product. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProduct,
    ) -> Result<Option<Product>, sqlx::Error> {
        let query = format!(
            "UPDATE products SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                price = COALESCE($4, price)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.price)
            .fetch_optional(pool)
            .await
    }

    /// Delete a product. Cascades to any cart/order line items referencing it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
