use super::{CatalogError, Pagination};
use crate::{
    domain::{Magazine, NewMagazine},
    utils::is_foreign_key_violation,
};
use anyhow::Context;
use sqlx::{PgExecutor, PgPool};

const MAGAZINE: &str = "Magazine";

#[tracing::instrument(name = "Saving new magazine", skip(db_pool, magazine))]
pub async fn insert_magazine(
    db_pool: &PgPool,
    magazine: &NewMagazine,
) -> Result<Magazine, anyhow::Error> {
    sqlx::query_as::<_, Magazine>(
        r#"
        INSERT INTO magazines (name, description, base_price)
        VALUES ($1, $2, $3)
        RETURNING id, name, description, base_price
        "#,
    )
    .bind(magazine.name.as_ref())
    .bind(&magazine.description)
    .bind(magazine.base_price.value())
    .fetch_one(db_pool)
    .await
    .context("Failed to insert magazine")
}

#[tracing::instrument(name = "Get magazine", skip(executor))]
pub async fn get_magazine<'e>(
    executor: impl PgExecutor<'e>,
    magazine_id: i64,
) -> Result<Option<Magazine>, anyhow::Error> {
    sqlx::query_as::<_, Magazine>(
        r#"
        SELECT id, name, description, base_price
        FROM magazines
        WHERE id = $1
        "#,
    )
    .bind(magazine_id)
    .fetch_optional(executor)
    .await
    .context("Failed to fetch magazine")
}

#[tracing::instrument(name = "List magazines", skip(db_pool))]
pub async fn list_magazines(
    db_pool: &PgPool,
    pagination: Pagination,
) -> Result<Vec<Magazine>, anyhow::Error> {
    let (offset, limit) = pagination.bounds();

    sqlx::query_as::<_, Magazine>(
        r#"
        SELECT id, name, description, base_price
        FROM magazines
        ORDER BY id
        OFFSET $1
        LIMIT $2
        "#,
    )
    .bind(offset)
    .bind(limit)
    .fetch_all(db_pool)
    .await
    .context("Failed to list magazines")
}

#[tracing::instrument(name = "Update magazine", skip(db_pool, magazine))]
pub async fn update_magazine(
    db_pool: &PgPool,
    magazine_id: i64,
    magazine: &NewMagazine,
) -> Result<Magazine, CatalogError> {
    sqlx::query_as::<_, Magazine>(
        r#"
        UPDATE magazines
        SET name = $2, description = $3, base_price = $4
        WHERE id = $1
        RETURNING id, name, description, base_price
        "#,
    )
    .bind(magazine_id)
    .bind(magazine.name.as_ref())
    .bind(&magazine.description)
    .bind(magazine.base_price.value())
    .fetch_optional(db_pool)
    .await
    .context("Failed to update magazine")?
    .ok_or(CatalogError::NotFound(MAGAZINE))
}

#[tracing::instrument(name = "Delete magazine", skip(db_pool))]
pub async fn delete_magazine(db_pool: &PgPool, magazine_id: i64) -> Result<Magazine, CatalogError> {
    sqlx::query_as::<_, Magazine>(
        r#"
        DELETE FROM magazines
        WHERE id = $1
        RETURNING id, name, description, base_price
        "#,
    )
    .bind(magazine_id)
    .fetch_optional(db_pool)
    .await
    .map_err(|e| {
        if is_foreign_key_violation(&e) {
            CatalogError::InUse(MAGAZINE)
        } else {
            CatalogError::UnexpectedError(anyhow::Error::new(e).context("Failed to delete magazine"))
        }
    })?
    .ok_or(CatalogError::NotFound(MAGAZINE))
}
