use super::{CatalogError, Pagination};
use crate::{
    domain::{NewPlan, Plan},
    utils::is_foreign_key_violation,
};
use anyhow::Context;
use sqlx::{PgExecutor, PgPool};

const PLAN: &str = "Plan";

#[tracing::instrument(name = "Saving new plan", skip(db_pool, plan))]
pub async fn insert_plan(db_pool: &PgPool, plan: &NewPlan) -> Result<Plan, anyhow::Error> {
    sqlx::query_as::<_, Plan>(
        r#"
        INSERT INTO plans (title, description, renewal_period, tier, discount)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, title, description, renewal_period, tier, discount
        "#,
    )
    .bind(plan.title.as_ref())
    .bind(&plan.description)
    .bind(plan.renewal_period.days())
    .bind(plan.tier)
    .bind(plan.discount.value())
    .fetch_one(db_pool)
    .await
    .context("Failed to insert plan")
}

#[tracing::instrument(name = "Get plan", skip(executor))]
pub async fn get_plan<'e>(
    executor: impl PgExecutor<'e>,
    plan_id: i64,
) -> Result<Option<Plan>, anyhow::Error> {
    sqlx::query_as::<_, Plan>(
        r#"
        SELECT id, title, description, renewal_period, tier, discount
        FROM plans
        WHERE id = $1
        "#,
    )
    .bind(plan_id)
    .fetch_optional(executor)
    .await
    .context("Failed to fetch plan")
}

#[tracing::instrument(name = "List plans", skip(db_pool))]
pub async fn list_plans(db_pool: &PgPool, pagination: Pagination) -> Result<Vec<Plan>, anyhow::Error> {
    let (offset, limit) = pagination.bounds();

    sqlx::query_as::<_, Plan>(
        r#"
        SELECT id, title, description, renewal_period, tier, discount
        FROM plans
        ORDER BY tier, id
        OFFSET $1
        LIMIT $2
        "#,
    )
    .bind(offset)
    .bind(limit)
    .fetch_all(db_pool)
    .await
    .context("Failed to list plans")
}

#[tracing::instrument(name = "Update plan", skip(db_pool, plan))]
pub async fn update_plan(db_pool: &PgPool, plan_id: i64, plan: &NewPlan) -> Result<Plan, CatalogError> {
    sqlx::query_as::<_, Plan>(
        r#"
        UPDATE plans
        SET title = $2, description = $3, renewal_period = $4, tier = $5, discount = $6
        WHERE id = $1
        RETURNING id, title, description, renewal_period, tier, discount
        "#,
    )
    .bind(plan_id)
    .bind(plan.title.as_ref())
    .bind(&plan.description)
    .bind(plan.renewal_period.days())
    .bind(plan.tier)
    .bind(plan.discount.value())
    .fetch_optional(db_pool)
    .await
    .context("Failed to update plan")?
    .ok_or(CatalogError::NotFound(PLAN))
}

#[tracing::instrument(name = "Delete plan", skip(db_pool))]
pub async fn delete_plan(db_pool: &PgPool, plan_id: i64) -> Result<Plan, CatalogError> {
    sqlx::query_as::<_, Plan>(
        r#"
        DELETE FROM plans
        WHERE id = $1
        RETURNING id, title, description, renewal_period, tier, discount
        "#,
    )
    .bind(plan_id)
    .fetch_optional(db_pool)
    .await
    .map_err(|e| {
        if is_foreign_key_violation(&e) {
            CatalogError::InUse(PLAN)
        } else {
            CatalogError::UnexpectedError(anyhow::Error::new(e).context("Failed to delete plan"))
        }
    })?
    .ok_or(CatalogError::NotFound(PLAN))
}
