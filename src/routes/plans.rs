use crate::{
    app_state::AppState,
    catalog::{delete_plan, get_plan, insert_plan, list_plans, update_plan, CatalogError, Pagination},
    domain::{CatalogName, Discount, NewPlan, Plan, RenewalPeriod},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/plans", get(list).post(create))
        .route("/plans/", get(list).post(create))
        .route("/plans/:id", get(read).put(update).delete(delete))
}

#[derive(Deserialize)]
struct PlanBody {
    title: String,
    #[serde(default)]
    description: String,
    renewal_period: i32,
    #[serde(default)]
    tier: i32,
    #[serde(default)]
    discount: Decimal,
}

impl TryFrom<PlanBody> for NewPlan {
    type Error = String;

    fn try_from(body: PlanBody) -> Result<Self, Self::Error> {
        Ok(Self {
            title: CatalogName::parse(body.title)?,
            description: body.description,
            renewal_period: RenewalPeriod::parse(body.renewal_period)?,
            tier: body.tier,
            discount: Discount::parse(body.discount)?,
        })
    }
}

#[tracing::instrument(name = "Create plan", skip(db_pool, body))]
async fn create(
    State(db_pool): State<PgPool>,
    Json(body): Json<PlanBody>,
) -> Result<(StatusCode, Json<Plan>), CatalogError> {
    let plan = body.try_into().map_err(CatalogError::ValidationError)?;
    let plan = insert_plan(&db_pool, &plan).await?;

    tracing::info!("Plan `{}` created", plan.id);

    Ok((StatusCode::CREATED, Json(plan)))
}

async fn list(
    State(db_pool): State<PgPool>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<Plan>>, CatalogError> {
    Ok(Json(list_plans(&db_pool, pagination).await?))
}

async fn read(
    State(db_pool): State<PgPool>,
    Path(plan_id): Path<i64>,
) -> Result<Json<Plan>, CatalogError> {
    get_plan(&db_pool, plan_id)
        .await?
        .map(Json)
        .ok_or(CatalogError::NotFound("Plan"))
}

#[tracing::instrument(name = "Update plan", skip(db_pool, body))]
async fn update(
    State(db_pool): State<PgPool>,
    Path(plan_id): Path<i64>,
    Json(body): Json<PlanBody>,
) -> Result<Json<Plan>, CatalogError> {
    let plan = body.try_into().map_err(CatalogError::ValidationError)?;

    Ok(Json(update_plan(&db_pool, plan_id, &plan).await?))
}

#[tracing::instrument(name = "Delete plan", skip(db_pool))]
async fn delete(
    State(db_pool): State<PgPool>,
    Path(plan_id): Path<i64>,
) -> Result<Json<Plan>, CatalogError> {
    Ok(Json(delete_plan(&db_pool, plan_id).await?))
}
