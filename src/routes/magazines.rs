use crate::{
    app_state::AppState,
    catalog::{
        delete_magazine, get_magazine, insert_magazine, list_magazines, update_magazine,
        CatalogError, Pagination,
    },
    domain::{BasePrice, CatalogName, Magazine, NewMagazine},
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
        .route("/magazines", get(list).post(create))
        .route("/magazines/", get(list).post(create))
        .route("/magazines/:id", get(read).put(update).delete(delete))
}

#[derive(Deserialize)]
struct MagazineBody {
    name: String,
    #[serde(default)]
    description: String,
    base_price: Decimal,
}

impl TryFrom<MagazineBody> for NewMagazine {
    type Error = String;

    fn try_from(body: MagazineBody) -> Result<Self, Self::Error> {
        Ok(Self {
            name: CatalogName::parse(body.name)?,
            description: body.description,
            base_price: BasePrice::parse(body.base_price)?,
        })
    }
}

#[tracing::instrument(name = "Create magazine", skip(db_pool, body))]
async fn create(
    State(db_pool): State<PgPool>,
    Json(body): Json<MagazineBody>,
) -> Result<(StatusCode, Json<Magazine>), CatalogError> {
    let magazine = body.try_into().map_err(CatalogError::ValidationError)?;
    let magazine = insert_magazine(&db_pool, &magazine).await?;

    tracing::info!("Magazine `{}` created", magazine.id);

    Ok((StatusCode::CREATED, Json(magazine)))
}

async fn list(
    State(db_pool): State<PgPool>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<Magazine>>, CatalogError> {
    Ok(Json(list_magazines(&db_pool, pagination).await?))
}

async fn read(
    State(db_pool): State<PgPool>,
    Path(magazine_id): Path<i64>,
) -> Result<Json<Magazine>, CatalogError> {
    get_magazine(&db_pool, magazine_id)
        .await?
        .map(Json)
        .ok_or(CatalogError::NotFound("Magazine"))
}

#[tracing::instrument(name = "Update magazine", skip(db_pool, body))]
async fn update(
    State(db_pool): State<PgPool>,
    Path(magazine_id): Path<i64>,
    Json(body): Json<MagazineBody>,
) -> Result<Json<Magazine>, CatalogError> {
    let magazine = body.try_into().map_err(CatalogError::ValidationError)?;

    Ok(Json(update_magazine(&db_pool, magazine_id, &magazine).await?))
}

#[tracing::instrument(name = "Delete magazine", skip(db_pool))]
async fn delete(
    State(db_pool): State<PgPool>,
    Path(magazine_id): Path<i64>,
) -> Result<Json<Magazine>, CatalogError> {
    Ok(Json(delete_magazine(&db_pool, magazine_id).await?))
}
