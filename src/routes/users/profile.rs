use super::UserRecord;
use crate::{
    app_state::AppState,
    authentication::AuthenticatedUser,
    utils::{e500, HttpError},
};
use anyhow::{Context, Error};
use axum::{extract::State, Json};
use serde::Serialize;
use sqlx::PgPool;

#[tracing::instrument(name = "Get own profile", skip(app_state, user))]
pub(super) async fn profile(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Profile>, HttpError<Error>> {
    let record = get_user(&app_state.db_pool, user.user_id)
        .await
        .map_err(e500)?;
    let subscriptions = get_subscription_ids(&app_state.db_pool, user.user_id)
        .await
        .map_err(e500)?;

    Ok(Json(Profile {
        user: record,
        subscriptions,
    }))
}

#[derive(Serialize)]
pub(super) struct Profile {
    #[serde(flatten)]
    user: UserRecord,
    subscriptions: Vec<i64>,
}

#[tracing::instrument(skip(db_pool))]
async fn get_user(db_pool: &PgPool, user_id: i64) -> Result<UserRecord, Error> {
    sqlx::query_as::<_, UserRecord>(
        r#"
        SELECT id, username, email, is_active
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_one(db_pool)
    .await
    .context("Failed to perform a query to retrieve a user")
}

#[tracing::instrument(skip(db_pool))]
async fn get_subscription_ids(db_pool: &PgPool, user_id: i64) -> Result<Vec<i64>, Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT id
        FROM subscriptions
        WHERE user_id = $1
        ORDER BY id
        "#,
    )
    .bind(user_id)
    .fetch_all(db_pool)
    .await
    .context("Failed to perform a query to retrieve subscription ids")
}
