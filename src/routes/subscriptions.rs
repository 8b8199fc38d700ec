use crate::{
    app_state::AppState,
    authentication::AuthenticatedUser,
    domain::Subscription,
    subscription_manager::{
        cancel_subscription, create_subscription, get_subscription, list_subscriptions,
        update_subscription, SubscriptionChange, SubscriptionError, SubscriptionRequest,
    },
    utils::error_response,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use time::Date;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/subscriptions", post(create).get(list))
        .route("/subscriptions/", post(create).get(list))
        .route("/subscriptions/:id", get(read).put(update).delete(cancel))
}

#[derive(Deserialize)]
struct CreateBody {
    user_id: i64,
    magazine_id: i64,
    plan_id: i64,
    renewal_date: Date,
}

#[derive(Deserialize)]
struct UpdateBody {
    magazine_id: i64,
    plan_id: i64,
    renewal_date: Date,
    start_date: Option<Date>,
    end_date: Option<Date>,
}

impl From<UpdateBody> for SubscriptionChange {
    fn from(body: UpdateBody) -> Self {
        Self {
            magazine_id: body.magazine_id,
            plan_id: body.plan_id,
            renewal_date: body.renewal_date,
            start_date: body.start_date,
            end_date: body.end_date,
        }
    }
}

#[derive(Deserialize)]
struct ListQuery {
    active: Option<bool>,
}

/// Subscribes a user. The term always starts today and lasts the plan's
/// renewal period, so any `start_date`/`end_date` in the body is ignored.
async fn create(
    State(app_state): State<AppState>,
    Json(body): Json<CreateBody>,
) -> Result<(StatusCode, Json<Subscription>), SubscriptionError> {
    let subscription = create_subscription(
        &app_state.db_pool,
        SubscriptionRequest {
            user_id: body.user_id,
            magazine_id: body.magazine_id,
            plan_id: body.plan_id,
            renewal_date: body.renewal_date,
        },
    )
    .await?;

    tracing::info!("Subscription `{}` created", subscription.id);

    Ok((StatusCode::CREATED, Json(subscription)))
}

async fn list(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Subscription>>, SubscriptionError> {
    let subscriptions = list_subscriptions(&app_state.db_pool, user.user_id, query.active).await?;

    Ok(Json(subscriptions))
}

async fn read(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(subscription_id): Path<i64>,
) -> Result<Json<Subscription>, SubscriptionError> {
    get_subscription(&app_state.db_pool, subscription_id, user.user_id)
        .await
        .map(Json)
}

async fn update(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(subscription_id): Path<i64>,
    Json(body): Json<UpdateBody>,
) -> Result<Json<Subscription>, SubscriptionError> {
    update_subscription(
        &app_state.db_pool,
        subscription_id,
        user.user_id,
        body.into(),
    )
    .await
    .map(Json)
}

async fn cancel(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(subscription_id): Path<i64>,
) -> Result<Json<Subscription>, SubscriptionError> {
    let subscription = cancel_subscription(&app_state.db_pool, subscription_id, user.user_id)
        .await?
        .ok_or(SubscriptionError::NotFound)?;

    tracing::info!("Subscription `{}` cancelled", subscription.id);

    Ok(Json(subscription))
}

impl IntoResponse for SubscriptionError {
    fn into_response(self) -> Response {
        tracing::error!("{:#?}", self);

        let status = match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::InvalidPlan
            | Self::Pricing(_)
            | Self::InvalidReference
            | Self::InvalidDates(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Duplicate | Self::Inactive => StatusCode::CONFLICT,
            Self::UnexpectedError(_) => return StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        };

        error_response(status, self.to_string())
    }
}
