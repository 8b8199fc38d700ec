use super::pricing::{calculate_price, PricingError};
use crate::{
    catalog::get_plan,
    domain::Subscription,
    utils::{is_foreign_key_violation, is_unique_violation},
};
use anyhow::Context;
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use time::{Date, Duration, OffsetDateTime};

#[derive(Debug, thiserror::Error)]
pub enum SubscriptionError {
    #[error("Subscription not found")]
    NotFound,
    #[error("Not authorized to access this subscription")]
    Forbidden,
    #[error("Invalid plan id")]
    InvalidPlan,
    #[error(transparent)]
    Pricing(PricingError),
    #[error("Invalid user, magazine or plan id")]
    InvalidReference,
    #[error("{0}")]
    InvalidDates(String),
    #[error("Subscription already exists")]
    Duplicate,
    #[error("Subscription is no longer active")]
    Inactive,
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl From<PricingError> for SubscriptionError {
    fn from(e: PricingError) -> Self {
        match e {
            PricingError::UnexpectedError(e) => Self::UnexpectedError(e),
            e => Self::Pricing(e),
        }
    }
}

pub struct SubscriptionRequest {
    pub user_id: i64,
    pub magazine_id: i64,
    pub plan_id: i64,
    pub renewal_date: Date,
}

/// Renewal or plan change of an existing subscription.
pub struct SubscriptionChange {
    pub magazine_id: i64,
    pub plan_id: i64,
    pub renewal_date: Date,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
}

fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

/// Last day of a term of `renewal_period` days starting on `start_date`.
fn term_end(start_date: Date, renewal_period: i32) -> Result<Date, SubscriptionError> {
    start_date
        .checked_add(Duration::days(renewal_period.into()))
        .ok_or_else(|| SubscriptionError::InvalidDates("Subscription term is out of range".into()))
}

fn validate_term(start_date: Date, end_date: Date) -> Result<(), SubscriptionError> {
    if end_date <= start_date {
        return Err(SubscriptionError::InvalidDates(format!(
            "End date {end_date} must be after start date {start_date}"
        )));
    }

    Ok(())
}

/// Creates an active subscription starting today and priced from the plan's
/// discount on the magazine's base price.
#[tracing::instrument(
    name = "Create subscription",
    skip(db_pool, request),
    fields(
        user_id = %request.user_id,
        magazine_id = %request.magazine_id,
        plan_id = %request.plan_id,
    )
)]
pub async fn create_subscription(
    db_pool: &PgPool,
    request: SubscriptionRequest,
) -> Result<Subscription, SubscriptionError> {
    let mut transaction = db_pool
        .begin()
        .await
        .context("Failed to begin transaction")?;

    let plan = get_plan(&mut *transaction, request.plan_id)
        .await?
        .ok_or(SubscriptionError::InvalidPlan)?;

    let start_date = today();
    let end_date = term_end(start_date, plan.renewal_period)?;
    let price = calculate_price(&mut transaction, request.plan_id, request.magazine_id).await?;

    let subscription = insert_subscription(
        &mut transaction,
        NewSubscriptionRow {
            user_id: request.user_id,
            magazine_id: request.magazine_id,
            plan_id: request.plan_id,
            start_date,
            end_date,
            renewal_date: request.renewal_date,
            price,
        },
    )
    .await?;

    transaction
        .commit()
        .await
        .context("Failed to commit transaction")?;

    Ok(subscription)
}

/// Replaces the active subscription `subscription_id` with a new active row
/// for the same user. The old row is deactivated in the same transaction, so
/// a failure leaves it as it was.
#[tracing::instrument(
    name = "Update subscription",
    skip(db_pool, change),
    fields(plan_id = %change.plan_id, magazine_id = %change.magazine_id)
)]
pub async fn update_subscription(
    db_pool: &PgPool,
    subscription_id: i64,
    requester_id: i64,
    change: SubscriptionChange,
) -> Result<Subscription, SubscriptionError> {
    let mut transaction = db_pool
        .begin()
        .await
        .context("Failed to begin transaction")?;

    let existing = lock_subscription(&mut transaction, subscription_id)
        .await?
        .ok_or(SubscriptionError::NotFound)?;

    if existing.user_id != requester_id {
        return Err(SubscriptionError::Forbidden);
    }

    // Only the current row of a history can be renewed.
    if !existing.is_active {
        return Err(SubscriptionError::Inactive);
    }

    let plan = get_plan(&mut *transaction, change.plan_id)
        .await?
        .ok_or(SubscriptionError::InvalidPlan)?;

    let price = calculate_price(&mut transaction, change.plan_id, change.magazine_id).await?;

    let start_date = change.start_date.unwrap_or_else(today);
    let end_date = match change.end_date {
        Some(end_date) => end_date,
        None => term_end(start_date, plan.renewal_period)?,
    };
    validate_term(start_date, end_date)?;

    set_active(&mut transaction, existing.id, false).await?;

    let subscription = insert_subscription(
        &mut transaction,
        NewSubscriptionRow {
            user_id: existing.user_id,
            magazine_id: change.magazine_id,
            plan_id: change.plan_id,
            start_date,
            end_date,
            renewal_date: change.renewal_date,
            price,
        },
    )
    .await?;

    transaction
        .commit()
        .await
        .context("Failed to commit transaction")?;

    tracing::info!(
        "Subscription `{}` replaced by `{}`",
        existing.id,
        subscription.id
    );

    Ok(subscription)
}

/// Soft-deletes a subscription on behalf of its owner. `None` when the id
/// does not resolve.
#[tracing::instrument(name = "Cancel subscription", skip(db_pool))]
pub async fn cancel_subscription(
    db_pool: &PgPool,
    subscription_id: i64,
    requester_id: i64,
) -> Result<Option<Subscription>, SubscriptionError> {
    let mut transaction = db_pool
        .begin()
        .await
        .context("Failed to begin transaction")?;

    let Some(existing) = lock_subscription(&mut transaction, subscription_id).await? else {
        return Ok(None);
    };

    if existing.user_id != requester_id {
        return Err(SubscriptionError::Forbidden);
    }

    let subscription = set_active(&mut transaction, existing.id, false).await?;

    transaction
        .commit()
        .await
        .context("Failed to commit transaction")?;

    Ok(subscription)
}

/// Deactivates a subscription regardless of who owns it.
#[tracing::instrument(name = "Deactivate subscription", skip(db_pool))]
pub async fn deactivate_subscription(
    db_pool: &PgPool,
    subscription_id: i64,
) -> Result<Option<Subscription>, anyhow::Error> {
    let mut connection = db_pool
        .acquire()
        .await
        .context("Failed to acquire a database connection")?;

    set_active(&mut connection, subscription_id, false).await
}

/// The subscription if `requester_id` owns it.
#[tracing::instrument(name = "Get subscription", skip(db_pool))]
pub async fn get_subscription(
    db_pool: &PgPool,
    subscription_id: i64,
    requester_id: i64,
) -> Result<Subscription, SubscriptionError> {
    let subscription = sqlx::query_as::<_, Subscription>(
        r#"
        SELECT *
        FROM subscriptions
        WHERE id = $1
        "#,
    )
    .bind(subscription_id)
    .fetch_optional(db_pool)
    .await
    .context("Failed to fetch subscription")?
    .ok_or(SubscriptionError::NotFound)?;

    if subscription.user_id != requester_id {
        return Err(SubscriptionError::Forbidden);
    }

    Ok(subscription)
}

/// A user's subscription history, newest first.
#[tracing::instrument(name = "List subscriptions", skip(db_pool))]
pub async fn list_subscriptions(
    db_pool: &PgPool,
    user_id: i64,
    active: Option<bool>,
) -> Result<Vec<Subscription>, anyhow::Error> {
    sqlx::query_as::<_, Subscription>(
        r#"
        SELECT *
        FROM subscriptions
        WHERE user_id = $1 AND ($2::BOOLEAN IS NULL OR is_active = $2)
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(user_id)
    .bind(active)
    .fetch_all(db_pool)
    .await
    .context("Failed to list subscriptions")
}

struct NewSubscriptionRow {
    user_id: i64,
    magazine_id: i64,
    plan_id: i64,
    start_date: Date,
    end_date: Date,
    renewal_date: Date,
    price: Decimal,
}

#[tracing::instrument(name = "Saving new subscription", skip_all)]
async fn insert_subscription(
    connection: &mut PgConnection,
    row: NewSubscriptionRow,
) -> Result<Subscription, SubscriptionError> {
    sqlx::query_as::<_, Subscription>(
        r#"
        INSERT INTO subscriptions (
            user_id, magazine_id, plan_id, start_date, end_date, renewal_date, price, is_active
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE)
        RETURNING *
        "#,
    )
    .bind(row.user_id)
    .bind(row.magazine_id)
    .bind(row.plan_id)
    .bind(row.start_date)
    .bind(row.end_date)
    .bind(row.renewal_date)
    .bind(row.price)
    .fetch_one(connection)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            SubscriptionError::Duplicate
        } else if is_foreign_key_violation(&e) {
            SubscriptionError::InvalidReference
        } else {
            SubscriptionError::UnexpectedError(
                anyhow::Error::new(e).context("Failed to insert subscription"),
            )
        }
    })
}

#[tracing::instrument(name = "Lock subscription", skip(connection))]
async fn lock_subscription(
    connection: &mut PgConnection,
    subscription_id: i64,
) -> Result<Option<Subscription>, anyhow::Error> {
    sqlx::query_as::<_, Subscription>(
        r#"
        SELECT *
        FROM subscriptions
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(subscription_id)
    .fetch_optional(connection)
    .await
    .context("Failed to fetch subscription")
}

#[tracing::instrument(name = "Set subscription activity", skip(connection))]
async fn set_active(
    connection: &mut PgConnection,
    subscription_id: i64,
    is_active: bool,
) -> Result<Option<Subscription>, anyhow::Error> {
    sqlx::query_as::<_, Subscription>(
        r#"
        UPDATE subscriptions
        SET is_active = $2
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(subscription_id)
    .bind(is_active)
    .fetch_optional(connection)
    .await
    .context("Failed to update subscription activity")
}
