use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use time::{Date, OffsetDateTime};

/// One row of a user's subscription history. Renewals append a new row and
/// deactivate the previous one, so only the latest row of a
/// (user, magazine, plan) triple is ever active.
#[derive(Debug, FromRow, Serialize)]
pub struct Subscription {
    pub id: i64,
    pub user_id: i64,
    pub magazine_id: i64,
    pub plan_id: i64,
    pub start_date: Date,
    pub end_date: Date,
    pub renewal_date: Date,
    pub price: Decimal,
    pub is_active: bool,
    #[serde(skip)]
    pub created_at: OffsetDateTime,
}
