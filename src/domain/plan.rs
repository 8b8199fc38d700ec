use super::{CatalogName, Discount, RenewalPeriod};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, FromRow, Serialize)]
pub struct Plan {
    pub id: i64,
    pub title: String,
    pub description: String,
    /// Term length in days.
    pub renewal_period: i32,
    pub tier: i32,
    pub discount: Decimal,
}

#[derive(Debug)]
pub struct NewPlan {
    pub title: CatalogName,
    pub description: String,
    pub renewal_period: RenewalPeriod,
    pub tier: i32,
    pub discount: Discount,
}
