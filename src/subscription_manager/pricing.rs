use crate::catalog::{get_magazine, get_plan};
use rust_decimal::Decimal;
use sqlx::PgConnection;

#[derive(Debug, thiserror::Error)]
pub enum PricingError {
    #[error("Invalid plan or magazine id")]
    InvalidReference,
    #[error("Price must be greater than zero")]
    NonPositivePrice,
    #[error("Price is out of range")]
    OutOfRange,
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

/// `base_price × (1 − discount)`, rejected unless strictly positive.
pub fn compute_price(base_price: Decimal, discount: Decimal) -> Result<Decimal, PricingError> {
    let price = Decimal::ONE
        .checked_sub(discount)
        .and_then(|multiplier| base_price.checked_mul(multiplier))
        .ok_or(PricingError::OutOfRange)?;

    if price <= Decimal::ZERO {
        return Err(PricingError::NonPositivePrice);
    }

    Ok(price)
}

/// Price of subscribing to `magazine_id` under `plan_id`. Read-only.
#[tracing::instrument(name = "Calculate subscription price", skip(connection))]
pub async fn calculate_price(
    connection: &mut PgConnection,
    plan_id: i64,
    magazine_id: i64,
) -> Result<Decimal, PricingError> {
    let plan = get_plan(&mut *connection, plan_id).await?;
    let magazine = get_magazine(&mut *connection, magazine_id).await?;

    match (plan, magazine) {
        (Some(plan), Some(magazine)) => compute_price(magazine.base_price, plan.discount),
        _ => Err(PricingError::InvalidReference),
    }
}
