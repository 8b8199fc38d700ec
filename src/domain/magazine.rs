use super::{BasePrice, CatalogName};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, FromRow, Serialize)]
pub struct Magazine {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub base_price: Decimal,
}

#[derive(Debug)]
pub struct NewMagazine {
    pub name: CatalogName,
    pub description: String,
    pub base_price: BasePrice,
}
