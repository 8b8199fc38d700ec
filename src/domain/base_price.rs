use rust_decimal::Decimal;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BasePrice(Decimal);

impl BasePrice {
    pub fn parse(value: Decimal) -> Result<BasePrice, String> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(format!("Base price must be greater than zero, got {value}"))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}
