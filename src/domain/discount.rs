use rust_decimal::Decimal;

/// Fraction of the base price taken off by a plan, in `[0, 1)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Discount(Decimal);

impl Discount {
    pub fn parse(value: Decimal) -> Result<Discount, String> {
        if value < Decimal::ZERO || value >= Decimal::ONE {
            return Err(format!(
                "Discount must be a fraction in [0, 1), got {value}"
            ));
        }

        Ok(Self(value))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}
