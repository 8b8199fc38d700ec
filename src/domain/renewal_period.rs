/// Length of a plan's subscription term in days.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenewalPeriod(i32);

impl RenewalPeriod {
    pub fn parse(days: i32) -> Result<RenewalPeriod, String> {
        if days > 0 {
            Ok(Self(days))
        } else {
            Err("Renewal period must be greater than zero".to_string())
        }
    }

    pub fn days(&self) -> i32 {
        self.0
    }
}
