mod base_price;
mod catalog_name;
mod discount;
mod magazine;
mod new_password;
mod new_user;
mod plan;
mod renewal_period;
mod subscription;
mod user_email;
mod username;

pub use base_price::BasePrice;
pub use catalog_name::CatalogName;
pub use discount::Discount;
pub use magazine::{Magazine, NewMagazine};
pub use new_password::NewPassword;
pub use new_user::NewUser;
pub use plan::{NewPlan, Plan};
pub use renewal_period::RenewalPeriod;
pub use subscription::Subscription;
pub use user_email::UserEmail;
pub use username::Username;
