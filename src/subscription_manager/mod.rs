//! Pricing and lifecycle of magazine subscriptions.

mod lifecycle;
mod pricing;

pub use lifecycle::{
    cancel_subscription, create_subscription, deactivate_subscription, get_subscription,
    list_subscriptions, update_subscription, SubscriptionChange,
    SubscriptionError, SubscriptionRequest,
};
pub use pricing::{calculate_price, compute_price, PricingError};
