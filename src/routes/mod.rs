mod analytics;
mod health_check;
mod helpers;
mod subscriptions;

pub use analytics::{analytics_summary, record_analytics};
pub use health_check::health_check;
pub use helpers::{analytics_json_error_handler, subscription_json_error_handler};
pub use subscriptions::{subscribe, unsubscribe};
