use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A newsletter subscription as stored in `newsletter_subscriptions`.
///
/// One row per email, ever: unsubscribing deactivates the row and a later
/// subscribe reactivates it. `is_active` and `unsubscribed_at` move together:
/// an active subscription never carries an unsubscribe timestamp.
#[derive(Debug, Clone)]
pub struct Subscription {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub is_active: bool,
    pub subscribed_at: DateTime<Utc>,
    pub unsubscribed_at: Option<DateTime<Utc>>,
    pub source: String,
}
