use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::{SubscriberEmail, Subscription};

fn map_subscription(row: PgRow) -> Subscription {
    Subscription {
        id: row.get("id"),
        email: row.get("email"),
        name: row.get("name"),
        is_active: row.get("is_active"),
        subscribed_at: row.get("subscribed_at"),
        unsubscribed_at: row.get("unsubscribed_at"),
        source: row.get("source"),
    }
}

#[tracing::instrument(name = "Looking up a subscription by email", skip(pool))]
pub async fn find_by_email(
    pool: &PgPool,
    email: &SubscriberEmail,
) -> Result<Option<Subscription>, sqlx::Error> {
    sqlx::query(
        r#"
        SELECT id, email, name, is_active, subscribed_at, unsubscribed_at, source
        FROM newsletter_subscriptions
        WHERE email = $1
        "#,
    )
    .bind(email.as_ref())
    .map(map_subscription)
    .fetch_optional(pool)
    .await
}

#[tracing::instrument(name = "Inserting a new active subscription", skip(pool, name))]
pub async fn insert_active(
    pool: &PgPool,
    email: &SubscriberEmail,
    name: Option<&str>,
    source: &str,
) -> Result<Subscription, sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO newsletter_subscriptions (id, email, name, is_active, subscribed_at, unsubscribed_at, source)
        VALUES ($1, $2, $3, TRUE, $4, NULL, $5)
        RETURNING id, email, name, is_active, subscribed_at, unsubscribed_at, source
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email.as_ref())
    .bind(name)
    .bind(Utc::now())
    .bind(source)
    .map(map_subscription)
    .fetch_one(pool)
    .await
}

/// Flips a previously deactivated subscription back to active.
///
/// The stored name is replaced only when the caller provides a non-empty one;
/// `NULLIF` lets the existing name win otherwise.
#[tracing::instrument(name = "Reactivating a subscription", skip(pool, name))]
pub async fn reactivate(
    pool: &PgPool,
    email: &SubscriberEmail,
    name: Option<&str>,
) -> Result<Subscription, sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE newsletter_subscriptions
        SET is_active = TRUE,
            unsubscribed_at = NULL,
            name = COALESCE(NULLIF($2, ''), name)
        WHERE email = $1
        RETURNING id, email, name, is_active, subscribed_at, unsubscribed_at, source
        "#,
    )
    .bind(email.as_ref())
    .bind(name)
    .map(map_subscription)
    .fetch_one(pool)
    .await
}

#[tracing::instrument(name = "Deactivating a subscription", skip(pool))]
pub async fn deactivate(
    pool: &PgPool,
    email: &SubscriberEmail,
    unsubscribed_at: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE newsletter_subscriptions
        SET is_active = FALSE, unsubscribed_at = $2
        WHERE email = $1
        "#,
    )
    .bind(email.as_ref())
    .bind(unsubscribed_at)
    .execute(pool)
    .await?;

    Ok(())
}
