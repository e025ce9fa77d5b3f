use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::Row;

use crate::helpers::spawn_app;

#[tokio::test]
async fn unsubscribe_returns_200_and_deactivates_the_subscription() {
    let app = spawn_app().await;
    app.post_subscribe(json!({"email": "a@x.com"})).await;

    let response = app.post_unsubscribe(json!({"email": "a@x.com"})).await;

    assert_eq!(200, response.status().as_u16());

    let saved = sqlx::query(
        "SELECT is_active, unsubscribed_at FROM newsletter_subscriptions WHERE email = $1",
    )
    .bind("a@x.com")
    .fetch_one(&app.db_pool)
    .await
    .expect("Failed to fetch saved subscription");

    assert!(!saved.get::<bool, _>("is_active"));
    assert!(
        saved
            .get::<Option<DateTime<Utc>>, _>("unsubscribed_at")
            .is_some()
    );
}

#[tokio::test]
async fn unsubscribing_an_unknown_email_returns_400() {
    let app = spawn_app().await;

    let response = app
        .post_unsubscribe(json!({"email": "never@x.com"}))
        .await;

    assert_eq!(400, response.status().as_u16());

    let body: serde_json::Value = response.json().await.expect("Failed to parse body.");
    let error = body["error"].as_str().expect("Missing error message.");
    assert!(error.contains("not subscribed"), "got: {error}");

    let count: i64 = sqlx::query("SELECT COUNT(*) AS n FROM newsletter_subscriptions")
        .fetch_one(&app.db_pool)
        .await
        .expect("Failed to count subscriptions")
        .get("n");
    assert_eq!(0, count);
}

#[tokio::test]
async fn unsubscribing_twice_returns_400_and_keeps_the_first_timestamp() {
    let app = spawn_app().await;
    app.post_subscribe(json!({"email": "a@x.com"})).await;

    let first = app.post_unsubscribe(json!({"email": "a@x.com"})).await;
    assert_eq!(200, first.status().as_u16());

    let stamped: Option<DateTime<Utc>> =
        sqlx::query("SELECT unsubscribed_at FROM newsletter_subscriptions WHERE email = $1")
            .bind("a@x.com")
            .fetch_one(&app.db_pool)
            .await
            .expect("Failed to fetch saved subscription")
            .get("unsubscribed_at");

    let second = app.post_unsubscribe(json!({"email": "a@x.com"})).await;
    assert_eq!(400, second.status().as_u16());

    let body: serde_json::Value = second.json().await.expect("Failed to parse body.");
    let error = body["error"].as_str().expect("Missing error message.");
    assert!(error.contains("already unsubscribed"), "got: {error}");

    let unchanged: Option<DateTime<Utc>> =
        sqlx::query("SELECT unsubscribed_at FROM newsletter_subscriptions WHERE email = $1")
            .bind("a@x.com")
            .fetch_one(&app.db_pool)
            .await
            .expect("Failed to fetch saved subscription")
            .get("unsubscribed_at");

    assert_eq!(stamped, unchanged);
}

#[tokio::test]
async fn unsubscribe_returns_400_for_a_malformed_email() {
    let app = spawn_app().await;

    let response = app
        .post_unsubscribe(json!({"email": "not-an-email"}))
        .await;

    assert_eq!(400, response.status().as_u16());
}
