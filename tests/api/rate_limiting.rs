use serde_json::json;

use crate::helpers::{TestApp, spawn_app};

async fn post_subscribe_as(
    app: &TestApp,
    client_key: &str,
    body: serde_json::Value,
) -> reqwest::Response {
    app.api_client
        .post(format!("{}/subscribe", app.address))
        .header("x-forwarded-for", client_key)
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request.")
}

#[tokio::test]
async fn the_sixth_subscribe_within_the_window_is_rejected() {
    let app = spawn_app().await;

    for i in 0..5 {
        let response =
            post_subscribe_as(&app, "203.0.113.9", json!({"email": format!("s{i}@x.com")})).await;
        assert_eq!(200, response.status().as_u16(), "request {i} was throttled");
    }

    let response = post_subscribe_as(&app, "203.0.113.9", json!({"email": "s5@x.com"})).await;

    assert_eq!(429, response.status().as_u16());
}

#[tokio::test]
async fn distinct_clients_are_throttled_independently() {
    let app = spawn_app().await;

    for i in 0..5 {
        post_subscribe_as(&app, "203.0.113.9", json!({"email": format!("s{i}@x.com")})).await;
    }

    let response = post_subscribe_as(&app, "203.0.113.10", json!({"email": "other@x.com"})).await;

    assert_eq!(200, response.status().as_u16());
}

#[tokio::test]
async fn unsubscribe_uses_a_separate_bucket() {
    let app = spawn_app().await;

    for i in 0..6 {
        post_subscribe_as(&app, "203.0.113.9", json!({"email": format!("s{i}@x.com")})).await;
    }

    // The subscribe bucket is exhausted; unsubscribe must still be served.
    let response = app
        .api_client
        .post(format!("{}/unsubscribe", app.address))
        .header("x-forwarded-for", "203.0.113.9")
        .json(&json!({"email": "s0@x.com"}))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(200, response.status().as_u16());
}

#[tokio::test]
async fn a_denied_request_leaves_no_trace_in_the_store() {
    let app = spawn_app().await;

    for i in 0..5 {
        post_subscribe_as(&app, "203.0.113.9", json!({"email": format!("s{i}@x.com")})).await;
    }

    let denied = post_subscribe_as(&app, "203.0.113.9", json!({"email": "s6@x.com"})).await;
    assert_eq!(429, denied.status().as_u16());

    use sqlx::Row;
    let count: i64 = sqlx::query("SELECT COUNT(*) AS n FROM newsletter_subscriptions")
        .fetch_one(&app.db_pool)
        .await
        .expect("Failed to count subscriptions")
        .get("n");
    assert_eq!(5, count);
}
