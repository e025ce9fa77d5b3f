use serde_json::json;

use crate::helpers::{TestApp, spawn_app};

fn pageview(url: &str) -> serde_json::Value {
    json!({
        "type": "pageview",
        "data": {
            "url": url,
            "referrer": "https://news.example.org",
            "userAgent": "Mozilla/5.0",
            "screenWidth": 1280,
            "screenHeight": 720,
            "language": "sw-KE"
        }
    })
}

async fn post_analytics_as(
    app: &TestApp,
    client_key: &str,
    body: serde_json::Value,
) -> reqwest::Response {
    app.api_client
        .post(format!("{}/analytics", app.address))
        .header("x-forwarded-for", client_key)
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request.")
}

#[tokio::test]
async fn recording_a_pageview_returns_200() {
    let app = spawn_app().await;

    let response = app.post_analytics(pageview("/")).await;

    assert_eq!(200, response.status().as_u16());

    let body: serde_json::Value = response.json().await.expect("Failed to parse body.");
    assert_eq!(json!(true), body["success"]);
}

#[tokio::test]
async fn recording_a_custom_event_returns_200() {
    let app = spawn_app().await;

    let response = app
        .post_analytics(json!({
            "type": "event",
            "data": {
                "category": "newsletter",
                "action": "cta_click",
                "label": "hero",
                "value": 1,
                "url": "/"
            }
        }))
        .await;

    assert_eq!(200, response.status().as_u16());
}

#[tokio::test]
async fn a_malformed_payload_is_rejected_with_400() {
    let app = spawn_app().await;

    let test_cases = vec![
        (json!({"type": "bogus", "data": {}}), "an unknown event kind"),
        (json!({"type": "pageview", "data": {}}), "a pageview without a url"),
        (
            json!({"type": "event", "data": {"category": "engagement", "action": "scroll"}}),
            "an event without a url",
        ),
        (json!({"data": {"url": "/"}}), "a missing type tag"),
    ];

    for (body, description) in test_cases {
        let response = app.post_analytics(body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request when the payload was {}.",
            description
        );

        let body: serde_json::Value = response.json().await.expect("The body was not JSON.");
        assert!(
            body["message"].as_str().is_some(),
            "The rejection for {} carried no message field.",
            description
        );
    }
}

#[tokio::test]
async fn the_summary_aggregates_the_recorded_window() {
    let app = spawn_app().await;

    post_analytics_as(&app, "203.0.113.9", pageview("/")).await;
    post_analytics_as(&app, "203.0.113.9", pageview("/budget")).await;
    post_analytics_as(&app, "203.0.113.10", pageview("/budget")).await;
    post_analytics_as(
        &app,
        "203.0.113.9",
        json!({
            "type": "event",
            "data": {"category": "engagement", "action": "video_play", "url": "/budget"}
        }),
    )
    .await;

    let response = app.get_analytics("").await;
    assert_eq!(200, response.status().as_u16());

    let summary: serde_json::Value = response.json().await.expect("Failed to parse body.");
    assert_eq!(json!(3), summary["totalPageViews"]);
    assert_eq!(json!(1), summary["totalEvents"]);
    assert_eq!(json!(2), summary["uniqueVisitors"]);
    assert_eq!(json!("/budget"), summary["topPages"][0]["key"]);
    assert_eq!(json!(2), summary["topPages"][0]["count"]);
    assert_eq!(json!("engagement"), summary["eventsByCategory"][0]["key"]);
}

#[tokio::test]
async fn the_summary_defaults_to_the_trailing_seven_days() {
    let app = spawn_app().await;

    app.post_analytics(pageview("/")).await;

    let response = app.get_analytics("").await;
    let summary: serde_json::Value = response.json().await.expect("Failed to parse body.");

    let daily = summary["daily"].as_array().expect("Missing daily series.");
    assert_eq!(8, daily.len());
    assert_eq!(json!(1), daily.last().unwrap()["pageViews"]);
}

#[tokio::test]
async fn an_explicit_window_excludes_older_records() {
    let app = spawn_app().await;

    app.post_analytics(pageview("/")).await;

    let response = app
        .get_analytics("?startDate=2020-01-01T00:00:00Z&endDate=2020-01-07T00:00:00Z")
        .await;
    let summary: serde_json::Value = response.json().await.expect("Failed to parse body.");

    assert_eq!(json!(0), summary["totalPageViews"]);
    assert_eq!(json!(0), summary["uniqueVisitors"]);
}
