use actix_web::{HttpRequest, HttpResponse, web};
use anyhow::Context;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::{
    domain::{NewSubscriber, SubscribeBody},
    email_client::EmailClient,
    rate_limit::{RateLimitDecision, SubscribeRateLimiter, client_key},
    startup::ApplicationBaseURL,
    subscription_store,
};

use super::errors::SubscribeError;
use super::helpers::{get_welcome_html, get_welcome_text};

const SUBSCRIPTION_SOURCE: &str = "website";

#[derive(serde::Serialize)]
struct SubscribeResponse {
    success: bool,
    message: String,
    data: SubscriptionData,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct SubscriptionData {
    email: String,
    subscribed_at: DateTime<Utc>,
}

#[tracing::instrument(
    name = "Adding a newsletter subscriber.",
    skip(request, body, db_pool, email_client, base_url, rate_limiter),
    fields(subscriber_email = %body.email)
)]
pub async fn subscribe(
    request: HttpRequest,
    body: web::Json<SubscribeBody>,
    db_pool: web::Data<PgPool>,
    email_client: web::Data<EmailClient>,
    base_url: web::Data<ApplicationBaseURL>,
    rate_limiter: web::Data<SubscribeRateLimiter>,
) -> Result<HttpResponse, SubscribeError> {
    if rate_limiter.0.check(&client_key(&request)) == RateLimitDecision::Denied {
        return Err(SubscribeError::RateLimited);
    }

    let new_subscriber: NewSubscriber =
        body.0.try_into().map_err(SubscribeError::ValidationError)?;

    let existing = subscription_store::find_by_email(&db_pool, &new_subscriber.email)
        .await
        .context("Failed to look up the subscription by email.")?;

    let subscription = match existing {
        Some(subscription) if subscription.is_active => {
            return Err(SubscribeError::AlreadySubscribed);
        }
        Some(_) => subscription_store::reactivate(
            &db_pool,
            &new_subscriber.email,
            new_subscriber.name_as_str(),
        )
        .await
        .context("Failed to reactivate the subscription.")?,
        None => subscription_store::insert_active(
            &db_pool,
            &new_subscriber.email,
            new_subscriber.name_as_str(),
            SUBSCRIPTION_SOURCE,
        )
        .await
        .context("Failed to insert a new subscription.")?,
    };

    // The subscription is committed at this point; a failed welcome email
    // must not undo it or fail the request.
    if let Err(err) = send_welcome_email(&email_client, &new_subscriber, &base_url.0).await {
        tracing::warn!(
            "Failed to send the welcome email to {}: {:?}",
            new_subscriber.email,
            err
        );
    }

    Ok(HttpResponse::Ok().json(SubscribeResponse {
        success: true,
        message: "Successfully subscribed to the newsletter.".into(),
        data: SubscriptionData {
            email: subscription.email,
            subscribed_at: subscription.subscribed_at,
        },
    }))
}

#[tracing::instrument(
    name = "Sending a welcome email to a new subscriber",
    skip(email_client, subscriber, site_url)
)]
async fn send_welcome_email(
    email_client: &EmailClient,
    subscriber: &NewSubscriber,
    site_url: &str,
) -> Result<(), reqwest::Error> {
    let name = subscriber.name_as_str().unwrap_or("there");

    email_client
        .send_email(
            &subscriber.email,
            "Welcome to Budget Ndio Story!",
            &get_welcome_html(name, site_url),
            &get_welcome_text(name, site_url),
        )
        .await
}
