use actix_web::{HttpRequest, HttpResponse, web};
use anyhow::Context;
use chrono::Utc;
use sqlx::PgPool;

use crate::{
    domain::SubscriberEmail,
    rate_limit::{RateLimitDecision, UnsubscribeRateLimiter, client_key},
    subscription_store,
};

use super::errors::UnsubscribeError;

#[derive(serde::Deserialize)]
pub struct UnsubscribeBody {
    pub email: String,
}

#[derive(serde::Serialize)]
struct UnsubscribeResponse {
    success: bool,
    message: String,
}

#[tracing::instrument(
    name = "Removing a newsletter subscriber.",
    skip(request, body, db_pool, rate_limiter),
    fields(subscriber_email = %body.email)
)]
pub async fn unsubscribe(
    request: HttpRequest,
    body: web::Json<UnsubscribeBody>,
    db_pool: web::Data<PgPool>,
    rate_limiter: web::Data<UnsubscribeRateLimiter>,
) -> Result<HttpResponse, UnsubscribeError> {
    if rate_limiter.0.check(&client_key(&request)) == RateLimitDecision::Denied {
        return Err(UnsubscribeError::RateLimited);
    }

    let email =
        SubscriberEmail::parse(body.0.email).map_err(UnsubscribeError::ValidationError)?;

    let existing = subscription_store::find_by_email(&db_pool, &email)
        .await
        .context("Failed to look up the subscription by email.")?;

    match existing {
        None => Err(UnsubscribeError::NotSubscribed),
        Some(subscription) if !subscription.is_active => {
            Err(UnsubscribeError::AlreadyUnsubscribed)
        }
        Some(_) => {
            subscription_store::deactivate(&db_pool, &email, Utc::now())
                .await
                .context("Failed to deactivate the subscription.")?;

            Ok(HttpResponse::Ok().json(UnsubscribeResponse {
                success: true,
                message: "Successfully unsubscribed from the newsletter.".into(),
            }))
        }
    }
}
