use actix_web::{HttpResponse, ResponseError, http::StatusCode};

use super::super::helpers::error_chain_fmt;

/// What a caller sees when the failure is not theirs to fix.
const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again later.";

#[derive(serde::Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(thiserror::Error)]
pub enum SubscribeError {
    #[error("{0}")]
    ValidationError(String),
    #[error("This email is already subscribed.")]
    AlreadySubscribed,
    #[error("Too many requests. Please try again in a minute.")]
    RateLimited,
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for SubscribeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for SubscribeError {
    fn status_code(&self) -> StatusCode {
        match self {
            SubscribeError::ValidationError(_) | SubscribeError::AlreadySubscribed => {
                StatusCode::BAD_REQUEST
            }
            SubscribeError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            SubscribeError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            SubscribeError::UnexpectedError(_) => GENERIC_ERROR_MESSAGE.to_owned(),
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(ErrorBody { error })
    }
}

#[derive(thiserror::Error)]
pub enum UnsubscribeError {
    #[error("{0}")]
    ValidationError(String),
    #[error("This email is not subscribed.")]
    NotSubscribed,
    #[error("This email is already unsubscribed.")]
    AlreadyUnsubscribed,
    #[error("Too many requests. Please try again in a minute.")]
    RateLimited,
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for UnsubscribeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for UnsubscribeError {
    fn status_code(&self) -> StatusCode {
        match self {
            UnsubscribeError::ValidationError(_)
            | UnsubscribeError::NotSubscribed
            | UnsubscribeError::AlreadyUnsubscribed => StatusCode::BAD_REQUEST,
            UnsubscribeError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            UnsubscribeError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            UnsubscribeError::UnexpectedError(_) => GENERIC_ERROR_MESSAGE.to_owned(),
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(ErrorBody { error })
    }
}
