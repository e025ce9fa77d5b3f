use std::error::Error;

use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::{HttpRequest, HttpResponse};

#[derive(serde::Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(serde::Serialize)]
struct MessageBody {
    message: String,
}

/// Rewraps a rejected subscription body as the `{"error": ...}` shape the
/// subscribe/unsubscribe endpoints answer with.
pub fn subscription_json_error_handler(
    err: JsonPayloadError,
    _req: &HttpRequest,
) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(ErrorBody {
        error: err.to_string(),
    });
    InternalError::from_response(err, response).into()
}

/// The analytics endpoint reports rejected payloads as `{"message": ...}`.
pub fn analytics_json_error_handler(
    err: JsonPayloadError,
    _req: &HttpRequest,
) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(MessageBody {
        message: err.to_string(),
    });
    InternalError::from_response(err, response).into()
}

pub fn error_chain_fmt(e: &impl Error, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    writeln!(f, "{e}\n")?;
    let mut current = e.source();

    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{cause}")?;
        current = cause.source();
    }

    Ok(())
}

pub fn prepare_html_template(entries: &[(&str, &str)], template_name: &str) -> String {
    let mut ctx = tera::Context::new();
    for (key, value) in entries.iter().copied() {
        ctx.insert(key, value);
    }
    let tera = tera::Tera::new("views/**/*").expect("Failed to initialize Tera templates");
    tera.render(template_name, &ctx)
        .expect("Failed rendering email template")
}
