use actix_web::http::header::LOCATION;
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Template error: {0}")]
    Template(#[from] handlebars::RenderError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Authentication required")]
    Unauthorized {
        /// Path to return to after login
        next: String,
    },

    #[error("Internal server error: {0}")]
    Internal(String),
}

const NOT_FOUND_PAGE: &str = include_str!("../templates/error_404.html");
const SERVER_ERROR_PAGE: &str = include_str!("../templates/error_500.html");

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized { .. } => StatusCode::SEE_OTHER,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Unauthorized { next } => {
                let location = format!("/login?next={}", urlencode(next));
                HttpResponse::SeeOther()
                    .insert_header((LOCATION, location))
                    .finish()
            }
            AppError::NotFound(what) => {
                tracing::info!(what = %what, "rendering 404");
                HttpResponse::NotFound()
                    .content_type("text/html; charset=utf-8")
                    .body(NOT_FOUND_PAGE)
            }
            AppError::Validation(msg) => HttpResponse::BadRequest()
                .content_type("text/html; charset=utf-8")
                .body(format!("<h1>Bad request</h1><p>{}</p>", html_escape(msg))),
            AppError::Database(e) => {
                tracing::error!(error = %e, "database error while handling request");
                HttpResponse::InternalServerError()
                    .content_type("text/html; charset=utf-8")
                    .body(SERVER_ERROR_PAGE)
            }
            AppError::Template(e) => {
                tracing::error!(error = %e, "template rendering failed");
                HttpResponse::InternalServerError()
                    .content_type("text/html; charset=utf-8")
                    .body(SERVER_ERROR_PAGE)
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error while handling request");
                HttpResponse::InternalServerError()
                    .content_type("text/html; charset=utf-8")
                    .body(SERVER_ERROR_PAGE)
            }
        }
    }
}

/// Percent-encode a path for use in a Location header query parameter
pub fn urlencode(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

fn html_escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
