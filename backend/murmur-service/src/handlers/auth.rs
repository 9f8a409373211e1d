//! Login, logout and registration.

use crate::config::Config;
use crate::db;
use crate::error::{urlencode, AppError, Result};
use crate::models::{LoginForm, RegisterForm};
use crate::security::password;
use crate::session::{self, sanitize_next, MaybeUser};
use crate::validators;
use crate::views::{self, page_context, Views};
use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::{web, HttpResponse};
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;
use tracing::{info, warn};

const INVALID_CREDENTIALS: &str = "Invalid username or password";
const WELCOME_MESSAGE: &str = "Congratulations! You are now a registered user!";
// A guest has no session row to carry a flash, so the redirect smuggles the
// welcome message through a marker parameter instead.
const REGISTERED_REDIRECT: &str = "/login?registered=1";

#[derive(Debug, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
    pub registered: Option<String>,
}

fn registration_flash(query: &NextQuery) -> Option<&'static str> {
    query.registered.as_deref().map(|_| WELCOME_MESSAGE)
}

pub async fn login_form(
    views: web::Data<Views>,
    user: MaybeUser,
    query: web::Query<NextQuery>,
) -> Result<HttpResponse> {
    if user.0.is_some() {
        return Ok(views::redirect("/"));
    }
    render_login(&views, query.next.as_deref(), registration_flash(&query), "")
}

pub async fn login(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    views: web::Data<Views>,
    user: MaybeUser,
    query: web::Query<NextQuery>,
    form: web::Form<LoginForm>,
) -> Result<HttpResponse> {
    if user.0.is_some() {
        return Ok(views::redirect("/"));
    }

    let found = db::users::find_by_username(&pool, form.username.trim()).await?;
    // The message never reveals which field was wrong.
    let Some(account) = found else {
        warn!(username = %form.username, "login attempt for unknown username");
        return render_login(
            &views,
            query.next.as_deref(),
            Some(INVALID_CREDENTIALS),
            &form.username,
        );
    };

    if !password::verify_password(&form.password, &account.password_hash)? {
        warn!(username = %account.username, "login attempt with wrong password");
        return render_login(
            &views,
            query.next.as_deref(),
            Some(INVALID_CREDENTIALS),
            &form.username,
        );
    }

    let (expires_at, max_age) = if form.remember() {
        let days = config.session.remember_ttl_days;
        (
            Utc::now() + Duration::days(days),
            Some(CookieDuration::days(days)),
        )
    } else {
        (Utc::now() + Duration::hours(config.session.ttl_hours), None)
    };

    let session_row = db::sessions::create_session(&pool, account.id, expires_at).await?;
    info!(username = %account.username, "user logged in");

    let target = sanitize_next(query.next.as_deref());
    Ok(HttpResponse::SeeOther()
        .insert_header((actix_web::http::header::LOCATION, target))
        .cookie(session::login_cookie(session_row.id, max_age))
        .finish())
}

pub async fn logout(pool: web::Data<PgPool>, user: MaybeUser) -> Result<HttpResponse> {
    if let Some(current) = user.0 {
        db::sessions::delete_session(&pool, current.session_id).await?;
        info!(username = %current.user.username, "user logged out");
    }
    Ok(HttpResponse::SeeOther()
        .insert_header((actix_web::http::header::LOCATION, "/"))
        .cookie(session::logout_cookie())
        .finish())
}

pub async fn register_form(views: web::Data<Views>, user: MaybeUser) -> Result<HttpResponse> {
    if user.0.is_some() {
        return Ok(views::redirect("/"));
    }
    render_register(&views, &json!({}), &json!({}))
}

pub async fn register(
    pool: web::Data<PgPool>,
    views: web::Data<Views>,
    user: MaybeUser,
    form: web::Form<RegisterForm>,
) -> Result<HttpResponse> {
    if user.0.is_some() {
        return Ok(views::redirect("/"));
    }

    let username = form.username.trim();
    let email = form.email.trim();
    let mut errors = serde_json::Map::new();

    if !validators::validate_username(username) {
        errors.insert(
            "username".into(),
            json!("Usernames are 3-32 characters: letters, digits, _ or -"),
        );
    } else if db::users::username_taken(&pool, username, None).await? {
        errors.insert("username".into(), json!("Please use a different username"));
    }

    if !validators::validate_email(email) {
        errors.insert("email".into(), json!("Please enter a valid email address"));
    } else if db::users::email_taken(&pool, email).await? {
        errors.insert("email".into(), json!("Please use a different email address"));
    }

    if form.password.is_empty() {
        errors.insert("password".into(), json!("Password is required"));
    }
    if form.password2 != form.password {
        errors.insert("password2".into(), json!("Passwords must match"));
    }

    let form_ctx = json!({ "username": username, "email": email });
    if !errors.is_empty() {
        return render_register(&views, &serde_json::Value::Object(errors), &form_ctx);
    }

    let hash = password::hash_password(&form.password)?;
    match db::users::create_user(&pool, username, email, &hash).await {
        Ok(created) => {
            info!(username = %created.username, "new user registered");
            Ok(views::redirect(REGISTERED_REDIRECT))
        }
        // Uniqueness race between the taken-check and the insert: the
        // constraint wins and the form shows a field error.
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            let errors = json!({
                "username": "Please use a different username",
                "email": "Please use a different email address",
            });
            render_register(&views, &errors, &form_ctx)
        }
        Err(e) => Err(AppError::Database(e)),
    }
}

fn render_login(
    views: &Views,
    next: Option<&str>,
    flash: Option<&str>,
    username: &str,
) -> Result<HttpResponse> {
    let mut ctx = page_context("Sign In", None, flash.map(str::to_string));
    ctx["next"] = match next {
        Some(path) => json!(urlencode(path)),
        None => serde_json::Value::Null,
    };
    ctx["form"] = json!({ "username": username });
    views.render("login", &ctx)
}

fn render_register(
    views: &Views,
    errors: &serde_json::Value,
    form: &serde_json::Value,
) -> Result<HttpResponse> {
    let mut ctx = page_context("Register", None, None);
    ctx["errors"] = errors.clone();
    ctx["form"] = form.clone();
    views.render("register", &ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_rt::test]
    async fn registration_redirect_carries_the_welcome_message() {
        // The marker the redirect sets must be the one login_form reads.
        let query_string = REGISTERED_REDIRECT.split_once('?').unwrap().1;
        let query = web::Query::<NextQuery>::from_query(query_string).unwrap();
        assert_eq!(registration_flash(&query), Some(WELCOME_MESSAGE));

        let views = Views::new().unwrap();
        let resp = render_login(&views, None, registration_flash(&query), "").unwrap();
        let body = to_bytes(resp.into_body()).await.unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains(WELCOME_MESSAGE));
    }

    #[actix_rt::test]
    async fn plain_login_page_has_no_welcome_message() {
        let query = web::Query::<NextQuery>::from_query("").unwrap();
        assert_eq!(registration_flash(&query), None);

        let views = Views::new().unwrap();
        let resp = render_login(&views, None, None, "").unwrap();
        let body = to_bytes(resp.into_body()).await.unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(!html.contains(WELCOME_MESSAGE));
    }
}
