//! Session cookie handling and the authenticated-principal extractor.

use crate::db;
use crate::error::AppError;
use crate::models::User;
use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use sqlx::PgPool;
use std::future::Future;
use std::pin::Pin;
use uuid::Uuid;

/// Name of the login cookie; its value is the session row id
pub const SESSION_COOKIE: &str = "murmur_session";

/// The authenticated principal, resolved from the session cookie.
///
/// Extraction loads the session row (rejecting expired ones), loads the user
/// and bumps `users.last_seen`. A missing or invalid session on a protected
/// route becomes a redirect to `/login?next=<original path>`.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub session_id: Uuid,
}

impl CurrentUser {
    /// Store a one-shot flash message for the next rendered page
    pub async fn flash(&self, pool: &PgPool, message: &str) -> Result<(), AppError> {
        db::sessions::set_flash(pool, self.session_id, message).await?;
        Ok(())
    }

    /// Fetch and clear the pending flash message
    pub async fn take_flash(&self, pool: &PgPool) -> Result<Option<String>, AppError> {
        Ok(db::sessions::take_flash(pool, self.session_id).await?)
    }
}

/// Optional principal for routes that behave differently for guests
/// (login and register redirect authenticated users home).
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<CurrentUser>);

async fn resolve_user(req: &HttpRequest) -> Result<CurrentUser, AppError> {
    let pool = req
        .app_data::<web::Data<PgPool>>()
        .ok_or_else(|| AppError::Internal("database pool missing from app data".to_string()))?
        .get_ref()
        .clone();

    let next = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());

    let token = req
        .cookie(SESSION_COOKIE)
        .and_then(|c| Uuid::parse_str(c.value()).ok())
        .ok_or_else(|| AppError::Unauthorized { next: next.clone() })?;

    let session = db::sessions::find_valid(&pool, token)
        .await?
        .ok_or_else(|| AppError::Unauthorized { next: next.clone() })?;

    let user = db::users::find_by_id(&pool, session.user_id)
        .await?
        .ok_or(AppError::Unauthorized { next })?;

    db::users::update_last_seen(&pool, user.id).await?;

    Ok(CurrentUser {
        user,
        session_id: session.id,
    })
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<CurrentUser, AppError>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move { resolve_user(&req).await })
    }
}

impl FromRequest for MaybeUser {
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<MaybeUser, AppError>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            match resolve_user(&req).await {
                Ok(user) => Ok(MaybeUser(Some(user))),
                Err(AppError::Unauthorized { .. }) => Ok(MaybeUser(None)),
                Err(e) => Err(e),
            }
        })
    }
}

/// Build the login cookie. Remember-me sessions persist for `max_age`;
/// otherwise the cookie is scoped to the browser session.
pub fn login_cookie(session_id: Uuid, max_age: Option<CookieDuration>) -> Cookie<'static> {
    let mut builder = Cookie::build(SESSION_COOKIE, session_id.to_string())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    if let Some(age) = max_age {
        builder = builder.max_age(age);
    }
    builder.finish()
}

/// An expired cookie that clears the session on logout
pub fn logout_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish();
    cookie.make_removal();
    cookie
}

/// Keep redirect targets local: only absolute paths on this host survive.
/// Anything else (full URLs, protocol-relative `//host`, empty) falls back
/// to the home page.
pub fn sanitize_next(next: Option<&str>) -> String {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path.to_string(),
        _ => "/".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_next_accepts_local_paths() {
        assert_eq!(sanitize_next(Some("/explore")), "/explore");
        assert_eq!(sanitize_next(Some("/user/alice?page=2")), "/user/alice?page=2");
    }

    #[test]
    fn test_sanitize_next_rejects_external() {
        assert_eq!(sanitize_next(Some("https://evil.example")), "/");
        assert_eq!(sanitize_next(Some("//evil.example")), "/");
        assert_eq!(sanitize_next(Some("relative")), "/");
        assert_eq!(sanitize_next(None), "/");
    }

    #[test]
    fn test_login_cookie_is_http_only() {
        let cookie = login_cookie(Uuid::new_v4(), None);
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert!(cookie.max_age().is_none());
    }

    #[test]
    fn test_remember_cookie_has_max_age() {
        let cookie = login_cookie(Uuid::new_v4(), Some(CookieDuration::days(30)));
        assert_eq!(cookie.max_age(), Some(CookieDuration::days(30)));
    }
}
