//! Route handlers, grouped by concern.

pub mod auth;
pub mod profile;
pub mod social;
pub mod tags;
pub mod timeline;

use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use sqlx::PgPool;

/// Liveness endpoint with a database round trip
pub async fn health(pool: web::Data<PgPool>) -> impl Responder {
    let db_ok = sqlx::query("SELECT 1").execute(pool.get_ref()).await.is_ok();
    let status = if db_ok { "healthy" } else { "unhealthy" };
    let body = serde_json::json!({
        "status": status,
        "database": db_ok,
        "timestamp": Utc::now().to_rfc3339(),
    });
    if db_ok {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}

/// Register every route on the actix app
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/login", web::get().to(auth::login_form))
        .route("/login", web::post().to(auth::login))
        .route("/logout", web::get().to(auth::logout))
        .route("/register", web::get().to(auth::register_form))
        .route("/register", web::post().to(auth::register))
        .route("/", web::get().to(timeline::index))
        .route("/", web::post().to(timeline::create_post))
        .route("/index", web::get().to(timeline::index))
        .route("/index", web::post().to(timeline::create_post))
        .route("/explore", web::get().to(timeline::explore))
        .route("/tag/{tag_id}", web::get().to(timeline::by_tag))
        .route("/search", web::get().to(timeline::search))
        .route("/search", web::post().to(timeline::search_submit))
        .route("/user/{username}", web::get().to(profile::show_user))
        .route("/edit_profile", web::get().to(profile::edit_profile_form))
        .route("/edit_profile", web::post().to(profile::edit_profile))
        .route("/follow/{username}", web::get().to(social::follow))
        .route("/unfollow/{username}", web::get().to(social::unfollow))
        .route("/like/{post_id}", web::get().to(social::like))
        .route("/likes/{post_id}", web::get().to(social::likes))
        .route("/tags", web::get().to(tags::list_tags))
        .route("/tags", web::post().to(tags::create_tag));
}
