//! Tag listing and creation.

use crate::db;
use crate::error::Result;
use crate::models::TagForm;
use crate::session::CurrentUser;
use crate::validators;
use crate::views::{self, page_context, Views};
use actix_web::{web, HttpResponse};
use serde_json::Value;
use sqlx::PgPool;
use tracing::info;

pub async fn list_tags(
    pool: web::Data<PgPool>,
    views: web::Data<Views>,
    user: CurrentUser,
) -> Result<HttpResponse> {
    let flash = user.take_flash(&pool).await?;
    render_tags(&pool, &views, &user, flash, None).await
}

pub async fn create_tag(
    pool: web::Data<PgPool>,
    views: web::Data<Views>,
    user: CurrentUser,
    form: web::Form<TagForm>,
) -> Result<HttpResponse> {
    let title = form.title.trim();
    if !validators::validate_tag_title(title) {
        return render_tags(
            &pool,
            &views,
            &user,
            None,
            Some("Tag titles are 1-30 characters".to_string()),
        )
        .await;
    }

    let tag = db::tags::create_tag(&pool, user.user.id, title).await?;
    info!(tag_id = %tag.id, title = %tag.title, creator = %user.user.username, "tag created");
    user.flash(&pool, "Tag created.").await?;
    Ok(views::redirect("/tags"))
}

async fn render_tags(
    pool: &PgPool,
    views: &Views,
    user: &CurrentUser,
    flash: Option<String>,
    tag_error: Option<String>,
) -> Result<HttpResponse> {
    let tags = db::tags::list_all(pool).await?;
    let mut ctx = page_context("Tags", Some(&user.user), flash);
    ctx["tags"] = serde_json::to_value(&tags)
        .map_err(|e| crate::error::AppError::Internal(format!("tag context failed: {e}")))?;
    ctx["tag_error"] = tag_error.map(Value::String).unwrap_or(Value::Null);
    views.render("tags", &ctx)
}
