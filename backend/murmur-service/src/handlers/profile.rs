//! Profile pages and profile editing.

use crate::config::Config;
use crate::db;
use crate::error::{AppError, Result};
use crate::models::{EditProfileForm, PostWithAuthor};
use crate::pagination::{Page, PageQuery};
use crate::session::CurrentUser;
use crate::validators;
use crate::views::{self, page_context, page_links, post_context, Views};
use actix_web::{web, HttpResponse};
use serde_json::{json, Value};
use sqlx::PgPool;
use tracing::info;

pub async fn show_user(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    views: web::Data<Views>,
    user: CurrentUser,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let username = path.into_inner();
    let profile = db::users::find_by_username(&pool, &username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {username}")))?;

    let per_page = config.limits.posts_per_page;
    let number = query.number();
    let rows = db::posts::by_author_page(
        &pool,
        profile.id,
        per_page + 1,
        Page::<PostWithAuthor>::offset(number, per_page),
    )
    .await?;
    let page = Page::from_rows(rows, number, per_page);

    let is_self = profile.id == user.user.id;
    let is_following = if is_self {
        false
    } else {
        db::follows::is_following(&pool, user.user.id, profile.id).await?
    };
    let follower_count = db::follows::follower_count(&pool, profile.id).await?;
    let followed_count = db::follows::followed_count(&pool, profile.id).await?;

    let flash = user.take_flash(&pool).await?;
    let mut ctx = page_context(&profile.username, Some(&user.user), flash);
    ctx["profile"] = json!({
        "username": profile.username,
        "avatar": profile.avatar_url(128),
        "about_me": profile.about_me,
        "last_seen": profile.last_seen.format("%Y-%m-%d %H:%M").to_string(),
        "is_self": is_self,
        "is_following": is_following,
        "follower_count": follower_count,
        "followed_count": followed_count,
    });
    ctx["posts"] = Value::Array(page.items.iter().map(post_context).collect());
    let (next_url, prev_url) = page_links(&format!("/user/{}", profile.username), &page);
    ctx["next_url"] = next_url.unwrap_or(Value::Null);
    ctx["prev_url"] = prev_url.unwrap_or(Value::Null);
    views.render("user", &ctx)
}

pub async fn edit_profile_form(
    pool: web::Data<PgPool>,
    views: web::Data<Views>,
    user: CurrentUser,
) -> Result<HttpResponse> {
    let flash = user.take_flash(&pool).await?;
    let form = json!({
        "username": user.user.username,
        "about_me": user.user.about_me,
    });
    render_edit(&views, &user, flash, &json!({}), &form)
}

pub async fn edit_profile(
    pool: web::Data<PgPool>,
    views: web::Data<Views>,
    user: CurrentUser,
    form: web::Form<EditProfileForm>,
) -> Result<HttpResponse> {
    let username = form.username.trim();
    let about_me = form.about_me.trim();
    let mut errors = serde_json::Map::new();

    if !validators::validate_username(username) {
        errors.insert(
            "username".into(),
            json!("Usernames are 3-32 characters: letters, digits, _ or -"),
        );
    } else if db::users::username_taken(&pool, username, Some(user.user.id)).await? {
        errors.insert("username".into(), json!("Please use a different username"));
    }

    if !validators::validate_about_me(about_me) {
        errors.insert("about_me".into(), json!("The bio is limited to 140 characters"));
    }

    if !errors.is_empty() {
        let form_ctx = json!({ "username": username, "about_me": about_me });
        return render_edit(
            &views,
            &user,
            None,
            &Value::Object(errors),
            &form_ctx,
        );
    }

    let updated = db::users::update_profile(&pool, user.user.id, username, about_me).await?;
    info!(username = %updated.username, "profile updated");
    user.flash(&pool, "Your changes have been saved.").await?;
    Ok(views::redirect(&format!("/user/{}", updated.username)))
}

fn render_edit(
    views: &Views,
    user: &CurrentUser,
    flash: Option<String>,
    errors: &Value,
    form: &Value,
) -> Result<HttpResponse> {
    let mut ctx = page_context("Edit Profile", Some(&user.user), flash);
    ctx["errors"] = errors.clone();
    ctx["form"] = form.clone();
    views.render("edit_profile", &ctx)
}
