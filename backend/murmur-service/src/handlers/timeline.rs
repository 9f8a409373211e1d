//! Home feed, explore, tag filter and search.

use crate::config::Config;
use crate::db;
use crate::error::{urlencode, AppError, Result};
use crate::models::{PostForm, PostWithAuthor, SearchForm};
use crate::pagination::{Page, PageQuery};
use crate::session::CurrentUser;
use crate::views::{self, page_context, page_links, post_context, Views};
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

pub async fn index(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    views: web::Data<Views>,
    user: CurrentUser,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    render_home(&pool, &config, &views, &user, query.number(), None, &json!({})).await
}

pub async fn create_post(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    views: web::Data<Views>,
    user: CurrentUser,
    form: web::Form<PostForm>,
) -> Result<HttpResponse> {
    let title = form.title.trim();
    let body = form.body.trim();
    let limit = config.limits.post_length_limit;

    let error = if title.is_empty() {
        Some("A title is required".to_string())
    } else if body.is_empty() {
        Some("Say something first".to_string())
    } else if body.chars().count() > limit {
        Some(format!("Posts are limited to {limit} characters"))
    } else {
        None
    };

    if let Some(message) = error {
        let form_ctx = json!({ "title": title, "body": body });
        return render_home(&pool, &config, &views, &user, 1, Some(message), &form_ctx).await;
    }

    // An unknown tag id from a stale form silently becomes "no tag".
    let tag_id = match form.tag() {
        Some(id) => db::tags::find_by_id(&pool, id).await?.map(|t| t.id),
        None => None,
    };

    let post = db::posts::create_post(&pool, user.user.id, title, body, tag_id).await?;
    info!(post_id = %post.id, author = %user.user.username, "post created");
    user.flash(&pool, "Your post is now live!").await?;
    Ok(views::redirect("/"))
}

pub async fn explore(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    views: web::Data<Views>,
    user: CurrentUser,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let per_page = config.limits.posts_per_page;
    let number = query.number();
    let rows = db::posts::explore_page(
        &pool,
        per_page + 1,
        Page::<PostWithAuthor>::offset(number, per_page),
    )
    .await?;
    let page = Page::from_rows(rows, number, per_page);

    let flash = user.take_flash(&pool).await?;
    let ctx = list_context("Explore", &user, flash, &page, "/explore");
    views.render("index", &ctx)
}

pub async fn by_tag(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    views: web::Data<Views>,
    user: CurrentUser,
    path: web::Path<Uuid>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let tag_id = path.into_inner();
    // An unknown tag id is not an error: the filter simply matches nothing.
    let tag = db::tags::find_by_id(&pool, tag_id).await?;

    let per_page = config.limits.posts_per_page;
    let number = query.number();
    let rows = db::posts::by_tag_page(
        &pool,
        tag_id,
        per_page + 1,
        Page::<PostWithAuthor>::offset(number, per_page),
    )
    .await?;
    let page = Page::from_rows(rows, number, per_page);

    let flash = user.take_flash(&pool).await?;
    let title = match &tag {
        Some(tag) => format!("#{}", tag.title),
        None => "Tag".to_string(),
    };
    let base = format!("/tag/{tag_id}");
    let ctx = list_context(&title, &user, flash, &page, &base);
    views.render("index", &ctx)
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub page: Option<i64>,
}

/// POST /search redirects to the GET form so pagination links stay on the
/// search route.
pub async fn search_submit(_user: CurrentUser, form: web::Form<SearchForm>) -> Result<HttpResponse> {
    Ok(views::redirect(&format!(
        "/search?q={}",
        urlencode(form.q.trim())
    )))
}

pub async fn search(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    views: web::Data<Views>,
    user: CurrentUser,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse> {
    let q = query.q.clone().unwrap_or_default();
    let number = PageQuery { page: query.page }.number();
    let per_page = config.limits.posts_per_page;

    let rows = if q.is_empty() {
        Vec::new()
    } else {
        db::posts::search_page(
            &pool,
            &q,
            per_page + 1,
            Page::<PostWithAuthor>::offset(number, per_page),
        )
        .await?
    };
    let page = Page::from_rows(rows, number, per_page);

    let flash = user.take_flash(&pool).await?;
    let base = format!("/search?q={}", urlencode(&q));
    let title = if q.is_empty() {
        "Search".to_string()
    } else {
        format!("Search: {q}")
    };
    let ctx = list_context(&title, &user, flash, &page, &base);
    views.render("index", &ctx)
}

/// Shared context for post-list pages without the posting form
fn list_context(
    title: &str,
    user: &CurrentUser,
    flash: Option<String>,
    page: &Page<PostWithAuthor>,
    base: &str,
) -> Value {
    let mut ctx = page_context(title, Some(&user.user), flash);
    ctx["posts"] = Value::Array(page.items.iter().map(post_context).collect());
    ctx["show_post_form"] = Value::Bool(false);
    let (next_url, prev_url) = page_links(base, page);
    ctx["next_url"] = next_url.unwrap_or(Value::Null);
    ctx["prev_url"] = prev_url.unwrap_or(Value::Null);
    ctx
}

/// Home page: the followed+own feed plus the posting form
async fn render_home(
    pool: &PgPool,
    config: &Config,
    views: &Views,
    user: &CurrentUser,
    number: i64,
    post_error: Option<String>,
    form_ctx: &Value,
) -> Result<HttpResponse> {
    let per_page = config.limits.posts_per_page;
    let rows = db::posts::feed_page(
        pool,
        user.user.id,
        per_page + 1,
        Page::<PostWithAuthor>::offset(number, per_page),
    )
    .await?;
    let page = Page::from_rows(rows, number, per_page);
    let tags = db::tags::list_all(pool).await?;

    let flash = user.take_flash(pool).await?;
    let mut ctx = list_context("Home", user, flash, &page, "/");
    ctx["show_post_form"] = Value::Bool(true);
    ctx["tags"] = serde_json::to_value(&tags)
        .map_err(|e| AppError::Internal(format!("tag context serialization failed: {e}")))?;
    ctx["post_length_limit"] = json!(config.limits.post_length_limit);
    ctx["post_error"] = post_error.map(Value::String).unwrap_or(Value::Null);
    ctx["form"] = form_ctx.clone();
    views.render("index", &ctx)
}
