//! Follow/unfollow and like routes.
//!
//! Unknown targets and self-directed actions end in a flash message and a
//! redirect, not an error page. Self-follow and self-like are guarded here
//! at the route layer; the database only enforces edge uniqueness.

use crate::config::Config;
use crate::db::{self, likes::LikeOutcome};
use crate::error::Result;
use crate::models::User;
use crate::pagination::{Page, PageQuery};
use crate::session::CurrentUser;
use crate::views::{self, page_context, page_links, Views};
use actix_web::{web, HttpResponse};
use serde_json::{json, Value};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

pub async fn follow(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let username = path.into_inner();
    let Some(target) = db::users::find_by_username(&pool, &username).await? else {
        user.flash(&pool, &format!("User {username} not found.")).await?;
        return Ok(views::redirect("/"));
    };
    if target.id == user.user.id {
        user.flash(&pool, "You cannot follow yourself!").await?;
        return Ok(views::redirect(&format!("/user/{username}")));
    }

    db::follows::follow(&pool, user.user.id, target.id).await?;
    info!(follower = %user.user.username, followed = %target.username, "follow edge created");
    user.flash(&pool, &format!("You are now following {username}!"))
        .await?;
    Ok(views::redirect(&format!("/user/{username}")))
}

pub async fn unfollow(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let username = path.into_inner();
    let Some(target) = db::users::find_by_username(&pool, &username).await? else {
        user.flash(&pool, &format!("User {username} not found.")).await?;
        return Ok(views::redirect("/"));
    };
    if target.id == user.user.id {
        user.flash(&pool, "You cannot unfollow yourself!").await?;
        return Ok(views::redirect(&format!("/user/{username}")));
    }

    db::follows::unfollow(&pool, user.user.id, target.id).await?;
    info!(follower = %user.user.username, followed = %target.username, "follow edge removed");
    user.flash(&pool, &format!("You are no longer following {username}."))
        .await?;
    Ok(views::redirect(&format!("/user/{username}")))
}

pub async fn like(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post_id = path.into_inner();
    let Some(post) = db::posts::find_by_id(&pool, post_id).await? else {
        user.flash(&pool, "Post not found.").await?;
        return Ok(views::redirect("/"));
    };
    if post.user_id == user.user.id {
        user.flash(&pool, "You cannot like your own posts!").await?;
        return Ok(views::redirect("/"));
    }

    match db::likes::like_post(&pool, user.user.id, post.id).await? {
        LikeOutcome::Liked => {
            info!(post_id = %post.id, username = %user.user.username, "post liked");
            user.flash(&pool, "Post liked!").await?;
        }
        LikeOutcome::AlreadyLiked => {
            user.flash(&pool, "You already liked this post").await?;
        }
    }
    Ok(views::redirect("/"))
}

pub async fn likes(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    views: web::Data<Views>,
    user: CurrentUser,
    path: web::Path<Uuid>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let post_id = path.into_inner();
    let Some(post) = db::posts::find_by_id(&pool, post_id).await? else {
        user.flash(&pool, "Post not found.").await?;
        return Ok(views::redirect("/"));
    };

    let per_page = config.limits.users_per_page;
    let number = query.number();
    let rows = db::likes::likers_page(
        &pool,
        post.id,
        per_page + 1,
        Page::<User>::offset(number, per_page),
    )
    .await?;
    let page = Page::from_rows(rows, number, per_page);

    let flash = user.take_flash(&pool).await?;
    let mut ctx = page_context("Likes", Some(&user.user), flash);
    ctx["post_title"] = json!(post.title);
    ctx["likers"] = Value::Array(
        page.items
            .iter()
            .map(|u| {
                json!({
                    "username": u.username,
                    "avatar": u.avatar_url(24),
                })
            })
            .collect(),
    );
    let (next_url, prev_url) = page_links(&format!("/likes/{}", post.id), &page);
    ctx["next_url"] = next_url.unwrap_or(Value::Null);
    ctx["prev_url"] = prev_url.unwrap_or(Value::Null);
    views.render("likes", &ctx)
}
