//! Handlebars template registry and rendering helpers.
//!
//! Templates are embedded at compile time and registered once at startup;
//! the registry is shared through `web::Data`.

use crate::error::AppError;
use crate::models::{avatar_url, PostWithAuthor, User};
use crate::pagination::Page;
use actix_web::http::header::LOCATION;
use actix_web::HttpResponse;
use handlebars::Handlebars;
use serde_json::{json, Value};

const TEMPLATES: &[(&str, &str)] = &[
    ("header", include_str!("../../templates/header.hbs")),
    ("footer", include_str!("../../templates/footer.hbs")),
    ("post_list", include_str!("../../templates/post_list.hbs")),
    ("index", include_str!("../../templates/index.hbs")),
    ("login", include_str!("../../templates/login.hbs")),
    ("register", include_str!("../../templates/register.hbs")),
    ("user", include_str!("../../templates/user.hbs")),
    ("edit_profile", include_str!("../../templates/edit_profile.hbs")),
    ("likes", include_str!("../../templates/likes.hbs")),
    ("tags", include_str!("../../templates/tags.hbs")),
];

pub struct Views {
    registry: Handlebars<'static>,
}

impl Views {
    pub fn new() -> Result<Self, AppError> {
        let mut registry = Handlebars::new();
        for (name, source) in TEMPLATES {
            registry
                .register_template_string(name, *source)
                .map_err(|e| AppError::Internal(format!("template {name} failed to parse: {e}")))?;
        }
        Ok(Views { registry })
    }

    /// Render a registered template into an HTML response
    pub fn render(&self, name: &str, ctx: &Value) -> Result<HttpResponse, AppError> {
        let body = self.registry.render(name, ctx)?;
        Ok(HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body))
    }
}

/// 303 redirect to a local path
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((LOCATION, location.to_string()))
        .finish()
}

/// Base context shared by every page: title, signed-in user, flash message
pub fn page_context(title: &str, current_user: Option<&User>, flash: Option<String>) -> Value {
    json!({
        "title": title,
        "current_user": current_user.map(|u| json!({
            "username": u.username,
            "avatar": u.avatar_url(32),
        })),
        "flash": flash,
    })
}

/// Template view of one feed item
pub fn post_context(post: &PostWithAuthor) -> Value {
    json!({
        "id": post.id,
        "title": post.title,
        "body": post.body,
        "author": post.author_username,
        "avatar": avatar_url(&post.author_email, 36),
        "created_at": post.created_at.format("%Y-%m-%d %H:%M").to_string(),
        "tag_id": post.tag_id,
        "tag_title": post.tag_title,
        "like_count": post.like_count,
    })
}

/// next/prev URLs for a page window. `base` is the endpoint path, with or
/// without an existing query string.
pub fn page_links<T>(base: &str, page: &Page<T>) -> (Option<Value>, Option<Value>) {
    let sep = if base.contains('?') { '&' } else { '?' };
    let url = |n: i64| Value::String(format!("{base}{sep}page={n}"));
    (
        page.next_number().map(url),
        page.prev_number().map(url),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: String::new(),
            about_me: String::new(),
            last_seen: Utc::now(),
            created_at: Utc::now(),
        }
    }

    fn sample_post(title: &str) -> PostWithAuthor {
        PostWithAuthor {
            id: Uuid::new_v4(),
            title: title.to_string(),
            body: "body".to_string(),
            user_id: Uuid::new_v4(),
            tag_id: None,
            created_at: Utc::now(),
            author_username: "alice".to_string(),
            author_email: "alice@example.com".to_string(),
            tag_title: None,
            like_count: 0,
        }
    }

    #[test]
    fn test_all_templates_parse() {
        Views::new().expect("all embedded templates should parse");
    }

    #[test]
    fn test_render_feed_page() {
        let views = Views::new().unwrap();
        let user = sample_user();
        let mut ctx = page_context("Home", Some(&user), Some("Your post is now live!".into()));
        ctx["posts"] = Value::Array(vec![post_context(&sample_post("Hello"))]);
        ctx["show_post_form"] = Value::Bool(false);
        ctx["next_url"] = Value::Null;
        ctx["prev_url"] = Value::Null;

        let body = views.registry.render("index", &ctx).unwrap();
        assert!(body.contains("Hello"));
        assert!(body.contains("alice"));
        assert!(body.contains("Your post is now live!"));
    }

    #[test]
    fn test_render_empty_post_list() {
        let views = Views::new().unwrap();
        let user = sample_user();
        let mut ctx = page_context("Tag", Some(&user), None);
        ctx["posts"] = Value::Array(vec![]);
        ctx["show_post_form"] = Value::Bool(false);

        let body = views.registry.render("index", &ctx).unwrap();
        assert!(body.contains("No posts to show."));
    }

    #[test]
    fn test_render_escapes_html() {
        let views = Views::new().unwrap();
        let user = sample_user();
        let mut ctx = page_context("Home", Some(&user), None);
        ctx["posts"] = Value::Array(vec![post_context(&sample_post("<script>alert(1)</script>"))]);
        ctx["show_post_form"] = Value::Bool(false);

        let body = views.registry.render("index", &ctx).unwrap();
        assert!(!body.contains("<script>alert(1)</script>"));
    }

    #[test]
    fn test_page_links() {
        let page = Page::from_rows((1..=11).collect::<Vec<i32>>(), 2, 10);
        let (next, prev) = page_links("/explore", &page);
        assert_eq!(next.unwrap(), "/explore?page=3");
        assert_eq!(prev.unwrap(), "/explore?page=1");

        let (next, _) = page_links("/search?q=hi", &page);
        assert_eq!(next.unwrap(), "/search?q=hi&page=3");
    }

    #[test]
    fn test_redirect_sets_location() {
        let resp = redirect("/login");
        assert_eq!(resp.status(), actix_web::http::StatusCode::SEE_OTHER);
        assert_eq!(resp.headers().get(LOCATION).unwrap(), "/login");
    }
}
