/// Post repository - feed, explore, tag, search and author queries.
///
/// Every list query fetches `limit` rows where the caller passes
/// `per_page + 1`; the extra row feeds the pagination window.
use crate::models::{Post, PostWithAuthor};
use sqlx::PgPool;
use uuid::Uuid;

const POST_SELECT: &str = r#"
    SELECT p.id, p.title, p.body, p.user_id, p.tag_id, p.created_at,
           u.username AS author_username, u.email AS author_email,
           t.title AS tag_title,
           (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id) AS like_count
    FROM posts p
    JOIN users u ON u.id = p.user_id
    LEFT JOIN tags t ON t.id = p.tag_id
"#;

const POST_ORDER: &str = " ORDER BY p.created_at DESC, p.id DESC LIMIT $2 OFFSET $3";

/// Create a post
pub async fn create_post(
    pool: &PgPool,
    user_id: Uuid,
    title: &str,
    body: &str,
    tag_id: Option<Uuid>,
) -> Result<Post, sqlx::Error> {
    sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (id, title, body, user_id, tag_id, created_at)
        VALUES ($1, $2, $3, $4, $5, NOW())
        RETURNING id, title, body, user_id, tag_id, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(title)
    .bind(body)
    .bind(user_id)
    .bind(tag_id)
    .fetch_one(pool)
    .await
}

/// Find a post by id
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Post>, sqlx::Error> {
    sqlx::query_as::<_, Post>(
        "SELECT id, title, body, user_id, tag_id, created_at FROM posts WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Home feed: posts by the user and everyone they follow, newest first
pub async fn feed_page(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostWithAuthor>, sqlx::Error> {
    let sql = format!(
        "{POST_SELECT} WHERE p.user_id = $1 \
         OR p.user_id IN (SELECT followed_id FROM follows WHERE follower_id = $1) {POST_ORDER}"
    );
    sqlx::query_as::<_, PostWithAuthor>(&sql)
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

/// Explore: all posts, newest first
pub async fn explore_page(
    pool: &PgPool,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostWithAuthor>, sqlx::Error> {
    let sql = format!("{POST_SELECT} ORDER BY p.created_at DESC, p.id DESC LIMIT $1 OFFSET $2");
    sqlx::query_as::<_, PostWithAuthor>(&sql)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

/// Posts carrying a given tag, newest first
pub async fn by_tag_page(
    pool: &PgPool,
    tag_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostWithAuthor>, sqlx::Error> {
    let sql = format!("{POST_SELECT} WHERE p.tag_id = $1 {POST_ORDER}");
    sqlx::query_as::<_, PostWithAuthor>(&sql)
        .bind(tag_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

/// Posts authored by one user, newest first
pub async fn by_author_page(
    pool: &PgPool,
    author_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostWithAuthor>, sqlx::Error> {
    let sql = format!("{POST_SELECT} WHERE p.user_id = $1 {POST_ORDER}");
    sqlx::query_as::<_, PostWithAuthor>(&sql)
        .bind(author_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

/// Title substring search (case-sensitive LIKE, matching the classic behavior)
pub async fn search_page(
    pool: &PgPool,
    query: &str,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostWithAuthor>, sqlx::Error> {
    let pattern = format!("%{}%", like_escape(query));
    let sql = format!("{POST_SELECT} WHERE p.title LIKE $1 ESCAPE '\\' \
         ORDER BY p.created_at DESC, p.id DESC LIMIT $2 OFFSET $3");
    sqlx::query_as::<_, PostWithAuthor>(&sql)
        .bind(pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

/// Escape LIKE metacharacters so the query is a literal substring match
fn like_escape(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}
