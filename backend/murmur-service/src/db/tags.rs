/// Tag repository
use crate::models::Tag;
use sqlx::PgPool;
use uuid::Uuid;

/// Create a tag owned by a user
pub async fn create_tag(pool: &PgPool, user_id: Uuid, title: &str) -> Result<Tag, sqlx::Error> {
    sqlx::query_as::<_, Tag>(
        r#"
        INSERT INTO tags (id, title, user_id, created_at)
        VALUES ($1, $2, $3, NOW())
        RETURNING id, title, user_id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(title)
    .bind(user_id)
    .fetch_one(pool)
    .await
}

/// All tags, for the post form's select box and the tags page
pub async fn list_all(pool: &PgPool) -> Result<Vec<Tag>, sqlx::Error> {
    sqlx::query_as::<_, Tag>("SELECT id, title, user_id FROM tags ORDER BY title ASC")
        .fetch_all(pool)
        .await
}

/// Find a tag by id
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Tag>, sqlx::Error> {
    sqlx::query_as::<_, Tag>("SELECT id, title, user_id FROM tags WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}
