/// Server-side session repository.
///
/// A session row is the login cookie's backing store; its id is the cookie
/// value. The `flash` column holds at most one pending one-shot message.
use crate::models::Session;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Create a session for a user, valid until `expires_at`
pub async fn create_session(
    pool: &PgPool,
    user_id: Uuid,
    expires_at: DateTime<Utc>,
) -> Result<Session, sqlx::Error> {
    sqlx::query_as::<_, Session>(
        r#"
        INSERT INTO sessions (id, user_id, flash, created_at, expires_at)
        VALUES ($1, $2, NULL, NOW(), $3)
        RETURNING id, user_id, flash, created_at, expires_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(expires_at)
    .fetch_one(pool)
    .await
}

/// Load a session if it exists and has not expired
pub async fn find_valid(pool: &PgPool, id: Uuid) -> Result<Option<Session>, sqlx::Error> {
    sqlx::query_as::<_, Session>(
        r#"
        SELECT id, user_id, flash, created_at, expires_at
        FROM sessions
        WHERE id = $1 AND expires_at > NOW()
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Delete a session (logout)
pub async fn delete_session(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM sessions WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Store a one-shot flash message on the session
pub async fn set_flash(pool: &PgPool, id: Uuid, message: &str) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE sessions SET flash = $2 WHERE id = $1")
        .bind(id)
        .bind(message)
        .execute(pool)
        .await?;
    Ok(())
}

/// Fetch and clear the pending flash message, if any
pub async fn take_flash(pool: &PgPool, id: Uuid) -> Result<Option<String>, sqlx::Error> {
    // RETURNING sees the updated row, so the old value comes from a self-join
    sqlx::query_scalar(
        r#"
        UPDATE sessions s SET flash = NULL
        FROM (SELECT id, flash FROM sessions WHERE id = $1 FOR UPDATE) old
        WHERE s.id = old.id AND old.flash IS NOT NULL
        RETURNING old.flash
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}
