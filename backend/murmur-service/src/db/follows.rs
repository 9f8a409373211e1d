/// Follow-edge repository.
///
/// The methods check current state before mutating, so they are idempotent
/// at this level; the unique constraint on (follower_id, followed_id) is the
/// backstop for concurrent inserts.
use sqlx::PgPool;
use uuid::Uuid;

/// Create a follow edge; returns true if a new row was inserted.
pub async fn follow(
    pool: &PgPool,
    follower_id: Uuid,
    followed_id: Uuid,
) -> Result<bool, sqlx::Error> {
    if is_following(pool, follower_id, followed_id).await? {
        return Ok(false);
    }
    let inserted = sqlx::query(
        r#"
        INSERT INTO follows (follower_id, followed_id, created_at)
        VALUES ($1, $2, NOW())
        ON CONFLICT (follower_id, followed_id) DO NOTHING
        "#,
    )
    .bind(follower_id)
    .bind(followed_id)
    .execute(pool)
    .await?
    .rows_affected();
    Ok(inserted > 0)
}

/// Remove a follow edge; returns true if a row was removed.
pub async fn unfollow(
    pool: &PgPool,
    follower_id: Uuid,
    followed_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let affected = sqlx::query(
        r#"
        DELETE FROM follows
        WHERE follower_id = $1 AND followed_id = $2
        "#,
    )
    .bind(follower_id)
    .bind(followed_id)
    .execute(pool)
    .await?
    .rows_affected();
    Ok(affected > 0)
}

/// Check if one user follows another
pub async fn is_following(
    pool: &PgPool,
    follower_id: Uuid,
    followed_id: Uuid,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM follows
            WHERE follower_id = $1 AND followed_id = $2
        )
        "#,
    )
    .bind(follower_id)
    .bind(followed_id)
    .fetch_one(pool)
    .await
}

/// Follower count for a user's profile page
pub async fn follower_count(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM follows WHERE followed_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await
}

/// Followed count for a user's profile page
pub async fn followed_count(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM follows WHERE follower_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await
}
