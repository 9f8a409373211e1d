/// Like-edge repository.
///
/// The like insert runs inside an explicit transaction: a duplicate like
/// trips the (user_id, post_id) unique constraint, the transaction rolls
/// back, and the caller surfaces the outcome as a flash message.
use crate::models::User;
use sqlx::PgPool;
use uuid::Uuid;

/// Outcome of a like attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeOutcome {
    Liked,
    AlreadyLiked,
}

/// Insert a like edge for (user, post).
pub async fn like_post(
    pool: &PgPool,
    user_id: Uuid,
    post_id: Uuid,
) -> Result<LikeOutcome, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        INSERT INTO likes (user_id, post_id, created_at)
        VALUES ($1, $2, NOW())
        "#,
    )
    .bind(user_id)
    .bind(post_id)
    .execute(&mut *tx)
    .await;

    match result {
        Ok(_) => {
            tx.commit().await?;
            Ok(LikeOutcome::Liked)
        }
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            tx.rollback().await?;
            Ok(LikeOutcome::AlreadyLiked)
        }
        Err(e) => {
            tx.rollback().await?;
            Err(e)
        }
    }
}

/// Check if a user has liked a post
pub async fn has_liked(pool: &PgPool, user_id: Uuid, post_id: Uuid) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM likes
            WHERE user_id = $1 AND post_id = $2
        )
        "#,
    )
    .bind(user_id)
    .bind(post_id)
    .fetch_one(pool)
    .await
}

/// Like count for a post
pub async fn like_count(pool: &PgPool, post_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM likes WHERE post_id = $1")
        .bind(post_id)
        .fetch_one(pool)
        .await
}

/// Users who liked a post, newest like first
pub async fn likers_page(
    pool: &PgPool,
    post_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT u.id, u.username, u.email, u.password_hash, u.about_me, u.last_seen, u.created_at
        FROM likes l
        JOIN users u ON u.id = l.user_id
        WHERE l.post_id = $1
        ORDER BY l.created_at DESC, u.id DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(post_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}
