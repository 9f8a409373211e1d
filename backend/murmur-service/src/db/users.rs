/// User repository - handles all database operations for users
use crate::models::User;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, username, email, password_hash, about_me, last_seen, created_at";

/// Create a new user
pub async fn create_user(
    pool: &PgPool,
    username: &str,
    email: &str,
    password_hash: &str,
) -> Result<User, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, username, email, password_hash, about_me, last_seen, created_at)
        VALUES ($1, $2, $3, $4, '', $5, $5)
        RETURNING id, username, email, password_hash, about_me, last_seen, created_at
        "#,
    )
    .bind(id)
    .bind(username)
    .bind(email.to_lowercase())
    .bind(password_hash)
    .bind(now)
    .fetch_one(pool)
    .await
}

/// Find a user by username
pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
    ))
    .bind(username)
    .fetch_optional(pool)
    .await
}

/// Find a user by ID
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Check whether a username is taken by anyone other than `exclude`
pub async fn username_taken(
    pool: &PgPool,
    username: &str,
    exclude: Option<Uuid>,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM users
            WHERE username = $1 AND ($2::uuid IS NULL OR id <> $2)
        )
        "#,
    )
    .bind(username)
    .bind(exclude)
    .fetch_one(pool)
    .await
}

/// Check whether an email is already registered
pub async fn email_taken(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
        .bind(email.to_lowercase())
        .fetch_one(pool)
        .await
}

/// Record that a user was just seen; called on every authenticated request
pub async fn update_last_seen(pool: &PgPool, user_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET last_seen = NOW() WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Update profile fields (username and bio)
pub async fn update_profile(
    pool: &PgPool,
    user_id: Uuid,
    username: &str,
    about_me: &str,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users SET username = $2, about_me = $3
        WHERE id = $1
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(username)
    .bind(about_me)
    .fetch_one(pool)
    .await
}
