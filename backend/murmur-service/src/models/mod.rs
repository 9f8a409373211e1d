//! Database rows and form payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub about_me: String,
    pub last_seen: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Identicon URL derived from the SHA-256 digest of the lowercased email.
    pub fn avatar_url(&self, size: u32) -> String {
        avatar_url(&self.email, size)
    }
}

/// Gravatar-compatible identicon URL for an email address
pub fn avatar_url(email: &str, size: u32) -> String {
    let digest = Sha256::digest(email.trim().to_lowercase().as_bytes());
    format!(
        "https://www.gravatar.com/avatar/{}?d=identicon&s={}",
        hex::encode(digest),
        size
    )
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub user_id: Uuid,
    pub tag_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// A post joined with its author and tag, as rendered in feeds
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PostWithAuthor {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub user_id: Uuid,
    pub tag_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub author_username: String,
    pub author_email: String,
    pub tag_title: Option<String>,
    pub like_count: i64,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tag {
    pub id: Uuid,
    pub title: String,
    pub user_id: Uuid,
}

#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub flash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

// Form payloads. All validation (field shapes via `validators`, cross-field
// checks like password confirmation and uniqueness) lives in the handlers.

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    /// Checkbox; present ("on") when ticked
    pub remember_me: Option<String>,
}

impl LoginForm {
    pub fn remember(&self) -> bool {
        self.remember_me.is_some()
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password2: String,
}

#[derive(Debug, Deserialize)]
pub struct PostForm {
    pub title: String,
    pub body: String,
    /// Select-box value; empty string means no tag
    #[serde(default)]
    pub tag_id: String,
}

impl PostForm {
    pub fn tag(&self) -> Option<Uuid> {
        Uuid::parse_str(self.tag_id.trim()).ok()
    }
}

#[derive(Debug, Deserialize)]
pub struct EditProfileForm {
    pub username: String,
    pub about_me: String,
}

#[derive(Debug, Deserialize)]
pub struct TagForm {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchForm {
    pub q: String,
}
