//! sqlx repositories: free async functions over `&PgPool`.

pub mod follows;
pub mod likes;
pub mod posts;
pub mod sessions;
pub mod tags;
pub mod users;
