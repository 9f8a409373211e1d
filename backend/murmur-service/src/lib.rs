//! murmur-service: a server-rendered social microblogging application.
//!
//! Users register, sign in with a session cookie, write short tagged posts,
//! follow each other, like posts and browse paginated feeds. PostgreSQL
//! enforces the relational invariants; handlers render handlebars templates.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod pagination;
pub mod security;
pub mod session;
pub mod validators;
pub mod views;

pub use config::Config;
pub use error::{AppError, Result};
