//! Account registration and login with salted password hashing.
//!
//! TRADE-OFFS
//! ==========
//! Hashing is salted SHA-256, matching the rest of the stack's sha2 usage.
//! Login failures collapse into one `InvalidCredentials` variant so the API
//! never reveals whether an email exists.

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;

use rand::Rng;
use sha2::{Digest, Sha256};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use shared::User;

use crate::services::session::bytes_to_hex;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("email already registered")]
    EmailTaken,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

fn sha256_hex(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    bytes_to_hex(&digest)
}

/// Hash a password with a fresh random salt; stored as `salt$hash`.
#[must_use]
pub fn hash_password(password: &str) -> String {
    let salt_bytes: [u8; 16] = rand::rng().random();
    let salt = bytes_to_hex(&salt_bytes);
    let hash = sha256_hex(&format!("{salt}:{password}"));
    format!("{salt}${hash}")
}

/// Check a password against a stored `salt$hash` value.
#[must_use]
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt, hash)) = stored.split_once('$') else {
        return false;
    };
    sha256_hex(&format!("{salt}:{password}")) == hash
}

fn row_to_user(row: &sqlx::postgres::PgRow) -> User {
    User {
        id: row.get("id"),
        email: row.get("email"),
        name: row.get("name"),
        created_at: row.get("created_at"),
    }
}

const USER_COLUMNS: &str =
    "id, email, name, (EXTRACT(EPOCH FROM created_at) * 1000)::BIGINT AS created_at";

/// Create a new account.
///
/// # Errors
///
/// Returns [`AuthError::EmailTaken`] when the email is already registered.
pub async fn register(pool: &PgPool, email: &str, password: &str, name: &str) -> Result<User, AuthError> {
    let email = email.trim().to_lowercase();
    let existing = sqlx::query("SELECT 1 AS one FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(pool)
        .await?;
    if existing.is_some() {
        return Err(AuthError::EmailTaken);
    }

    let row = sqlx::query(&format!(
        "INSERT INTO users (email, name, password_hash) VALUES ($1, $2, $3)
         RETURNING {USER_COLUMNS}"
    ))
    .bind(&email)
    .bind(name)
    .bind(hash_password(password))
    .fetch_one(pool)
    .await?;

    Ok(row_to_user(&row))
}

/// Authenticate by email and password.
///
/// # Errors
///
/// Returns [`AuthError::InvalidCredentials`] on unknown email or bad password.
pub async fn login(pool: &PgPool, email: &str, password: &str) -> Result<User, AuthError> {
    let email = email.trim().to_lowercase();
    let row = sqlx::query(&format!(
        "SELECT {USER_COLUMNS}, password_hash FROM users WHERE email = $1"
    ))
    .bind(&email)
    .fetch_optional(pool)
    .await?
    .ok_or(AuthError::InvalidCredentials)?;

    let stored: String = row.get("password_hash");
    if !verify_password(password, &stored) {
        return Err(AuthError::InvalidCredentials);
    }

    Ok(row_to_user(&row))
}

/// Fetch a user by id, for `/api/auth/me`.
pub async fn get_user(pool: &PgPool, user_id: Uuid) -> Result<Option<User>, sqlx::Error> {
    let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.as_ref().map(row_to_user))
}
