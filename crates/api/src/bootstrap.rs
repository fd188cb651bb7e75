//! First-admin bootstrap.
//!
//! On an empty `users` table the server creates one admin account from
//! `ADMIN_EMAIL` / `ADMIN_PASSWORD`. Once any user exists the variables are
//! ignored.

use pagedesk_core::roles::ROLE_ADMIN;
use pagedesk_db::models::user::CreateUser;
use pagedesk_db::repositories::UserRepo;
use pagedesk_db::DbPool;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};

/// Credentials for the bootstrap admin.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub email: String,
    pub password: String,
}

impl AdminSeed {
    /// Read `ADMIN_EMAIL` and `ADMIN_PASSWORD`. Returns `None` unless both are
    /// set and non-empty.
    pub fn from_env() -> Option<Self> {
        let email = std::env::var("ADMIN_EMAIL").ok()?.trim().to_string();
        let password = std::env::var("ADMIN_PASSWORD").ok()?;
        if email.is_empty() || password.is_empty() {
            return None;
        }
        Some(Self { email, password })
    }
}

/// Create the first admin if no user exists yet. Returns whether one was
/// created.
pub async fn ensure_admin(pool: &DbPool, seed: &AdminSeed) -> AppResult<bool> {
    if UserRepo::count(pool).await? > 0 {
        return Ok(false);
    }

    validate_password_strength(&seed.password, MIN_PASSWORD_LENGTH).map_err(AppError::BadRequest)?;
    let password_hash = hash_password(&seed.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: seed.email.clone(),
            name: "Administrator".to_string(),
            password_hash,
            role: ROLE_ADMIN.to_string(),
        },
    )
    .await?;

    tracing::info!(user_id = user.id, email = %user.email, "Bootstrap admin created");
    Ok(true)
}
