pub mod auth;
pub mod config;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod models;
pub mod repos;
pub mod rest;
pub mod storage;

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::{
    auth::{password::hash_password, TokenCodec},
    config::InitialAdmin,
    error::AppError,
    models::user::{NewUser, StaffRole},
    repos::UserRepo,
    storage::BlobStore,
};

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub tokens: Arc<TokenCodec>,
    pub blobs: Arc<dyn BlobStore>,
}

/// Create the configured admin account unless that email is already taken.
/// Returns the new user id, or `None` when the account existed.
pub async fn seed_admin(pool: &SqlitePool, admin: &InitialAdmin) -> Result<Option<i64>, AppError> {
    if UserRepo::find_by_email(pool, &admin.email).await?.is_some() {
        return Ok(None);
    }

    let user = NewUser {
        email: admin.email.clone(),
        password_hash: hash_password(&admin.password)?,
        is_staff: true,
        is_admin: true,
        staff_role: Some(StaffRole::Admin),
        ..NewUser::default()
    };
    Ok(Some(UserRepo::create(pool, &user).await?))
}
