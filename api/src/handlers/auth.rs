use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    auth::{password::verify_password, Rejection},
    error::AppError,
    models::user::LoginPayload,
    repos::UserRepo,
    rest::{respond, ApiResult},
    AppState,
};

#[derive(Debug, Serialize)]
pub struct LoginData {
    pub email: String,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginPayload>, JsonRejection>,
) -> ApiResult<LoginData> {
    let Json(payload) = payload
        .map_err(|_| AppError::BadRequest("Request body must be a JSON object.".to_string()))?;

    let email = payload
        .email
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty());
    let password = payload.password.filter(|p| !p.is_empty());

    let (email, password) = match (email, password) {
        (Some(email), Some(password)) => (email, password),
        (email, password) => {
            let mut missing = Vec::new();
            if email.is_none() {
                missing.push("email");
            }
            if password.is_none() {
                missing.push("password");
            }
            return Err(AppError::MissingFields(missing));
        }
    };

    let user = UserRepo::find_by_email(&state.db, &email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    match verify_password(&password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => return Err(AppError::InvalidCredentials),
        Err(e) => {
            // Accounts without a usable hash (social sign-in) cannot log in here.
            tracing::warn!(user_id = user.id, error = %e, "login against unusable password hash");
            return Err(AppError::InvalidCredentials);
        }
    }

    if !user.has_staff_access() {
        return Err(Rejection::Forbidden.into());
    }

    let issued = state.tokens.issue(&user.email)?;
    UserRepo::touch_last_login(&state.db, user.id).await?;
    tracing::info!(user_id = user.id, email = %user.email, "staff login");

    respond(
        StatusCode::OK,
        "Login successful.",
        LoginData {
            email: user.email,
            token: issued.token,
            expires_at: issued.expires_at,
        },
    )
}
