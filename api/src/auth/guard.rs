//! Bearer-token gate in front of every management endpoint.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderValue, StatusCode},
};
use serde::Serialize;
use sqlx::SqlitePool;

use super::token::TokenCodec;
use crate::{
    error::AppError,
    models::user::StaffRole,
    repos::UserRepo,
    AppState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("Authorization header is required.")]
    MissingHeader,
    #[error("Malformed authorization header.")]
    Malformed,
    #[error("Invalid token.")]
    InvalidToken,
    #[error("You do not have admin access.")]
    Forbidden,
}

impl Rejection {
    pub fn status(self) -> StatusCode {
        match self {
            Rejection::Forbidden => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

/// The staff account a request acts as.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizedSubject {
    pub user_id: i64,
    pub email: String,
    pub is_admin: bool,
    pub role: Option<StaffRole>,
}

/// Second whitespace-separated segment of the header. The scheme word is not
/// checked.
pub fn bearer_token(header: Option<&HeaderValue>) -> Result<&str, Rejection> {
    let value = header.ok_or(Rejection::MissingHeader)?;
    let value = value.to_str().map_err(|_| Rejection::Malformed)?;
    value.split_whitespace().nth(1).ok_or(Rejection::Malformed)
}

/// Resolve the header to a staff identity. Reads only; safe to call any
/// number of times per request.
pub async fn authorize(
    header: Option<&HeaderValue>,
    codec: &TokenCodec,
    db: &SqlitePool,
) -> Result<AuthorizedSubject, AppError> {
    let token = bearer_token(header)?;
    let claims = codec.verify(token).map_err(|_| Rejection::InvalidToken)?;

    // A token outliving its account is as good as forged.
    let user = UserRepo::find_by_email(db, &claims.sub)
        .await?
        .ok_or(Rejection::InvalidToken)?;

    if !user.has_staff_access() {
        return Err(Rejection::Forbidden.into());
    }

    Ok(AuthorizedSubject {
        user_id: user.id,
        role: user.role(),
        is_admin: user.is_admin,
        email: user.email,
    })
}

/// Extractor for staff-only handlers.
///
/// ```rust,ignore
/// async fn handler(StaffAuth(staff): StaffAuth) -> impl IntoResponse {
///     format!("acting as {}", staff.email)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct StaffAuth(pub AuthorizedSubject);

impl FromRequestParts<AppState> for StaffAuth {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let subject = authorize(parts.headers.get(AUTHORIZATION), &state.tokens, &state.db).await?;
        Ok(StaffAuth(subject))
    }
}
