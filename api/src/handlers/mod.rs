pub mod auth;
pub mod carousel;
pub mod categories;
pub mod orders;
pub mod products;
pub mod users;

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::{
    error::{AppError, Entity},
    forms::UploadedFile,
    storage::{sanitize_file_name, BlobStore},
};

/// Numeric `{id}` path segment; anything else is a 400 in the usual envelope.
#[derive(Debug, Clone, Copy)]
pub struct EntityId(pub i64);

impl<S> FromRequestParts<S> for EntityId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::BadRequest("Invalid id in path.".to_string()))?;
        Ok(EntityId(id))
    }
}

pub(crate) async fn store_upload(
    blobs: &dyn BlobStore,
    prefix: &str,
    file: &UploadedFile,
) -> Result<String, AppError> {
    let path = format!("{prefix}/{}", sanitize_file_name(&file.file_name));
    Ok(blobs.save(&path, &file.bytes).await?)
}

pub(crate) async fn store_uploads<'a>(
    blobs: &dyn BlobStore,
    prefix: &str,
    files: impl IntoIterator<Item = &'a UploadedFile>,
) -> Result<Vec<String>, AppError> {
    let mut paths = Vec::new();
    for file in files {
        paths.push(store_upload(blobs, prefix, file).await?);
    }
    Ok(paths)
}

/// A referenced row vanished between the existence check and the write.
pub(crate) fn dangling_reference(entity: Entity) -> impl FnOnce(sqlx::Error) -> AppError {
    move |err| match err.as_database_error() {
        Some(db_err) if db_err.is_foreign_key_violation() => AppError::NotFound(entity),
        _ => AppError::Sqlx(err),
    }
}
