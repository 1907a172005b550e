use axum::{extract::State, http::StatusCode};
use serde::Serialize;

use super::{store_upload, EntityId};
use crate::{
    auth::StaffAuth,
    error::{AppError, Entity},
    forms::{required, FormData},
    models::category::{Category, CategoryPatch, NewCategory},
    repos::CategoryRepo,
    rest::{respond, ApiResult, NoData},
    AppState,
};

const IMAGE_PREFIX: &str = "categories";

#[derive(Debug, Serialize)]
pub struct CategoryId {
    pub category_id: i64,
}

#[derive(Debug, Serialize)]
pub struct CategoryList {
    pub categories: Vec<Category>,
}

pub async fn list_categories(State(state): State<AppState>) -> ApiResult<CategoryList> {
    let categories = CategoryRepo::list(&state.db).await?;
    respond(
        StatusCode::OK,
        "Categories retrieved successfully.",
        CategoryList { categories },
    )
}

pub async fn create_category(
    State(state): State<AppState>,
    StaffAuth(staff): StaffAuth,
    form: FormData,
) -> ApiResult<CategoryId> {
    form.require(&["name", "description", "image"])?;

    let name = required(form.text_owned("name"), "name")?;
    let description = required(form.text_owned("description"), "description")?;
    let upload = required(form.file("image"), "image")?;
    let image = store_upload(state.blobs.as_ref(), IMAGE_PREFIX, upload).await?;

    let category_id = CategoryRepo::create(
        &state.db,
        &NewCategory {
            name,
            description,
            image,
        },
    )
    .await?;

    tracing::info!(category_id, staff = %staff.email, "category created");
    respond(
        StatusCode::CREATED,
        "Category added successfully.",
        CategoryId { category_id },
    )
}

pub async fn update_category(
    State(state): State<AppState>,
    StaffAuth(staff): StaffAuth,
    EntityId(category_id): EntityId,
    form: FormData,
) -> ApiResult<CategoryId> {
    let mut patch = CategoryPatch {
        name: form.non_blank_text("name")?,
        description: form.non_blank_text("description")?,
        image: None,
    };

    if !CategoryRepo::exists(&state.db, category_id).await? {
        return Err(AppError::NotFound(Entity::Category));
    }
    if let Some(upload) = form.file("image") {
        patch.image = Some(store_upload(state.blobs.as_ref(), IMAGE_PREFIX, upload).await?);
    }

    if !CategoryRepo::update(&state.db, category_id, &patch).await? {
        return Err(AppError::NotFound(Entity::Category));
    }

    tracing::info!(category_id, staff = %staff.email, "category updated");
    respond(
        StatusCode::OK,
        "Category updated successfully.",
        CategoryId { category_id },
    )
}

pub async fn delete_category(
    State(state): State<AppState>,
    StaffAuth(staff): StaffAuth,
    EntityId(category_id): EntityId,
) -> ApiResult<NoData> {
    if !CategoryRepo::delete(&state.db, category_id).await? {
        return Err(AppError::NotFound(Entity::Category));
    }

    tracing::info!(category_id, staff = %staff.email, "category deleted");
    respond(StatusCode::OK, "Category deleted successfully.", NoData {})
}
