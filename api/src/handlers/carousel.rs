use axum::{extract::State, http::StatusCode};
use serde::Serialize;

use super::{dangling_reference, store_upload, EntityId};
use crate::{
    auth::StaffAuth,
    error::{AppError, Entity},
    forms::{required, FormData},
    models::carousel::{CarouselImage, CarouselImagePatch, CarouselOrder, NewCarouselImage},
    repos::{CarouselRepo, ProductRepo},
    rest::{respond, ApiResult, NoData},
    AppState,
};

const IMAGE_PREFIX: &str = "carousel";

#[derive(Debug, Serialize)]
pub struct CarouselImageId {
    pub carousel_image_id: i64,
}

#[derive(Debug, Serialize)]
pub struct CarouselImageList {
    pub carousel_images: Vec<CarouselImage>,
}

#[derive(Debug, Serialize)]
pub struct CarouselImageDetail {
    pub carousel_image: CarouselImage,
}

async fn ensure_product(state: &AppState, product_id: Option<i64>) -> Result<(), AppError> {
    match product_id {
        Some(id) if !ProductRepo::exists(&state.db, id).await? => {
            Err(AppError::NotFound(Entity::Product))
        }
        _ => Ok(()),
    }
}

pub async fn list_carousel_images(State(state): State<AppState>) -> ApiResult<CarouselImageList> {
    let carousel_images = CarouselRepo::list(&state.db, CarouselOrder::Created).await?;
    respond(
        StatusCode::OK,
        "Carousel images retrieved successfully.",
        CarouselImageList { carousel_images },
    )
}

pub async fn list_carousel_images_by_display_order(
    State(state): State<AppState>,
) -> ApiResult<CarouselImageList> {
    let carousel_images = CarouselRepo::list(&state.db, CarouselOrder::Display).await?;
    respond(
        StatusCode::OK,
        "Carousel images retrieved successfully.",
        CarouselImageList { carousel_images },
    )
}

pub async fn get_carousel_image(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> ApiResult<CarouselImageDetail> {
    let carousel_image = CarouselRepo::get(&state.db, id)
        .await?
        .ok_or(AppError::NotFound(Entity::CarouselImage))?;
    respond(
        StatusCode::OK,
        "Carousel image retrieved successfully.",
        CarouselImageDetail { carousel_image },
    )
}

pub async fn create_carousel_image(
    State(state): State<AppState>,
    StaffAuth(staff): StaffAuth,
    form: FormData,
) -> ApiResult<CarouselImageId> {
    form.require(&["image"])?;

    let product_id = form.nullable_id("product_id")?.flatten();
    let display_order = form.integer("display_order")?.unwrap_or(0);
    ensure_product(&state, product_id).await?;

    let upload = required(form.file("image"), "image")?;
    let image = store_upload(state.blobs.as_ref(), IMAGE_PREFIX, upload).await?;

    let slide = NewCarouselImage {
        product_id,
        image,
        title: form.text_owned("title").unwrap_or_default(),
        caption: form.text_owned("caption").unwrap_or_default(),
        alt_text: form.text_owned("alt_text").unwrap_or_default(),
        external_link: form.text_owned("external_link").unwrap_or_default(),
        hover_text: form.text_owned("hover_text").unwrap_or_default(),
        display_order,
    };
    let carousel_image_id = CarouselRepo::create(&state.db, &slide)
        .await
        .map_err(dangling_reference(Entity::Product))?;

    tracing::info!(carousel_image_id, staff = %staff.email, "carousel image created");
    respond(
        StatusCode::CREATED,
        "Carousel image added successfully.",
        CarouselImageId { carousel_image_id },
    )
}

pub async fn update_carousel_image(
    State(state): State<AppState>,
    StaffAuth(staff): StaffAuth,
    EntityId(carousel_image_id): EntityId,
    form: FormData,
) -> ApiResult<CarouselImageId> {
    let mut patch = CarouselImagePatch {
        product_id: form.nullable_id("product_id")?,
        image: None,
        title: form.text_owned("title"),
        caption: form.text_owned("caption"),
        alt_text: form.text_owned("alt_text"),
        external_link: form.text_owned("external_link"),
        hover_text: form.text_owned("hover_text"),
        display_order: form.integer("display_order")?,
    };

    if CarouselRepo::get(&state.db, carousel_image_id).await?.is_none() {
        return Err(AppError::NotFound(Entity::CarouselImage));
    }
    ensure_product(&state, patch.product_id.flatten()).await?;

    if let Some(upload) = form.file("image") {
        patch.image = Some(store_upload(state.blobs.as_ref(), IMAGE_PREFIX, upload).await?);
    }

    let updated = CarouselRepo::update(&state.db, carousel_image_id, &patch)
        .await
        .map_err(dangling_reference(Entity::Product))?;
    if !updated {
        return Err(AppError::NotFound(Entity::CarouselImage));
    }

    tracing::info!(carousel_image_id, staff = %staff.email, "carousel image updated");
    respond(
        StatusCode::OK,
        "Carousel image updated successfully.",
        CarouselImageId { carousel_image_id },
    )
}

pub async fn delete_carousel_image(
    State(state): State<AppState>,
    StaffAuth(staff): StaffAuth,
    EntityId(carousel_image_id): EntityId,
) -> ApiResult<NoData> {
    if !CarouselRepo::delete(&state.db, carousel_image_id).await? {
        return Err(AppError::NotFound(Entity::CarouselImage));
    }

    tracing::info!(carousel_image_id, staff = %staff.email, "carousel image deleted");
    respond(StatusCode::OK, "Carousel image deleted successfully.", NoData {})
}

/// Public storefront hook; no staff token needed.
pub async fn record_click(
    State(state): State<AppState>,
    EntityId(carousel_image_id): EntityId,
) -> ApiResult<NoData> {
    if !CarouselRepo::record_click(&state.db, carousel_image_id).await? {
        return Err(AppError::NotFound(Entity::CarouselImage));
    }
    respond(StatusCode::OK, "Click count incremented successfully.", NoData {})
}
