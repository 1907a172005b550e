use axum::{extract::State, http::StatusCode};
use serde::Serialize;

use super::{dangling_reference, store_uploads, EntityId};
use crate::{
    auth::StaffAuth,
    error::{AppError, Entity},
    forms::{required, FormData},
    models::product::{NewProduct, ProductListing, ProductPatch},
    repos::{CategoryRepo, ProductRepo},
    rest::{respond, ApiResult, NoData},
    AppState,
};

const IMAGE_PREFIX: &str = "products";

#[derive(Debug, Serialize)]
pub struct ProductId {
    pub product_id: i64,
}

#[derive(Debug, Serialize)]
pub struct ProductList {
    pub products: Vec<ProductListing>,
}

fn new_product(form: &FormData) -> Result<NewProduct, AppError> {
    form.require(&["name", "description", "price", "stock", "category_id"])?;

    Ok(NewProduct {
        name: required(form.text_owned("name"), "name")?,
        description: required(form.text_owned("description"), "description")?,
        price: required(form.decimal("price")?, "price")?,
        discount_price: form.decimal("discount_price")?.unwrap_or_else(|| "0".to_string()),
        stock: required(form.non_negative_integer("stock")?, "stock")?,
        category_id: required(form.integer("category_id")?, "category_id")?,
        images: Vec::new(),
        video_url: form.text_owned("video_url").unwrap_or_default(),
        attributes: form
            .json_object("attributes")?
            .unwrap_or_else(|| serde_json::json!({})),
        is_featured: form.boolean("is_featured")?.unwrap_or(false),
        rating: form.float("rating")?.unwrap_or(0.0),
        brand: form.text_owned("brand").unwrap_or_default(),
        meta_keywords: form.text_owned("meta_keywords").unwrap_or_default(),
        meta_description: form.text_owned("meta_description").unwrap_or_default(),
    })
}

fn product_patch(form: &FormData) -> Result<ProductPatch, AppError> {
    Ok(ProductPatch {
        name: form.non_blank_text("name")?,
        description: form.text_owned("description"),
        price: form.decimal("price")?,
        discount_price: form.decimal("discount_price")?,
        stock: form.non_negative_integer("stock")?,
        category_id: form.integer("category_id")?,
        images: None,
        video_url: form.text_owned("video_url"),
        attributes: form.json_object("attributes")?,
        is_featured: form.boolean("is_featured")?,
        rating: form.float("rating")?,
        brand: form.text_owned("brand"),
        meta_keywords: form.text_owned("meta_keywords"),
        meta_description: form.text_owned("meta_description"),
    })
}

pub async fn list_products(
    State(state): State<AppState>,
    StaffAuth(_staff): StaffAuth,
) -> ApiResult<ProductList> {
    let products = ProductRepo::list(&state.db).await?;
    respond(StatusCode::OK, "Products retrieved successfully.", ProductList { products })
}

pub async fn create_product(
    State(state): State<AppState>,
    StaffAuth(staff): StaffAuth,
    form: FormData,
) -> ApiResult<ProductId> {
    let mut product = new_product(&form)?;

    // Checked before any upload is written so a bad reference leaves no orphans.
    if !CategoryRepo::exists(&state.db, product.category_id).await? {
        return Err(AppError::NotFound(Entity::Category));
    }

    product.images = store_uploads(state.blobs.as_ref(), IMAGE_PREFIX, form.files("image")).await?;
    let product_id = ProductRepo::create(&state.db, &product)
        .await
        .map_err(dangling_reference(Entity::Category))?;

    tracing::info!(product_id, staff = %staff.email, images = product.images.len(), "product created");
    respond(
        StatusCode::CREATED,
        "Product added successfully.",
        ProductId { product_id },
    )
}

pub async fn update_product(
    State(state): State<AppState>,
    StaffAuth(staff): StaffAuth,
    EntityId(product_id): EntityId,
    form: FormData,
) -> ApiResult<ProductId> {
    let mut patch = product_patch(&form)?;

    if !ProductRepo::exists(&state.db, product_id).await? {
        return Err(AppError::NotFound(Entity::Product));
    }
    if let Some(category_id) = patch.category_id {
        if !CategoryRepo::exists(&state.db, category_id).await? {
            return Err(AppError::NotFound(Entity::Category));
        }
    }

    // New images replace the whole list; no images leaves it alone.
    if form.file("image").is_some() {
        patch.images =
            Some(store_uploads(state.blobs.as_ref(), IMAGE_PREFIX, form.files("image")).await?);
    }

    if !patch.is_empty() {
        let updated = ProductRepo::update(&state.db, product_id, &patch)
            .await
            .map_err(dangling_reference(Entity::Category))?;
        if !updated {
            return Err(AppError::NotFound(Entity::Product));
        }
    }

    tracing::info!(product_id, staff = %staff.email, "product updated");
    respond(
        StatusCode::OK,
        "Product updated successfully.",
        ProductId { product_id },
    )
}

pub async fn delete_product(
    State(state): State<AppState>,
    StaffAuth(staff): StaffAuth,
    EntityId(product_id): EntityId,
) -> ApiResult<NoData> {
    if !ProductRepo::delete(&state.db, product_id).await? {
        return Err(AppError::NotFound(Entity::Product));
    }

    tracing::info!(product_id, staff = %staff.email, "product deleted");
    respond(StatusCode::OK, "Product deleted successfully.", NoData {})
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_form() -> FormData {
        FormData::default()
            .with_text("name", "Trail Shoe")
            .with_text("description", "Grippy")
            .with_text("price", "89.50")
            .with_text("stock", "4")
            .with_text("category_id", "2")
    }

    #[test]
    fn new_product_fills_defaults() {
        let product = new_product(&complete_form()).unwrap();
        assert_eq!(product.price, "89.50");
        assert_eq!(product.discount_price, "0");
        assert_eq!(product.stock, 4);
        assert_eq!(product.category_id, 2);
        assert_eq!(product.attributes, serde_json::json!({}));
        assert!(!product.is_featured);
        assert_eq!(product.rating, 0.0);
    }

    #[test]
    fn new_product_reports_every_missing_field_in_order() {
        let form = FormData::default().with_text("description", "Grippy");
        match new_product(&form) {
            Err(AppError::MissingFields(fields)) => {
                assert_eq!(fields, vec!["name", "price", "stock", "category_id"])
            }
            other => panic!("expected MissingFields, got {other:?}"),
        }
    }

    #[test]
    fn patch_only_carries_sent_fields() {
        let form = FormData::default()
            .with_text("stock", "10")
            .with_text("brand", "");
        let patch = product_patch(&form).unwrap();
        assert_eq!(patch.stock, Some(10));
        assert_eq!(patch.brand.as_deref(), Some(""));
        assert!(patch.name.is_none());
        assert!(patch.price.is_none());
        assert!(patch.images.is_none());
        assert!(!patch.is_empty());
        assert!(product_patch(&FormData::default()).unwrap().is_empty());
    }

    #[test]
    fn patch_rejects_blank_name() {
        let form = FormData::default().with_text("name", " ");
        assert!(matches!(
            product_patch(&form),
            Err(AppError::InvalidField { field: "name", .. })
        ));
    }
}
