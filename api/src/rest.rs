use std::path::Path;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{
    error::AppError,
    handlers::{auth, carousel, categories, orders, products, users},
    AppState,
};

/// `{success, message, ...data}` wrapper every endpoint answers with.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: String,
    #[serde(flatten)]
    pub data: T,
}

#[derive(Debug, Serialize)]
pub struct NoData {}

pub type ApiResult<T> = Result<(StatusCode, Json<Envelope<T>>), AppError>;

pub fn respond<T: Serialize>(status: StatusCode, message: &str, data: T) -> ApiResult<T> {
    Ok((
        status,
        Json(Envelope {
            success: true,
            message: message.to_string(),
            data,
        }),
    ))
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

async fn route_not_found() -> AppError {
    AppError::RouteNotFound
}

pub fn router(state: AppState, media_root: &Path, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/api/admin/login", post(auth::login))
        .route("/api/admin/users", get(users::list_customers))
        .route(
            "/api/admin/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/api/admin/products/{id}",
            patch(products::update_product).delete(products::delete_product),
        )
        .route(
            "/api/admin/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/api/admin/categories/{id}",
            patch(categories::update_category).delete(categories::delete_category),
        )
        .route(
            "/api/admin/carousel",
            get(carousel::list_carousel_images).post(carousel::create_carousel_image),
        )
        .route(
            "/api/admin/carousel/ordered",
            get(carousel::list_carousel_images_by_display_order),
        )
        .route(
            "/api/admin/carousel/{id}",
            get(carousel::get_carousel_image)
                .patch(carousel::update_carousel_image)
                .delete(carousel::delete_carousel_image),
        )
        .route("/api/admin/carousel/{id}/click", post(carousel::record_click))
        .route("/api/admin/orders", get(orders::list_orders))
        // Must follow the routes it applies to.
        .method_not_allowed_fallback(method_not_allowed)
        .nest_service("/media", ServeDir::new(media_root))
        .fallback(route_not_found)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
