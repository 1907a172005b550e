use axum::{extract::State, http::StatusCode};
use serde::Serialize;

use crate::{
    auth::StaffAuth,
    models::order::OrderSummary,
    repos::OrderRepo,
    rest::{respond, ApiResult},
    AppState,
};

#[derive(Debug, Serialize)]
pub struct OrderList {
    pub orders: Vec<OrderSummary>,
}

pub async fn list_orders(
    State(state): State<AppState>,
    StaffAuth(_staff): StaffAuth,
) -> ApiResult<OrderList> {
    let orders = OrderRepo::list(&state.db).await?;
    respond(StatusCode::OK, "Orders retrieved successfully.", OrderList { orders })
}
