use axum::{extract::State, http::StatusCode};
use serde::Serialize;

use crate::{
    auth::StaffAuth,
    models::user::CustomerSummary,
    repos::UserRepo,
    rest::{respond, ApiResult},
    AppState,
};

#[derive(Debug, Serialize)]
pub struct UserList {
    pub users: Vec<CustomerSummary>,
}

pub async fn list_customers(
    State(state): State<AppState>,
    StaffAuth(_staff): StaffAuth,
) -> ApiResult<UserList> {
    let users = UserRepo::list_customers(&state.db)
        .await?
        .into_iter()
        .map(CustomerSummary::from)
        .collect();

    respond(StatusCode::OK, "Users retrieved successfully.", UserList { users })
}
