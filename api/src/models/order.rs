use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderSummary {
    pub id: i64,
    pub user_id: i64,
    pub user_first_name: String,
    pub user_last_name: String,
    pub total_price: String,
    pub discount_amount: String,
    pub is_gift: bool,
    pub status: String,
    pub payment_status: String,
    pub payment_method: String,
    pub created_at: NaiveDateTime,
}
