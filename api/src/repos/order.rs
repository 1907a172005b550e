use sqlx::SqlitePool;

use crate::models::order::OrderSummary;

pub struct OrderRepo;

impl OrderRepo {
    pub async fn list(pool: &SqlitePool) -> Result<Vec<OrderSummary>, sqlx::Error> {
        sqlx::query_as::<_, OrderSummary>(
            "SELECT o.id, o.user_id, u.first_name AS user_first_name, \
             u.last_name AS user_last_name, o.total_price, o.discount_amount, o.is_gift, \
             o.status, o.payment_status, o.payment_method, o.created_at \
             FROM orders o JOIN users u ON u.id = o.user_id \
             ORDER BY o.created_at DESC, o.id DESC",
        )
        .fetch_all(pool)
        .await
    }
}
