use sqlx::SqlitePool;

use crate::models::carousel::{CarouselImage, CarouselImagePatch, CarouselOrder, NewCarouselImage};

const CAROUSEL_SELECT: &str = "SELECT ci.id, ci.product_id, p.name AS product_name, ci.image, \
     ci.title, ci.caption, ci.alt_text, ci.external_link, ci.hover_text, ci.display_order, \
     ci.click_count, ci.created_at \
     FROM carousel_images ci LEFT JOIN products p ON p.id = ci.product_id";

pub struct CarouselRepo;

impl CarouselRepo {
    pub async fn create(pool: &SqlitePool, image: &NewCarouselImage) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO carousel_images (product_id, image, title, caption, alt_text, \
             external_link, hover_text, display_order) VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(image.product_id)
        .bind(&image.image)
        .bind(&image.title)
        .bind(&image.caption)
        .bind(&image.alt_text)
        .bind(&image.external_link)
        .bind(&image.hover_text)
        .bind(image.display_order)
        .fetch_one(pool)
        .await
    }

    pub async fn get(pool: &SqlitePool, id: i64) -> Result<Option<CarouselImage>, sqlx::Error> {
        sqlx::query_as::<_, CarouselImage>(&format!("{CAROUSEL_SELECT} WHERE ci.id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        patch: &CarouselImagePatch,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE carousel_images SET \
                product_id = CASE WHEN ? THEN ? ELSE product_id END, \
                image = COALESCE(?, image), \
                title = COALESCE(?, title), \
                caption = COALESCE(?, caption), \
                alt_text = COALESCE(?, alt_text), \
                external_link = COALESCE(?, external_link), \
                hover_text = COALESCE(?, hover_text), \
                display_order = COALESCE(?, display_order) \
             WHERE id = ?",
        )
        .bind(patch.product_id.is_some())
        .bind(patch.product_id.flatten())
        .bind(patch.image.as_deref())
        .bind(patch.title.as_deref())
        .bind(patch.caption.as_deref())
        .bind(patch.alt_text.as_deref())
        .bind(patch.external_link.as_deref())
        .bind(patch.hover_text.as_deref())
        .bind(patch.display_order)
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM carousel_images WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list(
        pool: &SqlitePool,
        order: CarouselOrder,
    ) -> Result<Vec<CarouselImage>, sqlx::Error> {
        let order_by = match order {
            CarouselOrder::Created => "ci.id",
            CarouselOrder::Display => "ci.display_order, ci.id",
        };
        sqlx::query_as::<_, CarouselImage>(&format!("{CAROUSEL_SELECT} ORDER BY {order_by}"))
            .fetch_all(pool)
            .await
    }

    /// Single-statement increment; concurrent clicks are never lost.
    pub async fn record_click(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE carousel_images SET click_count = click_count + 1 WHERE id = ?")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
