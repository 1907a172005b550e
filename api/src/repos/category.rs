use sqlx::SqlitePool;

use crate::models::category::{Category, CategoryPatch, NewCategory};

pub struct CategoryRepo;

impl CategoryRepo {
    pub async fn create(pool: &SqlitePool, category: &NewCategory) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO categories (name, description, image) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(&category.name)
        .bind(&category.description)
        .bind(&category.image)
        .fetch_one(pool)
        .await
    }

    pub async fn exists(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let found = sqlx::query_scalar::<_, i64>("SELECT EXISTS(SELECT 1 FROM categories WHERE id = ?)")
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(found != 0)
    }

    /// Returns `false` when no category has this id.
    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        patch: &CategoryPatch,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE categories SET \
                name = COALESCE(?, name), \
                description = COALESCE(?, description), \
                image = COALESCE(?, image), \
                modified_at = CURRENT_TIMESTAMP \
             WHERE id = ?",
        )
        .bind(patch.name.as_deref())
        .bind(patch.description.as_deref())
        .bind(patch.image.as_deref())
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Products in the category go with it (`ON DELETE CASCADE`).
    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list(pool: &SqlitePool) -> Result<Vec<Category>, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            "SELECT id, name, description, image, created_at, modified_at FROM categories ORDER BY id",
        )
        .fetch_all(pool)
        .await
    }
}
