use sqlx::SqlitePool;

use crate::models::product::{NewProduct, ProductListing, ProductPatch};

const PRODUCT_COLUMNS: &str = "p.id, p.name, p.description, p.price, p.discount_price, p.stock, \
     p.category_id, p.images, p.video_url, p.attributes, p.is_featured, p.rating, p.brand, \
     p.meta_keywords, p.meta_description, p.created_at, p.modified_at";

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, sqlx::Error> {
    serde_json::to_string(value).map_err(|e| sqlx::Error::Encode(Box::new(e)))
}

pub struct ProductRepo;

impl ProductRepo {
    pub async fn create(pool: &SqlitePool, product: &NewProduct) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO products (name, description, price, discount_price, stock, category_id, \
             images, video_url, attributes, is_featured, rating, brand, meta_keywords, \
             meta_description) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.price)
        .bind(&product.discount_price)
        .bind(product.stock)
        .bind(product.category_id)
        .bind(to_json(&product.images)?)
        .bind(&product.video_url)
        .bind(to_json(&product.attributes)?)
        .bind(product.is_featured)
        .bind(product.rating)
        .bind(&product.brand)
        .bind(&product.meta_keywords)
        .bind(&product.meta_description)
        .fetch_one(pool)
        .await
    }

    pub async fn exists(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let found = sqlx::query_scalar::<_, i64>("SELECT EXISTS(SELECT 1 FROM products WHERE id = ?)")
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(found != 0)
    }

    /// Applies the patch in one statement so a concurrent writer never sees
    /// a half-updated row. Returns `false` when no product has this id.
    pub async fn update(pool: &SqlitePool, id: i64, patch: &ProductPatch) -> Result<bool, sqlx::Error> {
        let images = patch.images.as_ref().map(to_json).transpose()?;
        let attributes = patch.attributes.as_ref().map(to_json).transpose()?;

        let result = sqlx::query(
            "UPDATE products SET \
                name = COALESCE(?, name), \
                description = COALESCE(?, description), \
                price = COALESCE(?, price), \
                discount_price = COALESCE(?, discount_price), \
                stock = COALESCE(?, stock), \
                category_id = COALESCE(?, category_id), \
                images = COALESCE(?, images), \
                video_url = COALESCE(?, video_url), \
                attributes = COALESCE(?, attributes), \
                is_featured = COALESCE(?, is_featured), \
                rating = COALESCE(?, rating), \
                brand = COALESCE(?, brand), \
                meta_keywords = COALESCE(?, meta_keywords), \
                meta_description = COALESCE(?, meta_description), \
                modified_at = CURRENT_TIMESTAMP \
             WHERE id = ?",
        )
        .bind(patch.name.as_deref())
        .bind(patch.description.as_deref())
        .bind(patch.price.as_deref())
        .bind(patch.discount_price.as_deref())
        .bind(patch.stock)
        .bind(patch.category_id)
        .bind(images)
        .bind(patch.video_url.as_deref())
        .bind(attributes)
        .bind(patch.is_featured)
        .bind(patch.rating)
        .bind(patch.brand.as_deref())
        .bind(patch.meta_keywords.as_deref())
        .bind(patch.meta_description.as_deref())
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list(pool: &SqlitePool) -> Result<Vec<ProductListing>, sqlx::Error> {
        sqlx::query_as::<_, ProductListing>(&format!(
            "SELECT {PRODUCT_COLUMNS}, c.name AS category_name \
             FROM products p JOIN categories c ON c.id = p.category_id \
             ORDER BY p.id"
        ))
        .fetch_all(pool)
        .await
    }
}
