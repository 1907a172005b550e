use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Decimal kept in the canonical text form it was submitted in.
    pub price: String,
    pub discount_price: String,
    pub stock: i64,
    pub category_id: i64,
    #[sqlx(json)]
    pub images: Vec<String>,
    pub video_url: String,
    #[sqlx(json)]
    pub attributes: serde_json::Value,
    pub is_featured: bool,
    pub rating: f64,
    pub brand: String,
    pub meta_keywords: String,
    pub meta_description: String,
    pub created_at: NaiveDateTime,
    pub modified_at: NaiveDateTime,
}

/// Product joined with its category name for the admin listing.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProductListing {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub product: Product,
    pub category_name: String,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: String,
    pub discount_price: String,
    pub stock: i64,
    pub category_id: i64,
    pub images: Vec<String>,
    pub video_url: String,
    pub attributes: serde_json::Value,
    pub is_featured: bool,
    pub rating: f64,
    pub brand: String,
    pub meta_keywords: String,
    pub meta_description: String,
}

/// Partial update. Each `Some` overwrites one column; `None` keeps it.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub discount_price: Option<String>,
    pub stock: Option<i64>,
    pub category_id: Option<i64>,
    pub images: Option<Vec<String>>,
    pub video_url: Option<String>,
    pub attributes: Option<serde_json::Value>,
    pub is_featured: Option<bool>,
    pub rating: Option<f64>,
    pub brand: Option<String>,
    pub meta_keywords: Option<String>,
    pub meta_description: Option<String>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.discount_price.is_none()
            && self.stock.is_none()
            && self.category_id.is_none()
            && self.images.is_none()
            && self.video_url.is_none()
            && self.attributes.is_none()
            && self.is_featured.is_none()
            && self.rating.is_none()
            && self.brand.is_none()
            && self.meta_keywords.is_none()
            && self.meta_description.is_none()
    }
}
