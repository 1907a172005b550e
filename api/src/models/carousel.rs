use chrono::NaiveDateTime;
use serde::Serialize;

/// Carousel slide with the linked product's name resolved.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CarouselImage {
    pub id: i64,
    pub product_id: Option<i64>,
    pub product_name: Option<String>,
    pub image: String,
    pub title: String,
    pub caption: String,
    pub alt_text: String,
    pub external_link: String,
    pub hover_text: String,
    pub display_order: i64,
    pub click_count: i64,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Default)]
pub struct NewCarouselImage {
    pub product_id: Option<i64>,
    pub image: String,
    pub title: String,
    pub caption: String,
    pub alt_text: String,
    pub external_link: String,
    pub hover_text: String,
    pub display_order: i64,
}

#[derive(Debug, Clone, Default)]
pub struct CarouselImagePatch {
    /// Outer `None`: keep the link. `Some(None)`: unlink. `Some(Some(id))`: relink.
    pub product_id: Option<Option<i64>>,
    pub image: Option<String>,
    pub title: Option<String>,
    pub caption: Option<String>,
    pub alt_text: Option<String>,
    pub external_link: Option<String>,
    pub hover_text: Option<String>,
    pub display_order: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselOrder {
    /// Insertion order.
    Created,
    /// `display_order` ascending, ties by insertion order.
    Display,
}
