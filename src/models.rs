//! Frontend Models
//!
//! Data structures matching the REST backend's JSON (camelCase on the wire).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Depth of the category hierarchy (1 = root)
pub const MAX_DEPTH: u8 = 3;

/// Category record as returned by `GET /categories`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: u32,
    pub key: String,
    pub name: String,
    pub level: u8,
    #[serde(default)]
    pub parent_id: Option<u32>,
}

impl Category {
    pub fn is_root(&self) -> bool {
        self.level == 1
    }
}

/// Body of `POST /categories`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub key: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<u32>,
    pub level: u8,
}

/// Body of `PATCH /categories/{id}`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUpdate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<u32>,
}

/// Image slot of a product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    Main,
    Description,
}

impl ImageKind {
    pub fn max_images(self) -> usize {
        match self {
            ImageKind::Main => 1,
            ImageKind::Description => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ImageKind::Main => "main",
            ImageKind::Description => "description",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    pub url: String,
    pub display_order: u32,
    #[serde(rename = "type")]
    pub kind: ImageKind,
}

/// Size/price variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetail {
    #[serde(default)]
    pub size: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedCategory {
    #[serde(default)]
    pub id: u32,
    pub name: String,
    pub level: u8,
}

/// Product ↔ category association as embedded in product responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCategoryLink {
    pub category_id: u32,
    #[serde(default)]
    pub category: Option<LinkedCategory>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub sub_name: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_visible: bool,
    #[serde(default)]
    pub details: Vec<ProductDetail>,
    #[serde(default)]
    pub categories: Vec<ProductCategoryLink>,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

impl Product {
    /// Images of one slot in display order
    pub fn images_of(&self, kind: ImageKind) -> Vec<ProductImage> {
        let mut images: Vec<ProductImage> = self.images.iter().filter(|img| img.kind == kind).cloned().collect();
        images.sort_by_key(|img| img.display_order);
        images
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFields {
    pub name: String,
    pub sub_name: String,
    pub short_description: String,
    pub description: String,
    pub is_visible: bool,
}

/// Body of `POST /products` and `PATCH /products/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub product: ProductFields,
    pub details: Vec<ProductDetail>,
    pub category_ids: Vec<u32>,
    pub images: Vec<ProductImage>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pagination {
    pub total: u32,
    pub pages: u32,
    pub limit: u32,
    pub page: u32,
}

/// Response of `GET /products`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProductPage {
    #[serde(default)]
    pub data: Vec<Product>,
    #[serde(default)]
    pub pagination: Pagination,
}

/// Response of `POST /images`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UploadedImageResponse {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
}

impl UploadedImageResponse {
    pub fn into_url(self) -> Option<String> {
        self.url.or(self.filename).filter(|u| !u.is_empty())
    }
}
