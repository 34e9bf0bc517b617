//! Product Form and List Flows
//!
//! Builds the create/update payload from the form, seeds the form from
//! an existing product and holds the list-page helpers (paging, name
//! filter, display formatting).

use chrono::{DateTime, Utc};

use crate::api::CatalogApi;
use crate::error::{AppResult, FieldErrors};
use crate::models::{ImageKind, Product, ProductDetail, ProductFields, ProductImage, ProductPayload};
use crate::query::{Invalidate, QueryKey};
use crate::tree::CategorySnapshot;

#[derive(Debug, Clone, PartialEq)]
pub struct ProductForm {
    pub name: String,
    /// Sent as both `subName` and `shortDescription`
    pub short_description: String,
    pub description: String,
    /// Raw price input
    pub price: String,
    /// Free text, one line per size
    pub size_info: String,
    pub is_visible: bool,
    /// Root-first chain of the selected category
    pub category_ids: Vec<u32>,
    pub images: Vec<ProductImage>,
}

impl Default for ProductForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            short_description: String::new(),
            description: String::new(),
            price: String::new(),
            size_info: String::new(),
            is_visible: true,
            category_ids: Vec::new(),
            images: Vec::new(),
        }
    }
}

/// Store line breaks as Markdown hard breaks
pub fn to_markdown_breaks(text: &str) -> String {
    text.lines().map(str::trim_end).collect::<Vec<_>>().join("  \n").trim_end().to_string()
}

pub fn from_markdown_breaks(text: &str) -> String {
    text.replace("  \n", "\n")
}

fn parse_price(raw: &str) -> Option<f64> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    cleaned.parse::<f64>().ok().filter(|p| p.is_finite() && *p > 0.0)
}

impl ProductForm {
    /// Leaf category of the selected chain
    pub fn selected_category(&self) -> Option<u32> {
        self.category_ids.last().copied()
    }

    /// Build the payload. A non-empty `category_ids` must be the resolved
    /// root-first chain of its last id in `snapshot`.
    pub fn validate(&self, snapshot: &CategorySnapshot) -> Result<ProductPayload, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.insert("name", "Product name is required");
        }
        let price = parse_price(&self.price);
        if price.is_none() {
            errors.insert("price", "Price must be a positive number");
        }

        if let Some(leaf) = self.selected_category() {
            match snapshot.resolve_chain(leaf) {
                Ok(chain) if chain == self.category_ids => {}
                Ok(chain) => {
                    tracing::warn!("[PRODUCT] Category chain {:?} does not match {:?}", self.category_ids, chain);
                    errors.insert("category_ids", "The selected category path is out of date, please pick it again");
                }
                Err(err) => {
                    tracing::warn!("[PRODUCT] Category chain of {} unresolvable: {}", leaf, err);
                    errors.insert("category_ids", format!("Category data is inconsistent: {}", err));
                }
            }
        }

        for kind in [ImageKind::Main, ImageKind::Description] {
            let count = self.images.iter().filter(|img| img.kind == kind).count();
            if count > kind.max_images() {
                errors.insert(
                    "images",
                    format!("At most {} {} image(s) are allowed", kind.max_images(), kind.as_str()),
                );
            }
        }

        let mut images = self.images.clone();
        images.sort_by_key(|img| img.display_order);
        let short = self.short_description.trim().to_string();

        errors.into_result(ProductPayload {
            product: ProductFields {
                name: name.to_string(),
                sub_name: short.clone(),
                short_description: short,
                description: self.description.trim().to_string(),
                is_visible: self.is_visible,
            },
            details: vec![ProductDetail { size: to_markdown_breaks(&self.size_info), price: price.unwrap_or_default() }],
            category_ids: self.category_ids.clone(),
            images,
        })
    }

    /// Edit form seeded from a stored product. The category chain is
    /// resolved again from the deepest linked category in `snapshot`.
    pub fn from_product(product: &Product, snapshot: &CategorySnapshot) -> Self {
        let first_detail = product.details.first();
        let mut images = product.images.clone();
        images.sort_by_key(|img| img.display_order);

        Self {
            name: product.name.clone(),
            short_description: product
                .short_description
                .clone()
                .or_else(|| product.sub_name.clone())
                .unwrap_or_default(),
            description: product.description.clone().unwrap_or_default(),
            price: first_detail.map(|d| d.price.to_string()).unwrap_or_default(),
            size_info: first_detail.map(|d| from_markdown_breaks(&d.size)).unwrap_or_default(),
            is_visible: product.is_visible,
            category_ids: linked_chain(product, snapshot),
            images,
        }
    }
}

fn linked_chain(product: &Product, snapshot: &CategorySnapshot) -> Vec<u32> {
    let leaf = product
        .categories
        .iter()
        .filter_map(|link| snapshot.get(link.category_id))
        .max_by_key(|category| category.level);
    let Some(leaf) = leaf else {
        if !product.categories.is_empty() {
            tracing::warn!("[PRODUCT] No linked category of product {} is known", product.id);
        }
        return Vec::new();
    };
    match snapshot.resolve_chain(leaf.id) {
        Ok(chain) => chain,
        Err(err) => {
            tracing::warn!("[PRODUCT] Dropping category of product {}: {}", product.id, err);
            Vec::new()
        }
    }
}

pub async fn create_product(
    api: &dyn CatalogApi,
    invalidator: &dyn Invalidate,
    payload: &ProductPayload,
) -> AppResult<()> {
    api.create_product(payload).await?;
    tracing::info!("[PRODUCT] Created '{}'", payload.product.name);
    invalidator.invalidate(QueryKey::Products);
    Ok(())
}

pub async fn update_product(
    api: &dyn CatalogApi,
    invalidator: &dyn Invalidate,
    id: u32,
    payload: &ProductPayload,
) -> AppResult<()> {
    api.update_product(id, payload).await?;
    tracing::info!("[PRODUCT] Updated {} '{}'", id, payload.product.name);
    invalidator.invalidate(QueryKey::Products);
    invalidator.invalidate(QueryKey::Product(id));
    Ok(())
}

/// Page/limit of the product table (pages start at 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn new(limit: u32) -> Self {
        Self { page: 1, limit: limit.max(1) }
    }

    pub fn with_limit(self, limit: u32) -> Self {
        Self::new(limit)
    }

    pub fn first(self) -> Self {
        Self { page: 1, ..self }
    }

    pub fn prev(self) -> Self {
        Self { page: self.page.saturating_sub(1).max(1), ..self }
    }

    pub fn next(self, pages: u32) -> Self {
        Self { page: (self.page + 1).min(pages.max(1)), ..self }
    }

    pub fn last(self, pages: u32) -> Self {
        Self { page: pages.max(1), ..self }
    }

    pub fn can_prev(self) -> bool {
        self.page > 1
    }

    pub fn can_next(self, pages: u32) -> bool {
        self.page < pages
    }
}

/// Case-insensitive name filter over the loaded page
pub fn filter_by_name(products: &[Product], query: &str) -> Vec<Product> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return products.to_vec();
    }
    products
        .iter()
        .filter(|p| p.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// `12000.0` -> `"₩12,000"`
pub fn format_price(price: f64) -> String {
    let cents = (price.abs() * 100.0).round() as u64;
    let (whole, fraction) = (cents / 100, cents % 100);

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if price < 0.0 && cents > 0 { "-" } else { "" };
    if fraction == 0 {
        format!("{}₩{}", sign, grouped)
    } else {
        format!("{}₩{}.{:02}", sign, grouped, fraction)
    }
}

pub fn format_timestamp(timestamp: Option<DateTime<Utc>>) -> String {
    match timestamp {
        Some(ts) => ts.format("%Y-%m-%d %H:%M").to_string(),
        None => "-".to_string(),
    }
}
