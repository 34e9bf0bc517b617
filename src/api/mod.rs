//! Catalog Backend API
//!
//! `CatalogApi` is the seam between the flows and the REST backend.
//! `HttpCatalogApi` talks to the real server; tests use an in-memory fake.

mod category;
mod client;
mod image;
mod product;

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{Category, CategoryUpdate, NewCategory, Product, ProductPage, ProductPayload};

pub use client::HttpCatalogApi;
pub use image::read_file;

/// File contents ready for `POST /images`
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

// Browser futures are not Send
#[async_trait(?Send)]
pub trait CatalogApi {
    async fn list_categories(&self) -> AppResult<Vec<Category>>;
    async fn create_category(&self, body: &NewCategory) -> AppResult<Category>;
    async fn update_category(&self, id: u32, body: &CategoryUpdate) -> AppResult<Category>;
    async fn delete_category(&self, id: u32) -> AppResult<()>;
    async fn list_products(&self, page: u32, limit: u32) -> AppResult<ProductPage>;
    async fn get_product(&self, id: u32) -> AppResult<Product>;
    async fn create_product(&self, payload: &ProductPayload) -> AppResult<()>;
    async fn update_product(&self, id: u32, payload: &ProductPayload) -> AppResult<()>;
    async fn upload_image(&self, upload: ImageUpload) -> AppResult<String>;
}

#[async_trait(?Send)]
impl CatalogApi for HttpCatalogApi {
    async fn list_categories(&self) -> AppResult<Vec<Category>> {
        self.fetch_categories().await
    }

    async fn create_category(&self, body: &NewCategory) -> AppResult<Category> {
        self.post_category(body).await
    }

    async fn update_category(&self, id: u32, body: &CategoryUpdate) -> AppResult<Category> {
        self.patch_category(id, body).await
    }

    async fn delete_category(&self, id: u32) -> AppResult<()> {
        self.remove_category(id).await
    }

    async fn list_products(&self, page: u32, limit: u32) -> AppResult<ProductPage> {
        self.fetch_products(page, limit).await
    }

    async fn get_product(&self, id: u32) -> AppResult<Product> {
        self.fetch_product(id).await
    }

    async fn create_product(&self, payload: &ProductPayload) -> AppResult<()> {
        self.post_product(payload).await
    }

    async fn update_product(&self, id: u32, payload: &ProductPayload) -> AppResult<()> {
        self.patch_product(id, payload).await
    }

    async fn upload_image(&self, upload: ImageUpload) -> AppResult<String> {
        self.post_image(upload).await
    }
}
