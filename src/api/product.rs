//! Product Endpoints

use reqwest::Method;

use super::HttpCatalogApi;
use crate::error::AppResult;
use crate::models::{Product, ProductPage, ProductPayload};

impl HttpCatalogApi {
    pub async fn fetch_products(&self, page: u32, limit: u32) -> AppResult<ProductPage> {
        let path = format!("products?page={}&limit={}", page, limit);
        self.send_json(&format!("GET /{}", path), self.request(Method::GET, &path)).await
    }

    pub async fn fetch_product(&self, id: u32) -> AppResult<Product> {
        let path = format!("products/{}", id);
        self.send_json(&format!("GET /{}", path), self.request(Method::GET, &path)).await
    }

    /// The response body is not used; callers refetch through invalidation
    pub async fn post_product(&self, payload: &ProductPayload) -> AppResult<()> {
        let request = self.request(Method::POST, "products").json(payload);
        self.send("POST /products", request).await?;
        Ok(())
    }

    pub async fn patch_product(&self, id: u32, payload: &ProductPayload) -> AppResult<()> {
        let path = format!("products/{}", id);
        let request = self.request(Method::PATCH, &path).json(payload);
        self.send(&format!("PATCH /{}", path), request).await?;
        Ok(())
    }
}
