//! Category Endpoints

use reqwest::Method;

use super::HttpCatalogApi;
use crate::error::AppResult;
use crate::models::{Category, CategoryUpdate, NewCategory};

impl HttpCatalogApi {
    pub async fn fetch_categories(&self) -> AppResult<Vec<Category>> {
        self.send_json("GET /categories", self.request(Method::GET, "categories")).await
    }

    pub async fn post_category(&self, body: &NewCategory) -> AppResult<Category> {
        let request = self.request(Method::POST, "categories").json(body);
        self.send_json("POST /categories", request).await
    }

    pub async fn patch_category(&self, id: u32, body: &CategoryUpdate) -> AppResult<Category> {
        let path = format!("categories/{}", id);
        let request = self.request(Method::PATCH, &path).json(body);
        self.send_json(&format!("PATCH /{}", path), request).await
    }

    pub async fn remove_category(&self, id: u32) -> AppResult<()> {
        let path = format!("categories/{}", id);
        self.send(&format!("DELETE /{}", path), self.request(Method::DELETE, &path)).await?;
        Ok(())
    }
}
