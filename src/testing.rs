//! Test Fixtures
//!
//! In-memory backend and invalidation recorder for flow tests.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;

use async_trait::async_trait;

use crate::api::{CatalogApi, ImageUpload};
use crate::error::{AppError, AppResult};
use crate::models::{Category, CategoryUpdate, NewCategory, Pagination, Product, ProductPage, ProductPayload};
use crate::query::{Invalidate, QueryKey};

pub fn make_category(id: u32, name: &str, level: u8, parent_id: Option<u32>) -> Category {
    Category {
        id,
        key: name.to_lowercase(),
        name: name.to_string(),
        level,
        parent_id,
    }
}

pub fn make_product(id: u32, name: &str) -> Product {
    Product {
        id,
        name: name.to_string(),
        sub_name: None,
        short_description: None,
        description: None,
        is_visible: true,
        details: Vec::new(),
        categories: Vec::new(),
        images: Vec::new(),
        created_at: None,
        updated_at: None,
    }
}

#[derive(Default)]
pub struct FakeCatalogApi {
    pub categories: RefCell<Vec<Category>>,
    pub products: RefCell<Vec<Product>>,
    pub created_products: RefCell<Vec<ProductPayload>>,
    pub updated_products: RefCell<Vec<(u32, ProductPayload)>>,
    pub uploaded: RefCell<Vec<String>>,
    /// Uploads with these file names fail with a server error
    pub failing_uploads: RefCell<HashSet<String>>,
    /// Every call fails with a network error while set
    pub offline: Cell<bool>,
    next_id: Cell<u32>,
    in_flight: Cell<usize>,
    pub max_in_flight: Cell<usize>,
}

impl FakeCatalogApi {
    pub fn new() -> Self {
        Self { next_id: Cell::new(100), ..Default::default() }
    }

    pub fn with_categories(categories: Vec<Category>) -> Self {
        let api = Self::new();
        *api.categories.borrow_mut() = categories;
        api
    }

    pub fn fail_upload(&self, file_name: &str) {
        self.failing_uploads.borrow_mut().insert(file_name.to_string());
    }

    fn check_online(&self) -> AppResult<()> {
        if self.offline.get() {
            Err(AppError::Network("connection refused".into()))
        } else {
            Ok(())
        }
    }

    fn allocate_id(&self) -> u32 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }
}

#[async_trait(?Send)]
impl CatalogApi for FakeCatalogApi {
    async fn list_categories(&self) -> AppResult<Vec<Category>> {
        self.check_online()?;
        Ok(self.categories.borrow().clone())
    }

    async fn create_category(&self, body: &NewCategory) -> AppResult<Category> {
        self.check_online()?;
        let category = Category {
            id: self.allocate_id(),
            key: body.key.clone(),
            name: body.name.clone(),
            level: body.level,
            parent_id: body.parent_id,
        };
        self.categories.borrow_mut().push(category.clone());
        Ok(category)
    }

    async fn update_category(&self, id: u32, body: &CategoryUpdate) -> AppResult<Category> {
        self.check_online()?;
        let mut categories = self.categories.borrow_mut();
        let category = categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::Http { status: 404, message: "Category not found".into() })?;
        category.name = body.name.clone();
        if body.parent_id.is_some() {
            category.parent_id = body.parent_id;
        }
        Ok(category.clone())
    }

    async fn delete_category(&self, id: u32) -> AppResult<()> {
        self.check_online()?;
        let mut categories = self.categories.borrow_mut();
        if categories.iter().any(|c| c.parent_id == Some(id)) {
            return Err(AppError::Conflict("Category has child categories".into()));
        }
        categories.retain(|c| c.id != id);
        Ok(())
    }

    async fn list_products(&self, page: u32, limit: u32) -> AppResult<ProductPage> {
        self.check_online()?;
        let products = self.products.borrow();
        let total = products.len() as u32;
        let limit = limit.max(1);
        let start = (page.saturating_sub(1) * limit) as usize;
        let data = products.iter().skip(start).take(limit as usize).cloned().collect();
        Ok(ProductPage {
            data,
            pagination: Pagination { total, pages: total.div_ceil(limit), limit, page },
        })
    }

    async fn get_product(&self, id: u32) -> AppResult<Product> {
        self.check_online()?;
        self.products
            .borrow()
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| AppError::Http { status: 404, message: "Product not found".into() })
    }

    async fn create_product(&self, payload: &ProductPayload) -> AppResult<()> {
        self.check_online()?;
        self.created_products.borrow_mut().push(payload.clone());
        Ok(())
    }

    async fn update_product(&self, id: u32, payload: &ProductPayload) -> AppResult<()> {
        self.check_online()?;
        self.updated_products.borrow_mut().push((id, payload.clone()));
        Ok(())
    }

    async fn upload_image(&self, upload: ImageUpload) -> AppResult<String> {
        self.check_online()?;
        self.in_flight.set(self.in_flight.get() + 1);
        self.max_in_flight.set(self.max_in_flight.get().max(self.in_flight.get()));
        // Let sibling uploads start before this one settles
        tokio::task::yield_now().await;
        self.in_flight.set(self.in_flight.get() - 1);

        if self.failing_uploads.borrow().contains(&upload.file_name) {
            return Err(AppError::Http { status: 500, message: "Upload failed".into() });
        }
        let url = format!("https://cdn.test/{}", upload.file_name);
        self.uploaded.borrow_mut().push(url.clone());
        Ok(url)
    }
}

#[derive(Default)]
pub struct RecordingInvalidator {
    pub keys: RefCell<Vec<QueryKey>>,
}

impl RecordingInvalidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recorded(&self) -> Vec<QueryKey> {
        self.keys.borrow().clone()
    }
}

impl Invalidate for RecordingInvalidator {
    fn invalidate(&self, key: QueryKey) {
        self.keys.borrow_mut().push(key);
    }
}
