//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::error::{AppError, AppResult};
use crate::models::Category;
use crate::tree::{CategorySnapshot, ExpansionState};

/// Catalog state shared by the category page and the product form
#[derive(Clone, Debug, Default, Store)]
pub struct CatalogState {
    /// Latest checked category list
    pub categories: CategorySnapshot,
    /// Expanded rows of the category table
    pub expanded: ExpansionState,
    /// A category fetch is in flight
    pub categories_loading: bool,
    /// Last category fetch failure
    pub categories_error: Option<AppError>,
    /// Newest category fetch started
    pub categories_requested: u32,
    /// Fetch whose list is installed in `categories`
    pub categories_loaded: Option<u32>,
}

impl CatalogState {
    pub fn begin_categories(&mut self, version: u32) {
        self.categories_requested = self.categories_requested.max(version);
        self.categories_loading = true;
    }

    /// Install the answer of fetch `version`. Answers older than the newest
    /// started fetch are dropped and `false` is returned.
    pub fn apply_categories(&mut self, version: u32, result: AppResult<Vec<Category>>) -> bool {
        if version < self.categories_requested {
            tracing::debug!(
                "[STORE] Dropping categories v{} (newest request is v{})",
                version,
                self.categories_requested
            );
            return false;
        }

        match result {
            Ok(records) => {
                let snapshot = CategorySnapshot::load(records);
                self.expanded.retain_existing(snapshot.records());
                self.categories = snapshot;
                self.categories_error = None;
                self.categories_loaded = Some(version);
            }
            Err(err) => self.categories_error = Some(err),
        }
        self.categories_loading = false;
        true
    }

    /// The category list settled at least once
    pub fn categories_ready(&self) -> bool {
        self.categories_loaded.is_some() || self.categories_error.is_some()
    }
}

/// Type alias for the store
pub type CatalogStore = Store<CatalogState>;

/// Get the catalog store from context
pub fn use_catalog_store() -> CatalogStore {
    expect_context::<CatalogStore>()
}

// ========================
// Store Helper Functions
// ========================

pub fn store_begin_categories(store: &CatalogStore, version: u32) {
    store.update(|s| s.begin_categories(version));
}

/// Apply a finished category fetch unless a newer one has started
pub fn store_apply_categories(store: &CatalogStore, version: u32, result: AppResult<Vec<Category>>) -> bool {
    store.try_update(|s| s.apply_categories(version, result)).unwrap_or(false)
}

pub fn store_toggle_expanded(store: &CatalogStore, id: u32) {
    store.expanded().write().toggle(id);
}
