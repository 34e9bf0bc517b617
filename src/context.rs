//! Application Context
//!
//! Shared handles provided via Leptos Context API.

use std::rc::Rc;

use leptos::prelude::*;

use crate::api::CatalogApi;
use crate::config::AppConfig;
use crate::query::{Invalidate, QueryKey, QueryVersions};
use crate::router::{self, Route};

/// App-wide handles provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    config: StoredValue<AppConfig>,
    /// Backend client; browser futures are not Send, so it lives in local storage
    api: StoredValue<Rc<dyn CatalogApi>, LocalStorage>,
    /// Versions of the cached queries; bumping one triggers a refetch
    queries: RwSignal<QueryVersions>,
    /// Current hash route
    pub route: RwSignal<Route>,
}

impl AppContext {
    pub fn new(config: AppConfig, api: Rc<dyn CatalogApi>, route: RwSignal<Route>) -> Self {
        Self {
            config: StoredValue::new(config),
            api: StoredValue::new_local(api),
            queries: RwSignal::new(QueryVersions::new()),
            route,
        }
    }

    pub fn config(&self) -> AppConfig {
        self.config.get_value()
    }

    pub fn api(&self) -> Rc<dyn CatalogApi> {
        self.api.get_value()
    }

    /// Tracked version of a query; read it inside an Effect to refetch on change
    pub fn version(&self, key: QueryKey) -> u32 {
        self.queries.with(|versions| versions.version(key))
    }

    pub fn navigate(&self, route: Route) {
        router::navigate(&route);
        self.route.set(route);
    }
}

impl Invalidate for AppContext {
    fn invalidate(&self, key: QueryKey) {
        tracing::debug!("[QUERY] Invalidate {:?}", key);
        self.queries.try_update(|versions| versions.bump(key));
    }
}

pub fn use_app_context() -> AppContext {
    expect_context::<AppContext>()
}
