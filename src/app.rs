//! Catalog Admin App
//!
//! Root component: sets up logging, the API client and the shared state,
//! keeps the category snapshot fresh and switches pages on the hash route.

use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;

use crate::api::HttpCatalogApi;
use crate::components::{ErrorView, Layout};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::logging;
use crate::pages::{
    CategoriesPage, HomePage, NotFoundPage, ProductCreatePage, ProductDetailPage, ProductEditPage, ProductListPage,
    SignupPage,
};
use crate::query::{Invalidate, QueryKey};
use crate::router::{self, Route};
use crate::store::{store_apply_categories, store_begin_categories, CatalogState};

#[component]
pub fn App() -> impl IntoView {
    let config = AppConfig::load();
    logging::init(&config);
    tracing::info!("[APP] Starting, API at {}", config.api_base_url);

    let api = Rc::new(HttpCatalogApi::new(config.clone()));
    let route = RwSignal::new(router::current());
    router::bind_hashchange(route);

    let ctx = AppContext::new(config, api, route);
    let store = Store::new(CatalogState::default());
    provide_context(ctx);
    provide_context(store);

    // Categories feed the category page, the picker and the dashboard
    Effect::new(move |_| {
        let version = ctx.version(QueryKey::Categories);
        store_begin_categories(&store, version);
        let api = ctx.api();
        spawn_local(async move {
            let result = api.list_categories().await;
            match &result {
                Ok(records) => tracing::info!("[APP] Loaded {} categories (v{})", records.len(), version),
                Err(err) => tracing::error!("[APP] Loading categories failed: {}", err),
            }
            store_apply_categories(&store, version, result);
        });
    });

    let page = move || match ctx.route.get() {
        Route::Home => view! { <HomePage /> }.into_any(),
        Route::Categories => view! { <CategoriesPage /> }.into_any(),
        Route::Products => view! { <ProductListPage /> }.into_any(),
        Route::ProductCreate => view! { <ProductCreatePage /> }.into_any(),
        Route::ProductDetail(id) => view! { <ProductDetailPage id=id /> }.into_any(),
        Route::ProductEdit(id) => view! { <ProductEditPage id=id /> }.into_any(),
        Route::Signup => view! { <SignupPage /> }.into_any(),
        Route::NotFound(path) => view! { <NotFoundPage path=path /> }.into_any(),
    };

    view! {
        <Layout>
            <ErrorBoundary fallback=move |errors| {
                let message = errors.with(|errors| {
                    errors.iter().map(|(_, e)| e.to_string()).collect::<Vec<_>>().join("; ")
                });
                view! {
                    <ErrorView
                        message=message
                        on_retry=Callback::new(move |_| {
                            ctx.invalidate(QueryKey::Categories);
                            ctx.invalidate(QueryKey::Products);
                        })
                    />
                }
            }>
                {page}
            </ErrorBoundary>
        </Layout>
    }
}
