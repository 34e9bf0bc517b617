//! Dashboard Page

use leptos::prelude::*;

use crate::context::use_app_context;
use crate::pages::{render_query, use_query};
use crate::query::QueryKey;
use crate::router::Route;
use crate::store::{use_catalog_store, CatalogStateStoreFields};

#[component]
pub fn HomePage() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_catalog_store();
    let summary = use_query(
        move || ctx.version(QueryKey::Products),
        |api, _| async move { api.list_products(1, 1).await },
    );

    let category_count = move || store.categories().with(|s| s.records().len());
    let root_count = move || store.categories().with(|s| s.tree().len());

    view! {
        <div class="page dashboard">
            <h1>"Dashboard"</h1>
            <div class="stat-grid">
                <a class="stat-card" href=Route::Categories.href()>
                    <span class="stat-label">"Categories"</span>
                    <span class="stat-value">{category_count}</span>
                    <span class="muted">{move || format!("{} top level", root_count())}</span>
                </a>
                <a class="stat-card" href=Route::Products.href()>
                    <span class="stat-label">"Products"</span>
                    {move || {
                        render_query(summary.data.get(), |page| view! {
                            <span class="stat-value">{page.pagination.total}</span>
                        })
                    }}
                </a>
            </div>
            <a class="btn" href=Route::ProductCreate.href()>"+ New product"</a>
        </div>
    }
}
