//! Product List Page

use leptos::prelude::*;

use crate::components::ProductTable;
use crate::context::use_app_context;
use crate::flows::product::PageRequest;
use crate::models::ProductPage;
use crate::pages::use_query;
use crate::query::QueryKey;
use crate::router::Route;

#[component]
pub fn ProductListPage() -> impl IntoView {
    let ctx = use_app_context();
    let page = RwSignal::new(PageRequest::new(ctx.config().page_size));

    let query = use_query(
        move || {
            ctx.version(QueryKey::Products);
            page.get()
        },
        |api, request: PageRequest| async move { api.list_products(request.page, request.limit).await },
    );

    // The table stays mounted across page changes so its filter survives
    let loaded = Signal::derive(move || {
        query.data.with(|d| d.as_ref().and_then(|r| r.as_ref().ok()).cloned().unwrap_or_else(ProductPage::default))
    });
    let failure = move || query.data.with(|d| match d {
        Some(Err(err)) => Err(err.clone()),
        _ => Ok(()),
    });

    view! {
        <div class="page products-page">
            <div class="page-header">
                <h1>"Products"</h1>
                <Show when=move || query.loading.get()>
                    <span class="spinner">"Loading..."</span>
                </Show>
                <a class="btn" href=Route::ProductCreate.href()>"+ New product"</a>
            </div>
            {failure}
            <ProductTable
                products=Signal::derive(move || loaded.with(|p| p.data.clone()))
                pagination=Signal::derive(move || loaded.with(|p| p.pagination))
                page=page
            />
        </div>
    }
}
