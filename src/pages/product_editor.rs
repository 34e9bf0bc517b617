//! Product Create and Edit Pages

use leptos::prelude::*;

use crate::components::{FormMode, ProductFormView};
use crate::flows::product::ProductForm;
use crate::pages::{render_query, use_query};
use crate::router::Route;
use crate::store::{use_catalog_store, CatalogState, CatalogStateStoreFields};
use crate::upload::ImageUploadState;

#[component]
pub fn ProductCreatePage() -> impl IntoView {
    view! {
        <div class="page product-editor">
            <a class="back-link" href=Route::Products.href()>"← Products"</a>
            <h1>"New product"</h1>
            <ProductFormView initial=ProductForm::default() uploads=ImageUploadState::new() mode=FormMode::Create />
        </div>
    }
}

#[component]
pub fn ProductEditPage(id: u32) -> impl IntoView {
    // Loaded once; refetching would reset the form under the user
    let query = use_query(|| (), move |api, _| async move { api.get_product(id).await });
    // The category chain is rebuilt from the snapshot, so wait for one
    let store = use_catalog_store();
    let categories_ready = Memo::new(move |_| {
        store.categories_loaded().track();
        store.categories_error().track();
        store.with_untracked(CatalogState::categories_ready)
    });

    view! {
        <div class="page product-editor">
            <a class="back-link" href=Route::ProductDetail(id).href()>"← Back to product"</a>
            <h1>"Edit product"</h1>
            {move || {
                if !categories_ready.get() {
                    return Ok(view! { <p class="loading">"Loading categories..."</p> }.into_any());
                }
                render_query(query.data.get(), move |product| {
                    let initial = store.categories().with_untracked(|snapshot| ProductForm::from_product(&product, snapshot));
                    view! {
                        <ProductFormView
                            initial=initial
                            uploads=ImageUploadState::from_existing(&product.images)
                            mode=FormMode::Edit(id)
                        />
                    }
                })
            }}
        </div>
    }
}
