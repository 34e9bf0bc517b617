//! Category Picker Component
//!
//! Single-select of the product's category. Only leaves can be picked;
//! the chosen leaf is stored as its root-first id chain.

use leptos::prelude::*;

use crate::models::ProductCategoryLink;
use crate::store::{use_catalog_store, CatalogStateStoreFields};
use crate::tree::{category_path, picker_rows};

#[component]
pub fn CategoryPicker(
    /// Root-first chain of the selection
    chain: RwSignal<Vec<u32>>,
) -> impl IntoView {
    let store = use_catalog_store();
    let (resolve_error, set_resolve_error) = signal(None::<String>);

    let rows = move || store.categories().with(|s| picker_rows(s.tree()));
    let selected_value = move || chain.with(|c| c.last().map(|id| id.to_string()).unwrap_or_default());

    let path = move || {
        let ids = chain.get();
        store.categories().with(|s| {
            let names: Vec<String> = ids
                .iter()
                .filter_map(|id| s.get(*id))
                .map(|c| c.name.clone())
                .collect();
            if names.is_empty() { None } else { Some(names.join(" > ")) }
        })
    };

    let on_change = move |ev: web_sys::Event| {
        let value = event_target_value(&ev);
        let Ok(id) = value.parse::<u32>() else {
            chain.set(Vec::new());
            set_resolve_error.set(None);
            return;
        };
        match store.categories().with_untracked(|s| s.resolve_chain(id)) {
            Ok(ids) => {
                tracing::debug!("[PICKER] Selected {} -> {:?}", id, ids);
                chain.set(ids);
                set_resolve_error.set(None);
            }
            Err(err) => {
                tracing::error!("[PICKER] {}", err);
                chain.set(Vec::new());
                set_resolve_error.set(Some(format!("Category data is inconsistent: {}", err)));
            }
        }
    };

    view! {
        <div class="category-picker">
            <select class="form-select" prop:value=selected_value on:change=on_change>
                <option value="">"Select a category"</option>
                <For
                    each=rows
                    key=|row| (row.id, row.label.clone(), row.disabled)
                    children=|row| view! {
                        <option value=row.id.to_string() disabled=row.disabled>{row.label.clone()}</option>
                    }
                />
            </select>
            {move || path().map(|p| view! { <p class="category-path">{p}</p> })}
            {move || resolve_error.get().map(|e| view! { <p class="field-error">{e}</p> })}
        </div>
    }
}

/// Read-only category path of a stored product
#[component]
pub fn CategoryPath(links: Vec<ProductCategoryLink>) -> impl IntoView {
    let path = category_path(&links);
    if path.is_empty() {
        view! { <p class="muted">"No category assigned"</p> }.into_any()
    } else {
        view! { <span class="badge">{path}</span> }.into_any()
    }
}
