//! Product Table Component
//!
//! One server page of products with paging controls and a name filter
//! over the loaded rows.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::config::PAGE_SIZES;
use crate::context::use_app_context;
use crate::flows::product::{filter_by_name, format_price, format_timestamp, PageRequest};
use crate::models::{Pagination, Product};
use crate::router::Route;
use crate::tree::category_path;

const FILTER_DEBOUNCE_MS: u32 = 300;

#[component]
pub fn ProductTable(
    #[prop(into)] products: Signal<Vec<Product>>,
    #[prop(into)] pagination: Signal<Pagination>,
    page: RwSignal<PageRequest>,
) -> impl IntoView {
    let ctx = use_app_context();
    let (filter_input, set_filter_input) = signal(String::new());
    let (filter, set_filter) = signal(String::new());
    let generation = StoredValue::new(0u32);

    let on_filter = move |ev: web_sys::Event| {
        let value = event_target_value(&ev);
        set_filter_input.set(value.clone());
        generation.update_value(|g| *g += 1);
        let current = generation.get_value();
        spawn_local(async move {
            TimeoutFuture::new(FILTER_DEBOUNCE_MS).await;
            // Only the last keystroke applies
            if generation.try_get_value() == Some(current) {
                set_filter.try_set(value);
            }
        });
    };

    let rows = move || filter.with(|f| products.with(|p| filter_by_name(p, f)));
    let pages = move || pagination.get().pages.max(1);

    view! {
        <div class="product-table-wrap">
            <div class="table-toolbar">
                <input
                    type="search"
                    class="form-input"
                    placeholder="Filter by name"
                    prop:value=filter_input
                    on:input=on_filter
                />
                <span class="muted">{move || format!("{} products", pagination.get().total)}</span>
            </div>

            <table class="product-table">
                <thead>
                    <tr>
                        <th>"Name"</th>
                        <th>"Category"</th>
                        <th>"Price"</th>
                        <th>"Visible"</th>
                        <th>"Updated"</th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=rows
                        key=|p: &Product| (p.id, p.updated_at)
                        children=move |product: Product| {
                            let id = product.id;
                            let price = product.details.first().map(|d| format_price(d.price)).unwrap_or_else(|| "-".into());
                            view! {
                                <tr class="clickable" on:click=move |_| ctx.navigate(Route::ProductDetail(id))>
                                    <td>{product.name.clone()}</td>
                                    <td>{category_path(&product.categories)}</td>
                                    <td>{price}</td>
                                    <td>{if product.is_visible { "Yes" } else { "No" }}</td>
                                    <td>{format_timestamp(product.updated_at)}</td>
                                </tr>
                            }
                        }
                    />
                </tbody>
            </table>
            <Show when=move || rows().is_empty()>
                <p class="muted empty-state">"No products to show"</p>
            </Show>

            <div class="pagination">
                <button class="btn btn-small" disabled=move || !page.get().can_prev() on:click=move |_| page.update(|p| *p = p.first())>
                    "«"
                </button>
                <button class="btn btn-small" disabled=move || !page.get().can_prev() on:click=move |_| page.update(|p| *p = p.prev())>
                    "‹"
                </button>
                <span class="page-indicator">{move || format!("{} / {}", page.get().page, pages())}</span>
                <button
                    class="btn btn-small"
                    disabled=move || !page.get().can_next(pages())
                    on:click=move |_| page.update(|p| *p = p.next(pages()))
                >
                    "›"
                </button>
                <button
                    class="btn btn-small"
                    disabled=move || !page.get().can_next(pages())
                    on:click=move |_| page.update(|p| *p = p.last(pages()))
                >
                    "»"
                </button>
                <select
                    class="form-select page-size"
                    prop:value=move || page.get().limit.to_string()
                    on:change=move |ev| {
                        if let Ok(limit) = event_target_value(&ev).parse::<u32>() {
                            page.update(|p| *p = p.with_limit(limit));
                        }
                    }
                >
                    {PAGE_SIZES
                        .iter()
                        .map(|size| view! { <option value=size.to_string()>{format!("{} / page", size)}</option> })
                        .collect_view()}
                </select>
            </div>
        </div>
    }
}
