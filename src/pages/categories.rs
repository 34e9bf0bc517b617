//! Category Management Page
//!
//! Tree table with add/edit/delete dialogs. Records the snapshot check
//! dropped are listed above the table.

use leptos::prelude::*;

use crate::components::{AddCategoryModal, CategoryTable, DeleteCategoryModal, EditCategoryModal, ErrorView};
use crate::context::use_app_context;
use crate::flows::{ModalEvent, ModalState};
use crate::models::Category;
use crate::query::{Invalidate, QueryKey};
use crate::store::{use_catalog_store, CatalogStateStoreFields};

#[component]
pub fn CategoriesPage() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_catalog_store();

    let add_state = RwSignal::new(ModalState::Closed);
    let edit_state = RwSignal::new(ModalState::Closed);
    let delete_state = RwSignal::new(ModalState::Closed);
    let edit_target = RwSignal::new(None::<Category>);
    let delete_target = RwSignal::new(None::<Category>);

    let open = move |state: RwSignal<ModalState>| state.update(|s| *s = s.on(ModalEvent::Open));

    let on_edit = Callback::new(move |category: Category| {
        edit_target.set(Some(category));
        open(edit_state);
    });
    let on_delete = Callback::new(move |category: Category| {
        delete_target.set(Some(category));
        open(delete_state);
    });

    let issues = move || store.categories().with(|s| s.issues().iter().map(ToString::to_string).collect::<Vec<_>>());
    let is_empty = move || store.categories().with(|s| s.is_empty());

    view! {
        <div class="page categories-page">
            <div class="page-header">
                <h1>"Categories"</h1>
                <button class="btn" on:click=move |_| open(add_state)>"+ Add category"</button>
            </div>

            {move || {
                let list = issues();
                (!list.is_empty()).then(|| view! {
                    <div class="integrity-banner">
                        <strong>{format!("{} category record(s) look inconsistent", list.len())}</strong>
                        <ul>{list.into_iter().map(|line| view! { <li>{line}</li> }).collect_view()}</ul>
                    </div>
                })
            }}

            {move || match store.categories_error().get() {
                Some(err) => view! {
                    <ErrorView
                        message=err.user_message()
                        on_retry=Callback::new(move |_| ctx.invalidate(QueryKey::Categories))
                    />
                }.into_any(),
                None if store.categories_loading().get() && is_empty() => {
                    view! { <p class="loading">"Loading categories..."</p> }.into_any()
                }
                None if is_empty() => view! { <p class="muted empty-state">"No categories yet"</p> }.into_any(),
                None => view! { <CategoryTable on_edit=on_edit on_delete=on_delete /> }.into_any(),
            }}

            <AddCategoryModal state=add_state />
            <EditCategoryModal state=edit_state target=edit_target />
            <DeleteCategoryModal state=delete_state target=delete_target />
        </div>
    }
}
