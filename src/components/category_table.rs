//! Category Table Component
//!
//! Collapsible tree table of the category snapshot. Rows come from one
//! pre-order walk, so every level renders the same way.

use leptos::prelude::*;

use crate::models::Category;
use crate::store::{store_toggle_expanded, use_catalog_store, CatalogStateStoreFields};
use crate::tree::{visible_rows, TreeRow};

#[component]
pub fn CategoryTable(
    #[prop(into)] on_edit: Callback<Category>,
    #[prop(into)] on_delete: Callback<Category>,
) -> impl IntoView {
    let store = use_catalog_store();

    let rows = move || {
        let expanded = store.expanded().get();
        store.categories().with(|s| visible_rows(s.tree(), &expanded))
    };

    view! {
        <table class="category-table">
            <thead>
                <tr>
                    <th>"Name"</th>
                    <th>"Key"</th>
                    <th>"Level"</th>
                    <th class="actions-col">"Actions"</th>
                </tr>
            </thead>
            <tbody>
                <For
                    each=rows
                    key=|row: &TreeRow| {
                        let c = &row.category;
                        (c.id, c.name.clone(), c.key.clone(), c.parent_id, row.depth, row.has_children, row.expanded)
                    }
                    children=move |row: TreeRow| {
                        let category = row.category.clone();
                        let id = category.id;
                        let indent = row.depth * 24;
                        let edit_target = category.clone();
                        let delete_target = category.clone();

                        view! {
                            <tr class=format!("category-row level-{}", category.level)>
                                <td style=format!("padding-left: {}px;", indent + 8)>
                                    {if row.has_children {
                                        view! {
                                            <button class="collapse-btn" on:click=move |_| store_toggle_expanded(&store, id)>
                                                {if row.expanded { "▼" } else { "▶" }}
                                            </button>
                                        }.into_any()
                                    } else {
                                        view! { <span class="collapse-placeholder">"·"</span> }.into_any()
                                    }}
                                    <span class="category-name">{category.name.clone()}</span>
                                </td>
                                <td class="category-key">{category.key.clone()}</td>
                                <td>{category.level}</td>
                                <td class="actions-col">
                                    <button class="btn btn-small" on:click=move |_| on_edit.run(edit_target.clone())>"Edit"</button>
                                    <button class="btn btn-small btn-danger" on:click=move |_| on_delete.run(delete_target.clone())>"Delete"</button>
                                </td>
                            </tr>
                        }
                    }
                />
            </tbody>
        </table>
    }
}
