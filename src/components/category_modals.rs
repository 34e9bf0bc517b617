//! Category Modals
//!
//! Add, edit and delete dialogs of the category page. Each dialog owns its
//! form and drives a `ModalState`; the page only opens them.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::{alert, Modal};
use crate::context::use_app_context;
use crate::error::AppError;
use crate::flows::category::{self as flow, CategoryForm};
use crate::flows::{ModalEvent, ModalState};
use crate::models::Category;
use crate::store::{use_catalog_store, CatalogStateStoreFields};
use crate::tree::indent_prefix;

fn transition(state: RwSignal<ModalState>, event: ModalEvent) {
    state.try_update(|s| *s = s.on(event));
}

/// Inline message for a field, if the error belongs to it
fn field_message(error: RwSignal<Option<AppError>>, field: &'static str) -> impl Fn() -> Option<String> + Send + Sync + 'static {
    move || {
        error.with(|err| match err {
            Some(err) if err.field() == Some(field) => Some(err.user_message()),
            _ => None,
        })
    }
}

/// Request failures block with an alert; validation stays inline
fn report_failure(err: &AppError) {
    tracing::error!("[CATEGORY] {}", err);
    if err.field().is_none() {
        alert(&err.user_message());
    }
}

#[component]
fn ParentSelect(
    candidates: Signal<Vec<Category>>,
    form: RwSignal<CategoryForm>,
    #[prop(into)] none_label: String,
) -> impl IntoView {
    view! {
        <select
            class="form-select"
            prop:value=move || form.with(|f| f.parent_id.map(|id| id.to_string()).unwrap_or_default())
            on:change=move |ev| {
                let value = event_target_value(&ev);
                form.update(|f| f.parent_id = value.parse().ok());
            }
        >
            <option value="">{none_label}</option>
            <For
                each=move || candidates.get()
                key=|c| (c.id, c.name.clone())
                children=|c| view! {
                    <option value=c.id.to_string()>{format!("{}{}", indent_prefix(c.level), c.name)}</option>
                }
            />
        </select>
    }
}

#[component]
pub fn AddCategoryModal(state: RwSignal<ModalState>) -> impl IntoView {
    let ctx = use_app_context();
    let store = use_catalog_store();
    let form = RwSignal::new(CategoryForm::default());
    let error = RwSignal::new(None::<AppError>);

    let candidates = Signal::derive(move || store.categories().with(|s| flow::add_candidates(s.records())));

    let close = move || {
        transition(state, ModalEvent::Dismiss);
        if !state.get_untracked().is_open() {
            form.set(CategoryForm::default());
            error.set(None);
        }
    };

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if state.get_untracked() != ModalState::Open {
            return;
        }
        let snapshot = store.categories().get_untracked();
        let current = form.get_untracked();
        if let Err(err) = flow::prepare_add(&current, &snapshot) {
            error.set(Some(err));
            transition(state, ModalEvent::ValidationFailed);
            return;
        }

        error.set(None);
        transition(state, ModalEvent::Submit);
        let api = ctx.api();
        spawn_local(async move {
            match flow::add_category(api.as_ref(), &ctx, &current, &snapshot).await {
                Ok(_) => {
                    transition(state, ModalEvent::Succeeded);
                    form.try_set(CategoryForm::default());
                }
                Err(err) => {
                    report_failure(&err);
                    error.try_set(Some(err));
                    transition(state, ModalEvent::Failed);
                }
            }
        });
    };

    view! {
        <Modal title="Add category" open=Signal::derive(move || state.get().is_open()) on_close=move |_| close()>
            <form class="category-form" on:submit=submit>
                <label class="form-label">"Name"</label>
                <input
                    type="text"
                    class="form-input"
                    placeholder="Category name"
                    prop:value=move || form.with(|f| f.name.clone())
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        form.update(|f| f.name = value);
                    }
                />
                <p class="field-error">{field_message(error, "name")}</p>

                <label class="form-label">"Parent category"</label>
                <ParentSelect candidates=candidates form=form none_label="None (top level)" />
                <p class="field-error">{field_message(error, "parent_id")}</p>

                <div class="modal-actions">
                    <button type="button" class="btn btn-secondary" on:click=move |_| close()>"Cancel"</button>
                    <button type="submit" class="btn" disabled=move || state.get().is_submitting()>
                        {move || if state.get().is_submitting() { "Saving..." } else { "Add" }}
                    </button>
                </div>
            </form>
        </Modal>
    }
}

#[component]
pub fn EditCategoryModal(state: RwSignal<ModalState>, target: RwSignal<Option<Category>>) -> impl IntoView {
    let ctx = use_app_context();
    let store = use_catalog_store();
    let form = RwSignal::new(CategoryForm::default());
    let error = RwSignal::new(None::<AppError>);

    // Seed the form whenever another record is opened
    Effect::new(move |_| {
        if let Some(category) = target.get() {
            form.set(CategoryForm::for_edit(&category));
            error.set(None);
        }
    });

    let candidates = Signal::derive(move || {
        let Some(category) = target.get() else { return Vec::new() };
        store.categories().with(|s| flow::selectable_parents(s.records(), &category))
    });
    let shows_parent = move || target.with(|t| t.as_ref().map(flow::shows_parent_selector).unwrap_or(false));

    let close = move || {
        transition(state, ModalEvent::Dismiss);
        if !state.get_untracked().is_open() {
            target.set(None);
            form.set(CategoryForm::default());
            error.set(None);
        }
    };

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if state.get_untracked() != ModalState::Open {
            return;
        }
        let Some(category) = target.get_untracked() else { return };
        let snapshot = store.categories().get_untracked();
        let current = form.get_untracked();
        if let Err(err) = flow::prepare_edit(&current, &category, &snapshot) {
            error.set(Some(err));
            transition(state, ModalEvent::ValidationFailed);
            return;
        }

        error.set(None);
        transition(state, ModalEvent::Submit);
        let api = ctx.api();
        spawn_local(async move {
            match flow::edit_category(api.as_ref(), &ctx, &category, &current, &snapshot).await {
                Ok(_) => {
                    transition(state, ModalEvent::Succeeded);
                    target.try_set(None);
                }
                Err(err) => {
                    report_failure(&err);
                    error.try_set(Some(err));
                    transition(state, ModalEvent::Failed);
                }
            }
        });
    };

    view! {
        <Modal title="Edit category" open=Signal::derive(move || state.get().is_open()) on_close=move |_| close()>
            <form class="category-form" on:submit=submit>
                <p class="form-hint">
                    {move || target.with(|t| t.as_ref().map(|c| format!("Level {} category", c.level)).unwrap_or_default())}
                </p>
                <label class="form-label">"Name"</label>
                <input
                    type="text"
                    class="form-input"
                    prop:value=move || form.with(|f| f.name.clone())
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        form.update(|f| f.name = value);
                    }
                />
                <p class="field-error">{field_message(error, "name")}</p>

                <Show when=shows_parent>
                    <label class="form-label">"Parent category"</label>
                    <ParentSelect candidates=candidates form=form none_label="Keep current parent" />
                    <p class="field-error">{field_message(error, "parent_id")}</p>
                </Show>

                <div class="modal-actions">
                    <button type="button" class="btn btn-secondary" on:click=move |_| close()>"Cancel"</button>
                    <button type="submit" class="btn" disabled=move || state.get().is_submitting()>
                        {move || if state.get().is_submitting() { "Saving..." } else { "Save" }}
                    </button>
                </div>
            </form>
        </Modal>
    }
}

#[component]
pub fn DeleteCategoryModal(state: RwSignal<ModalState>, target: RwSignal<Option<Category>>) -> impl IntoView {
    let ctx = use_app_context();
    let store = use_catalog_store();

    let warning = move || {
        let id = target.with(|t| t.as_ref().map(|c| c.id))?;
        store.categories().with(|s| flow::delete_warning(s, id))
    };

    let close = move || {
        transition(state, ModalEvent::Dismiss);
        if !state.get_untracked().is_open() {
            target.set(None);
        }
    };

    let confirm = move |_: web_sys::MouseEvent| {
        if state.get_untracked() != ModalState::Open {
            return;
        }
        let Some(category) = target.get_untracked() else { return };
        transition(state, ModalEvent::Submit);
        let api = ctx.api();
        spawn_local(async move {
            match flow::delete_category(api.as_ref(), &ctx, category.id).await {
                Ok(()) => {
                    transition(state, ModalEvent::Succeeded);
                    target.try_set(None);
                }
                Err(err) => {
                    report_failure(&err);
                    transition(state, ModalEvent::Failed);
                }
            }
        });
    };

    view! {
        <Modal title="Delete category" open=Signal::derive(move || state.get().is_open()) on_close=move |_| close()>
            <p>
                {move || target.with(|t| t.as_ref().map(|c| format!("Delete \"{}\"? This cannot be undone.", c.name)).unwrap_or_default())}
            </p>
            {move || warning().map(|text| view! { <p class="delete-warning">{text}</p> })}
            <div class="modal-actions">
                <button type="button" class="btn btn-secondary" on:click=move |_| close()>"Cancel"</button>
                <button type="button" class="btn btn-danger" disabled=move || state.get().is_submitting() on:click=confirm>
                    {move || if state.get().is_submitting() { "Deleting..." } else { "Delete" }}
                </button>
            </div>
        </Modal>
    }
}
