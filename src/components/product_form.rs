//! Product Form Component
//!
//! Shared by the create and edit pages. Submission is blocked while any
//! image is still uploading.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::{alert, CategoryPicker, ImageUploadSection};
use crate::context::use_app_context;
use crate::error::FieldErrors;
use crate::flows::product::{self as flow, ProductForm};
use crate::router::Route;
use crate::store::{use_catalog_store, CatalogStateStoreFields};
use crate::upload::ImageUploadState;

/// What a successful submit does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(u32),
}

impl FormMode {
    fn submit_label(self) -> &'static str {
        match self {
            FormMode::Create => "Create product",
            FormMode::Edit(_) => "Save changes",
        }
    }

    fn destination(self) -> Route {
        match self {
            FormMode::Create => Route::Products,
            FormMode::Edit(id) => Route::ProductDetail(id),
        }
    }
}

#[component]
pub fn ProductFormView(initial: ProductForm, uploads: ImageUploadState, mode: FormMode) -> impl IntoView {
    let ctx = use_app_context();
    let store = use_catalog_store();

    let chain = RwSignal::new(initial.category_ids.clone());
    let images = RwSignal::new(initial.images.clone());
    let upload_state = RwSignal::new(uploads);
    let form = RwSignal::new(initial);
    let errors = RwSignal::new(FieldErrors::new());
    let submitting = RwSignal::new(false);

    let busy = move || upload_state.with(|s| s.is_busy());
    let error_for = move |field: &'static str| move || errors.with(|e| e.get(field).map(str::to_string));

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }
        if busy() {
            alert("Please wait until every image has finished uploading.");
            return;
        }

        let mut current = form.get_untracked();
        current.category_ids = chain.get_untracked();
        current.images = images.get_untracked();
        let payload = match store.categories().with_untracked(|snapshot| current.validate(snapshot)) {
            Ok(payload) => payload,
            Err(field_errors) => {
                tracing::debug!("[PRODUCT] Form has {} invalid field(s)", field_errors.len());
                errors.set(field_errors);
                return;
            }
        };

        errors.set(FieldErrors::new());
        submitting.set(true);
        let api = ctx.api();
        spawn_local(async move {
            let result = match mode {
                FormMode::Create => flow::create_product(api.as_ref(), &ctx, &payload).await,
                FormMode::Edit(id) => flow::update_product(api.as_ref(), &ctx, id, &payload).await,
            };
            submitting.try_set(false);
            match result {
                Ok(()) => ctx.navigate(mode.destination()),
                Err(err) => {
                    tracing::error!("[PRODUCT] Save failed: {}", err);
                    alert(&err.user_message());
                }
            }
        });
    };

    let text_input = move |value: fn(&ProductForm) -> String, apply: fn(&mut ProductForm, String)| {
        (
            move || form.with(|f| value(f)),
            move |ev: web_sys::Event| {
                let text = event_target_value(&ev);
                form.update(|f| apply(f, text));
            },
        )
    };
    let (name_value, on_name) = text_input(|f| f.name.clone(), |f, v| f.name = v);
    let (short_value, on_short) = text_input(|f| f.short_description.clone(), |f, v| f.short_description = v);
    let (description_value, on_description) = text_input(|f| f.description.clone(), |f, v| f.description = v);
    let (price_value, on_price) = text_input(|f| f.price.clone(), |f, v| f.price = v);
    let (size_value, on_size) = text_input(|f| f.size_info.clone(), |f, v| f.size_info = v);

    let cancel_route = mode.destination();

    view! {
        <form class="product-form" on:submit=submit>
            <section class="form-card">
                <h2>"Basic information"</h2>
                <label class="form-label">"Product name"</label>
                <input type="text" class="form-input" prop:value=name_value on:input=on_name />
                <p class="field-error">{error_for("name")}</p>

                <label class="form-label">"Short description"</label>
                <input type="text" class="form-input" prop:value=short_value on:input=on_short />

                <label class="form-label">"Description"</label>
                <textarea class="form-textarea" rows="4" prop:value=description_value on:input=on_description />

                <label class="form-toggle">
                    <input
                        type="checkbox"
                        prop:checked=move || form.with(|f| f.is_visible)
                        on:change=move |ev| {
                            let checked = event_target_checked(&ev);
                            form.update(|f| f.is_visible = checked);
                        }
                    />
                    "Visible in the shop"
                </label>
            </section>

            <section class="form-card">
                <h2>"Category"</h2>
                <CategoryPicker chain=chain />
                <p class="field-error">{error_for("category_ids")}</p>
            </section>

            <section class="form-card">
                <h2>"Price and size"</h2>
                <label class="form-label">"Price"</label>
                <input type="text" class="form-input" inputmode="decimal" prop:value=price_value on:input=on_price />
                <p class="field-error">{error_for("price")}</p>

                <label class="form-label">"Size information"</label>
                <textarea
                    class="form-textarea"
                    rows="3"
                    placeholder="One size per line"
                    prop:value=size_value
                    on:input=on_size
                />
            </section>

            <section class="form-card">
                <h2>"Images"</h2>
                <ImageUploadSection state=upload_state images=images />
                <p class="field-error">{error_for("images")}</p>
            </section>

            <div class="form-actions">
                <a class="btn btn-secondary" href=cancel_route.href()>"Cancel"</a>
                <button type="submit" class="btn" disabled=move || submitting.get() || busy()>
                    {move || {
                        if submitting.get() {
                            "Saving..."
                        } else if busy() {
                            "Uploading images..."
                        } else {
                            mode.submit_label()
                        }
                    }}
                </button>
            </div>
        </form>
    }
}

