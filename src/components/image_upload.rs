//! Image Upload Section
//!
//! Main and description image slots of the product form. Dropped or
//! picked files upload concurrently; once a batch settles the form's
//! image list is rebuilt from the successful uploads. Thumbnails within a
//! slot reorder by dragging.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dragdrop::{
    bind_global_handlers, create_dnd_signals, make_on_end_mouseenter, make_on_item_mouseenter, make_on_mousedown,
    make_on_mouseleave, DndSignals, DropTarget,
};

use crate::api::read_file;
use crate::cancel::CancelScope;
use crate::components::{alert, FileDropZone};
use crate::context::use_app_context;
use crate::models::{ImageKind, ProductImage};
use crate::upload::{filter_images, upload_batch, ImageUploadState, PendingFile, UploadStatus, UploadedImage};

fn revoke_preview(image: &UploadedImage) {
    if let Some(url) = &image.preview_url {
        let _ = web_sys::Url::revoke_object_url(url);
    }
}

#[component]
pub fn ImageUploadSection(
    /// Thumbnail state of both slots
    state: RwSignal<ImageUploadState>,
    /// Form field holding the successful uploads
    images: RwSignal<Vec<ProductImage>>,
) -> impl IntoView {
    let ctx = use_app_context();
    let scope = StoredValue::new(CancelScope::for_component());

    on_cleanup(move || {
        state.with_untracked(|s| {
            for kind in [ImageKind::Main, ImageKind::Description] {
                s.slot(kind).iter().for_each(revoke_preview);
            }
        });
    });

    let process = move |kind: ImageKind, files: Vec<web_sys::File>| {
        let pending: Vec<PendingFile<web_sys::File>> = files
            .into_iter()
            .map(|file| PendingFile { name: file.name(), mime: file.type_(), source: file })
            .collect();
        let pending = match filter_images(pending) {
            Ok(pending) => pending,
            Err(err) => return alert(&err.user_message()),
        };
        let admitted = match state.try_update(|s| s.admit(kind, pending)) {
            Some(Ok(admitted)) => admitted,
            Some(Err(err)) => return alert(&err.user_message()),
            None => return,
        };
        if admitted.is_empty() {
            return;
        }

        for item in &admitted {
            if let Ok(url) = web_sys::Url::create_object_url_with_blob(&item.file.source) {
                state.update(|s| s.set_preview(item.local_id, url));
            }
        }

        tracing::info!("[UPLOAD] Uploading {} {} image(s)", admitted.len(), kind.as_str());
        let api = ctx.api();
        let scope = scope.get_value();
        spawn_local(async move {
            let results = upload_batch(admitted, |file| {
                let api = api.clone();
                let scope = scope.clone();
                async move {
                    scope
                        .run(async {
                            let upload = read_file(&file.source).await?;
                            api.upload_image(upload).await
                        })
                        .await
                }
            })
            .await;

            let done = results.iter().filter(|(_, r)| r.is_ok()).count();
            tracing::info!("[UPLOAD] Batch settled: {} of {} succeeded", done, results.len());
            if let Some(form_images) = state.try_update(|s| s.settle(results)) {
                images.try_set(form_images);
            }
        });
    };

    let on_remove = Callback::new(move |local_id: u32| {
        if let Some(Some(removed)) = state.try_update(|s| s.remove(local_id)) {
            revoke_preview(&removed);
        }
        images.set(state.with_untracked(|s| s.form_images()));
    });

    view! {
        <div class="image-upload-section">
            <ImageSlotCard
                kind=ImageKind::Main
                title="Main image"
                state=state
                images=images
                on_files=Callback::new(move |files| process(ImageKind::Main, files))
                on_remove=on_remove
            />
            <ImageSlotCard
                kind=ImageKind::Description
                title="Description images"
                state=state
                images=images
                on_files=Callback::new(move |files| process(ImageKind::Description, files))
                on_remove=on_remove
            />
            <p class="form-hint">"Image formats: .jpg, .jpeg, .png. Preferred size 1:1."</p>
        </div>
    }
}

#[component]
fn ImageSlotCard(
    kind: ImageKind,
    #[prop(into)] title: String,
    state: RwSignal<ImageUploadState>,
    images: RwSignal<Vec<ProductImage>>,
    on_files: Callback<Vec<web_sys::File>>,
    on_remove: Callback<u32>,
) -> impl IntoView {
    let dnd = create_dnd_signals();
    bind_global_handlers(dnd, move |dragged, target| {
        state.try_update(|s| s.reorder(kind, dragged, target));
        if let Some(form_images) = state.try_with_untracked(|s| s.form_images()) {
            images.try_set(form_images);
        }
    });

    let thumbnails = move || state.with(|s| s.slot(kind).to_vec());
    let count = move || state.with(|s| s.slot(kind).len());
    let full = Signal::derive(move || state.with(|s| s.remaining(kind) == 0));
    let busy = move || state.with(|s| s.slot(kind).iter().any(|i| i.status == UploadStatus::Uploading));
    let on_end_mouseenter = make_on_end_mouseenter(dnd);
    let on_mouseleave = make_on_mouseleave(dnd);
    let hint = match kind {
        ImageKind::Main => "Drop the main image here or",
        ImageKind::Description => "Drop up to 5 images here or",
    };

    view! {
        <div class="image-slot-card">
            <div class="image-slot-header">
                <h3>{title}</h3>
                <span class="muted">{move || format!("{}/{}", count(), kind.max_images())}</span>
                <Show when=busy>
                    <span class="spinner">"Uploading..."</span>
                </Show>
            </div>
            <div class="image-grid">
                <For
                    each=thumbnails
                    key=|img: &UploadedImage| (img.local_id, img.display_order, img.status.clone(), img.preview_url.clone())
                    children=move |img: UploadedImage| view! { <Thumbnail image=img dnd=dnd on_remove=on_remove /> }
                />
                <div
                    class=move || match dnd.drop_target.get() {
                        Some(DropTarget::End) => "grid-end drop-target",
                        _ => "grid-end",
                    }
                    on:mouseenter=on_end_mouseenter
                    on:mouseleave=on_mouseleave
                />
            </div>
            <FileDropZone
                input_id=format!("upload-{}", kind.as_str())
                on_files=on_files
                disabled=full
                hint=hint
            />
        </div>
    }
}

#[component]
fn Thumbnail(image: UploadedImage, dnd: DndSignals, on_remove: Callback<u32>) -> impl IntoView {
    let id = image.local_id;
    let on_mousedown = make_on_mousedown(dnd, id);
    let on_mouseenter = make_on_item_mouseenter(dnd, id);
    let on_mouseleave = make_on_mouseleave(dnd);

    let item_class = move || {
        let mut c = String::from("thumbnail");
        if dnd.dragging_id.get() == Some(id) { c.push_str(" dragging"); }
        if matches!(dnd.drop_target.get(), Some(DropTarget::Item(tid)) if tid == id) { c.push_str(" drop-target"); }
        c
    };

    let overlay = match &image.status {
        UploadStatus::Uploading => Some(view! { <div class="thumbnail-overlay uploading">"Uploading..."</div> }.into_any()),
        UploadStatus::Failed(message) => {
            Some(view! { <div class="thumbnail-overlay failed" title=message.clone()>"Upload failed"</div> }.into_any())
        }
        UploadStatus::Done(_) => None,
    };

    view! {
        <div
            class=item_class
            on:mousedown=on_mousedown
            on:mouseenter=on_mouseenter
            on:mouseleave=on_mouseleave
        >
            {image.display_src().map(|src| view! { <img src=src alt=image.file_name.clone() /> })}
            {overlay}
            <span class="thumbnail-order">{image.display_order + 1}</span>
            <button
                type="button"
                class="thumbnail-remove"
                on:click=move |ev| {
                    ev.stop_propagation();
                    if !dnd.drag_just_ended.get_untracked() {
                        on_remove.run(id);
                    }
                }
            >
                "×"
            </button>
        </div>
    }
}
