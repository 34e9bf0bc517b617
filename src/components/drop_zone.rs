//! File Drop Zone Component
//!
//! Target for dropping image files, doubling as the label of a hidden
//! file input for click-to-select.

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::DragEvent;

use crate::upload::DragCounter;

fn collect_files(list: Option<web_sys::FileList>) -> Vec<web_sys::File> {
    let Some(list) = list else { return Vec::new() };
    (0..list.length()).filter_map(|i| list.get(i)).collect()
}

/// Drop zone that reports the files dropped or picked
#[component]
pub fn FileDropZone(
    /// Id of the hidden input, unique per slot
    #[prop(into)] input_id: String,
    /// Called with the raw files, before any filtering
    #[prop(into)] on_files: Callback<Vec<web_sys::File>>,
    #[prop(into)] disabled: Signal<bool>,
    #[prop(into)] hint: String,
) -> impl IntoView {
    let counter = RwSignal::new(DragCounter::default());

    let on_dragenter = move |ev: DragEvent| {
        ev.prevent_default();
        ev.stop_propagation();
        counter.update(|c| c.enter());
    };

    let on_dragleave = move |ev: DragEvent| {
        ev.prevent_default();
        ev.stop_propagation();
        counter.update(|c| c.leave());
    };

    let on_dragover = move |ev: DragEvent| {
        ev.prevent_default();
        ev.stop_propagation();
    };

    let on_drop = move |ev: DragEvent| {
        ev.prevent_default();
        ev.stop_propagation();
        counter.update(|c| c.reset());
        if disabled.get_untracked() {
            return;
        }
        let files = collect_files(ev.data_transfer().and_then(|dt| dt.files()));
        if !files.is_empty() {
            on_files.run(files);
        }
    };

    let on_input_change = move |ev: web_sys::Event| {
        let Some(input) = ev.target().and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok()) else {
            return;
        };
        let files = collect_files(input.files());
        // Allow picking the same file again
        input.set_value("");
        if !files.is_empty() {
            on_files.run(files);
        }
    };

    let is_over = move || counter.get().is_over();
    let label_for = input_id.clone();

    view! {
        <div
            class=move || {
                let mut c = "file-drop-zone".to_string();
                if is_over() { c.push_str(" active"); }
                if disabled.get() { c.push_str(" disabled"); }
                c
            }
            on:dragenter=on_dragenter
            on:dragleave=on_dragleave
            on:dragover=on_dragover
            on:drop=on_drop
        >
            <p>{move || if is_over() { "Drop the images here!".to_string() } else { hint.clone() }}</p>
            <Show when=move || !is_over() && !disabled.get()>
                <label for=label_for.clone() class="file-pick-link">"Click to select"</label>
            </Show>
            <input
                id=input_id
                type="file"
                multiple=true
                accept="image/*"
                class="hidden"
                disabled=move || disabled.get()
                on:change=on_input_change
            />
        </div>
    }
}
