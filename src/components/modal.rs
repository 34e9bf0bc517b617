//! Modal Component
//!
//! Overlay dialog shared by the category modals.

use leptos::prelude::*;

#[component]
pub fn Modal(
    #[prop(into)] title: String,
    #[prop(into)] open: Signal<bool>,
    /// Backdrop click or close button
    #[prop(into)] on_close: Callback<()>,
    children: ChildrenFn,
) -> impl IntoView {
    let children = StoredValue::new(children);

    view! {
        <Show when=move || open.get()>
            <div class="modal-backdrop" on:click=move |_| on_close.run(())>
                <div class="modal" on:click=|ev| ev.stop_propagation()>
                    <div class="modal-header">
                        <h2>{title.clone()}</h2>
                        <button class="modal-close" on:click=move |_| on_close.run(())>"×"</button>
                    </div>
                    <div class="modal-body">{children.with_value(|children| children())}</div>
                </div>
            </div>
        </Show>
    }
}
