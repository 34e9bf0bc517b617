//! Error View Component
//!
//! Generic failure panel with retry, a way home and the recent log lines.

use leptos::prelude::*;

use crate::logging;
use crate::router::Route;

const LOG_TAIL: usize = 30;

#[component]
pub fn ErrorView(
    #[prop(into)] message: String,
    #[prop(into, optional)] on_retry: Option<Callback<()>>,
) -> impl IntoView {
    let (show_log, set_show_log) = signal(false);

    view! {
        <div class="error-view">
            <h2>"Something went wrong"</h2>
            <p class="error-message">{message}</p>
            <div class="error-actions">
                {on_retry.map(|retry| view! {
                    <button class="btn" on:click=move |_| retry.run(())>"Try again"</button>
                })}
                <a class="btn btn-secondary" href=Route::Home.href()>"Go to dashboard"</a>
                <button class="btn btn-link" on:click=move |_| set_show_log.update(|v| *v = !*v)>
                    {move || if show_log.get() { "Hide log" } else { "Show log" }}
                </button>
            </div>
            <Show when=move || show_log.get()>
                <pre class="error-log">{logging::recent_lines(LOG_TAIL).join("\n")}</pre>
            </Show>
        </div>
    }
}
