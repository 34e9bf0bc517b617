//! Signup Stub and Not-Found Page

use leptos::prelude::*;

use crate::router::Route;

#[component]
pub fn SignupPage() -> impl IntoView {
    view! {
        <div class="page signup-page">
            <h1>"Sign up"</h1>
            <p class="muted">"Account registration is not available yet."</p>
            <a class="btn btn-secondary" href=Route::Home.href()>"Go to dashboard"</a>
        </div>
    }
}

#[component]
pub fn NotFoundPage(#[prop(into)] path: String) -> impl IntoView {
    tracing::warn!("[ROUTER] No page for '{}'", path);

    view! {
        <div class="page not-found">
            <h1>"Page not found"</h1>
            <p class="muted">{format!("Nothing lives at /{}", path.trim_start_matches('/'))}</p>
            <a class="btn" href=Route::Home.href()>"Go to dashboard"</a>
        </div>
    }
}
