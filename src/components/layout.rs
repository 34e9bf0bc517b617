//! Layout Components
//!
//! Header bar and navigation sidebar around the routed page.

use leptos::prelude::*;

use crate::context::use_app_context;
use crate::router::Route;

fn nav_items() -> [(&'static str, Route); 3] {
    [("Dashboard", Route::Home), ("Categories", Route::Categories), ("Products", Route::Products)]
}

#[component]
pub fn Header() -> impl IntoView {
    let ctx = use_app_context();
    let title = move || ctx.route.with(|r| r.section().unwrap_or("Catalog Admin"));

    view! {
        <header class="app-header">
            <a class="app-title" href=Route::Home.href()>"Catalog Admin"</a>
            <span class="header-section">{title}</span>
            <a class="header-link" href=Route::Signup.href()>"Sign up"</a>
        </header>
    }
}

#[component]
pub fn Sidebar() -> impl IntoView {
    let ctx = use_app_context();

    view! {
        <nav class="app-sidebar">
            <ul>
                {nav_items()
                    .into_iter()
                    .map(|(label, route)| {
                        let href = route.href();
                        let is_active = move || ctx.route.with(|r| r.section() == Some(label));
                        view! {
                            <li class=move || { if is_active() { "nav-item active" } else { "nav-item" } }>
                                <a href=href>{label}</a>
                            </li>
                        }
                    })
                    .collect_view()}
            </ul>
            <a class="btn sidebar-action" href=Route::ProductCreate.href()>"+ New product"</a>
        </nav>
    }
}

#[component]
pub fn Layout(children: Children) -> impl IntoView {
    view! {
        <div class="app-layout">
            <Header />
            <div class="app-body">
                <Sidebar />
                <main class="main-content">{children()}</main>
            </div>
        </div>
    }
}
