//! Hash Router
//!
//! Maps `window.location.hash` to a `Route` and back.

use leptos::prelude::*;
use percent_encoding::{percent_decode_str, utf8_percent_encode, NON_ALPHANUMERIC};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Categories,
    Products,
    ProductCreate,
    ProductDetail(u32),
    ProductEdit(u32),
    Signup,
    NotFound(String),
}

impl Route {
    pub fn parse(hash: &str) -> Self {
        let path = hash.trim_start_matches('#');
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<String> = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| percent_decode_str(s).decode_utf8_lossy().into_owned())
            .collect();
        let parts: Vec<&str> = segments.iter().map(String::as_str).collect();

        match parts.as_slice() {
            [] => Route::Home,
            ["category"] => Route::Categories,
            ["product"] => Route::Products,
            ["product", "create"] => Route::ProductCreate,
            ["product", "edit", id] => match id.parse() {
                Ok(id) => Route::ProductEdit(id),
                Err(_) => Route::NotFound(path.to_string()),
            },
            ["product", id] => match id.parse() {
                Ok(id) => Route::ProductDetail(id),
                Err(_) => Route::NotFound(path.to_string()),
            },
            ["signup"] => Route::Signup,
            _ => Route::NotFound(path.to_string()),
        }
    }

    pub fn href(&self) -> String {
        match self {
            Route::Home => "#/".to_string(),
            Route::Categories => "#/category".to_string(),
            Route::Products => "#/product".to_string(),
            Route::ProductCreate => "#/product/create".to_string(),
            Route::ProductDetail(id) => format!("#/product/{}", id),
            Route::ProductEdit(id) => format!("#/product/edit/{}", id),
            Route::Signup => "#/signup".to_string(),
            Route::NotFound(path) => {
                let encoded: Vec<String> = path
                    .split('/')
                    .filter(|s| !s.is_empty())
                    .map(|s| utf8_percent_encode(s, NON_ALPHANUMERIC).to_string())
                    .collect();
                format!("#/{}", encoded.join("/"))
            }
        }
    }

    /// Sidebar section the route belongs to
    pub fn section(&self) -> Option<&'static str> {
        match self {
            Route::Home => Some("Dashboard"),
            Route::Categories => Some("Categories"),
            Route::Products | Route::ProductCreate | Route::ProductDetail(_) | Route::ProductEdit(_) => {
                Some("Products")
            }
            Route::Signup | Route::NotFound(_) => None,
        }
    }
}

pub fn current() -> Route {
    let hash = web_sys::window().and_then(|win| win.location().hash().ok()).unwrap_or_default();
    Route::parse(&hash)
}

pub fn navigate(route: &Route) {
    tracing::debug!("[ROUTER] Navigate to {}", route.href());
    if let Some(win) = web_sys::window() {
        if let Err(e) = win.location().set_hash(&route.href()) {
            tracing::error!("[ROUTER] Failed to set hash: {:?}", e);
        }
    }
}

/// Keep `route` in sync with `hashchange` events
pub fn bind_hashchange(route: RwSignal<Route>) {
    let on_change = Closure::<dyn FnMut(web_sys::Event)>::new(move |_ev: web_sys::Event| {
        route.try_set(current());
    });
    if let Some(win) = web_sys::window() {
        let _ = win.add_event_listener_with_callback("hashchange", on_change.as_ref().unchecked_ref());
    }
    on_change.forget();
}
