//! Catalog Admin Entry Point

mod api;
mod app;
mod cancel;
mod components;
mod config;
mod context;
mod error;
mod flows;
mod logging;
mod markdown;
mod models;
mod pages;
mod query;
mod router;
mod store;
mod tree;
mod upload;

#[cfg(test)]
mod testing;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    mount_to_body(App);
}
