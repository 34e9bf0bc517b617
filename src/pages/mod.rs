//! Routed Pages
//!
//! One component per route, plus the query hook the product pages load
//! their data with.

mod categories;
mod fallback;
mod home;
mod product_detail;
mod product_editor;
mod product_list;

use std::future::Future;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::CatalogApi;
use crate::cancel::CancelScope;
use crate::context::use_app_context;
use crate::error::{AppError, AppResult};

pub use categories::CategoriesPage;
pub use fallback::{NotFoundPage, SignupPage};
pub use home::HomePage;
pub use product_detail::ProductDetailPage;
pub use product_editor::{ProductCreatePage, ProductEditPage};
pub use product_list::ProductListPage;

/// Server data of a page. `data` keeps the last answer while a refetch
/// is in flight.
pub struct Query<T: Send + Sync + 'static> {
    pub data: RwSignal<Option<AppResult<T>>>,
    pub loading: RwSignal<bool>,
}

impl<T: Send + Sync + 'static> Clone for Query<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Send + Sync + 'static> Copy for Query<T> {}

/// Fetch whenever the values read by `track` change. Only the newest
/// request may write its answer; unmounting aborts whatever is in flight.
pub fn use_query<A, T, Fut>(
    track: impl Fn() -> A + 'static,
    fetch: impl Fn(Rc<dyn CatalogApi>, A) -> Fut + 'static,
) -> Query<T>
where
    A: 'static,
    T: Send + Sync + 'static,
    Fut: Future<Output = AppResult<T>> + 'static,
{
    let ctx = use_app_context();
    let scope = CancelScope::for_component();
    let query = Query { data: RwSignal::new(None), loading: RwSignal::new(false) };
    let latest = StoredValue::new(0u64);

    Effect::new(move |_| {
        let args = track();
        latest.update_value(|n| *n += 1);
        let request = latest.get_value();
        query.loading.set(true);

        let fut = fetch(ctx.api(), args);
        let scope = scope.clone();
        spawn_local(async move {
            let result = scope.run(fut).await;
            if latest.try_get_value() != Some(request) {
                return;
            }
            if matches!(result, Err(AppError::Cancelled)) {
                return;
            }
            if let Err(err) = &result {
                tracing::error!("[QUERY] {}", err);
            }
            query.loading.try_set(false);
            query.data.try_set(Some(result));
        });
    });

    query
}

/// Render the loaded value; failures go to the surrounding error boundary
pub fn render_query<T, V>(state: Option<AppResult<T>>, render: impl FnOnce(T) -> V) -> Result<AnyView, AppError>
where
    V: IntoView + 'static,
{
    match state {
        None => Ok(view! { <p class="loading">"Loading..."</p> }.into_any()),
        Some(Ok(value)) => Ok(render(value).into_any()),
        Some(Err(err)) => Err(err),
    }
}
