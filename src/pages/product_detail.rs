//! Product Detail Page

use leptos::prelude::*;

use crate::components::CategoryPath;
use crate::context::use_app_context;
use crate::flows::product::{format_price, format_timestamp};
use crate::markdown::parse_markdown;
use crate::models::{ImageKind, Product, ProductImage};
use crate::pages::{render_query, use_query};
use crate::query::QueryKey;
use crate::router::Route;

#[component]
fn ImageStrip(#[prop(into)] title: String, images: Vec<ProductImage>) -> impl IntoView {
    view! {
        <div class="detail-images">
            <h3>{title}</h3>
            {if images.is_empty() {
                view! { <p class="muted">"No images"</p> }.into_any()
            } else {
                view! {
                    <div class="image-grid">
                        {images
                            .into_iter()
                            .map(|img| view! { <img class="thumbnail" src=img.url alt="" /> })
                            .collect_view()}
                    </div>
                }.into_any()
            }}
        </div>
    }
}

#[component]
fn ProductDetailView(product: Product) -> impl IntoView {
    let main_images = product.images_of(ImageKind::Main);
    let description_images = product.images_of(ImageKind::Description);
    let subtitle = product.short_description.clone().or_else(|| product.sub_name.clone()).unwrap_or_default();
    let (badge_class, badge_text) = if product.is_visible { ("badge", "Visible") } else { ("badge badge-muted", "Hidden") };

    view! {
        <div class="page-header">
            <h1>{product.name.clone()}</h1>
            <span class=badge_class>{badge_text}</span>
            <a class="btn" href=Route::ProductEdit(product.id).href()>"Edit"</a>
        </div>

        <section class="form-card">
            <h2>"Images"</h2>
            <ImageStrip title="Main image" images=main_images />
            <ImageStrip title="Description images" images=description_images />
        </section>

        <section class="form-card">
            <h2>"Basic information"</h2>
            <p class="muted">{subtitle}</p>
            <p class="product-description">{product.description.clone().unwrap_or_default()}</p>
            <CategoryPath links=product.categories.clone() />
        </section>

        <section class="form-card">
            <h2>"Price and size"</h2>
            {product
                .details
                .iter()
                .map(|detail| view! {
                    <div class="detail-row">
                        <span class="detail-price">{format_price(detail.price)}</span>
                        <div class="markdown-content" inner_html=parse_markdown(&detail.size) />
                    </div>
                })
                .collect_view()}
        </section>

        <dl class="timestamps">
            <dt>"Created"</dt>
            <dd>{format_timestamp(product.created_at)}</dd>
            <dt>"Updated"</dt>
            <dd>{format_timestamp(product.updated_at)}</dd>
        </dl>
    }
}

#[component]
pub fn ProductDetailPage(id: u32) -> impl IntoView {
    let ctx = use_app_context();
    let query = use_query(
        move || ctx.version(QueryKey::Product(id)),
        move |api, _| async move { api.get_product(id).await },
    );

    view! {
        <div class="page product-detail">
            <a class="back-link" href=Route::Products.href()>"← Products"</a>
            {move || render_query(query.data.get(), |product| view! { <ProductDetailView product=product /> })}
        </div>
    }
}
