//! メインアプリケーションコンポーネント

use leptos::prelude::*;
use leptos::task::spawn_local;
use crate::api::catalog::fetch_catalog;
use crate::browser;
use crate::components::{gallery::Gallery, header::Header};
use folio_gallery_common::Catalog;

/// カタログの読み込み状態
#[derive(Clone)]
enum CatalogState {
    Loading,
    Ready(Catalog),
    Failed(String),
}

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    let (catalog, set_catalog) = signal(CatalogState::Loading);

    // カタログはページビューごとに一度だけ読む
    spawn_local(async move {
        match fetch_catalog().await {
            Ok(loaded) => {
                browser::log(&format!("カタログ読み込み: {}件", loaded.len()));
                set_catalog.set(CatalogState::Ready(loaded));
            }
            Err(e) => {
                let message = format!("カタログを読み込めませんでした: {:?}", e);
                browser::warn(&message);
                set_catalog.set(CatalogState::Failed(message));
            }
        }
    });

    view! {
        <div class="container">
            <Header />

            {move || match catalog.get() {
                CatalogState::Loading => view! { <p class="text-muted">"LOADING"</p> }.into_any(),
                CatalogState::Ready(catalog) => view! { <Gallery catalog=catalog /> }.into_any(),
                CatalogState::Failed(message) => view! { <p class="text-error">{message}</p> }.into_any(),
            }}
        </div>
    }
}
