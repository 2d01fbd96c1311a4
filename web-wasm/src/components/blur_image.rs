//! ぼかしプレースホルダー付き画像
//!
//! 読み込み中は `/api/blur` のぼかし画像を背景に敷く。取得結果はページ内で共有する
//! キャッシュに入れ、画像が切り替わったら前の取得は中断する。

use leptos::prelude::*;
use leptos::task::spawn_local;
use crate::api::blur::fetch_blur;
use folio_gallery_common::placeholder::ERROR_IMG_SRC;
use folio_gallery_common::{BoundedPlaceholderCache, PlaceholderLoader};
use web_sys::AbortController;

/// ページ内で共有するプレースホルダーキャッシュ
pub type SharedPlaceholderCache = StoredValue<BoundedPlaceholderCache>;

pub fn provide_placeholder_cache() {
    provide_context::<SharedPlaceholderCache>(StoredValue::new(BoundedPlaceholderCache::default()));
}

#[component]
pub fn BlurImage(
    #[prop(into)] src: Signal<String>,
    #[prop(into)] alt: String,
    #[prop(optional, into)] class: String,
    /// `/api/blur` から取得する（グリッドでは既定値のみ）
    #[prop(optional)]
    fetch_placeholder: bool,
    #[prop(optional)] on_load: Option<Callback<()>>,
    #[prop(optional)] on_error: Option<Callback<()>>,
) -> impl IntoView {
    let cache = use_context::<SharedPlaceholderCache>()
        .unwrap_or_else(|| StoredValue::new(BoundedPlaceholderCache::default()));
    let loader = RwSignal::new(PlaceholderLoader::new());
    let loaded = RwSignal::new(false);
    let errored = RwSignal::new(false);
    let in_flight = StoredValue::new_local(None::<AbortController>);

    let abort_in_flight = move || {
        in_flight.try_update_value(|slot| {
            if let Some(controller) = slot.take() {
                controller.abort();
            }
        });
    };

    Effect::new(move |_| {
        let src = src.get();
        loaded.set(false);
        errored.set(false);
        abort_in_flight();

        if !fetch_placeholder {
            return;
        }

        let ticket = cache
            .with_value(|c| loader.try_update(|l| l.begin(&src, c)))
            .flatten();
        let Some(ticket) = ticket else {
            return;
        };
        let Ok(controller) = AbortController::new() else {
            return;
        };
        let signal = controller.signal();
        in_flight.set_value(Some(controller));

        spawn_local(async move {
            let result = fetch_blur(&ticket.src, &signal)
                .await
                .map_err(|e| format!("{:?}", e));
            cache.try_update_value(|c| {
                loader.try_update(|l| l.complete(&ticket, result, c));
            });
        });
    });

    on_cleanup(abort_in_flight);

    let placeholder = move || {
        let src = src.get();
        cache.with_value(|c| loader.with(|l| l.resolve(&src, None, c)))
    };

    move || {
        if errored.get() {
            view! {
                <div class=format!("image-error {}", class)>
                    <img src=ERROR_IMG_SRC alt="Error loading image" data-original-url=move || src.get() />
                </div>
            }
            .into_any()
        } else {
            view! {
                <div
                    class="blur-image"
                    class:loaded=move || loaded.get()
                    style=move || format!("background-image: url(\"{}\")", placeholder())
                >
                    <img
                        src=move || src.get()
                        alt=alt.clone()
                        class=class.clone()
                        loading="lazy"
                        on:load=move |_| {
                            loaded.set(true);
                            if let Some(cb) = on_load {
                                cb.run(());
                            }
                        }
                        on:error=move |_| {
                            errored.set(true);
                            if let Some(cb) = on_error {
                                cb.run(());
                            }
                        }
                    />
                </div>
            }
            .into_any()
        }
    }
}
