//! ギャラリー本体
//!
//! コントローラを1つ持ち、URLの `?project=ID` と同期する。
//! グリッドとモーダルは同時に操作できない（モーダル表示中はグリッドを外す）。

use leptos::ev;
use leptos::prelude::*;
use leptos::task::spawn_local;
use crate::browser;
use crate::components::{
    blur_image::provide_placeholder_cache,
    category_filter::CategoryFilter,
    photo_gallery::PhotoGallery,
    photo_modal::PhotoModal,
    project_grid::ProjectGrid,
};
use folio_gallery_common::{Catalog, GalleryController, ViewMode};

#[component]
pub fn Gallery(catalog: Catalog) -> impl IntoView {
    provide_placeholder_cache();

    let ctrl = RwSignal::new(GalleryController::new(catalog));
    let grid_visible = Memo::new(move |_| ctrl.with(|c| c.is_grid_visible()));
    let modal_open = Memo::new(move |_| ctrl.with(|c| c.is_modal_open()));
    let mode = Memo::new(move |_| ctrl.with(|c| c.view_mode()));

    // ディープリンクの反映は次のマイクロタスクで。それまでに再予約・アンマウントされたら捨てる
    let reconcile = move || {
        let url = browser::current_url();
        let pending = ctrl.try_update(|c| c.begin_reconcile_url(&url)).flatten();
        if let Some(pending) = pending {
            spawn_local(async move {
                ctrl.try_update(|c| c.commit_reconcile(pending));
            });
        }
    };

    reconcile();

    let popstate = window_event_listener(ev::popstate, move |_| reconcile());
    on_cleanup(move || {
        popstate.remove();
        ctrl.try_update_untracked(|c| c.cancel_pending());
    });

    let on_close = Callback::new(move |_: ()| {
        let url = browser::current_url();
        let rewritten = ctrl.try_update(|c| c.close_modal(&url)).flatten();
        if let Some(next) = rewritten {
            browser::replace_url(&next);
        }
        reconcile();
    });

    view! {
        <section id="work" class="work">
            <Show when=move || grid_visible.get()>
                <CategoryFilter ctrl=ctrl />
                {move || match mode.get() {
                    ViewMode::Projects => view! { <ProjectGrid ctrl=ctrl /> }.into_any(),
                    ViewMode::Photos => view! { <PhotoGallery ctrl=ctrl /> }.into_any(),
                }}
            </Show>
            <Show when=move || modal_open.get()>
                <PhotoModal ctrl=ctrl on_close=on_close />
            </Show>
        </section>
    }
}
