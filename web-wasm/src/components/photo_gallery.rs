//! 写真ストリーム（PHOTOS ビュー）

use leptos::prelude::*;
use crate::components::blur_image::BlurImage;
use folio_gallery_common::{GalleryController, PhotoPager};

#[component]
pub fn PhotoGallery(ctrl: RwSignal<GalleryController>) -> impl IntoView {
    let photos = Memo::new(move |_| ctrl.with(|c| c.photos()));
    let selected = Memo::new(move |_| {
        ctrl.with(|c| c.active_filter().iter().map(String::from).collect::<Vec<_>>())
    });
    let pager = RwSignal::new(PhotoPager::default());

    // フィルタか枚数が変わったら先頭ページに戻す
    Effect::new(move |_| {
        let total = photos.with(|p| p.len());
        selected.with(|labels| {
            pager.update(|pg| pg.sync(labels.iter().map(String::as_str), total));
        });
    });

    let visible = move || {
        let total = photos.with(|p| p.len());
        let shown = pager.with(|pg| pg.visible(total));
        photos.with(|p| p.iter().take(shown).cloned().enumerate().collect::<Vec<_>>())
    };

    view! {
        <div class="photo-gallery">
            <For
                each=visible
                key=|(index, src)| (*index, src.clone())
                children=move |(index, src)| {
                    view! {
                        <button
                            class="photo-tile"
                            on:click=move |_| {
                                ctrl.update(|c| {
                                    c.open_photo(index);
                                });
                            }
                        >
                            <BlurImage src=src alt=format!("Photo {}", index + 1) class="photo-thumb" />
                        </button>
                    }
                }
            />
        </div>
        <Show when=move || pager.with(|pg| pg.has_more(photos.with(|p| p.len())))>
            <button
                class="btn load-more"
                on:click=move |_| pager.update(|pg| pg.load_more(photos.with(|p| p.len())))
            >
                {move || pager.with(|pg| pg.label(photos.with(|p| p.len())))}
            </button>
        </Show>
    }
}
