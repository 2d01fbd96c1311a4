//! 作品グリッド

use leptos::prelude::*;
use crate::components::blur_image::BlurImage;
use folio_gallery_common::{GalleryController, Item};

#[component]
pub fn ProjectGrid(ctrl: RwSignal<GalleryController>) -> impl IntoView {
    let items = Memo::new(move |_| {
        ctrl.with(|c| c.filtered().into_iter().cloned().collect::<Vec<Item>>())
    });

    view! {
        <div class="project-grid">
            <For
                each=move || items.get()
                key=|item| item.id
                children=move |item| view! { <ProjectCard item=item ctrl=ctrl /> }
            />
        </div>
    }
}

#[component]
fn ProjectCard(item: Item, ctrl: RwSignal<GalleryController>) -> impl IntoView {
    let id = item.id;

    view! {
        <div
            class="project-card"
            on:click=move |_| {
                ctrl.update(|c| {
                    c.open_item(id, 0);
                });
            }
        >
            <BlurImage src=item.image_url.clone() alt=item.title.clone() class="project-cover" />
            <div class="project-overlay">
                <h3>{item.title.clone()}</h3>
                <div class="project-meta">
                    <span>{format!("[{}]", item.categories.join(", "))}</span>
                    <span>{item.year.clone()}</span>
                </div>
            </div>
        </div>
    }
}
