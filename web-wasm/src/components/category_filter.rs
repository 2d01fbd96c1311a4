//! カテゴリフィルタ（PROJECTS / PHOTOS とカテゴリチップ）

use leptos::prelude::*;
use folio_gallery_common::{CategoryCount, GalleryController, ViewMode};

#[component]
pub fn CategoryFilter(ctrl: RwSignal<GalleryController>) -> impl IntoView {
    let counts = Memo::new(move |_| ctrl.with(|c| c.category_counts()));
    let mode = Memo::new(move |_| ctrl.with(|c| c.view_mode()));
    let unfiltered = Memo::new(move |_| ctrl.with(|c| c.active_filter().is_empty()));
    let project_count = Memo::new(move |_| ctrl.with(|c| c.filtered().len()));
    let photo_count = Memo::new(move |_| ctrl.with(|c| c.photos().len()));

    let mode_button = move |target: ViewMode, label: &'static str, count: Memo<usize>| {
        view! {
            <button
                class="view-mode"
                class:active=move || mode.get() == target && unfiltered.get()
                on:click=move |_| ctrl.update(|c| c.set_view_mode(target))
            >
                {move || format!("{} [{}]", label, count.get())}
            </button>
        }
    };

    view! {
        <div class="filter-bar">
            <div class="view-modes">
                {mode_button(ViewMode::Projects, "PROJECTS", project_count)}
                {mode_button(ViewMode::Photos, "PHOTOS", photo_count)}
            </div>
            <div class="chips">
                <For
                    each=move || counts.get()
                    key=|c| (c.label.clone(), c.count, c.selected)
                    children=move |count| view! { <CategoryChip count=count ctrl=ctrl /> }
                />
            </div>
        </div>
    }
}

#[component]
fn CategoryChip(count: CategoryCount, ctrl: RwSignal<GalleryController>) -> impl IntoView {
    let selectable = count.is_selectable();
    let label = count.label.clone();

    view! {
        <button
            class="chip"
            class:selected=count.selected
            class:unselectable=!selectable
            disabled=!selectable
            on:click=move |_| {
                ctrl.update(|c| {
                    c.toggle_category(&label);
                });
            }
        >
            {count.label.clone()}
            " "
            <span class="chip-count">{format!("[{}]", count.count)}</span>
        </button>
    }
}
