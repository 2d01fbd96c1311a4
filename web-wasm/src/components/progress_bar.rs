//! 画像読み込みのプログレスバー

use leptos::prelude::*;
use folio_gallery_common::LoadProgress;

#[component]
pub fn ProgressBar(progress: RwSignal<LoadProgress>) -> impl IntoView {
    view! {
        <Show when=move || progress.with(|p| p.visible())>
            <div class="load-progress">
                <div
                    class="load-progress-fill"
                    style=move || format!("width: {}%", progress.with(|p| p.value()))
                />
            </div>
        </Show>
    }
}
