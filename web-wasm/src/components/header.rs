//! ヘッダーコンポーネント

use leptos::prelude::*;

#[component]
pub fn Header() -> impl IntoView {
    view! {
        <header class="header">
            <a href="/" class="header-title">"FOLIO"</a>
            <nav class="header-nav">
                <a href="/work">"WORK"</a>
            </nav>
        </header>
    }
}
