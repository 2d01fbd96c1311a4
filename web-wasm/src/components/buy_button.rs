//! 購入ボタン（表示のみ）

use leptos::prelude::*;
use folio_gallery_common::BuyAffordance;

#[component]
pub fn BuyButton(affordance: BuyAffordance) -> impl IntoView {
    let enabled = affordance.is_enabled();
    let price_ref = match &affordance {
        BuyAffordance::Available { price_ref, .. } => Some(price_ref.clone()),
        _ => None,
    };

    view! {
        <button
            class="btn buy-button"
            class:out-of-stock=matches!(affordance, BuyAffordance::OutOfStock)
            disabled=!enabled
            data-price-ref=price_ref
        >
            {affordance.label().to_string()}
        </button>
    }
}
