//! ブラウザ環境の薄いラッパー（URL・履歴・ログ）

use wasm_bindgen::JsValue;

pub fn current_url() -> String {
    web_sys::window()
        .and_then(|w| w.location().href().ok())
        .unwrap_or_default()
}

/// 履歴を増やさずにURLを置き換える（スクロール位置は変えない）
pub fn replace_url(url: &str) {
    let Some(history) = web_sys::window().and_then(|w| w.history().ok()) else {
        return;
    };
    if let Err(e) = history.replace_state_with_url(&JsValue::NULL, "", Some(url)) {
        warn(&format!("URLの置き換えに失敗: {:?}", e));
    }
}

pub fn viewport_height() -> f64 {
    web_sys::window()
        .and_then(|w| w.inner_height().ok())
        .and_then(|h| h.as_f64())
        .unwrap_or(0.0)
}

pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

pub fn log(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}

pub fn warn(message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(message));
}
