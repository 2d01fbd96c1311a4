//! サーバー連携

pub mod blur;
pub mod catalog;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortSignal, Request, RequestInit, RequestMode, Response};

/// API のオリジン（ビルド時指定、未指定なら同一オリジン）
pub const API_BASE: &str = match option_env!("FOLIO_API_BASE") {
    Some(base) => base,
    None => "",
};

/// GET して成功レスポンスを返す
async fn get(url: &str, signal: Option<&AbortSignal>) -> Result<Response, JsValue> {
    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::Cors);
    opts.set_signal(signal);

    let request = Request::new_with_str_and_init(url, &opts)?;

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("window がありません"))?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request)).await?;
    let resp: Response = resp_value.dyn_into()?;

    if !resp.ok() {
        return Err(JsValue::from_str(&format!("API error: {}", resp.status())));
    }
    Ok(resp)
}
