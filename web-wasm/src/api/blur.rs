//! `/api/blur` からぼかしプレースホルダーを取得

use super::{get, API_BASE};
use folio_gallery_common::placeholder::{blur_request_path, BlurResponse};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::AbortSignal;

/// 取得。`signal` で中断されたら Err
pub async fn fetch_blur(src: &str, signal: &AbortSignal) -> Result<BlurResponse, JsValue> {
    let url = format!("{}{}", API_BASE, blur_request_path(src));
    let resp = get(&url, Some(signal)).await?;

    let json = JsFuture::from(resp.json()?).await?;
    let body: BlurResponse = serde_wasm_bindgen::from_value(json)?;
    Ok(body)
}
