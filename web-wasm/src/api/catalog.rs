//! カタログJSONの取得

use super::get;
use folio_gallery_common::Catalog;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

/// カタログの配置先（ビルド時指定）
pub const CATALOG_URL: &str = match option_env!("FOLIO_CATALOG_URL") {
    Some(url) => url,
    None => "catalog.json",
};

/// ページビューごとに一度だけ呼ぶ
pub async fn fetch_catalog() -> Result<Catalog, JsValue> {
    let resp = get(CATALOG_URL, None).await?;
    let text = JsFuture::from(resp.text()?)
        .await?
        .as_string()
        .ok_or_else(|| JsValue::from_str("カタログが文字列ではありません"))?;

    Catalog::from_json(&text).map_err(|e| JsValue::from_str(&format!("カタログ解析エラー: {}", e)))
}
