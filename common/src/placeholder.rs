//! ぼかしプレースホルダーのキャッシュと取得管理
//!
//! キャッシュは画像参照 → data URL の対応表。ページ内の全ギャラリーで共有する。
//! 同じキーの再書き込みは無害なので排他は不要。上限に達したら全消去する（LRUなし）。

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// キャッシュ上限の既定値
pub const DEFAULT_CACHE_LIMIT: usize = 2000;

/// プレースホルダー取得APIのパス
pub const BLUR_ENDPOINT: &str = "/api/blur";

/// 取得できなかったときに使う暗いグラデーション
pub const DEFAULT_BLUR_DATA_URL: &str = "data:image/svg+xml;base64,PHN2ZyB3aWR0aD0iMzIiIGhlaWdodD0iMzIiIHhtbG5zPSJodHRwOi8vd3d3LnczLm9yZy8yMDAwL3N2ZyI+PGxpbmVhckdyYWRpZW50IGlkPSJnIiB4MT0iMCIgeTE9IjAiIHgyPSIxIiB5Mj0iMSI+PHN0b3Agb2Zmc2V0PSIwIiBzdG9wLWNvbG9yPSIjMTExIi8+PHN0b3Agb2Zmc2V0PSIxIiBzdG9wLWNvbG9yPSIjMjIyIi8+PC9saW5lYXJHcmFkaWVudD48cmVjdCB3aWR0aD0iMzIiIGhlaWdodD0iMzIiIGZpbGw9InVybCgjZykiLz48L3N2Zz4=";

/// 画像の読み込みに失敗したときの代替アイコン
pub const ERROR_IMG_SRC: &str = "data:image/svg+xml;base64,PHN2ZyB3aWR0aD0iODgiIGhlaWdodD0iODgiIHhtbG5zPSJodHRwOi8vd3d3LnczLm9yZy8yMDAwL3N2ZyIgc3Ryb2tlPSIjMDAwIiBzdHJva2UtbGluZWpvaW49InJvdW5kIiBvcGFjaXR5PSIuMyIgZmlsbD0ibm9uZSIgc3Ryb2tlLXdpZHRoPSIzLjciPjxyZWN0IHg9IjE2IiB5PSIxNiIgd2lkdGg9IjU2IiBoZWlnaHQ9IjU2IiByeD0iNiIvPjxwYXRoIGQ9Im0xNiA1OCAxNi0xOCAzMiAzMiIvPjxjaXJjbGUgY3g9IjUzIiBjeT0iMzUiIHI9IjciLz48L3N2Zz4KCg==";

/// プレースホルダーキャッシュ
///
/// ビューアに注入して使う。テストでは差し替え可能。
pub trait PlaceholderCache {
    fn get(&self, src: &str) -> Option<String>;
    fn put(&mut self, src: &str, data_url: String);
    fn len(&self) -> usize;

    fn contains(&self, src: &str) -> bool {
        self.get(src).is_some()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 上限付きキャッシュ（溢れたら全消去）
#[derive(Debug, Clone)]
pub struct BoundedPlaceholderCache {
    entries: HashMap<String, String>,
    limit: usize,
}

impl BoundedPlaceholderCache {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: HashMap::new(),
            limit: limit.max(1),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for BoundedPlaceholderCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_LIMIT)
    }
}

impl PlaceholderCache for BoundedPlaceholderCache {
    fn get(&self, src: &str) -> Option<String> {
        self.entries.get(src).cloned()
    }

    fn put(&mut self, src: &str, data_url: String) {
        if self.entries.len() >= self.limit && !self.entries.contains_key(src) {
            tracing::debug!(limit = self.limit, "placeholder cache full, clearing");
            self.entries.clear();
        }
        self.entries.insert(src.to_string(), data_url);
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// `/api/blur` のレスポンス
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlurResponse {
    #[serde(rename = "blurDataURL")]
    pub blur_data_url: String,
}

/// `/api/blur` のエラーレスポンス
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlurError {
    pub error: String,
}

/// 取得URL: `/api/blur?src=<urlencoded>`
pub fn blur_request_path(src: &str) -> String {
    format!("{}?src={}", BLUR_ENDPOINT, urlencoding::encode(src))
}

/// 取得中リクエストの識別子
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderTicket {
    pub src: String,
    generation: u64,
}

/// 画像ごとのプレースホルダー取得状態
///
/// 画像が切り替わった後に届いた古い結果は新しい画像に適用しない。
#[derive(Debug, Clone, Default)]
pub struct PlaceholderLoader {
    generation: u64,
    current: Option<String>,
    fetched: Option<(String, String)>,
}

impl PlaceholderLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// 画像切り替え。取得が必要なら ticket を返す
    ///
    /// 以前の ticket はこの時点で無効になる（呼び出し側は fetch を abort する）。
    pub fn begin(&mut self, src: &str, cache: &dyn PlaceholderCache) -> Option<PlaceholderTicket> {
        self.generation += 1;
        self.current = Some(src.to_string());

        if src.is_empty() || cache.contains(src) {
            return None;
        }
        Some(PlaceholderTicket {
            src: src.to_string(),
            generation: self.generation,
        })
    }

    /// 取得結果を反映。失敗は「プレースホルダーなし」
    pub fn complete(
        &mut self,
        ticket: &PlaceholderTicket,
        result: Result<BlurResponse, String>,
        cache: &mut dyn PlaceholderCache,
    ) -> Option<String> {
        if ticket.generation != self.generation {
            tracing::debug!(src = %ticket.src, "stale placeholder discarded");
            return None;
        }

        let data_url = match result {
            Ok(body) if !body.blur_data_url.is_empty() => body.blur_data_url,
            Ok(_) => return None,
            Err(e) => {
                tracing::warn!(src = %ticket.src, error = %e, "placeholder fetch failed");
                return None;
            }
        };

        cache.put(&ticket.src, data_url.clone());
        self.fetched = Some((ticket.src.clone(), data_url.clone()));
        Some(data_url)
    }

    /// 表示に使う data URL
    ///
    /// 明示指定 → キャッシュ → この画像向けの取得結果 → 既定値 の順。
    pub fn resolve(&self, src: &str, explicit: Option<&str>, cache: &dyn PlaceholderCache) -> String {
        if let Some(explicit) = explicit {
            return explicit.to_string();
        }
        if let Some(cached) = cache.get(src) {
            return cached;
        }
        match &self.fetched {
            Some((fetched_src, data_url)) if fetched_src == src => data_url.clone(),
            _ => DEFAULT_BLUR_DATA_URL.to_string(),
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }
}
