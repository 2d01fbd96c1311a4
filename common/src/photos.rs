//! 写真ストリーム（PHOTOSビュー）
//!
//! フィルタ後の作品の画像を [カバー, ...ギャラリー] の順に平坦化したもの。

use crate::types::Item;
use serde::{Deserialize, Serialize};

pub const INITIAL_PHOTOS_TO_RENDER: usize = 96;
pub const PHOTOS_PAGE_SIZE: usize = 96;

/// グリッドの表示モード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Projects,
    Photos,
}

/// 作品列を写真列に平坦化（空の参照は除外）
pub fn photo_stream(items: &[&Item]) -> Vec<String> {
    items
        .iter()
        .flat_map(|item| item.images())
        .filter(|src| !src.is_empty())
        .collect()
}

/// 写真グリッドの段階表示
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoPager {
    visible: usize,
    page_size: usize,
    reset_key: String,
}

impl PhotoPager {
    pub fn new(page_size: usize) -> Self {
        Self {
            visible: INITIAL_PHOTOS_TO_RENDER,
            page_size: page_size.max(1),
            reset_key: String::new(),
        }
    }

    /// フィルタか写真数が変わったら先頭ページに戻す
    pub fn sync<'a>(&mut self, selected: impl IntoIterator<Item = &'a str>, total: usize) {
        let key = format!("{}|{}", selected.into_iter().collect::<Vec<_>>().join("|"), total);
        if key != self.reset_key {
            self.reset_key = key;
            self.visible = INITIAL_PHOTOS_TO_RENDER;
        }
    }

    pub fn visible(&self, total: usize) -> usize {
        self.visible.min(total)
    }

    pub fn has_more(&self, total: usize) -> bool {
        total > self.visible
    }

    pub fn load_more(&mut self, total: usize) {
        self.visible = total.min(self.visible + self.page_size);
    }

    /// 「LOAD MORE [次の表示数/総数]」
    pub fn label(&self, total: usize) -> String {
        format!(
            "LOAD MORE [{}/{}]",
            total.min(self.visible + self.page_size),
            total
        )
    }
}

impl Default for PhotoPager {
    fn default() -> Self {
        Self::new(PHOTOS_PAGE_SIZE)
    }
}
