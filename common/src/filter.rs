//! カテゴリフィルタ
//!
//! 選択カテゴリすべてを持つ作品だけを残す（AND条件）。

use crate::types::{ActiveFilter, Catalog, Item};

/// フィルタ適用
///
/// フィルタが空ならカタログ全件をカタログ順で返す。
pub fn apply_filter<'a>(catalog: &'a Catalog, active: &ActiveFilter) -> Vec<&'a Item> {
    if active.is_empty() {
        return catalog.iter().collect();
    }

    catalog
        .iter()
        .filter(|item| matches_all(item, active))
        .collect()
}

/// 作品が選択カテゴリをすべて持つか
pub fn matches_all(item: &Item, active: &ActiveFilter) -> bool {
    active.iter().all(|label| item.has_label(label))
}
