//! カテゴリ件数の集計
//!
//! ラベルの集合（ユニバース）はカタログ読み込み時に一度だけ決める。
//! フィルタ変更のたびに件数だけを数え直し、ラベルの増減は起きない。

use crate::filter::apply_filter;
use crate::types::{ActiveFilter, Catalog, Item};
use serde::Serialize;
use std::collections::HashMap;

/// カテゴリ件数（フィルタチップ1個分）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
    pub selected: bool,
}

impl CategoryCount {
    /// 件数があるか、既に選択中なら押せる
    pub fn is_selectable(&self) -> bool {
        self.count > 0 || self.selected
    }
}

/// ラベルユニバースを計算
///
/// 未フィルタ件数の降順。同数は初出順。
pub fn label_universe(catalog: &Catalog) -> Vec<String> {
    let items: Vec<&Item> = catalog.iter().collect();
    let counts = count_labels(&items);

    let mut order: Vec<String> = Vec::new();
    for item in catalog.iter() {
        for label in &item.categories {
            if !order.iter().any(|l| l == label) {
                order.push(label.clone());
            }
        }
    }

    // sort_by は安定ソートなので同数の初出順が保たれる
    order.sort_by(|a, b| counts[b].cmp(&counts[a]));
    order
}

/// フィルタ後の件数でチップ一覧を作る
pub fn compute_category_counts(
    catalog: &Catalog,
    universe: &[String],
    active: &ActiveFilter,
) -> Vec<CategoryCount> {
    let filtered = apply_filter(catalog, active);
    let counts = count_labels(&filtered);

    let mut entries: Vec<CategoryCount> = universe
        .iter()
        .map(|label| CategoryCount {
            label: label.clone(),
            count: counts.get(label).copied().unwrap_or(0),
            selected: active.contains(label),
        })
        .collect();

    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries
}

/// 現在のフィルタ下でのラベル件数
pub fn count_for(catalog: &Catalog, active: &ActiveFilter, label: &str) -> usize {
    apply_filter(catalog, active)
        .iter()
        .flat_map(|item| item.categories.iter())
        .filter(|l| *l == label)
        .count()
}

/// 出現回数で数える（1作品に同じラベルが2つあれば2）
fn count_labels(items: &[&Item]) -> HashMap<String, usize> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for label in items.iter().flat_map(|item| item.categories.iter()) {
        *counts.entry(label.clone()).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ItemId;

    fn item(id: i64, labels: &[&str]) -> Item {
        Item {
            id: ItemId(id),
            categories: labels.iter().map(|l| l.to_string()).collect(),
            ..Default::default()
        }
    }

    /// BW×2, BW+LANDSCAPE, COLOUR の3件
    fn scenario_catalog() -> Catalog {
        Catalog::from_items(vec![
            item(1, &["BW"]),
            item(2, &["BW", "LANDSCAPE"]),
            item(3, &["COLOUR"]),
        ])
    }

    fn pairs(counts: &[CategoryCount]) -> Vec<(&str, usize)> {
        counts.iter().map(|c| (c.label.as_str(), c.count)).collect()
    }

    #[test]
    fn test_universe_order_by_count_then_first_seen() {
        let catalog = scenario_catalog();
        assert_eq!(label_universe(&catalog), vec!["BW", "LANDSCAPE", "COLOUR"]);
    }

    #[test]
    fn test_counts_without_filter() {
        let catalog = scenario_catalog();
        let universe = label_universe(&catalog);
        let counts = compute_category_counts(&catalog, &universe, &ActiveFilter::new());
        assert_eq!(pairs(&counts), vec![("BW", 2), ("LANDSCAPE", 1), ("COLOUR", 1)]);
        assert!(counts.iter().all(|c| c.is_selectable()));
    }

    #[test]
    fn test_counts_after_selecting_bw() {
        let catalog = scenario_catalog();
        let universe = label_universe(&catalog);
        let active: ActiveFilter = ["BW"].into_iter().collect();
        let counts = compute_category_counts(&catalog, &universe, &active);

        assert_eq!(pairs(&counts), vec![("BW", 2), ("LANDSCAPE", 1), ("COLOUR", 0)]);
        assert!(counts[0].selected);
        assert!(!counts[2].is_selectable());
    }

    #[test]
    fn test_labels_never_disappear() {
        let catalog = scenario_catalog();
        let universe = label_universe(&catalog);
        let active: ActiveFilter = ["COLOUR"].into_iter().collect();
        let counts = compute_category_counts(&catalog, &universe, &active);
        assert_eq!(counts.len(), universe.len());
    }

    #[test]
    fn test_ties_keep_universe_order() {
        let catalog = Catalog::from_items(vec![
            item(1, &["B", "A"]),
            item(2, &["C"]),
            item(3, &["C", "A"]),
        ]);
        let universe = label_universe(&catalog);
        assert_eq!(universe, vec!["A", "C", "B"]);

        // 全件1件ずつになる条件でも順序は揺れない
        let active: ActiveFilter = ["A"].into_iter().collect();
        let counts = compute_category_counts(&catalog, &universe, &active);
        assert_eq!(pairs(&counts), vec![("A", 2), ("C", 1), ("B", 1)]);
    }

    #[test]
    fn test_selected_label_with_zero_count_is_selectable() {
        let catalog = scenario_catalog();
        let universe = label_universe(&catalog);
        // ディープリンク等で作られた空になるフィルタ
        let active: ActiveFilter = ["COLOUR", "BW"].into_iter().collect();
        let counts = compute_category_counts(&catalog, &universe, &active);

        let colour = counts.iter().find(|c| c.label == "COLOUR").expect("COLOURがない");
        assert_eq!(colour.count, 0);
        assert!(colour.is_selectable());
    }

    #[test]
    fn test_count_sum_matches_label_occurrences() {
        let catalog = Catalog::from_items(vec![
            item(1, &["BW", "STREET"]),
            item(2, &["BW", "LANDSCAPE"]),
            item(3, &["COLOUR", "STREET"]),
            item(4, &["BW", "STREET", "NIGHT"]),
            item(5, &["BW", "BW", "NIGHT"]),
        ]);
        let universe = label_universe(&catalog);

        let filters: Vec<ActiveFilter> = vec![
            ActiveFilter::new(),
            ["BW"].into_iter().collect(),
            ["STREET"].into_iter().collect(),
            ["BW", "STREET"].into_iter().collect(),
        ];

        for active in filters {
            let filtered = apply_filter(&catalog, &active);
            let occurrences: usize = filtered.iter().map(|i| i.categories.len()).sum();
            let total: usize = compute_category_counts(&catalog, &universe, &active)
                .iter()
                .map(|c| c.count)
                .sum();
            assert_eq!(total, occurrences);
        }
    }

    #[test]
    fn test_duplicate_label_counts_each_occurrence() {
        let catalog = Catalog::from_items(vec![item(1, &["BW", "BW"]), item(2, &["COLOUR"])]);
        let universe = label_universe(&catalog);
        let counts = compute_category_counts(&catalog, &universe, &ActiveFilter::new());
        assert_eq!(pairs(&counts), vec![("BW", 2), ("COLOUR", 1)]);

        let active: ActiveFilter = ["BW"].into_iter().collect();
        assert_eq!(count_for(&catalog, &active, "BW"), 2);
    }

    #[test]
    fn test_count_for() {
        let catalog = scenario_catalog();
        let active: ActiveFilter = ["BW"].into_iter().collect();
        assert_eq!(count_for(&catalog, &active, "LANDSCAPE"), 1);
        assert_eq!(count_for(&catalog, &active, "COLOUR"), 0);
    }
}
