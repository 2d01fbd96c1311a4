//! ギャラリーの型定義
//!
//! CLI・サーバー・Web(WASM)で共有される型:
//! - Item: 作品（プロジェクト）1件
//! - Catalog: 1ページビュー中は不変の作品一覧
//! - ActiveFilter: 選択中のカテゴリ集合

use serde::{Deserialize, Serialize};
use std::fmt;

/// 作品ID
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub i64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 作品（写真プリント商品）
///
/// `image_url` は常に存在する。空文字は「画像なし」を表す。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,

    #[serde(default, alias = "name")]
    pub title: String,

    #[serde(default)]
    pub categories: Vec<String>,

    #[serde(default)]
    pub year: String,

    #[serde(default, alias = "image_url")]
    pub image_url: String,

    #[serde(default, alias = "gallery_images")]
    pub gallery_images: Vec<String>,

    #[serde(default, alias = "description", skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// 決済プロバイダ側の価格ID
    #[serde(default, alias = "stripe_price_id", skip_serializing_if = "Option::is_none")]
    pub price_ref: Option<String>,

    #[serde(default, alias = "stock_level")]
    pub stock_level: i64,

    /// 価格（最小通貨単位）
    #[serde(default, alias = "price_hw")]
    pub price_minor: i64,
}

impl Item {
    /// モーダルで閲覧する画像列: [カバー, ...ギャラリー]
    pub fn images(&self) -> Vec<String> {
        std::iter::once(self.image_url.clone())
            .chain(self.gallery_images.iter().cloned())
            .collect()
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.categories.iter().any(|c| c == label)
    }

    /// タイトル・カテゴリを大文字に正規化（重複はそのまま残す）
    pub fn normalized(mut self) -> Self {
        self.title = self.title.to_uppercase();
        self.categories = self.categories.iter().map(|c| normalize_label(c)).collect();
        self
    }

    /// 空白のみの説明文は説明なしとして扱う
    pub fn description(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.trim().is_empty())
    }
}

/// カテゴリラベルの正規化
pub fn normalize_label(label: &str) -> String {
    label.trim().to_uppercase()
}

/// 作品カタログ
///
/// ページビュー単位で一度だけ読み込まれ、以後は変更されない。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    items: Vec<Item>,
}

impl Catalog {
    pub fn from_items(items: Vec<Item>) -> Self {
        Self {
            items: items.into_iter().map(Item::normalized).collect(),
        }
    }

    /// JSON配列から読み込み
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let items: Vec<Item> = serde_json::from_str(json)?;
        Ok(Self::from_items(items))
    }

    /// JSONファイルから読み込み（非WASM環境のみ）
    #[cfg(not(feature = "wasm"))]
    pub fn from_file(path: &std::path::Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn find(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let items = Vec::<Item>::deserialize(deserializer)?;
        Ok(Self::from_items(items))
    }
}

/// 選択中のカテゴリ集合
///
/// 空 = フィルタなし。順序は表示用で、意味を持たない。
#[derive(Debug, Clone, Default)]
pub struct ActiveFilter {
    labels: Vec<String>,
}

impl ActiveFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// 追加。既にあれば false
    pub fn insert(&mut self, label: impl Into<String>) -> bool {
        let label = label.into();
        if self.contains(&label) {
            return false;
        }
        self.labels.push(label);
        true
    }

    pub fn remove(&mut self, label: &str) -> bool {
        let before = self.labels.len();
        self.labels.retain(|l| l != label);
        before != self.labels.len()
    }

    pub fn clear(&mut self) {
        self.labels.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

impl PartialEq for ActiveFilter {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|l| other.contains(l))
    }
}

impl Eq for ActiveFilter {}

impl<S: Into<String>> FromIterator<S> for ActiveFilter {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut filter = Self::new();
        for label in iter {
            filter.insert(label);
        }
        filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_images_cover_first() {
        let item = Item {
            id: ItemId(1),
            image_url: "cover.jpg".to_string(),
            gallery_images: vec!["a.jpg".to_string(), "b.jpg".to_string()],
            ..Default::default()
        };
        assert_eq!(item.images(), vec!["cover.jpg", "a.jpg", "b.jpg"]);
    }

    #[test]
    fn test_item_images_empty_cover_kept() {
        let item = Item::default();
        assert_eq!(item.images(), vec![""]);
    }

    #[test]
    fn test_item_deserialize_camel_case() {
        let json = r#"{
            "id": 7,
            "title": "harbour",
            "categories": ["bw", "Landscape"],
            "year": "2021",
            "imageUrl": "https://cdn/7.jpg",
            "galleryImages": ["https://cdn/7-1.jpg"]
        }"#;

        let item: Item = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(item.id, ItemId(7));
        assert_eq!(item.image_url, "https://cdn/7.jpg");
        assert_eq!(item.gallery_images.len(), 1);
        assert_eq!(item.text, None);
        assert_eq!(item.stock_level, 0);
    }

    #[test]
    fn test_item_deserialize_database_row() {
        // DBの行形式（snake_case）も受け付ける
        let json = r#"{
            "id": 3,
            "name": "Pier",
            "description": "Long exposure",
            "image_url": "pier.jpg",
            "price_hw": 4500,
            "stock_level": 2,
            "stripe_price_id": "price_123"
        }"#;

        let item: Item = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(item.title, "Pier");
        assert_eq!(item.description(), Some("Long exposure"));
        assert_eq!(item.price_minor, 4500);
        assert_eq!(item.stock_level, 2);
        assert_eq!(item.price_ref.as_deref(), Some("price_123"));
    }

    #[test]
    fn test_catalog_normalizes_labels() {
        let catalog = Catalog::from_json(
            r#"[{"id": 1, "title": "dunes", "categories": ["bw", " colour ", "bw"]}]"#,
        )
        .expect("カタログ読み込み失敗");

        let item = catalog.find(ItemId(1)).expect("作品が見つからない");
        assert_eq!(item.title, "DUNES");
        assert_eq!(item.categories, vec!["BW", "COLOUR", "BW"]);
    }

    #[test]
    fn test_catalog_find_missing() {
        let catalog = Catalog::from_items(vec![Item { id: ItemId(1), ..Default::default() }]);
        assert!(catalog.find(ItemId(7)).is_none());
    }

    #[test]
    fn test_description_blank_is_none() {
        let item = Item { text: Some("  \n".to_string()), ..Default::default() };
        assert_eq!(item.description(), None);
    }

    #[test]
    fn test_active_filter_set_semantics() {
        let mut filter = ActiveFilter::new();
        assert!(filter.insert("BW"));
        assert!(!filter.insert("BW"));
        assert!(filter.insert("LANDSCAPE"));
        assert_eq!(filter.len(), 2);

        let reordered: ActiveFilter = ["LANDSCAPE", "BW"].into_iter().collect();
        assert_eq!(filter, reordered);

        assert!(filter.remove("BW"));
        assert!(!filter.remove("BW"));
        assert!(filter.contains("LANDSCAPE"));
    }
}
