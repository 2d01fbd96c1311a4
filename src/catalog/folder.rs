//! フォルダ名からの作品メタデータ抽出
//!
//! メディアCDNのフォルダ命名規則 `{id}_{TITLE}_{year}` を解釈する。
//! タイトル内の `_` は区切りと区別できないため、先頭の数字をID、
//! 末尾の4桁をyearとみなし、その間をすべてタイトルとする。

use folio_gallery_common::ItemId;
use regex::Regex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderMeta {
    pub id: ItemId,
    pub title: String,
    pub year: Option<String>,
}

/// フォルダ名を解析。IDがなければ None
pub fn parse_folder_name(name: &str) -> Option<FolderMeta> {
    lazy_static::lazy_static! {
        // タイトルは最短一致、末尾の年は任意
        static ref FOLDER_RE: Regex = Regex::new(r"^(\d+)_(.+?)(?:_((?:19|20)\d{2}))?$").unwrap();
    }

    let caps = FOLDER_RE.captures(name.trim())?;
    let id: i64 = caps.get(1)?.as_str().parse().ok()?;
    let title = caps
        .get(2)?
        .as_str()
        .split('_')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase();
    let year = caps.get(3).map(|m| m.as_str().to_string());

    Some(FolderMeta {
        id: ItemId(id),
        title,
        year,
    })
}

/// タグ文字列（改行またはカンマ区切り）をカテゴリに
pub fn parse_tags(content: &str) -> Vec<String> {
    content
        .split(|c| c == '\n' || c == ',')
        .map(|t| t.trim())
        .filter(|t| !t.is_empty() && !t.starts_with('#'))
        .map(|t| t.to_uppercase())
        .collect()
}

/// EXIF日時 "2021-06-04 10:22:01" から年を取り出す
pub fn year_from_exif_date(date: &str) -> Option<String> {
    lazy_static::lazy_static! {
        static ref YEAR_RE: Regex = Regex::new(r"^((?:19|20)\d{2})[-:]").unwrap();
    }

    YEAR_RE
        .captures(date.trim())
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}
