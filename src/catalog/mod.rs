//! カタログ提供元
//!
//! - JSONファイル（DBエクスポート形式）
//! - フォルダツリー（メディアCDNのフォルダ構成をローカルで再現したもの）

mod exif;
pub mod folder;

use crate::error::{FolioError, Result};
use chrono::Datelike;
use folio_gallery_common::{Catalog, Item};
use std::collections::HashSet;
use std::path::Path;
use walkdir::WalkDir;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "JPG", "JPEG", "PNG", "WEBP"];
const TAGS_FILE: &str = "tags.txt";
const DESCRIPTION_FILE: &str = "description.txt";
const COVER_STEM: &str = "cover";

/// フォルダならスキャン、ファイルならJSONとして読み込み
pub fn load(path: &Path) -> Result<Catalog> {
    if path.is_dir() {
        scan_folder(path)
    } else {
        load_json(path)
    }
}

/// JSONファイルから読み込み
pub fn load_json(path: &Path) -> Result<Catalog> {
    if !path.exists() {
        return Err(FolioError::FileNotFound(path.display().to_string()));
    }
    Ok(Catalog::from_file(path)?)
}

/// JSONファイルに保存
pub fn save_json(catalog: &Catalog, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(catalog)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// フォルダツリーからカタログを作る
///
/// 直下のフォルダ1つが作品1件。命名規則に合わないフォルダは読み飛ばす。
pub fn scan_folder(root: &Path) -> Result<Catalog> {
    if !root.is_dir() {
        return Err(FolioError::FolderNotFound(root.display().to_string()));
    }

    let mut items = Vec::new();

    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_dir() {
            continue;
        }

        let dir_name = entry.file_name().to_string_lossy().to_string();
        let Some(meta) = folder::parse_folder_name(&dir_name) else {
            tracing::warn!(folder = %dir_name, "folder name does not match {{id}}_{{title}}_{{year}}, skipped");
            continue;
        };

        let images = list_images(entry.path(), root);
        let (cover, gallery) = split_cover(images);

        let categories = read_optional(&entry.path().join(TAGS_FILE))
            .map(|content| folder::parse_tags(&content))
            .unwrap_or_default();
        let text = read_optional(&entry.path().join(DESCRIPTION_FILE))
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        let year = meta
            .year
            .clone()
            .or_else(|| {
                cover
                    .as_ref()
                    .and_then(|c| exif::extract_date(&root.join(c)).ok())
                    .and_then(|date| folder::year_from_exif_date(&date))
            })
            .unwrap_or_else(|| chrono::Local::now().year().to_string());

        tracing::debug!(id = %meta.id, title = %meta.title, images = gallery.len() + 1, "scanned project folder");

        items.push(Item {
            id: meta.id,
            title: meta.title,
            categories,
            year,
            image_url: cover.unwrap_or_default(),
            gallery_images: gallery,
            text,
            ..Default::default()
        });
    }

    items.sort_by_key(|item| item.id);

    let mut seen = HashSet::new();
    for item in &items {
        if !seen.insert(item.id) {
            return Err(FolioError::InvalidCatalog(format!("作品IDが重複しています: {}", item.id)));
        }
    }

    Ok(Catalog::from_items(items))
}

/// フォルダ直下の画像をファイル名順に（ルートからの相対パス、`/`区切り）
fn list_images(dir: &Path, root: &Path) -> Vec<String> {
    let mut images: Vec<String> = WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_string_lossy();
            !name.starts_with('.') && is_image(e.path())
        })
        .filter_map(|e| {
            e.path().strip_prefix(root).ok().map(|rel| {
                rel.components()
                    .map(|c| c.as_os_str().to_string_lossy().to_string())
                    .collect::<Vec<_>>()
                    .join("/")
            })
        })
        .collect();

    images.sort();
    images
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .map(|ext| IMAGE_EXTENSIONS.iter().any(|&e| e == ext.to_string_lossy()))
        .unwrap_or(false)
}

/// `cover.*` があればカバー、なければ先頭の画像
fn split_cover(mut images: Vec<String>) -> (Option<String>, Vec<String>) {
    let cover_pos = images.iter().position(|img| {
        Path::new(img)
            .file_stem()
            .map(|s| s.to_string_lossy().eq_ignore_ascii_case(COVER_STEM))
            .unwrap_or(false)
    });

    match cover_pos {
        Some(pos) => {
            let cover = images.remove(pos);
            (Some(cover), images)
        }
        None if images.is_empty() => (None, images),
        None => {
            let cover = images.remove(0);
            (Some(cover), images)
        }
    }
}

fn read_optional(path: &Path) -> Option<String> {
    std::fs::read_to_string(path).ok()
}
