//! ぼかしプレースホルダー生成
//!
//! 画像を小さく縮小してぼかし、低品質JPEGの data URL にする。
//! サーバーとCLIの両方から使う。

use crate::error::{FolioError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use folio_gallery_common::{BoundedPlaceholderCache, PlaceholderCache};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;

/// プレースホルダー幅の既定値(px)
pub const DEFAULT_WIDTH: u32 = 32;

/// JPEG品質（プレースホルダーなので最低限）
const JPEG_QUALITY: u8 = 10;

/// ぼかし半径（縮小後の画素単位）
const BLUR_SIGMA: f32 = 2.0;

/// 画像ファイルからぼかしプレースホルダーの data URL を作る
///
/// 縦横比は維持し、幅を `width` に合わせる。
pub fn generate_blur_data_url(path: &Path, width: u32) -> Result<String> {
    let img = image::open(path)
        .map_err(|e| FolioError::ImageLoad(format!("{}: {}", path.display(), e)))?;
    encode_placeholder(&img, width)
}

/// デコード済み画像から data URL を作る
pub fn encode_placeholder(img: &DynamicImage, width: u32) -> Result<String> {
    let width = width.max(1);
    let (orig_w, orig_h) = (img.width().max(1), img.height().max(1));
    let height = ((orig_h as f64 * width as f64 / orig_w as f64).round() as u32).max(1);

    let small = img.resize_exact(width, height, FilterType::Triangle);
    let blurred = small.blur(BLUR_SIGMA);
    let rgb = DynamicImage::ImageRgb8(blurred.to_rgb8());

    let mut buf = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY);
    rgb.write_with_encoder(encoder)
        .map_err(|e| FolioError::ImageEncode(e.to_string()))?;

    Ok(format!("data:image/jpeg;base64,{}", STANDARD.encode(&buf)))
}

/// メディアルート配下の画像に対するプレースホルダー提供
///
/// 生成結果は上限付きキャッシュで共有する。
pub struct PlaceholderService {
    media_root: PathBuf,
    width: u32,
    cache: Mutex<BoundedPlaceholderCache>,
}

impl PlaceholderService {
    pub fn new(media_root: &Path, width: u32, cache_limit: usize) -> Result<Self> {
        let media_root = media_root
            .canonicalize()
            .map_err(|_| FolioError::FolderNotFound(media_root.display().to_string()))?;
        if !media_root.is_dir() {
            return Err(FolioError::FolderNotFound(media_root.display().to_string()));
        }

        Ok(Self {
            media_root,
            width,
            cache: Mutex::new(BoundedPlaceholderCache::new(cache_limit)),
        })
    }

    pub fn media_root(&self) -> &Path {
        &self.media_root
    }

    /// 画像参照をメディアルート内の実ファイルに解決
    ///
    /// CDNのURLはパス部分だけを使う。ルート外を指す参照は拒否する。
    pub fn resolve(&self, src: &str) -> Result<PathBuf> {
        let rel = reference_path(src);
        let rel_path = Path::new(rel);

        if rel.is_empty()
            || rel_path
                .components()
                .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(FolioError::PathOutsideRoot(src.to_string()));
        }

        let full = self
            .media_root
            .join(rel_path)
            .canonicalize()
            .map_err(|_| FolioError::FileNotFound(src.to_string()))?;

        // シンボリックリンク経由の脱出も拒否
        if !full.starts_with(&self.media_root) {
            return Err(FolioError::PathOutsideRoot(src.to_string()));
        }
        Ok(full)
    }

    /// プレースホルダーを取得（キャッシュ優先）
    pub fn blur_data_url(&self, src: &str) -> Result<String> {
        if let Some(hit) = self.lock_cache()?.get(src) {
            tracing::debug!(src, "placeholder cache hit");
            return Ok(hit);
        }

        let path = self.resolve(src)?;
        let data_url = generate_blur_data_url(&path, self.width)?;

        self.lock_cache()?.put(src, data_url.clone());
        Ok(data_url)
    }

    /// キャッシュ済み件数
    pub fn cached(&self) -> usize {
        self.lock_cache().map(|c| c.len()).unwrap_or(0)
    }

    fn lock_cache(&self) -> Result<std::sync::MutexGuard<'_, BoundedPlaceholderCache>> {
        self.cache
            .lock()
            .map_err(|_| FolioError::Server("プレースホルダーキャッシュのロックに失敗".into()))
    }
}

/// `https://cdn.example/a/b.jpg` → `a/b.jpg`、`/a/b.jpg` → `a/b.jpg`
fn reference_path(src: &str) -> &str {
    let src = src.trim();
    let path = match src.find("://") {
        Some(scheme_end) => {
            let rest = &src[scheme_end + 3..];
            rest.find('/').map(|i| &rest[i..]).unwrap_or("")
        }
        None => src,
    };
    let path = path.split(['?', '#']).next().unwrap_or("");
    path.trim_start_matches('/')
}
