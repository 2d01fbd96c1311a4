use crate::error::{FolioError, Result};
use folio_gallery_common::deep_link::DEFAULT_PARAM;
use folio_gallery_common::photos::PHOTOS_PAGE_SIZE;
use folio_gallery_common::placeholder::DEFAULT_CACHE_LIMIT;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// ディープリンクのクエリパラメータ名
    pub deep_link_param: String,
    /// プレースホルダーサーバーが参照する画像ルート
    pub media_root: Option<PathBuf>,
    pub port: u16,
    /// プレースホルダー画像の幅(px)
    pub placeholder_width: u32,
    pub placeholder_cache_limit: usize,
    pub photos_page_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            deep_link_param: DEFAULT_PARAM.into(),
            media_root: None,
            port: 3080,
            placeholder_width: 32,
            placeholder_cache_limit: DEFAULT_CACHE_LIMIT,
            photos_page_size: PHOTOS_PAGE_SIZE,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| FolioError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("folio-gallery").join("config.json"))
    }

    /// 画像ルート（環境変数を優先）
    pub fn media_root(&self) -> Result<PathBuf> {
        if let Ok(root) = std::env::var("FOLIO_MEDIA_ROOT") {
            return Ok(PathBuf::from(root));
        }

        self.media_root.clone().ok_or_else(|| {
            FolioError::Config(
                "画像ルートが未設定です。`folio config --set-media-root DIR` で設定してください".into(),
            )
        })
    }

    /// 待受ポート（環境変数を優先）
    pub fn port(&self) -> u16 {
        match std::env::var("FOLIO_PORT") {
            Ok(value) => value.parse().unwrap_or_else(|e| {
                tracing::warn!("Invalid FOLIO_PORT value {value}: {e}, using {}", self.port);
                self.port
            }),
            Err(_) => self.port,
        }
    }

    pub fn set_media_root(&mut self, root: PathBuf) -> Result<()> {
        self.media_root = Some(root);
        self.save()
    }

    pub fn set_port(&mut self, port: u16) -> Result<()> {
        self.port = port;
        self.save()
    }
}
