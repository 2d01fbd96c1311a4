use thiserror::Error;

#[derive(Error, Debug)]
pub enum FolioError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("画像エンコードエラー: {0}")]
    ImageEncode(String),

    #[error("カタログが不正: {0}")]
    InvalidCatalog(String),

    #[error("メディアルート外のパスは参照できません: {0}")]
    PathOutsideRoot(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("サーバーエラー: {0}")]
    Server(String),
}

impl From<folio_gallery_common::Error> for FolioError {
    fn from(err: folio_gallery_common::Error) -> Self {
        match err {
            folio_gallery_common::Error::Io(e) => FolioError::Io(e),
            folio_gallery_common::Error::Json(e) => FolioError::JsonParse(e),
            folio_gallery_common::Error::Config(msg) => FolioError::Config(msg),
            folio_gallery_common::Error::Catalog(msg) => FolioError::InvalidCatalog(msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, FolioError>;
