//! エラー型定義

use thiserror::Error;

/// 共通エラー型
///
/// ギャラリーの状態遷移そのものはエラーを返さない（範囲外・不正値は丸めるか無視する）。
/// ここに来るのはカタログ読み込みなど外縁の失敗のみ。
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Catalog error: {0}")]
    Catalog(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
