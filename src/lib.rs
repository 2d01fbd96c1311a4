//! Folio Gallery
//!
//! ギャラリーエンジン（`folio-gallery-common`）の運用側:
//! カタログ生成、ぼかしプレースホルダー生成とそのHTTPサービス、設定。

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod placeholder;
pub mod server;
