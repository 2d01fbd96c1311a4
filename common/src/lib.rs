//! Folio Gallery Common Library
//!
//! CLI・サーバーとWeb(WASM)で共有されるギャラリーの状態エンジン。
//! I/Oを持たず、DOMイベントやタイマーはすべて呼び出し側から渡す。

pub mod types;
pub mod error;
pub mod filter;
pub mod category;
pub mod photos;
pub mod deep_link;
pub mod viewer;
pub mod layout;
pub mod progress;
pub mod placeholder;
pub mod shop;
pub mod controller;

pub use types::{ActiveFilter, Catalog, Item, ItemId};
pub use error::{Error, Result};
pub use filter::apply_filter;
pub use category::{compute_category_counts, label_universe, CategoryCount};
pub use photos::{photo_stream, PhotoPager, ViewMode};
pub use deep_link::{read_deep_link, write_deep_link};
pub use viewer::{Key, KeyOutcome, ModalSession, SessionMode, SwipeTracker, WheelStepper};
pub use progress::LoadProgress;
pub use placeholder::{BoundedPlaceholderCache, PlaceholderCache, PlaceholderLoader};
pub use shop::BuyAffordance;
pub use controller::{GalleryController, PendingReconcile};
