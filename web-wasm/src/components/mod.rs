//! UIコンポーネント

pub mod blur_image;
pub mod buy_button;
pub mod category_filter;
pub mod gallery;
pub mod header;
pub mod photo_gallery;
pub mod photo_modal;
pub mod progress_bar;
pub mod project_grid;
