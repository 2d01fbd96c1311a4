//! ギャラリー全体の流れのテスト
//!
//! フォルダから作ったカタログでフィルタ・ディープリンク・モーダルを通しで検証

use folio_gallery::catalog;
use folio_gallery_common::{
    photo_stream, write_deep_link, GalleryController, ItemId, Key, KeyOutcome, PhotoPager, ViewMode,
};
use std::path::Path;
use tempfile::tempdir;

fn project(root: &Path, name: &str, images: &[&str], tags: &str) {
    let dir = root.join(name);
    std::fs::create_dir_all(&dir).unwrap();
    for img in images {
        image::RgbImage::new(8, 8).save(dir.join(img)).expect("テスト画像の保存失敗");
    }
    std::fs::write(dir.join("tags.txt"), tags).unwrap();
}

fn controller(root: &Path) -> GalleryController {
    project(root, "1_dunes_2019", &["cover.jpg", "01.jpg", "02.jpg"], "bw\nlandscape");
    project(root, "2_market_2020", &["cover.jpg"], "colour\nstreet");
    project(root, "3_coast_2021", &["cover.jpg", "01.jpg"], "bw\ncoast");
    GalleryController::new(catalog::scan_folder(root).expect("スキャン失敗"))
}

#[test]
fn test_filter_counts_follow_selection() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut gallery = controller(dir.path());

    let counts = gallery.category_counts();
    assert_eq!(counts[0].label, "BW");
    assert_eq!(counts[0].count, 2);

    assert!(gallery.toggle_category("bw"));
    let ids: Vec<ItemId> = gallery.filtered().iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![ItemId(1), ItemId(3)]);

    // BW選択中に STREET は0件なので選べない
    assert!(!gallery.toggle_category("street"));
    assert_eq!(gallery.active_filter().len(), 1);

    let street = gallery
        .category_counts()
        .into_iter()
        .find(|c| c.label == "STREET")
        .expect("STREETが消えた");
    assert_eq!(street.count, 0);
    assert!(!street.is_selectable());
}

#[test]
fn test_deep_link_open_navigate_close() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut gallery = controller(dir.path());
    gallery.toggle_category("street");

    let url = "https://folio.example/work?view=grid&project=1#top";
    let pending = gallery.begin_reconcile_url(url).expect("反映が予約されない");
    assert!(gallery.commit_reconcile(pending));

    // ディープリンクで開くとフィルタは解除される
    assert!(gallery.active_filter().is_empty());
    assert!(!gallery.is_grid_visible());

    let session = gallery.modal_mut().expect("モーダルが開いていない");
    assert_eq!(session.len(), 3);
    assert_eq!(session.handle_key(Key::ArrowRight), KeyOutcome::Navigated);
    assert_eq!(session.current(), "1_dunes_2019/01.jpg");
    assert_eq!(session.handle_key(Key::Escape), KeyOutcome::Close);

    let stripped = gallery.close_modal(url).expect("URLが書き換えられない");
    assert_eq!(stripped, "https://folio.example/work?view=grid#top");
    assert!(gallery.is_grid_visible());

    // 同じURLが再び来たら開き直せる
    assert!(gallery.begin_reconcile_url(&stripped).is_none());
    assert!(gallery.reconcile_now(url));
}

#[test]
fn test_superseded_reconcile_is_dropped() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut gallery = controller(dir.path());

    let first = gallery
        .begin_reconcile(Some("1"))
        .expect("反映が予約されない");
    let second = gallery
        .begin_reconcile(Some("3"))
        .expect("反映が予約されない");

    assert!(!gallery.commit_reconcile(first));
    assert!(gallery.commit_reconcile(second));
    assert_eq!(gallery.modal().and_then(|m| m.item_id()), Some(ItemId(3)));
}

#[test]
fn test_photos_view_and_pager() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut gallery = controller(dir.path());
    gallery.toggle_category("bw");

    gallery.set_view_mode(ViewMode::Photos);
    assert!(gallery.active_filter().is_empty());

    let photos = gallery.photos();
    assert_eq!(photos.len(), 6);
    assert_eq!(photos, photo_stream(&gallery.filtered()));

    // 初期表示数より少ないので一度に全部出る
    let mut pager = PhotoPager::default();
    pager.sync(gallery.active_filter().iter(), photos.len());
    assert_eq!(pager.visible(photos.len()), 6);
    assert!(!pager.has_more(photos.len()));

    assert!(gallery.open_photo(5));
    let session = gallery.modal().expect("モーダルが開いていない");
    assert_eq!(session.current(), "3_coast_2021/01.jpg");
    assert!(session.item_id().is_none());
}

#[test]
fn test_write_deep_link_for_share() {
    let url = write_deep_link("https://folio.example/work", "project", Some(ItemId(2)));
    assert_eq!(url, "https://folio.example/work?project=2");
}
