//! ギャラリーコントローラ
//!
//! フィルタ状態とモーダル状態を持ち、開閉・ナビゲーションとURLのディープリンクを
//! 仲介する。件数やフィルタ結果は呼ばれるたびに現在の状態から計算し直す。
//!
//! モーダルのライフサイクルは `Closed -> Open -> Closed` のみ。開いている間に
//! 別の作品を開くと、Closed を経由せずセッションを置き換える。

use crate::category::{compute_category_counts, count_for, label_universe, CategoryCount};
use crate::deep_link::{parse_item_id, read_deep_link, write_deep_link, DEFAULT_PARAM};
use crate::filter::apply_filter;
use crate::photos::{photo_stream, ViewMode};
use crate::types::{normalize_label, ActiveFilter, Catalog, Item, ItemId};
use crate::viewer::{ModalSession, SessionMode};

/// 次のマイクロタスクで実行するディープリンク反映
///
/// 実行前にパラメータが変わるかアンマウントされたら無効になる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReconcile {
    pub id: ItemId,
    generation: u64,
}

#[derive(Debug, Clone)]
pub struct GalleryController {
    catalog: Catalog,
    universe: Vec<String>,
    active: ActiveFilter,
    view_mode: ViewMode,
    modal: Option<ModalSession>,
    last_auto_opened: Option<ItemId>,
    reconcile_generation: u64,
    /// 予約中の反映が開く予定の作品
    pending_id: Option<ItemId>,
    param: String,
}

impl GalleryController {
    pub fn new(catalog: Catalog) -> Self {
        Self::with_param(catalog, DEFAULT_PARAM)
    }

    pub fn with_param(catalog: Catalog, param: &str) -> Self {
        let universe = label_universe(&catalog);
        Self {
            catalog,
            universe,
            active: ActiveFilter::new(),
            view_mode: ViewMode::default(),
            modal: None,
            last_auto_opened: None,
            reconcile_generation: 0,
            pending_id: None,
            param: param.to_string(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn active_filter(&self) -> &ActiveFilter {
        &self.active
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn deep_link_param(&self) -> &str {
        &self.param
    }

    pub fn modal(&self) -> Option<&ModalSession> {
        self.modal.as_ref()
    }

    pub fn modal_mut(&mut self) -> Option<&mut ModalSession> {
        self.modal.as_mut()
    }

    pub fn is_modal_open(&self) -> bool {
        self.modal.is_some()
    }

    /// グリッドとモーダルは同時に操作できない
    pub fn is_grid_visible(&self) -> bool {
        self.modal.is_none()
    }

    // =============================================
    // 派生データ（キャッシュしない）
    // =============================================

    pub fn filtered(&self) -> Vec<&Item> {
        apply_filter(&self.catalog, &self.active)
    }

    pub fn category_counts(&self) -> Vec<CategoryCount> {
        compute_category_counts(&self.catalog, &self.universe, &self.active)
    }

    pub fn photos(&self) -> Vec<String> {
        photo_stream(&self.filtered())
    }

    /// 「PROJECTS [n]」「PHOTOS [n]」の件数
    pub fn visible_count(&self) -> usize {
        match self.view_mode {
            ViewMode::Projects => self.filtered().len(),
            ViewMode::Photos => self.photos().len(),
        }
    }

    // =============================================
    // フィルタ操作
    // =============================================

    /// カテゴリの選択切り替え
    ///
    /// 解除は常に可能。追加は現在のフィルタ下で件数 > 0 のときだけで、
    /// それ以外は何もしない。状態が変わったら true。
    pub fn toggle_category(&mut self, label: &str) -> bool {
        let label = normalize_label(label);
        if self.active.contains(&label) {
            return self.active.remove(&label);
        }
        if count_for(&self.catalog, &self.active, &label) == 0 {
            tracing::debug!(%label, "toggle rejected: no matches under current filter");
            return false;
        }
        self.active.insert(label)
    }

    pub fn clear_filter(&mut self) {
        self.active.clear();
    }

    /// PROJECTS / PHOTOS の切り替え（フィルタも解除）
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
        self.active.clear();
    }

    // =============================================
    // モーダル操作
    // =============================================

    /// 作品を開く。未知のIDは何もしない
    pub fn open_item(&mut self, id: ItemId, start: usize) -> bool {
        let Some(session) = self.catalog.find(id).and_then(|item| ModalSession::for_item(item, start)) else {
            return false;
        };
        self.modal = Some(session);
        true
    }

    /// 写真ストリームの index 番目から開く
    pub fn open_photo(&mut self, index: usize) -> bool {
        let Some(session) = ModalSession::new(self.photos(), index, SessionMode::Photos) else {
            return false;
        };
        self.modal = Some(session);
        true
    }

    /// モーダルを閉じる
    ///
    /// 閉じた作品をURLのディープリンクが指していれば、パラメータを除いたURLを返す。
    /// 呼び出し側は履歴を増やさずスクロールもしない replace で反映する。
    pub fn close_modal(&mut self, current_url: &str) -> Option<String> {
        let closed = self.modal.take()?;
        let closed_id = closed.item_id()?;

        if read_deep_link(current_url, &self.param) == Some(closed_id) {
            tracing::debug!(id = %closed_id, "stripping deep link on close");
            return Some(write_deep_link(current_url, &self.param, None));
        }
        None
    }

    // =============================================
    // ディープリンク反映
    // =============================================

    /// パラメータ値の変化（またはマウント時）を受けて反映を予約する
    ///
    /// 値が変わったときだけ予約中の反映を無効にする。
    /// 同じ値の再読み込みでは予約済みのチケットがそのまま生きる。反映不要なら None。
    pub fn begin_reconcile(&mut self, param_value: Option<&str>) -> Option<PendingReconcile> {
        let parsed = param_value.and_then(parse_item_id);
        if parsed.is_some() && parsed == self.pending_id {
            return None;
        }
        self.reconcile_generation += 1;
        self.pending_id = None;

        if param_value.is_none() {
            // パラメータが消えたら、次に同じIDが来たとき再び開けるようにする
            self.last_auto_opened = None;
            return None;
        }
        let id = parsed?;
        if self.catalog.find(id).is_none() {
            tracing::debug!(%id, "deep link names unknown item, ignored");
            return None;
        }

        let already_open = self.modal.as_ref().and_then(ModalSession::item_id) == Some(id);
        if already_open || self.last_auto_opened == Some(id) {
            return None;
        }

        self.last_auto_opened = Some(id);
        self.pending_id = Some(id);
        Some(PendingReconcile {
            id,
            generation: self.reconcile_generation,
        })
    }

    /// URL全体から反映を予約する
    pub fn begin_reconcile_url(&mut self, url: &str) -> Option<PendingReconcile> {
        let value = url
            .split_once('?')
            .map(|(_, q)| q.split('#').next().unwrap_or(""))
            .and_then(|q| crate::deep_link::query_value(q, &self.param));
        self.begin_reconcile(value.as_deref())
    }

    /// 予約した反映を実行（次のティック）。実行したら true
    pub fn commit_reconcile(&mut self, pending: PendingReconcile) -> bool {
        if pending.generation != self.reconcile_generation {
            tracing::debug!(id = %pending.id, "deep link reconcile cancelled");
            return false;
        }
        self.pending_id = None;
        self.active.clear();
        self.open_item(pending.id, 0)
    }

    /// アンマウント時など、予約中の反映をすべて無効にする
    pub fn cancel_pending(&mut self) {
        self.reconcile_generation += 1;
        self.pending_id = None;
    }

    /// URLを読んで即時に反映する（非同期境界のない呼び出し元向け）
    pub fn reconcile_now(&mut self, url: &str) -> bool {
        match self.begin_reconcile_url(url) {
            Some(pending) => self.commit_reconcile(pending),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, labels: &[&str], gallery: usize) -> Item {
        Item {
            id: ItemId(id),
            title: format!("work {}", id),
            categories: labels.iter().map(|l| l.to_string()).collect(),
            year: "2024".to_string(),
            image_url: format!("{}.jpg", id),
            gallery_images: (1..=gallery).map(|g| format!("{}-{}.jpg", id, g)).collect(),
            ..Default::default()
        }
    }

    fn controller() -> GalleryController {
        GalleryController::new(Catalog::from_items(vec![
            item(1, &["BW"], 0),
            item(2, &["BW", "LANDSCAPE"], 2),
            item(3, &["COLOUR"], 1),
            item(7, &["COLOUR", "LANDSCAPE"], 0),
        ]))
    }

    fn ids(c: &GalleryController) -> Vec<i64> {
        c.filtered().iter().map(|i| i.id.0).collect()
    }

    #[test]
    fn test_toggle_add_and_remove() {
        let mut c = controller();
        assert!(c.toggle_category("BW"));
        assert_eq!(ids(&c), vec![1, 2]);
        assert!(c.toggle_category("bw"));
        assert_eq!(ids(&c), vec![1, 2, 3, 7]);
    }

    #[test]
    fn test_toggle_twice_restores_filter() {
        let mut c = controller();
        c.toggle_category("LANDSCAPE");
        let before = c.active_filter().clone();

        c.toggle_category("BW");
        c.toggle_category("BW");
        assert_eq!(c.active_filter(), &before);
    }

    #[test]
    fn test_toggle_rejects_zero_count_label() {
        let mut c = controller();
        c.toggle_category("BW");
        assert!(!c.toggle_category("COLOUR"));
        assert!(!c.active_filter().contains("COLOUR"));
        assert!(!c.toggle_category("PORTRAIT"));
    }

    #[test]
    fn test_clear_filter() {
        let mut c = controller();
        c.toggle_category("BW");
        c.toggle_category("LANDSCAPE");
        c.clear_filter();
        assert!(c.active_filter().is_empty());
        assert_eq!(c.filtered().len(), 4);
    }

    #[test]
    fn test_counts_follow_filter() {
        let mut c = controller();
        c.toggle_category("LANDSCAPE");
        let counts = c.category_counts();
        let colour = counts.iter().find(|e| e.label == "COLOUR").unwrap();
        assert_eq!(colour.count, 1);
    }

    #[test]
    fn test_view_mode_photos() {
        let mut c = controller();
        c.toggle_category("BW");
        c.set_view_mode(ViewMode::Photos);
        assert!(c.active_filter().is_empty());
        // 1 + 3 + 2 + 1
        assert_eq!(c.visible_count(), 7);

        assert!(c.open_photo(3));
        let modal = c.modal().unwrap();
        assert_eq!(modal.current(), "2-2.jpg");
        assert_eq!(modal.item_id(), None);
    }

    #[test]
    fn test_open_item_replaces_session() {
        let mut c = controller();
        assert!(c.open_item(ItemId(2), 0));
        assert!(!c.is_grid_visible());
        assert_eq!(c.modal().unwrap().len(), 3);

        assert!(c.open_item(ItemId(3), 1));
        let modal = c.modal().unwrap();
        assert_eq!(modal.item_id(), Some(ItemId(3)));
        assert_eq!(modal.current(), "3-1.jpg");
    }

    #[test]
    fn test_open_unknown_item_is_noop() {
        let mut c = controller();
        assert!(!c.open_item(ItemId(99), 0));
        assert!(c.is_grid_visible());
    }

    #[test]
    fn test_close_click_opened_does_not_touch_url() {
        let mut c = controller();
        c.open_item(ItemId(2), 0);
        assert_eq!(c.close_modal("/work?a=1"), None);
        assert!(!c.is_modal_open());
    }

    #[test]
    fn test_close_when_not_open() {
        let mut c = controller();
        assert_eq!(c.close_modal("/work?project=7"), None);
    }

    #[test]
    fn test_deep_link_to_unknown_item_is_ignored() {
        let mut c = controller();
        assert!(c.begin_reconcile(Some("99")).is_none());
        assert!(c.begin_reconcile(Some("seven")).is_none());
        assert!(!c.is_modal_open());
    }

    #[test]
    fn test_deep_link_opens_and_clears_filter() {
        let mut c = controller();
        c.toggle_category("BW");

        let pending = c.begin_reconcile(Some("7")).expect("反映が予約されない");
        // 予約しただけではまだ開かない
        assert!(!c.is_modal_open());

        assert!(c.commit_reconcile(pending));
        assert!(c.active_filter().is_empty());
        assert_eq!(c.modal().unwrap().item_id(), Some(ItemId(7)));
        assert_eq!(c.modal().unwrap().index(), 0);
    }

    #[test]
    fn test_deep_link_same_value_twice_opens_once() {
        let mut c = controller();
        let first = c.begin_reconcile(Some("7"));
        assert!(first.is_some());
        c.commit_reconcile(first.unwrap());

        assert!(c.begin_reconcile(Some("7")).is_none());
    }

    #[test]
    fn test_deep_link_close_strips_and_does_not_reopen() {
        let mut c = controller();
        let url = "/work?project=7";
        assert!(c.reconcile_now(url));

        let stripped = c.close_modal(url).expect("パラメータが除去されない");
        assert_eq!(stripped, "/work");

        // replace 反映前に同じ値で再評価されても開かない
        assert!(c.begin_reconcile_url(url).is_none());
        // 除去後のURLでも開かない
        assert!(!c.reconcile_now(&stripped));
        assert!(!c.is_modal_open());
    }

    #[test]
    fn test_deep_link_reopens_after_param_removed() {
        let mut c = controller();
        c.reconcile_now("/work?project=7");
        c.close_modal("/work?project=7");
        c.begin_reconcile(None);

        assert!(c.reconcile_now("/work?project=7"));
    }

    #[test]
    fn test_pending_cancelled_by_param_change() {
        let mut c = controller();
        let stale = c.begin_reconcile(Some("7")).unwrap();
        let fresh = c.begin_reconcile(Some("2")).unwrap();

        assert!(!c.commit_reconcile(stale));
        assert!(c.commit_reconcile(fresh));
        assert_eq!(c.modal().unwrap().item_id(), Some(ItemId(2)));
    }

    #[test]
    fn test_same_value_reread_keeps_pending() {
        let mut c = controller();
        let first = c.begin_reconcile(Some("7")).expect("反映が予約されない");
        // popstate などで同じ値をもう一度読んでも予約は生きる
        assert!(c.begin_reconcile(Some(" 7 ")).is_none());
        assert!(c.begin_reconcile_url("/work?project=7#gallery").is_none());

        assert!(c.commit_reconcile(first));
        assert_eq!(c.modal().unwrap().item_id(), Some(ItemId(7)));
    }

    #[test]
    fn test_invalid_value_cancels_pending() {
        let mut c = controller();
        let first = c.begin_reconcile(Some("7")).unwrap();
        assert!(c.begin_reconcile(Some("abc")).is_none());
        assert!(!c.commit_reconcile(first));

        let second = c.begin_reconcile(Some("7")).unwrap();
        assert!(c.begin_reconcile(None).is_none());
        assert!(!c.commit_reconcile(second));
        assert!(!c.is_modal_open());
    }

    #[test]
    fn test_pending_cancelled_on_unmount() {
        let mut c = controller();
        let pending = c.begin_reconcile(Some("7")).unwrap();
        c.cancel_pending();
        assert!(!c.commit_reconcile(pending));
        assert!(!c.is_modal_open());
    }

    #[test]
    fn test_deep_link_switches_between_items() {
        let mut c = controller();
        assert!(c.reconcile_now("/work?project=7"));
        assert!(c.reconcile_now("/work?project=2"));
        assert_eq!(c.modal().unwrap().item_id(), Some(ItemId(2)));
    }

    #[test]
    fn test_deep_link_custom_param() {
        let mut c = GalleryController::with_param(controller().catalog().clone(), "item");
        assert!(!c.reconcile_now("/work?project=7"));
        assert!(c.reconcile_now("/work?item=7"));
    }
}
