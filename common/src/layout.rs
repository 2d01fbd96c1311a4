//! サムネイルストリップの配置計算
//!
//! 描画中のレイアウト（getBoundingClientRect）から毎回計算する。キャッシュしない。

/// 画像の最大高さ（ビューポート比）
pub const MAX_IMAGE_VH: f64 = 0.82;
/// ストリップの上下余白(px)
pub const STRIP_MARGIN_PX: f64 = 8.0;

/// 矩形（CSSピクセル）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center_y(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

/// アクティブなサムネイルを中央に寄せる scrollLeft
pub fn centering_scroll_left(strip: Rect, thumb: Rect, scroll_left: f64) -> f64 {
    let delta = thumb.left - strip.left + thumb.width / 2.0 - strip.width / 2.0;
    scroll_left + delta
}

/// ストリップの top 位置
///
/// 実際に描画された画像ではなく最大画像高さを基準にするので、縦長・横長を
/// 切り替えてもストリップが跳ねない。最大画像の下端と画面下端の中間に置き、
/// 画面内に収まるよう丸める。
pub fn strip_top(viewport_height: f64, viewer: Rect, strip_height: f64) -> f64 {
    let max_image_height = viewer.height.min(viewport_height * MAX_IMAGE_VH);
    let max_image_bottom = viewer.center_y() + max_image_height / 2.0;
    let target_center = (max_image_bottom + viewport_height) / 2.0;
    let top = target_center - strip_height / 2.0;

    let min_top = STRIP_MARGIN_PX;
    let max_top = viewport_height - strip_height - STRIP_MARGIN_PX;
    // 画面が極端に低いときは上端を優先
    top.min(max_top).max(min_top)
}
