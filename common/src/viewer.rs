//! モーダルビューア
//!
//! 開いている画像列と現在位置の状態機械。キーボード・スワイプ・ホイールの
//! 入力解釈もここで行い、DOMイベントの購読はWeb側が担当する。

use crate::shop::BuyAffordance;
use crate::types::{Item, ItemId};

/// スワイプとみなす最小移動量(px)
pub const SWIPE_DEAD_ZONE_PX: f64 = 10.0;
/// ホイールの微小ノイズ閾値
pub const WHEEL_MIN_DELTA: f64 = 4.0;
/// ホイール1ステップ後の不感時間(ms)
pub const WHEEL_DEAD_TIME_MS: f64 = 120.0;

/// 作品モーダルの見出し情報
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectInfo {
    pub id: ItemId,
    pub title: String,
    pub year: String,
    pub text: Option<String>,
    pub shop: BuyAffordance,
}

impl ProjectInfo {
    pub fn from_item(item: &Item) -> Self {
        Self {
            id: item.id,
            title: item.title.clone(),
            year: item.year.clone(),
            text: item.description().map(str::to_string),
            shop: BuyAffordance::from_item(item),
        }
    }

    /// 見出し「TITLE 2021」
    pub fn heading(&self) -> String {
        format!("{} {}", self.title, self.year).trim().to_string()
    }
}

/// 1作品の画像を見ているか、平坦化した写真列を見ているか
#[derive(Debug, Clone, PartialEq)]
pub enum SessionMode {
    Project(ProjectInfo),
    Photos,
}

/// モーダルセッション（開いている間だけ存在する）
#[derive(Debug, Clone, PartialEq)]
pub struct ModalSession {
    images: Vec<String>,
    index: usize,
    mode: SessionMode,
    text_open: bool,
}

impl ModalSession {
    /// 画像が1枚もなければ開かない
    pub fn new(images: Vec<String>, start: usize, mode: SessionMode) -> Option<Self> {
        if images.is_empty() {
            return None;
        }
        let index = start.min(images.len() - 1);
        Some(Self {
            images,
            index,
            mode,
            text_open: false,
        })
    }

    /// 作品1件分のセッション: [カバー, ...ギャラリー]
    pub fn for_item(item: &Item, start: usize) -> Option<Self> {
        Self::new(item.images(), start, SessionMode::Project(ProjectInfo::from_item(item)))
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn mode(&self) -> &SessionMode {
        &self.mode
    }

    pub fn project(&self) -> Option<&ProjectInfo> {
        match &self.mode {
            SessionMode::Project(info) => Some(info),
            SessionMode::Photos => None,
        }
    }

    pub fn item_id(&self) -> Option<ItemId> {
        self.project().map(|p| p.id)
    }

    /// 現在の画像参照（空文字 = 画像なし）
    pub fn current(&self) -> &str {
        self.images.get(self.index).map(String::as_str).unwrap_or("")
    }

    pub fn has_prev(&self) -> bool {
        self.index > 0
    }

    pub fn has_next(&self) -> bool {
        self.index + 1 < self.images.len()
    }

    /// 次へ。末尾では何もしない。移動したら true
    pub fn next(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.index += 1;
        true
    }

    /// 前へ。先頭では何もしない。移動したら true
    pub fn prev(&mut self) -> bool {
        if !self.has_prev() {
            return false;
        }
        self.index -= 1;
        true
    }

    /// 任意位置へ。範囲外は丸める。移動したら true
    pub fn go_to(&mut self, index: isize) -> bool {
        let last = self.images.len().saturating_sub(1) as isize;
        let clamped = index.clamp(0, last) as usize;
        let moved = clamped != self.index;
        self.index = clamped;
        moved
    }

    /// サムネイルストリップを出すか
    pub fn shows_strip(&self) -> bool {
        self.images.len() > 1
    }

    pub fn text_open(&self) -> bool {
        self.text_open
    }

    /// TEXTボタン。説明文がある作品だけ開閉できる
    pub fn toggle_text(&mut self) {
        if self.project().and_then(|p| p.text.as_ref()).is_some() {
            self.text_open = !self.text_open;
        }
    }

    /// キー入力の解釈
    pub fn handle_key(&mut self, key: Key) -> KeyOutcome {
        match key {
            Key::Escape => KeyOutcome::Close,
            Key::ArrowLeft if self.prev() => KeyOutcome::Navigated,
            Key::ArrowRight if self.next() => KeyOutcome::Navigated,
            _ => KeyOutcome::Ignored,
        }
    }

    /// スワイプ方向を反映。移動したら true
    pub fn handle_swipe(&mut self, direction: SwipeDirection) -> bool {
        match direction {
            SwipeDirection::Left => self.next(),
            SwipeDirection::Right => self.prev(),
        }
    }
}

/// ビューアが扱うキー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Escape,
    Other,
}

impl Key {
    /// `KeyboardEvent.key` の値から変換
    pub fn from_key_name(name: &str) -> Self {
        match name {
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "Escape" | "Esc" => Key::Escape,
            _ => Key::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Navigated,
    Close,
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Left,
    Right,
}

/// タッチ／マウスドラッグのスワイプ判定
#[derive(Debug, Clone, Default)]
pub struct SwipeTracker {
    start: Option<(f64, f64)>,
}

impl SwipeTracker {
    pub fn begin(&mut self, x: f64, y: f64) {
        self.start = Some((x, y));
    }

    pub fn cancel(&mut self) {
        self.start = None;
    }

    pub fn is_tracking(&self) -> bool {
        self.start.is_some()
    }

    /// 不感帯未満・縦方向優位の移動は None
    pub fn end(&mut self, x: f64, y: f64) -> Option<SwipeDirection> {
        let (sx, sy) = self.start.take()?;
        let dx = x - sx;
        let dy = y - sy;
        if dx.abs() < SWIPE_DEAD_ZONE_PX || dy.abs() > dx.abs() {
            return None;
        }
        Some(if dx < 0.0 {
            SwipeDirection::Left
        } else {
            SwipeDirection::Right
        })
    }
}

/// ホイール1イベントの処理結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WheelOutcome {
    /// 背面ページのスクロールを止める（preventDefault）
    pub consume: bool,
    pub moved: bool,
}

impl WheelOutcome {
    const IGNORED: Self = Self {
        consume: false,
        moved: false,
    };
}

/// トラックパッドの連続ホイールを「1ジェスチャー1枚」に間引く
#[derive(Debug, Clone, Default)]
pub struct WheelStepper {
    last_accepted_ms: Option<f64>,
}

impl WheelStepper {
    pub fn on_wheel(&mut self, session: &mut ModalSession, delta_y: f64, now_ms: f64) -> WheelOutcome {
        if session.len() < 2 {
            return WheelOutcome::IGNORED;
        }
        if delta_y.abs() < WHEEL_MIN_DELTA {
            return WheelOutcome::IGNORED;
        }
        if let Some(last) = self.last_accepted_ms {
            if now_ms - last < WHEEL_DEAD_TIME_MS {
                return WheelOutcome::IGNORED;
            }
        }
        self.last_accepted_ms = Some(now_ms);

        let moved = if delta_y < 0.0 {
            session.prev()
        } else {
            session.next()
        };
        WheelOutcome { consume: true, moved }
    }

    pub fn reset(&mut self) {
        self.last_accepted_ms = None;
    }
}
