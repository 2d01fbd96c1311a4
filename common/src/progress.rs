//! 画像読み込みの疑似プログレス
//!
//! `Idle -> Climbing -> Completing -> Hidden` の状態機械。
//! 外部シグナル `tick`（一定間隔）と `loaded`（実画像の読み込み完了）だけで
//! 駆動するので、擬似クロックでテストできる。

/// tick 間隔(ms)
pub const TICK_INTERVAL_MS: u32 = 120;
/// 100% 表示から非表示までの時間(ms)
pub const HIDE_DELAY_MS: u32 = 250;
/// 開始時の値
pub const BASELINE: u8 = 6;
/// 読み込み完了前の上限
pub const CEILING: u8 = 92;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressState {
    #[default]
    Idle,
    Climbing(u8),
    Completing,
    Hidden,
}

/// 1画像ぶんの疑似プログレス
#[derive(Debug, Clone, Default)]
pub struct LoadProgress {
    state: ProgressState,
    /// 計測を開始済みの画像（同じ画像の再描画で再始動しない）
    started_for: Option<String>,
}

impl LoadProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ProgressState {
        self.state
    }

    /// 画像が変わったときだけ開始。開始したら true
    pub fn start(&mut self, src: &str) -> bool {
        if src.is_empty() {
            return false;
        }
        if self.started_for.as_deref() == Some(src) {
            return false;
        }
        self.started_for = Some(src.to_string());
        self.state = ProgressState::Climbing(BASELINE);
        true
    }

    /// 前後ボタンのクリック時は同じ状態からでも再始動
    pub fn restart(&mut self) {
        self.state = ProgressState::Climbing(BASELINE);
    }

    /// 一定間隔の進行。上限を超えない
    pub fn tick(&mut self) {
        if let ProgressState::Climbing(p) = self.state {
            self.state = ProgressState::Climbing(step(p));
        }
    }

    /// 実画像の読み込み完了 → 100%
    pub fn loaded(&mut self) {
        if matches!(self.state, ProgressState::Climbing(_)) {
            self.state = ProgressState::Completing;
        }
    }

    /// 読み込み失敗。バーを残さず即座に隠す
    pub fn failed(&mut self) {
        if matches!(self.state, ProgressState::Climbing(_) | ProgressState::Completing) {
            self.state = ProgressState::Hidden;
        }
    }

    /// 非表示タイマー満了
    pub fn hide_elapsed(&mut self) {
        if self.state == ProgressState::Completing {
            self.state = ProgressState::Hidden;
        }
    }

    /// セッション終了時。全タイマーは呼び出し側で破棄する
    pub fn reset(&mut self) {
        self.state = ProgressState::Idle;
        self.started_for = None;
    }

    pub fn value(&self) -> u8 {
        match self.state {
            ProgressState::Idle | ProgressState::Hidden => 0,
            ProgressState::Climbing(p) => p,
            ProgressState::Completing => 100,
        }
    }

    pub fn visible(&self) -> bool {
        matches!(self.state, ProgressState::Climbing(_) | ProgressState::Completing)
    }

    /// tick タイマーが必要か
    pub fn needs_ticker(&self) -> bool {
        matches!(self.state, ProgressState::Climbing(p) if p < CEILING)
    }

    /// 非表示タイマーが必要か
    pub fn needs_hide_timer(&self) -> bool {
        self.state == ProgressState::Completing
    }
}

/// 減速する増分: 60%未満は+9、80%未満は+4、それ以上は+1（上限92%）
fn step(p: u8) -> u8 {
    if p >= CEILING {
        return p;
    }
    let inc = if p < 60 {
        9
    } else if p < 80 {
        4
    } else {
        1
    };
    (p + inc).min(CEILING)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_sets_baseline() {
        let mut progress = LoadProgress::new();
        assert!(!progress.visible());
        assert!(progress.start("a.jpg"));
        assert_eq!(progress.value(), BASELINE);
        assert!(progress.visible());
        assert!(progress.needs_ticker());
    }

    #[test]
    fn test_start_guarded_per_image() {
        let mut progress = LoadProgress::new();
        progress.start("a.jpg");
        progress.tick();
        let value = progress.value();

        // 同じ画像の再描画では再始動しない
        assert!(!progress.start("a.jpg"));
        assert_eq!(progress.value(), value);

        assert!(progress.start("b.jpg"));
        assert_eq!(progress.value(), BASELINE);
    }

    #[test]
    fn test_empty_source_does_not_start() {
        let mut progress = LoadProgress::new();
        assert!(!progress.start(""));
        assert_eq!(progress.state(), ProgressState::Idle);
    }

    #[test]
    fn test_decelerating_climb_caps_at_92() {
        let mut progress = LoadProgress::new();
        progress.start("a.jpg");

        let mut values = vec![progress.value()];
        for _ in 0..40 {
            progress.tick();
            values.push(progress.value());
        }

        assert_eq!(&values[..8], &[6, 15, 24, 33, 42, 51, 60, 64]);
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*values.last().unwrap(), CEILING);
        assert!(!progress.needs_ticker());
    }

    #[test]
    fn test_loaded_then_hidden() {
        let mut progress = LoadProgress::new();
        progress.start("a.jpg");
        progress.tick();

        progress.loaded();
        assert_eq!(progress.value(), 100);
        assert!(progress.visible());
        assert!(progress.needs_hide_timer());
        assert!(!progress.needs_ticker());

        // 完了後の tick は無視
        progress.tick();
        assert_eq!(progress.value(), 100);

        progress.hide_elapsed();
        assert_eq!(progress.state(), ProgressState::Hidden);
        assert_eq!(progress.value(), 0);
        assert!(!progress.visible());
    }

    #[test]
    fn test_loaded_before_any_tick() {
        // キャッシュ済み画像は即座に load される
        let mut progress = LoadProgress::new();
        progress.start("a.jpg");
        progress.loaded();
        assert_eq!(progress.state(), ProgressState::Completing);
    }

    #[test]
    fn test_loaded_without_start_stays_hidden() {
        let mut progress = LoadProgress::new();
        progress.loaded();
        assert!(!progress.visible());
    }

    #[test]
    fn test_restart_after_completion() {
        let mut progress = LoadProgress::new();
        progress.start("a.jpg");
        progress.loaded();
        progress.hide_elapsed();

        progress.restart();
        assert_eq!(progress.value(), BASELINE);
    }

    #[test]
    fn test_reset_clears_guard() {
        let mut progress = LoadProgress::new();
        progress.start("a.jpg");
        progress.reset();
        assert!(progress.start("a.jpg"));
    }

    #[test]
    fn test_failed_hides_without_timers() {
        let mut progress = LoadProgress::new();
        progress.start("broken.jpg");
        for _ in 0..20 {
            progress.tick();
        }
        assert!(progress.visible());

        progress.failed();
        assert_eq!(progress.state(), ProgressState::Hidden);
        assert!(!progress.visible());
        assert!(!progress.needs_ticker());
        assert!(!progress.needs_hide_timer());

        // 次の画像では再び進む
        assert!(progress.start("next.jpg"));
        assert!(progress.visible());
    }
}
