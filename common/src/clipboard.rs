//! コピー完了表示
//!
//! コピー成功から2秒間だけ "Copied!" を表示し、その後 "Copy" に戻す。
//! 時刻はミリ秒（ブラウザの`Date.now()`相当）で受け取る。

use std::time::Duration;

/// "Copied!" の表示時間
pub const COPY_ACK_DURATION: Duration = Duration::from_secs(2);

pub const COPY_LABEL: &str = "Copy";
pub const COPIED_LABEL: &str = "Copied!";

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CopyAck {
    copied_at_ms: Option<f64>,
}

impl CopyAck {
    pub fn new() -> Self {
        Self::default()
    }

    /// コピー成功を記録
    pub fn acknowledge(&mut self, now_ms: f64) {
        self.copied_at_ms = Some(now_ms);
    }

    pub fn clear(&mut self) {
        self.copied_at_ms = None;
    }

    pub fn is_active(&self, now_ms: f64) -> bool {
        match self.copied_at_ms {
            Some(start) => now_ms >= start && now_ms - start < duration_ms(),
            None => false,
        }
    }

    pub fn label(&self, now_ms: f64) -> &'static str {
        if self.is_active(now_ms) {
            COPIED_LABEL
        } else {
            COPY_LABEL
        }
    }
}

fn duration_ms() -> f64 {
    COPY_ACK_DURATION.as_millis() as f64
}
