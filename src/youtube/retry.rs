use std::time::Duration;

/// デフォルトのリトライ待機時間（秒）
pub const DEFAULT_RETRY_DELAY_SECS: u64 = 30;

/// ポーリング失敗の分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// API/ネットワーク由来の一時的なエラー
    Transient,
    /// それ以外（デコード失敗、キュー送信失敗など）
    Unclassified,
}

/// 固定間隔のリトライポリシー
///
/// 失敗の種類に関わらず同じ待機時間を返す。試行回数の上限はない。
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    delay: Duration,
}

impl RetryPolicy {
    pub fn new() -> Self {
        Self::fixed(Duration::from_secs(DEFAULT_RETRY_DELAY_SECS))
    }

    pub fn fixed(delay: Duration) -> Self {
        Self { delay }
    }

    /// 次のリトライまでの待機時間
    pub fn next_delay(&self, _kind: FailureKind) -> Duration {
        self.delay
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}
