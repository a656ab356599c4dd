use chrono::{DateTime, Utc};
use std::time::Duration;

use super::types::DEFAULT_POLLING_INTERVAL_MILLIS;

/// liveChatMessages.list のクォータコスト
const MESSAGES_QUOTA_COST: u64 = 5;

/// videos.list のクォータコスト
const VIDEOS_QUOTA_COST: u64 = 1;

/// 1日あたりのデフォルトクォータ
const DAILY_QUOTA: i64 = 10_000;

/// ページネーションカーソル
///
/// 取得成功時にのみ丸ごと置き換える
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor {
    /// 次回リクエスト用のページトークン
    pub continuation_token: Option<String>,
    /// 推奨ポーリング間隔（ミリ秒）
    pub polling_interval_millis: u64,
}

impl PageCursor {
    pub fn new() -> Self {
        Self {
            continuation_token: None,
            polling_interval_millis: DEFAULT_POLLING_INTERVAL_MILLIS,
        }
    }

    /// レスポンスの値で置き換えたカーソルを返す
    pub fn advance(next_page_token: Option<String>, polling_interval_millis: Option<u64>) -> Self {
        Self {
            continuation_token: next_page_token,
            polling_interval_millis: polling_interval_millis
                .unwrap_or(DEFAULT_POLLING_INTERVAL_MILLIS),
        }
    }

    /// ポーリング間隔をDurationとして取得
    pub fn polling_interval(&self) -> Duration {
        Duration::from_millis(self.polling_interval_millis)
    }
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::new()
    }
}

/// ポーリング状態を管理する構造体
#[derive(Debug, Clone)]
pub struct PollingState {
    /// 対象の動画ID
    pub video_id: String,
    /// 現在のライブチャットID
    pub live_chat_id: String,
    /// 現在のカーソル
    pub cursor: PageCursor,
    /// 累積クォータ消費量（推定）
    pub quota_used: u64,
    /// 成功したポーリング回数
    pub poll_count: u64,
    /// 送信済みメッセージ数
    pub messages_published: u64,
    /// 連続失敗回数
    pub consecutive_failures: u32,
    /// 最後に取得に成功した時刻
    pub last_success_at: Option<DateTime<Utc>>,
}

impl PollingState {
    /// 新しいポーリング状態を作成
    ///
    /// セッション解決（videos.list）のクォータを計上済みで始める
    pub fn new(video_id: String, live_chat_id: String) -> Self {
        Self {
            video_id,
            live_chat_id,
            cursor: PageCursor::new(),
            quota_used: VIDEOS_QUOTA_COST,
            poll_count: 0,
            messages_published: 0,
            consecutive_failures: 0,
            last_success_at: None,
        }
    }

    /// 取得成功後に呼び出す
    pub fn record_success(&mut self, cursor: PageCursor, published: usize) {
        self.cursor = cursor;
        self.poll_count += 1;
        self.messages_published += published as u64;
        self.consecutive_failures = 0;
        self.last_success_at = Some(Utc::now());
        self.quota_used += MESSAGES_QUOTA_COST;
    }

    /// 失敗時に呼び出す（カーソルは変更しない）
    pub fn record_failure(&mut self) {
        self.consecutive_failures += 1;
    }

    /// 残りクォータを推定
    pub fn estimated_remaining_quota(&self) -> i64 {
        DAILY_QUOTA - self.quota_used as i64
    }

    /// あと何回ポーリングできるかを推定
    pub fn estimated_remaining_polls(&self) -> i64 {
        self.estimated_remaining_quota() / MESSAGES_QUOTA_COST as i64
    }
}
