use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use super::{
    client::LiveChatApi,
    errors::YouTubeError,
    retry::{FailureKind, RetryPolicy},
    session::SessionResolver,
    state::{PageCursor, PollingState},
    timer::Timer,
    types::{ChatMessage, LiveSession},
};
use crate::queue::{MessagePublisher, QueueClient, QueueError};

/// 何回の成功ごとに状態ログを出すか
const STATUS_LOG_EVERY: u64 = 10;

/// ポーラーの状態遷移（INIT → POLLING → STOPPED）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerPhase {
    Init,
    Polling,
    Stopped,
}

/// 1回のポーリングで発生したエラー
#[derive(Debug, Error)]
pub enum PollError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] YouTubeError),

    #[error("publish failed: {0}")]
    Publish(#[from] QueueError),
}

impl PollError {
    pub fn kind(&self) -> FailureKind {
        match self {
            PollError::Fetch(e) if e.is_transient() => FailureKind::Transient,
            _ => FailureKind::Unclassified,
        }
    }
}

/// 1回のポーリング結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// 取得成功（カーソル更新済み）
    Fetched { published: usize, wait: Duration },
    /// 失敗（カーソルはそのまま）
    Failed { kind: FailureKind, wait: Duration },
}

impl StepOutcome {
    /// 次のポーリングまでの待機時間
    pub fn wait(&self) -> Duration {
        match self {
            StepOutcome::Fetched { wait, .. } | StepOutcome::Failed { wait, .. } => *wait,
        }
    }
}

/// YouTubeコメントポーリングマネージャー
///
/// 取得 → 送信 → 待機 を1つの流れで繰り返す。カーソルはこの構造体だけが持つ。
pub struct ChatPoller<A, Q, T> {
    api: Arc<A>,
    resolver: SessionResolver<A>,
    publisher: MessagePublisher<Q>,
    retry: RetryPolicy,
    timer: T,
    phase: PollerPhase,
    state: Option<PollingState>,
}

impl<A, Q, T> ChatPoller<A, Q, T>
where
    A: LiveChatApi,
    Q: QueueClient,
    T: Timer,
{
    /// 新しいポーラーを作成
    pub fn new(api: Arc<A>, publisher: MessagePublisher<Q>, retry: RetryPolicy, timer: T) -> Self {
        Self {
            resolver: SessionResolver::new(Arc::clone(&api)),
            api,
            publisher,
            retry,
            timer,
            phase: PollerPhase::Init,
            state: None,
        }
    }

    pub fn phase(&self) -> PollerPhase {
        self.phase
    }

    /// 現在の状態を取得
    pub fn state(&self) -> Option<&PollingState> {
        self.state.as_ref()
    }

    /// セッションを解決してポーリング可能な状態にする
    ///
    /// アクティブなチャットがなければ STOPPED になる。2回目以降の呼び出しは何もしない。
    pub async fn start(&mut self, video_id: &str) -> Result<PollerPhase, YouTubeError> {
        if self.phase != PollerPhase::Init {
            return Ok(self.phase);
        }

        match self.resolver.resolve(video_id).await {
            Ok(LiveSession {
                video_id,
                live_chat_id: Some(live_chat_id),
            }) => {
                log::info!(
                    "Starting to fetch messages for Live Chat ID: {}",
                    live_chat_id
                );
                self.state = Some(PollingState::new(video_id, live_chat_id));
                self.phase = PollerPhase::Polling;
            }
            Ok(_) => {
                log::warn!("No active live chat, poller will not start");
                self.phase = PollerPhase::Stopped;
            }
            Err(e) => {
                log::error!("Failed to resolve live chat session: {}", e);
                self.phase = PollerPhase::Stopped;
                return Err(e);
            }
        }

        Ok(self.phase)
    }

    /// ポーリングループ
    ///
    /// チャットがなければすぐに戻る。開始後はプロセス終了まで戻らない。
    pub async fn run(&mut self, video_id: &str) -> Result<(), YouTubeError> {
        if self.start(video_id).await? != PollerPhase::Polling {
            return Ok(());
        }

        loop {
            self.tick().await;
        }
    }

    /// 1回分のポーリングと待機
    ///
    /// POLLING 以外では何もせず None を返す
    pub async fn tick(&mut self) -> Option<StepOutcome> {
        let outcome = self.step().await?;
        self.timer.sleep(outcome.wait()).await;
        Some(outcome)
    }

    async fn step(&mut self) -> Option<StepOutcome> {
        if self.phase != PollerPhase::Polling {
            return None;
        }

        let result =
            Self::poll_once(self.api.as_ref(), &self.publisher, self.state.as_ref()?).await;
        let state = self.state.as_mut()?;

        let outcome = match result {
            Ok((cursor, published)) => {
                let wait = cursor.polling_interval();
                state.record_success(cursor, published);

                if state.poll_count % STATUS_LOG_EVERY == 0 {
                    log::info!(
                        "Polling status - polls: {}, published: {}, quota used: {}, remaining: {} (~{} polls), last success: {}",
                        state.poll_count,
                        state.messages_published,
                        state.quota_used,
                        state.estimated_remaining_quota(),
                        state.estimated_remaining_polls(),
                        state
                            .last_success_at
                            .map(|at| at.to_rfc3339())
                            .unwrap_or_else(|| "never".to_string())
                    );
                }

                StepOutcome::Fetched { published, wait }
            }
            Err(e) => {
                let kind = e.kind();
                let wait = self.retry.next_delay(kind);
                state.record_failure();

                match kind {
                    FailureKind::Transient => log::error!("An HTTP error occurred: {}", e),
                    FailureKind::Unclassified => {
                        log::error!("An unexpected error occurred: {}", e)
                    }
                }
                log::warn!(
                    "Retrying in {:?} with unchanged page token (consecutive failures: {})",
                    wait,
                    state.consecutive_failures
                );

                StepOutcome::Failed { kind, wait }
            }
        };

        Some(outcome)
    }

    /// 1ページ取得して全件送信する
    ///
    /// 途中で送信に失敗した場合はエラーを返し、カーソルは進めない
    async fn poll_once(
        api: &A,
        publisher: &MessagePublisher<Q>,
        state: &PollingState,
    ) -> Result<(PageCursor, usize), PollError> {
        let page = api
            .get_live_chat_messages(
                &state.live_chat_id,
                state.cursor.continuation_token.as_deref(),
            )
            .await?;

        let published = page.items.len();
        for item in page.items {
            let message = ChatMessage::from_item(item, &state.video_id);
            publisher.publish(&message).await?;
        }

        Ok((
            PageCursor::advance(page.next_page_token, page.polling_interval_millis),
            published,
        ))
    }
}
