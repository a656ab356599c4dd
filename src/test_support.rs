//! テスト用のダブル（API / キュー / タイマー）

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::queue::{QueueClient, QueueError};
use crate::youtube::client::LiveChatApi;
use crate::youtube::errors::YouTubeError;
use crate::youtube::timer::Timer;
use crate::youtube::types::*;

/// videos.list のレスポンスを作る
///
/// - None: 動画が存在しない
/// - Some(None): 配信中でない
/// - Some(Some(id)): アクティブなチャットあり
pub fn video_response(video: Option<Option<&str>>) -> VideoResponse {
    let items = match video {
        None => vec![],
        Some(chat_id) => vec![VideoItem {
            live_streaming_details: Some(LiveStreamingDetails {
                active_live_chat_id: chat_id.map(str::to_string),
            }),
        }],
    };
    VideoResponse { items }
}

/// (id, 本文) のリストからメッセージページを作る
pub fn page(
    items: &[(&str, &str)],
    next_page_token: Option<&str>,
    polling_interval_millis: Option<u64>,
) -> LiveChatMessagesResponse {
    LiveChatMessagesResponse {
        polling_interval_millis,
        next_page_token: next_page_token.map(str::to_string),
        items: items
            .iter()
            .map(|(id, text)| LiveChatMessageItem {
                id: id.to_string(),
                snippet: MessageSnippet {
                    published_at: "2024-05-01T12:00:00.000Z".to_string(),
                    display_message: text.to_string(),
                },
                author_details: AuthorDetails {
                    display_name: format!("author-{}", id),
                },
            })
            .collect(),
    }
}

pub fn chat_message(id: &str, text: &str, video_id: &str) -> ChatMessage {
    ChatMessage {
        author: "alice".to_string(),
        timestamp: "2024-05-01T12:00:00.000Z".to_string(),
        message: text.to_string(),
        video_id: video_id.to_string(),
        message_id: id.to_string(),
    }
}

/// 決められた順にレスポンスを返すAPI
pub struct FakeApi {
    video: VideoResponse,
    video_calls: Mutex<usize>,
    pages: Mutex<VecDeque<Result<LiveChatMessagesResponse, YouTubeError>>>,
    page_tokens: Mutex<Vec<Option<String>>>,
}

impl FakeApi {
    pub fn with_video(video: VideoResponse) -> Self {
        Self {
            video,
            video_calls: Mutex::new(0),
            pages: Mutex::new(VecDeque::new()),
            page_tokens: Mutex::new(Vec::new()),
        }
    }

    pub fn push_page(self, page: Result<LiveChatMessagesResponse, YouTubeError>) -> Self {
        self.pages.lock().unwrap().push_back(page);
        self
    }

    pub fn video_calls(&self) -> usize {
        *self.video_calls.lock().unwrap()
    }

    /// 各取得で渡されたページトークン
    pub fn page_tokens(&self) -> Vec<Option<String>> {
        self.page_tokens.lock().unwrap().clone()
    }
}

#[async_trait]
impl LiveChatApi for FakeApi {
    async fn get_video_details(&self, _video_id: &str) -> Result<VideoResponse, YouTubeError> {
        *self.video_calls.lock().unwrap() += 1;
        let items = self
            .video
            .items
            .iter()
            .map(|item| VideoItem {
                live_streaming_details: item.live_streaming_details.as_ref().map(|d| {
                    LiveStreamingDetails {
                        active_live_chat_id: d.active_live_chat_id.clone(),
                    }
                }),
            })
            .collect();
        Ok(VideoResponse { items })
    }

    async fn get_live_chat_messages(
        &self,
        _live_chat_id: &str,
        page_token: Option<&str>,
    ) -> Result<LiveChatMessagesResponse, YouTubeError> {
        self.page_tokens
            .lock()
            .unwrap()
            .push(page_token.map(str::to_string));
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(YouTubeError::ApiError {
                    status: 500,
                    message: "no scripted page".to_string(),
                })
            })
    }
}

/// 送信内容を記録するキュー
pub struct FakeQueue {
    sent: Mutex<Vec<(String, Vec<u8>)>>,
    calls: Mutex<usize>,
    fail_on: Option<usize>,
}

impl FakeQueue {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            calls: Mutex::new(0),
            fail_on: None,
        }
    }

    /// n回目（0始まり）の送信だけ失敗させる
    pub fn fail_on(call: usize) -> Self {
        Self {
            fail_on: Some(call),
            ..Self::new()
        }
    }

    pub fn sent(&self) -> Vec<(String, Vec<u8>)> {
        self.sent.lock().unwrap().clone()
    }

    fn field(&self, name: &str) -> Vec<String> {
        self.sent()
            .iter()
            .map(|(_, payload)| {
                let value: serde_json::Value = serde_json::from_slice(payload).unwrap();
                value[name].as_str().unwrap().to_string()
            })
            .collect()
    }

    pub fn message_ids(&self) -> Vec<String> {
        self.field("messageId")
    }

    pub fn video_ids(&self) -> Vec<String> {
        self.field("videoId")
    }
}

#[async_trait]
impl QueueClient for FakeQueue {
    async fn send(&self, topic: &str, payload: Vec<u8>) -> Result<(), QueueError> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            let call = *calls;
            *calls += 1;
            call
        };

        if self.fail_on == Some(call) {
            return Err(QueueError::Unavailable("broker unreachable".to_string()));
        }

        self.sent.lock().unwrap().push((topic.to_string(), payload));
        Ok(())
    }
}

/// 待機せずに時間だけ記録するタイマー
pub struct RecordingTimer {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingTimer {
    pub fn new() -> Self {
        Self {
            sleeps: Mutex::new(Vec::new()),
        }
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Timer for RecordingTimer {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}
