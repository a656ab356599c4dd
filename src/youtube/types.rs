use serde::{Deserialize, Serialize};

/// ポーリング間隔が省略された場合のデフォルト（ミリ秒）
pub const DEFAULT_POLLING_INTERVAL_MILLIS: u64 = 10_000;

/// キューへ送信する正規化済みチャットメッセージ
///
/// JSONのフィールド順（author, timestamp, message, videoId, messageId）は
/// コンシューマ側のために固定しておく
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub author: String,
    /// publishedAt（ISO-8601）をそのまま保持する
    pub timestamp: String,
    pub message: String,
    pub video_id: String,
    pub message_id: String,
}

impl ChatMessage {
    /// APIのメッセージアイテムから生成
    pub fn from_item(item: LiveChatMessageItem, video_id: &str) -> Self {
        Self {
            author: item.author_details.display_name,
            timestamp: item.snippet.published_at,
            message: item.snippet.display_message,
            video_id: video_id.to_string(),
            message_id: item.id,
        }
    }
}

/// 解決済みのライブセッション
///
/// `live_chat_id` が None の場合はアクティブなチャットがない
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveSession {
    pub video_id: String,
    pub live_chat_id: Option<String>,
}

impl LiveSession {
    pub fn is_active(&self) -> bool {
        self.live_chat_id.is_some()
    }
}

// YouTube API レスポンス型
#[derive(Debug, Deserialize)]
pub struct LiveChatMessagesResponse {
    #[serde(rename = "pollingIntervalMillis")]
    pub polling_interval_millis: Option<u64>,
    #[serde(rename = "nextPageToken")]
    pub next_page_token: Option<String>,
    #[serde(default)]
    pub items: Vec<LiveChatMessageItem>,
}

#[derive(Debug, Deserialize)]
pub struct LiveChatMessageItem {
    pub id: String,
    pub snippet: MessageSnippet,
    #[serde(rename = "authorDetails")]
    pub author_details: AuthorDetails,
}

#[derive(Debug, Deserialize)]
pub struct MessageSnippet {
    #[serde(rename = "publishedAt")]
    pub published_at: String,
    /// 削除イベントなどでは省略されるため空文字で受ける
    #[serde(rename = "displayMessage", default)]
    pub display_message: String,
}

#[derive(Debug, Deserialize)]
pub struct AuthorDetails {
    #[serde(rename = "displayName")]
    pub display_name: String,
}

#[derive(Debug, Deserialize)]
pub struct VideoResponse {
    #[serde(default)]
    pub items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
pub struct VideoItem {
    #[serde(rename = "liveStreamingDetails")]
    pub live_streaming_details: Option<LiveStreamingDetails>,
}

#[derive(Debug, Deserialize)]
pub struct LiveStreamingDetails {
    #[serde(rename = "activeLiveChatId")]
    pub active_live_chat_id: Option<String>,
}
