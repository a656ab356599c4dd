use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use super::{errors::YouTubeError, types::*};
use crate::util::mask_api_key;

/// YouTube Data API v3 のベースURL
pub const API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// ライブチャット取得に必要なプラットフォームAPI
///
/// テストではダブルに差し替える
#[async_trait]
pub trait LiveChatApi: Send + Sync {
    /// videos.list（liveStreamingDetails）
    async fn get_video_details(&self, video_id: &str) -> Result<VideoResponse, YouTubeError>;

    /// liveChatMessages.list
    async fn get_live_chat_messages(
        &self,
        live_chat_id: &str,
        page_token: Option<&str>,
    ) -> Result<LiveChatMessagesResponse, YouTubeError>;
}

pub struct YouTubeClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl YouTubeClient {
    /// タイムアウト付きのHTTPクライアントを構築
    pub fn new(api_key: String, base_url: &str, timeout: Duration) -> Result<Self, YouTubeError> {
        let client = Client::builder().timeout(timeout).build()?;

        log::info!(
            "YouTube API client initialized (key: {}, base: {})",
            mask_api_key(&api_key),
            base_url
        );

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, YouTubeError> {
        let url = format!("{}/{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::OK {
            return Err(classify_error_status(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            log::error!("Failed to decode {} response: {}", path, e);
            YouTubeError::ParseError(e.to_string())
        })
    }
}

#[async_trait]
impl LiveChatApi for YouTubeClient {
    async fn get_video_details(&self, video_id: &str) -> Result<VideoResponse, YouTubeError> {
        log::info!(
            "Fetching live streaming details for video: {} (quota cost: 1 unit)",
            video_id
        );

        self.get_json(
            "videos",
            &[("part", "liveStreamingDetails"), ("id", video_id)],
        )
        .await
        .map_err(|e| match e {
            YouTubeError::LiveChatNotFound => YouTubeError::VideoNotFound(video_id.to_string()),
            other => other,
        })
    }

    async fn get_live_chat_messages(
        &self,
        live_chat_id: &str,
        page_token: Option<&str>,
    ) -> Result<LiveChatMessagesResponse, YouTubeError> {
        log::debug!(
            "Fetching live chat messages for chat ID: {} (page token: {:?})",
            live_chat_id,
            page_token
        );

        let mut query_params = vec![
            ("liveChatId", live_chat_id),
            ("part", "snippet,authorDetails"),
        ];

        // pageTokenがある場合は追加
        if let Some(token) = page_token {
            query_params.push(("pageToken", token));
        }

        let data: LiveChatMessagesResponse =
            self.get_json("liveChat/messages", &query_params).await?;

        log::debug!(
            "Fetched {} messages (polling interval: {:?}ms)",
            data.items.len(),
            data.polling_interval_millis
        );
        Ok(data)
    }
}

/// 200以外のステータスをエラー種別に振り分ける
fn classify_error_status(status: StatusCode, body: &str) -> YouTubeError {
    match status {
        StatusCode::BAD_REQUEST if body.contains("keyInvalid") => {
            log::error!("API key is invalid");
            YouTubeError::InvalidApiKey
        }
        StatusCode::UNAUTHORIZED => {
            log::error!("Unauthorized - API key invalid");
            YouTubeError::InvalidApiKey
        }
        StatusCode::FORBIDDEN => {
            if body.contains("quotaExceeded") {
                log::error!("Quota exceeded - daily limit reached");
                YouTubeError::QuotaExceeded
            } else if body.contains("rateLimitExceeded") {
                log::warn!("Rate limit exceeded");
                YouTubeError::RateLimitExceeded
            } else {
                log::error!("API key invalid or insufficient permissions");
                YouTubeError::InvalidApiKey
            }
        }
        StatusCode::NOT_FOUND => {
            log::warn!("Resource not found: {}", body);
            YouTubeError::LiveChatNotFound
        }
        status => {
            log::error!(
                "Unexpected API response - status: {}, body: {}",
                status,
                body
            );
            YouTubeError::ApiError {
                status: status.as_u16(),
                message: body.to_string(),
            }
        }
    }
}
