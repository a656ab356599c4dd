use std::sync::Arc;

use super::{client::LiveChatApi, errors::YouTubeError, types::LiveSession};

/// 動画IDからアクティブなライブチャットを解決する
///
/// 起動時に一度だけ呼ばれる。リトライはしない。
pub struct SessionResolver<A> {
    api: Arc<A>,
}

impl<A: LiveChatApi> SessionResolver<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    /// ライブセッションを解決
    ///
    /// - 動画が存在しない: `YouTubeError::VideoNotFound`
    /// - 配信中でない / チャット無効: `live_chat_id` が None のセッション
    pub async fn resolve(&self, video_id: &str) -> Result<LiveSession, YouTubeError> {
        if video_id.trim().is_empty() {
            return Err(YouTubeError::EmptyVideoId);
        }

        let response = self.api.get_video_details(video_id).await?;

        let Some(video) = response.items.first() else {
            log::error!("Video with ID '{}' not found", video_id);
            return Err(YouTubeError::VideoNotFound(video_id.to_string()));
        };

        let live_chat_id = video
            .live_streaming_details
            .as_ref()
            .and_then(|details| details.active_live_chat_id.clone())
            .filter(|id| !id.is_empty());

        match &live_chat_id {
            Some(id) => log::info!("Live chat ID retrieved: {}", id),
            None => log::warn!(
                "Video '{}' is not an active live stream or has chat disabled",
                video_id
            ),
        }

        Ok(LiveSession {
            video_id: video_id.to_string(),
            live_chat_id,
        })
    }
}
