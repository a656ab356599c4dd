use thiserror::Error;

#[derive(Error, Debug)]
pub enum YouTubeError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[source] reqwest::Error),

    #[error("Video ID is empty")]
    EmptyVideoId,

    #[error("API key is invalid or missing")]
    InvalidApiKey,

    #[error("Video not found: {0}")]
    VideoNotFound(String),

    #[error("Live chat not found - stream may have ended")]
    LiveChatNotFound,

    #[error("Quota exceeded - daily limit reached")]
    QuotaExceeded,

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Unexpected API response: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

// クエリにAPIキーを含むURLは保持しない
impl From<reqwest::Error> for YouTubeError {
    fn from(err: reqwest::Error) -> Self {
        YouTubeError::HttpError(err.without_url())
    }
}

impl YouTubeError {
    /// API/ネットワーク由来の一時的なエラーかどうか
    ///
    /// レスポンスのデコード失敗など、分類できないエラーは false を返す
    pub fn is_transient(&self) -> bool {
        match self {
            YouTubeError::HttpError(e) => !e.is_decode(),
            YouTubeError::InvalidApiKey
            | YouTubeError::LiveChatNotFound
            | YouTubeError::QuotaExceeded
            | YouTubeError::RateLimitExceeded
            | YouTubeError::ApiError { .. } => true,
            YouTubeError::EmptyVideoId
            | YouTubeError::VideoNotFound(_)
            | YouTubeError::ParseError(_) => false,
        }
    }
}
