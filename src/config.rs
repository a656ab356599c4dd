// =============================================================================
// 共通設定・定数モジュール
// =============================================================================
// 環境変数（.envを含む）から起動設定を読み込む
// 必須項目が欠けている場合は起動しない
// =============================================================================

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::util::mask_api_key;
use crate::youtube::client::API_BASE;
use crate::youtube::retry::DEFAULT_RETRY_DELAY_SECS;

/// HTTPリクエストのデフォルトタイムアウト（秒）
///
/// YouTube APIへのリクエストで使用。
/// ネットワーク状況が悪い場合でもポーリングが止まったままにならないようにする。
pub const HTTP_TIMEOUT_SECS: u64 = 10;

/// デフォルトのKafkaブローカー
pub const DEFAULT_KAFKA_BROKER: &str = "localhost:29092";

/// デフォルトの送信先トピック
pub const DEFAULT_KAFKA_TOPIC: &str = "chat_raw";

/// 設定エラー
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

/// 起動設定
#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub video_id: String,
    pub kafka_broker: String,
    pub kafka_topic: String,
    pub api_base_url: String,
    pub http_timeout: Duration,
    pub retry_delay: Duration,
}

impl Config {
    /// プロセスの環境変数から読み込む（.envがあれば先に読み込む）
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            log::debug!("Loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 任意の取得関数から読み込む
    ///
    /// 空文字は未設定として扱う
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = get("YOUTUBE_API_KEY").ok_or(ConfigError::Missing("YOUTUBE_API_KEY"))?;
        let video_id =
            get("YOUTUBE_VIDEO_ID").ok_or(ConfigError::Missing("YOUTUBE_VIDEO_ID"))?;

        Ok(Self {
            api_key,
            video_id,
            kafka_broker: get("KAFKA_BROKER").unwrap_or_else(|| DEFAULT_KAFKA_BROKER.to_string()),
            kafka_topic: get("KAFKA_TOPIC").unwrap_or_else(|| DEFAULT_KAFKA_TOPIC.to_string()),
            api_base_url: get("YOUTUBE_API_BASE_URL").unwrap_or_else(|| API_BASE.to_string()),
            http_timeout: Duration::from_secs(parse_secs(
                "HTTP_TIMEOUT_SECS",
                get("HTTP_TIMEOUT_SECS"),
                HTTP_TIMEOUT_SECS,
            )?),
            retry_delay: Duration::from_secs(parse_secs(
                "RETRY_DELAY_SECS",
                get("RETRY_DELAY_SECS"),
                DEFAULT_RETRY_DELAY_SECS,
            )?),
        })
    }
}

fn parse_secs(key: &'static str, value: Option<String>, default: u64) -> Result<u64, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) => v
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or(ConfigError::Invalid { key, value: v }),
    }
}

// APIキーをログに出さない
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &mask_api_key(&self.api_key))
            .field("video_id", &self.video_id)
            .field("kafka_broker", &self.kafka_broker)
            .field("kafka_topic", &self.kafka_topic)
            .field("api_base_url", &self.api_base_url)
            .field("http_timeout", &self.http_timeout)
            .field("retry_delay", &self.retry_delay)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[
            ("YOUTUBE_API_KEY", "AIzaSyABC123def456GHI789"),
            ("YOUTUBE_VIDEO_ID", "V1"),
        ]))
        .unwrap();

        assert_eq!(config.video_id, "V1");
        assert_eq!(config.kafka_broker, "localhost:29092");
        assert_eq!(config.kafka_topic, "chat_raw");
        assert_eq!(config.api_base_url, API_BASE);
        assert_eq!(config.http_timeout, Duration::from_secs(10));
        assert_eq!(config.retry_delay, Duration::from_secs(30));
    }

    #[test]
    fn test_missing_required() {
        let err = Config::from_lookup(lookup(&[("YOUTUBE_VIDEO_ID", "V1")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("YOUTUBE_API_KEY")));

        // 空文字は未設定扱い
        let err = Config::from_lookup(lookup(&[
            ("YOUTUBE_API_KEY", "key-123456789"),
            ("YOUTUBE_VIDEO_ID", "  "),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("YOUTUBE_VIDEO_ID")));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("YOUTUBE_API_KEY", "key-123456789"),
            ("YOUTUBE_VIDEO_ID", "V1"),
            ("KAFKA_BROKER", "kafka:9092"),
            ("KAFKA_TOPIC", "chat_test"),
            ("YOUTUBE_API_BASE_URL", "http://localhost:8080"),
            ("RETRY_DELAY_SECS", "5"),
        ]))
        .unwrap();

        assert_eq!(config.kafka_broker, "kafka:9092");
        assert_eq!(config.kafka_topic, "chat_test");
        assert_eq!(config.api_base_url, "http://localhost:8080");
        assert_eq!(config.retry_delay, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_number() {
        let err = Config::from_lookup(lookup(&[
            ("YOUTUBE_API_KEY", "key-123456789"),
            ("YOUTUBE_VIDEO_ID", "V1"),
            ("RETRY_DELAY_SECS", "soon"),
        ]))
        .unwrap_err();

        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "RETRY_DELAY_SECS",
                ..
            }
        ));
    }

    #[test]
    fn test_debug_masks_api_key() {
        let config = Config::from_lookup(lookup(&[
            ("YOUTUBE_API_KEY", "AIzaSyABC123def456GHI789"),
            ("YOUTUBE_VIDEO_ID", "V1"),
        ]))
        .unwrap();

        let debug = format!("{:?}", config);
        assert!(debug.contains("AIza***I789"));
        assert!(!debug.contains("AIzaSyABC123def456GHI789"));
    }
}
