pub mod config;
pub mod logging;
pub mod queue;
pub mod util; // doctestのためpubにする
pub mod youtube;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use thiserror::Error;

use config::{Config, ConfigError};
use queue::{KafkaQueue, MessagePublisher, QueueError};
use youtube::{
    client::YouTubeClient, errors::YouTubeError, poller::ChatPoller, retry::RetryPolicy,
    timer::TokioTimer,
};

/// 起動時のエラー（いずれもプロセスを異常終了させる）
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to initialize YouTube API client: {0}")]
    ApiClient(#[source] YouTubeError),

    #[error("Failed to initialize Kafka producer: {0}")]
    Queue(#[from] QueueError),

    #[error("Failed to resolve live chat: {0}")]
    Session(#[source] YouTubeError),
}

/// ログと設定を初期化してポーラーを起動
pub async fn run() -> Result<(), StartupError> {
    logging::init();

    let config = Config::from_env()?;
    log::info!("Loaded configuration: {:?}", config);

    run_with_config(config).await
}

/// クライアントを構築してポーリングを開始
///
/// アクティブなチャットがない場合は正常に戻る。開始後は戻らない。
pub async fn run_with_config(config: Config) -> Result<(), StartupError> {
    let queue = Arc::new(KafkaQueue::connect(&config.kafka_broker)?);

    let api = Arc::new(
        YouTubeClient::new(
            config.api_key.clone(),
            &config.api_base_url,
            config.http_timeout,
        )
        .map_err(StartupError::ApiClient)?,
    );

    let publisher = MessagePublisher::new(queue, config.kafka_topic.clone());
    log::info!("Publishing chat messages to topic: {}", publisher.topic());

    let mut poller = ChatPoller::new(
        api,
        publisher,
        RetryPolicy::fixed(config.retry_delay),
        TokioTimer,
    );

    poller
        .run(&config.video_id)
        .await
        .map_err(StartupError::Session)?;

    log::info!("Poller stopped without an active live chat");
    Ok(())
}
