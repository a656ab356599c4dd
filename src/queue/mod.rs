// =============================================================================
// メッセージキュー連携モジュール
// =============================================================================
// 正規化したチャットメッセージをKafkaトピックへ再送信する
//
// 機能:
// - QueueClient: キュー送信の抽象（テストではダブルに差し替え）
// - KafkaQueue: Kafkaブローカーへの同期送信（ACK待ち）
// - MessagePublisher: ChatMessageをJSON化して固定トピックへ送信
// =============================================================================

mod kafka;
mod publisher;

pub use self::kafka::KafkaQueue;
pub use self::publisher::MessagePublisher;

use async_trait::async_trait;
use thiserror::Error;

/// キュー送信エラー
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Failed to serialize message: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Kafka error: {0}")]
    Kafka(#[from] ::kafka::Error),

    #[error("Queue client unavailable: {0}")]
    Unavailable(String),
}

/// キューへの送信を行うクライアント
///
/// `send` はブローカーがレコードを受理するまで戻らない
#[async_trait]
pub trait QueueClient: Send + Sync {
    async fn send(&self, topic: &str, payload: Vec<u8>) -> Result<(), QueueError>;
}
