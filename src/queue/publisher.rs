use std::sync::Arc;

use super::{QueueClient, QueueError};
use crate::youtube::types::ChatMessage;

/// チャットメッセージを固定トピックへ送信する
pub struct MessagePublisher<Q> {
    queue: Arc<Q>,
    topic: String,
}

impl<Q: QueueClient> MessagePublisher<Q> {
    pub fn new(queue: Arc<Q>, topic: impl Into<String>) -> Self {
        Self {
            queue,
            topic: topic.into(),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// 1件送信（ACKを受け取るまで待つ）
    pub async fn publish(&self, message: &ChatMessage) -> Result<(), QueueError> {
        let payload = serde_json::to_vec(message)?;
        self.queue.send(&self.topic, payload).await?;

        log::info!("Sent message to {}: {}", self.topic, message.message);
        Ok(())
    }
}
