use std::sync::{Arc, Mutex};
use std::time::Duration;

use ::kafka::producer::{Producer, Record, RequiredAcks};
use async_trait::async_trait;

use super::{QueueClient, QueueError};

/// ブローカーからのACK待ちタイムアウト
const ACK_TIMEOUT_SECS: u64 = 5;

/// Kafkaプロデューサー
///
/// プロデューサーはブロッキングAPIのため、送信はブロッキングスレッドで行う
pub struct KafkaQueue {
    producer: Arc<Mutex<Producer>>,
}

impl KafkaQueue {
    /// ブローカーに接続してプロデューサーを作成
    pub fn connect(broker: &str) -> Result<Self, QueueError> {
        let producer = Producer::from_hosts(vec![broker.to_string()])
            .with_ack_timeout(Duration::from_secs(ACK_TIMEOUT_SECS))
            .with_required_acks(RequiredAcks::One)
            .create()?;

        log::info!("Kafka producer initialized (broker: {})", broker);

        Ok(Self {
            producer: Arc::new(Mutex::new(producer)),
        })
    }
}

#[async_trait]
impl QueueClient for KafkaQueue {
    async fn send(&self, topic: &str, payload: Vec<u8>) -> Result<(), QueueError> {
        let producer = Arc::clone(&self.producer);
        let topic = topic.to_string();

        tokio::task::spawn_blocking(move || {
            let mut producer = producer.lock().map_err(|e| {
                log::error!("Failed to acquire producer lock: {}", e);
                QueueError::Unavailable("producer lock poisoned".to_string())
            })?;
            producer.send(&Record::from_value(&topic, payload.as_slice()))?;
            Ok::<(), QueueError>(())
        })
        .await
        .map_err(|e| QueueError::Unavailable(format!("send task failed: {}", e)))?
    }
}
