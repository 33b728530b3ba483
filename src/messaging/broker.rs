//! # Broker Capability
//!
//! The narrow interface the pipeline consumes from a peek-lock broker
//! client: batch receive plus the three settlement actions. Concrete clients
//! (Azure Service Bus and friends) implement [`BrokerReceiver`] outside this
//! crate.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::errors::BrokerError;

/// The broker's handle to one received item.
///
/// Carries the raw body plus broker-assigned metadata. A delivery is settled
/// exactly once per successful pass; a second settlement call is an error
/// condition to avoid, not a defined recovery.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub message_id: String,
    pub sequence_number: i64,
    pub enqueued_at: DateTime<Utc>,
    pub delivery_count: u32,
    pub body: Vec<u8>,
}

impl Delivery {
    pub fn new(message_id: impl Into<String>, body: Vec<u8>) -> Self {
        Delivery {
            message_id: message_id.into(),
            sequence_number: 0,
            enqueued_at: Utc::now(),
            delivery_count: 1,
            body,
        }
    }

    pub fn with_sequence_number(mut self, sequence_number: i64) -> Self {
        self.sequence_number = sequence_number;
        self
    }
}

/// Structured reason attached to a dead-lettered delivery.
#[derive(Debug, Clone)]
pub struct DeadLetterReason {
    pub reason: String,
    pub description: String,
}

impl DeadLetterReason {
    pub fn new(reason: impl Into<String>, description: impl Into<String>) -> Self {
        DeadLetterReason {
            reason: reason.into(),
            description: description.into(),
        }
    }
}

/// Receive-and-settle capability of a peek-lock broker subscription.
///
/// Any of the four calls may report [`BrokerError::LockLost`]; callers treat
/// that as an expected, recoverable race.
#[async_trait]
pub trait BrokerReceiver: Send + Sync {
    /// Receive up to `limit` deliveries in one broker call.
    async fn receive_batch(&self, limit: usize) -> Result<Vec<Delivery>, BrokerError>;

    /// Settle a delivery as successfully consumed.
    async fn complete(&self, delivery: &Delivery) -> Result<(), BrokerError>;

    /// Return a delivery for redelivery.
    async fn abandon(&self, delivery: &Delivery) -> Result<(), BrokerError>;

    /// Move a delivery to the dead-letter queue with a structured reason.
    async fn dead_letter(
        &self,
        delivery: &Delivery,
        reason: DeadLetterReason,
    ) -> Result<(), BrokerError>;
}
