//! # Received Envelope
//!
//! Wrapper pairing a decoded message with broker infrastructure metadata.
//! The sequence number and enqueue time become valuable when leveraging the
//! broker's ordering, deduplication and partitioning capabilities.

use std::any::Any;
use std::fmt;

use chrono::{DateTime, Utc};

use super::broker::Delivery;
use super::errors::DecodeError;
use crate::pubsub::{Discriminator, Message};

/// A decoded message together with the metadata of the delivery it arrived on.
///
/// Delegates the discriminator to the wrapped message.
pub struct ReceivedEnvelope {
    pub sequence_number: i64,
    pub enqueued_at: DateTime<Utc>,
    pub message: Box<dyn Message>,
}

impl ReceivedEnvelope {
    pub fn new(message: Box<dyn Message>) -> Self {
        ReceivedEnvelope {
            sequence_number: 0,
            enqueued_at: Utc::now(),
            message,
        }
    }

    /// Wrap a decoded message, copying the metadata of its delivery.
    pub fn from_delivery(message: Box<dyn Message>, delivery: &Delivery) -> Self {
        ReceivedEnvelope {
            sequence_number: delivery.sequence_number,
            enqueued_at: delivery.enqueued_at,
            message,
        }
    }
}

impl Message for ReceivedEnvelope {
    fn discriminator(&self) -> Discriminator {
        self.message.discriminator()
    }

    fn decode_body(&mut self, body: &[u8]) -> Result<(), DecodeError> {
        self.message.decode_body(body)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Debug for ReceivedEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReceivedEnvelope")
            .field("sequence_number", &self.sequence_number)
            .field("enqueued_at", &self.enqueued_at)
            .field("discriminator", &self.message.discriminator())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pubsub::EmptyMessage;

    #[test]
    fn envelope_delegates_discriminator() {
        let inner = EmptyMessage::new(Discriminator::from("MasterData_City"));
        let envelope = ReceivedEnvelope::new(Box::new(inner));

        assert_eq!(
            envelope.discriminator(),
            Discriminator::from("MasterData_City")
        );
    }

    #[test]
    fn envelope_copies_delivery_metadata() {
        let delivery = Delivery::new("m-1", Vec::new()).with_sequence_number(42);
        let inner = EmptyMessage::new(Discriminator::EMPTY);
        let envelope = ReceivedEnvelope::from_delivery(Box::new(inner), &delivery);

        assert_eq!(envelope.sequence_number, 42);
        assert_eq!(envelope.enqueued_at, delivery.enqueued_at);
    }
}
