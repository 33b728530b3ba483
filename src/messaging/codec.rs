//! # Decode Combinators
//!
//! Turning a raw [`Delivery`] into a typed [`Message`] plus its
//! discriminator. Two strategies are supported:
//!
//! - **self-describing** ([`typed_decoder`]): the raw bytes decode directly
//!   into one concrete message type whose discriminator is read afterwards;
//! - **two-phase** ([`registry_decoder`]): a partial parse extracts only the
//!   type tag, the dispatcher supplies an empty shell via `Handler::create`,
//!   and the full body is decoded into that shell. Required when the concrete
//!   type cannot be determined without registry knowledge.
//!
//! [`envelope_decoder`] layers broker metadata on top of either strategy.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::broker::Delivery;
use super::envelope::ReceivedEnvelope;
use super::errors::DecodeError;
use crate::pubsub::{Discriminator, Dispatcher, EmptyMessage, Message};

/// Injected decode function: raw delivery in, typed message out.
pub type UnmarshalMessageFn =
    Arc<dyn Fn(&Delivery) -> Result<Box<dyn Message>, DecodeError> + Send + Sync>;

/// Lightweight partial parse reading only the type tag from a JSON body.
///
/// A body without a `Type` field yields the empty discriminator rather than
/// an error; only malformed JSON fails.
pub fn extract_discriminator(body: &[u8]) -> Result<Discriminator, DecodeError> {
    #[derive(Deserialize)]
    struct PartialMessage {
        #[serde(rename = "Type", default)]
        r#type: String,
    }

    let partial: PartialMessage = serde_json::from_slice(body)?;

    Ok(Discriminator::from(partial.r#type))
}

/// Two-phase decoder driven by the handler registry.
///
/// Discriminators with no registered handler decode to [`EmptyMessage`]; the
/// consumer's handler-not-found policy then completes and discards them
/// instead of the producer dead-lettering messages that are merely
/// unregistered.
pub fn registry_decoder(dispatcher: Arc<Dispatcher>) -> UnmarshalMessageFn {
    Arc::new(move |delivery| {
        let discriminator = extract_discriminator(&delivery.body)?;

        let mut message: Box<dyn Message> = match dispatcher.dispatch(&discriminator) {
            Some(handler) => handler.create(),
            None => Box::new(EmptyMessage::new(discriminator)),
        };

        message.decode_body(&delivery.body)?;

        Ok(message)
    })
}

/// Self-describing decoder for a single concrete message type.
pub fn typed_decoder<T>() -> UnmarshalMessageFn
where
    T: Message + DeserializeOwned + 'static,
{
    Arc::new(|delivery| {
        let message: T = serde_json::from_slice(&delivery.body)?;

        Ok(Box::new(message))
    })
}

/// Wrap an inner decoder so every decoded message carries the metadata of the
/// delivery it arrived on.
pub fn envelope_decoder(inner: UnmarshalMessageFn) -> UnmarshalMessageFn {
    Arc::new(move |delivery| {
        let message = inner(delivery)?;

        Ok(Box::new(ReceivedEnvelope::from_delivery(message, delivery)))
    })
}
