//! # Messaging Layer
//!
//! Broker-facing types: the [`Delivery`] handle, the [`BrokerReceiver`]
//! capability trait, the error taxonomy, the [`ReceivedEnvelope`] wrapper and
//! the decode combinators.
//!
//! The concrete broker client (connect, batch-receive, settle) lives outside
//! this crate; the pipeline consumes it through [`BrokerReceiver`] only.

pub mod broker;
pub mod codec;
pub mod envelope;
pub mod errors;

pub use broker::{BrokerReceiver, DeadLetterReason, Delivery};
pub use codec::{
    envelope_decoder, extract_discriminator, registry_decoder, typed_decoder, UnmarshalMessageFn,
};
pub use envelope::ReceivedEnvelope;
pub use errors::{BrokerError, DecodeError, RoutingError};
