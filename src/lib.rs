//! # Sync Core
//!
//! Partitioned peek-lock subscriber pipeline for tenant synchronization
//! events. One producer polls a broker subscription, decodes raw deliveries
//! into typed events and routes them by partition key onto bounded lanes;
//! per-lane consumer workers dispatch to registered handlers and settle each
//! delivery (complete, abandon or dead-letter).
//!
//! ## Layout
//!
//! - [`pubsub`]: message/handler contracts and the dispatcher registry
//! - [`messaging`]: broker capability trait, deliveries, errors and decoders
//! - [`events`]: the synchronization event model (master data, partner, HR)
//! - [`handlers`]: per-event handlers and the partition-key function
//! - [`subscriber`]: the partitioned producer/consumer pipeline
//! - [`config`]: environment-driven settings
//! - [`logging`]: tracing initialization
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use sync_core::config::SubscriberConfig;
//! use sync_core::messaging::{envelope_decoder, registry_decoder, BrokerReceiver};
//! use sync_core::pubsub::Dispatcher;
//! use sync_core::subscriber::PartitionedSubscriber;
//! use sync_core::{handlers, logging};
//!
//! # async fn run(receiver: Arc<dyn BrokerReceiver>) -> anyhow::Result<()> {
//! logging::init_logging();
//!
//! let mut dispatcher = Dispatcher::new();
//! handlers::register_all(&mut dispatcher);
//! let dispatcher = Arc::new(dispatcher);
//!
//! let subscriber = PartitionedSubscriber::new(
//!     receiver,
//!     Arc::clone(&dispatcher),
//!     envelope_decoder(registry_decoder(dispatcher)),
//!     handlers::partition_key_fn(),
//!     SubscriberConfig::from_env()?.options(),
//! );
//!
//! subscriber.run().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod events;
pub mod handlers;
pub mod logging;
pub mod messaging;
pub mod pubsub;
pub mod subscriber;

pub use messaging::{BrokerReceiver, DeadLetterReason, Delivery};
pub use pubsub::{Discriminator, Dispatcher, Handler, Message};
pub use subscriber::{PartitionedSubscriber, RunError, ShutdownMode, SubscriberOptions};
