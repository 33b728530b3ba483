//! # Partitioned Subscriber
//!
//! The pipeline core: one producer polls the broker on an interval, decodes
//! and routes each delivery onto one of N bounded lanes, and one consumer
//! worker per lane dispatches messages to handlers and settles them. Key
//! properties:
//!
//! - per-key ordering: deliveries sharing a partition key always land on the
//!   same lane and are processed in receive order;
//! - bounded memory: each lane holds at most [`LANE_CAPACITY`] in-flight
//!   entries, so a slow handler backpressures the producer;
//! - error containment: decode failures dead-letter, routing and handler
//!   failures abandon, the peek-lock expiry race is logged and survived, and
//!   only broker-level receive/settlement failures take the run down.

pub mod partition;

pub use partition::{fnv1a_32, lane_index, PartitionKeyFn};

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{broadcast, mpsc};
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{self, Instant};
use tracing::{debug, error, info, warn};

use crate::messaging::{
    BrokerError, BrokerReceiver, DeadLetterReason, Delivery, UnmarshalMessageFn,
};
use crate::pubsub::{Dispatcher, Message};

/// Bound on in-flight entries per lane.
pub const LANE_CAPACITY: usize = 10;

/// How the subscriber winds down after [`PartitionedSubscriber::shutdown`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShutdownMode {
    /// Consumers finish everything already enqueued on their lanes before
    /// exiting; only the producer stops immediately.
    #[serde(rename = "drain")]
    Drain,

    /// Consumers stop at the next message boundary; enqueued entries are
    /// dropped unsettled and redelivered after lock expiry.
    #[default]
    #[serde(rename = "cancel")]
    CancelInPlace,
}

/// Tuning knobs for one subscriber run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberOptions {
    pub poll_interval: Duration,
    pub messages_limit: usize,
    pub partition_count: usize,
    pub shutdown_mode: ShutdownMode,
}

impl Default for SubscriberOptions {
    fn default() -> Self {
        SubscriberOptions {
            poll_interval: Duration::from_secs(60),
            messages_limit: 1,
            partition_count: 1,
            shutdown_mode: ShutdownMode::default(),
        }
    }
}

impl SubscriberOptions {
    /// Clamp zero counts up to one; a run always has at least one lane and
    /// receives at least one message per poll.
    fn normalized(&self) -> Self {
        SubscriberOptions {
            poll_interval: self.poll_interval,
            messages_limit: self.messages_limit.max(1),
            partition_count: self.partition_count.max(1),
            shutdown_mode: self.shutdown_mode,
        }
    }
}

/// A fatal error from the producer or one consumer worker.
#[derive(Debug, Error)]
pub enum SubscriberError {
    #[error("receive failed: {source}")]
    Receive {
        #[source]
        source: BrokerError,
    },

    #[error("settlement failed during {operation}: {source}")]
    Settlement {
        operation: &'static str,
        #[source]
        source: BrokerError,
    },

    #[error("consumer worker failed: {message}")]
    Worker { message: String },
}

impl SubscriberError {
    fn receive(source: BrokerError) -> Self {
        SubscriberError::Receive { source }
    }

    fn settlement(operation: &'static str, source: BrokerError) -> Self {
        SubscriberError::Settlement { operation, source }
    }

    fn worker(err: JoinError) -> Self {
        SubscriberError::Worker {
            message: err.to_string(),
        }
    }
}

/// Aggregate outcome of a failed run: whatever felled the producer plus every
/// consumer failure, never the recoverable lock-lost races.
#[derive(Debug, Default)]
pub struct RunError {
    pub producer: Option<SubscriberError>,
    pub consumers: Vec<SubscriberError>,
}

impl RunError {
    fn is_empty(&self) -> bool {
        self.producer.is_none() && self.consumers.is_empty()
    }
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines = Vec::new();
        if let Some(producer) = &self.producer {
            lines.push(format!("producer: {producer}"));
        }
        for consumer in &self.consumers {
            lines.push(format!("consumer: {consumer}"));
        }
        f.write_str(&lines.join("\n"))
    }
}

impl std::error::Error for RunError {}

/// One decoded message travelling a lane together with its broker handle.
struct LaneEntry {
    message: Box<dyn Message>,
    delivery: Delivery,
}

/// Peek-lock subscriber with partitioned, backpressured dispatch.
///
/// Construct once, then [`run`](Self::run) until [`shutdown`](Self::shutdown)
/// is called from another task or a fatal broker error occurs. Lanes are
/// created per run, so a subscriber can be run again after a clean shutdown.
pub struct PartitionedSubscriber {
    receiver: Arc<dyn BrokerReceiver>,
    dispatcher: Arc<Dispatcher>,
    unmarshal_message: UnmarshalMessageFn,
    partition_key: PartitionKeyFn,
    options: SubscriberOptions,
    shutdown_tx: broadcast::Sender<()>,
}

impl PartitionedSubscriber {
    pub fn new(
        receiver: Arc<dyn BrokerReceiver>,
        dispatcher: Arc<Dispatcher>,
        unmarshal_message: UnmarshalMessageFn,
        partition_key: PartitionKeyFn,
        options: SubscriberOptions,
    ) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        PartitionedSubscriber {
            receiver,
            dispatcher,
            unmarshal_message,
            partition_key,
            options,
            shutdown_tx,
        }
    }

    /// Signal the running pipeline to stop. Safe to call from any task and
    /// more than once; a no-op when nothing is running.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Run the pipeline until shutdown or a fatal error.
    ///
    /// A shutdown-initiated stop is a clean `Ok(())`; fatal producer and
    /// consumer errors are collected into one [`RunError`].
    pub async fn run(&self) -> Result<(), RunError> {
        let options = self.options.normalized();
        let lane_count = options.partition_count;

        info!(
            lanes = lane_count,
            messages_limit = options.messages_limit,
            poll_interval_ms = options.poll_interval.as_millis() as u64,
            shutdown_mode = ?options.shutdown_mode,
            "subscriber starting"
        );

        let mut lanes = Vec::with_capacity(lane_count);
        let mut workers: Vec<JoinHandle<Result<(), SubscriberError>>> =
            Vec::with_capacity(lane_count);

        for lane in 0..lane_count {
            let (tx, rx) = mpsc::channel::<LaneEntry>(LANE_CAPACITY);
            lanes.push(tx);

            // in drain mode the lane closing is the only stop condition
            let shutdown = match options.shutdown_mode {
                ShutdownMode::Drain => None,
                ShutdownMode::CancelInPlace => Some(self.shutdown_tx.subscribe()),
            };

            let receiver = Arc::clone(&self.receiver);
            let dispatcher = Arc::clone(&self.dispatcher);
            let shutdown_tx = self.shutdown_tx.clone();

            workers.push(tokio::spawn(async move {
                let result = consume(lane, receiver, dispatcher, rx, shutdown).await;

                // a dead consumer takes the whole run down
                if result.is_err() {
                    let _ = shutdown_tx.send(());
                }

                result
            }));
        }

        let produced = self.produce(&lanes, &options).await;

        // closing the lanes lets draining consumers run dry and exit
        drop(lanes);

        if produced.is_err() {
            let _ = self.shutdown_tx.send(());
        }

        let mut outcome = RunError {
            producer: produced.err(),
            consumers: Vec::new(),
        };

        for worker in workers {
            match worker.await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => outcome.consumers.push(err),
                Err(err) => outcome.consumers.push(SubscriberError::worker(err)),
            }
        }

        if outcome.is_empty() {
            info!("subscriber stopped");
            Ok(())
        } else {
            error!(error = %outcome, "subscriber failed");
            Err(outcome)
        }
    }

    /// Poll loop: receive a batch every tick, decode, route and enqueue.
    async fn produce(
        &self,
        lanes: &[mpsc::Sender<LaneEntry>],
        options: &SubscriberOptions,
    ) -> Result<(), SubscriberError> {
        let mut shutdown = self.shutdown_tx.subscribe();
        let first_tick = Instant::now() + options.poll_interval;
        let mut ticker = time::interval_at(first_tick, options.poll_interval);

        loop {
            tokio::select! {
                biased;
                _ = shutdown.recv() => {
                    debug!("producer stopping");
                    return Ok(());
                }
                _ = ticker.tick() => {}
            }

            let batch = self
                .receiver
                .receive_batch(options.messages_limit)
                .await
                .map_err(SubscriberError::receive)?;

            for delivery in batch {
                let message = match (self.unmarshal_message)(&delivery) {
                    Ok(message) => message,
                    Err(err) => {
                        let reason = DeadLetterReason::new("UnmarshalMessageError", err.to_string());
                        dead_letter_delivery(self.receiver.as_ref(), &delivery, reason).await?;
                        continue;
                    }
                };

                let key = match (self.partition_key)(message.as_ref()) {
                    Ok(key) => key,
                    Err(err) => {
                        warn!(
                            message_id = %delivery.message_id,
                            error = %err,
                            "failed to compute partition key"
                        );
                        abandon_delivery(self.receiver.as_ref(), &delivery).await?;
                        continue;
                    }
                };

                let lane = partition::lane_index(&key, lanes.len());
                let entry = LaneEntry { message, delivery };

                // reserve-then-send keeps the entry ours until a slot exists,
                // so a shutdown during backpressure can still abandon it
                tokio::select! {
                    biased;
                    _ = shutdown.recv() => {
                        abandon_delivery(self.receiver.as_ref(), &entry.delivery).await?;
                        debug!("producer stopping");
                        return Ok(());
                    }
                    permit = lanes[lane].reserve() => match permit {
                        Ok(permit) => permit.send(entry),
                        Err(_) => {
                            abandon_delivery(self.receiver.as_ref(), &entry.delivery).await?;
                            return Ok(());
                        }
                    },
                }
            }
        }
    }
}

/// One lane's consumer: dispatch each entry to its handler, then settle.
async fn consume(
    lane: usize,
    receiver: Arc<dyn BrokerReceiver>,
    dispatcher: Arc<Dispatcher>,
    mut entries: mpsc::Receiver<LaneEntry>,
    mut shutdown: Option<broadcast::Receiver<()>>,
) -> Result<(), SubscriberError> {
    loop {
        let next = match &mut shutdown {
            Some(signal) => tokio::select! {
                biased;
                _ = signal.recv() => {
                    debug!(lane, "consumer cancelled");
                    return Ok(());
                }
                entry = entries.recv() => entry,
            },
            None => entries.recv().await,
        };

        let Some(entry) = next else {
            debug!(lane, "consumer lane closed");
            return Ok(());
        };

        let discriminator = entry.message.discriminator();

        let handler = match dispatcher.dispatch(&discriminator) {
            Some(handler) => handler,
            None => {
                info!(
                    lane,
                    discriminator = %discriminator,
                    message_id = %entry.delivery.message_id,
                    "message handler was not found"
                );
                complete_delivery(receiver.as_ref(), &entry.delivery).await?;
                continue;
            }
        };

        match handler.handle(entry.message.as_ref()).await {
            Ok(()) => complete_delivery(receiver.as_ref(), &entry.delivery).await?,
            Err(err) => {
                warn!(
                    lane,
                    discriminator = %discriminator,
                    message_id = %entry.delivery.message_id,
                    error = %err,
                    "message handler failed"
                );
                abandon_delivery(receiver.as_ref(), &entry.delivery).await?;
            }
        }
    }
}

async fn complete_delivery(
    receiver: &dyn BrokerReceiver,
    delivery: &Delivery,
) -> Result<(), SubscriberError> {
    match receiver.complete(delivery).await {
        Ok(()) => Ok(()),
        Err(err) if err.is_lock_lost() => {
            warn!(
                message_id = %delivery.message_id,
                "message lock was lost while trying to complete the message"
            );
            Ok(())
        }
        Err(err) => Err(SubscriberError::settlement("complete", err)),
    }
}

async fn abandon_delivery(
    receiver: &dyn BrokerReceiver,
    delivery: &Delivery,
) -> Result<(), SubscriberError> {
    error!(message_id = %delivery.message_id, "message was abandoned");

    match receiver.abandon(delivery).await {
        Ok(()) => Ok(()),
        Err(err) if err.is_lock_lost() => {
            warn!(
                message_id = %delivery.message_id,
                "message lock was lost while trying to abandon the message"
            );
            Ok(())
        }
        Err(err) => Err(SubscriberError::settlement("abandon", err)),
    }
}

async fn dead_letter_delivery(
    receiver: &dyn BrokerReceiver,
    delivery: &Delivery,
    reason: DeadLetterReason,
) -> Result<(), SubscriberError> {
    error!(
        message_id = %delivery.message_id,
        reason = %reason.reason,
        description = %reason.description,
        "message was dead lettered"
    );

    match receiver.dead_letter(delivery, reason).await {
        Ok(()) => Ok(()),
        Err(err) if err.is_lock_lost() => {
            warn!(
                message_id = %delivery.message_id,
                "message lock was lost while trying to dead letter the message"
            );
            Ok(())
        }
        Err(err) => Err(SubscriberError::settlement("dead_letter", err)),
    }
}
